//! Capture fixtures for engine tests

#![allow(dead_code)]

use netcheck_core::dialect::Vendor;
use netcheck_core::model::CaptureBody;
use netcheck_core::schema::SchemaRegistry;
use netcheck_engine::{CaptureSource, DeviceJob};
use std::sync::Arc;

pub const TERSE_UP: &str = "Interface               Admin Link Proto    Local                 Remote
ge-0/0/0                up    up
ge-0/0/0.0              up    up   inet     10.0.0.1/24";

pub const TERSE_DOWN: &str = "Interface               Admin Link Proto    Local                 Remote
ge-0/0/0                up    down
ge-0/0/0.0              up    down inet     10.0.0.1/24";

pub const BGP: &str = "Peer                     AS      InPkt     OutPkt    OutQ   Flaps Last Up/Dwn State|#Active/Received/Accepted/Damped...
10.0.0.2              65002       1520       1530       0       0    11:22:33 Establ";

pub fn transcript(host: &str, blocks: &[(&str, &str)]) -> String {
    let mut out = String::from("--- JUNOS 21.4R3-S5.4 Kernel 64-bit\n");
    for (command, output) in blocks {
        out.push_str(&format!("{{master}}\nadmin@{}> {} | no-more\n{}\n\n", host, command, output));
    }
    out.push_str(&format!("{{master}}\nadmin@{}> \n", host));
    out
}

pub fn inline(text: String) -> CaptureSource {
    CaptureSource::Inline(CaptureBody::Transcript(text))
}

/// Device whose interfaces stay up (`pass`) or go down (`fail`)
pub fn job(device_id: &str, regress: bool) -> DeviceJob {
    let post = if regress { TERSE_DOWN } else { TERSE_UP };
    DeviceJob::new(
        device_id,
        Vendor::Junos,
        inline(transcript(
            device_id,
            &[("show interfaces terse", TERSE_UP), ("show bgp summary", BGP)],
        )),
        inline(transcript(
            device_id,
            &[("show interfaces terse", post), ("show bgp summary", BGP)],
        )),
    )
}

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::builtin().expect("builtin schemas load"))
}
