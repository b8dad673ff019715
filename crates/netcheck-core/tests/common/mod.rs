//! Shared capture fixtures and pipeline helpers

#![allow(dead_code)]

use netcheck_core::dialect::Vendor;
use netcheck_core::errors::ExErrorKind;
use netcheck_core::failure::Failure;
use netcheck_core::model::{CommandId, Phase};
use netcheck_core::schema::SchemaRegistry;
use netcheck_core::segment::segment;
use netcheck_core::snapshot::{Snapshot, SnapshotBuilder};

pub const DEVICE: &str = "mx80-lab";

pub const JUNOS_BANNER: &str = "Last login: Sun Oct 18 09:12:44 2026 from 10.10.10.10

--- JUNOS 21.4R3-S5.4 Kernel 64-bit  JNPR-12.1-20230321.8b9c6d1_buil
";

pub const VERSION_PRE: &str = "Hostname: mx80-lab
Model: mx80
Junos: 21.4R3-S5.4
JUNOS Base OS boot [21.4R3-S5.4]";

pub const VERSION_POST: &str = "Hostname: mx80-lab
Model: mx80
Junos: 22.4R2-S2.6
JUNOS Base OS boot [22.4R2-S2.6]";

pub const TERSE_PRE: &str = "Interface               Admin Link Proto    Local                 Remote
ge-0/0/0                up    up
ge-0/0/0.0              up    up   inet     10.0.0.1/24
                                   inet6    fe80::5668:a3ff:fe1e:1/64
ge-0/0/1                up    up
ge-0/0/1.0              up    up   inet     10.0.1.1/24
lo0                     up    up
lo0.0                   up    up   inet     10.255.0.1          --> 0/0";

pub const TERSE_POST: &str = "Interface               Admin Link Proto    Local                 Remote
ge-0/0/0                up    up
ge-0/0/0.0              up    up   inet     10.0.0.1/24
                                   inet6    fe80::5668:a3ff:fe1e:1/64
ge-0/0/1                up    down
ge-0/0/1.0              up    down inet     10.0.1.1/24
lo0                     up    up
lo0.0                   up    up   inet     10.255.0.1          --> 0/0";

pub const BGP_PRE: &str = "Threading mode: BGP I/O
Groups: 1 Peers: 2 Down peers: 0
Table          Tot Paths  Act Paths Suppressed    History Damp State    Pending
inet.0
                      10          5          0          0          0          0
Peer                     AS      InPkt     OutPkt    OutQ   Flaps Last Up/Dwn State|#Active/Received/Accepted/Damped...
10.0.0.2              65002       1520       1530       0       0    11:22:33 Establ
  inet.0: 5/10/10/0
10.0.1.2              65003        900        905       0       1     8:01:02 Establ
  inet.0: 0/0/0/0";

/// Counters moved, one session is down and the table is paginated
pub const BGP_POST: &str = "Threading mode: BGP I/O
Groups: 1 Peers: 2 Down peers: 1
Table          Tot Paths  Act Paths Suppressed    History Damp State    Pending
inet.0
                      10          5          0          0          0          0
Peer                     AS      InPkt     OutPkt    OutQ   Flaps Last Up/Dwn State|#Active/Received/Accepted/Damped...
---(more 60%)---
10.0.0.2              65002         42         44       3       0       12:01 Establ
  inet.0: 5/10/10/0
10.0.1.2              65003          0          0       0       2       11:58 Active";

/// Uptime over a day prints in two tokens, which defeats column counting
pub const BGP_LONG_UPTIME: &str = "Peer                     AS      InPkt     OutPkt    OutQ   Flaps Last Up/Dwn State|#Active/Received/Accepted/Damped...
10.0.0.2              65002      98120      98200       0       0  2d 3:04:05 Establ
  inet.0: 5/10/10/0
10.0.1.2              65003        900        905       0       1     8:01:02 Establ";

pub const ROUTES_PRE: &str = "
inet.0: 4 destinations, 4 routes (4 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

10.0.0.0/24        *[Direct/0] 5d 03:10:11
                    > via ge-0/0/0.0
10.0.0.1/32        *[Local/0] 5d 03:10:11
                      Local via ge-0/0/0.0
10.0.1.0/24        *[OSPF/10] 2d 01:00:00, metric 2
                    > to 10.0.0.2 via ge-0/0/0.0
10.20.0.0/16       *[BGP/170] 11:22:33, localpref 100
                      AS path: 65002 I, validation-state: unverified
                    > to 10.0.0.2 via ge-0/0/0.0";

pub const ROUTES_POST: &str = "
inet.0: 4 destinations, 4 routes (4 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

10.0.0.0/24        *[Direct/0] 00:04:10
                    > via ge-0/0/0.0
10.0.0.1/32        *[Local/0] 00:04:10
                      Local via ge-0/0/0.0
10.0.2.0/24        *[OSPF/10] 00:03:55, metric 2
                    > to 10.0.0.2 via ge-0/0/0.0
10.20.0.0/16       *[BGP/170] 00:03:40, localpref 100
                      AS path: 65002 I, validation-state: unverified
                    > to 10.0.0.2 via ge-0/0/0.0";

pub const BFD: &str = "                                                  Detect   Transmit
Address                  State     Interface      Time     Interval  Multiplier
10.0.0.2                 Up        ge-0/0/0.0     0.900     0.300        3

1 sessions, 1 clients
Cumulative transmit rate 3.3 pps, cumulative receive rate 3.3 pps";

pub const ARP: &str = "MAC Address       Address         Interface                Flags
00:05:86:71:4d:01 10.0.0.2        ge-0/0/0.0               none
00:05:86:71:4d:02 10.0.1.2        ge-0/0/1.0               none
Total entries: 2";

pub const VRRP: &str = "Interface     State       Group   VR state       VR Mode    Type   Address
ge-0/0/0.0    up              1   master          Active    lcl    10.0.0.1
                                                            vip    10.0.0.254
ge-0/0/1.0    up              2   backup          Active    lcl    10.0.1.1
                                                            mas    10.0.1.3
                                                            vip    10.0.1.254";

pub const LLDP: &str = "Local Interface    Parent Interface    Chassis Id          Port info          System Name
ge-0/0/0           -                   00:05:86:71:4d:00   ge-0/0/1           peer-r1
ge-0/0/1           -                   00:05:86:71:4e:00   ge-0/0/3           peer-r2";

pub const ISIS: &str = "Interface             System         L State        Hold (secs) SNPA
ge-0/0/0.0            peer-r1        2  Up                   23  0:5:86:71:4d:1
ge-0/0/1.0            peer-r2        2  Up                   25  0:5:86:71:4e:1";

pub const ISIS_EXTENSIVE: &str = "peer-r1
  Interface: ge-0/0/0.0, Level: 2, State: Up, Expires in 24 secs
  Priority: 0, Up/Down transitions: 1, Last transition: 2w1d 03:04:05 ago
  Circuit type: 2, Speaks: IP, IPv6, MAC address: 0:5:86:71:4d:1
  Topologies: Unicast
  Restart capable: Yes, Adjacency advertisement: Advertise
  IP addresses: 10.0.0.2
  Transition log:
  When                  State        Event           Reason
  Sun Oct  4 06:08:39   Up           Seenself
peer-r2
  Interface: ge-0/0/1.0, Level: 2, State: Up, Expires in 25 secs
  Priority: 0, Up/Down transitions: 3, Last transition: 1d 02:00:00 ago
  Circuit type: 2, Speaks: IP, IPv6, MAC address: 0:5:86:71:4e:1
  IP addresses: 10.0.1.2";

pub const BGP_NEIGHBOR: &str = "Peer: 10.0.0.2+179 AS 65002    Local: 10.0.0.1+54321 AS 65001
  Description: to-peer-r1
  Group: ebgp-peers            Routing-Instance: master
  Type: External    State: Established    Flags: <Sync>
  Last State: OpenConfirm   Last Event: RecvKeepAlive
  Last Error: None
  Options: <Preference PeerAS Refresh>
  Holdtime: 90 Preference: 170
  Number of flaps: 0
  Peer ID: 10.255.0.2      Local ID: 10.255.0.1       Active Holdtime: 90
  Keepalive Interval: 30         Group index: 0    Peer index: 0
  Table inet.0 Bit: 20000
    RIB State: BGP restart is complete
    Send state: in sync
    Active prefixes:              12
    Received prefixes:            14
    Accepted prefixes:            14
Peer: 10.0.1.2 AS 65003    Local: 10.0.1.1 AS 65001
  Group: ebgp-peers            Routing-Instance: master
  Type: External    State: Active         Flags: <>
  Last State: Idle          Last Event: Start
  Last Error: Cease
  Number of flaps: 2";

pub const ROUTE_SUMMARY: &str = "Autonomous system number: 65001
Router ID: 10.255.0.1

inet.0: 25 destinations, 27 routes (25 active, 0 holddown, 0 hidden)
              Direct:      6 routes,      6 active
               Local:      6 routes,      6 active
                 BGP:     10 routes,      8 active
               IS-IS:      5 routes,      5 active

inet.3: 2 destinations, 2 routes (2 active, 0 holddown, 0 hidden)
                RSVP:      2 routes,      2 active

mpls.0: 7 destinations, 7 routes (7 active, 0 holddown, 0 hidden)
                MPLS:      3 routes,      3 active
                RSVP:      4 routes,      4 active";

pub const RSVP_NEIGHBOR: &str = "RSVP neighbor: 2 learned
Address            Idle Up/Dn LastChange HelloInt HelloTx/Rx MsgRcvd
10.0.0.2              0  1/0    3:04:05        9  1201/1198     2311
10.0.1.2              0  3/2    1:12:01        9   480/479       912";

pub const RSVP_NEIGHBOR_LONG_UPTIME: &str = "RSVP neighbor: 1 learned
Address            Idle Up/Dn LastChange HelloInt HelloTx/Rx MsgRcvd
10.0.0.2              0  1/0  2w1d 3:04:05     9  9811/9800    19002";

pub const RSVP_SESSION: &str = "Ingress RSVP: 2 sessions
To              From            State   Rt Style Labelin Labelout LSPname
10.255.0.2      10.255.0.1      Up       0  1 FF       -   299776 to-pe2
10.255.0.3      10.255.0.1      Dn       0  1 FF       -        - to-pe3
Total 2 displayed, Up 1, Down 1

Egress RSVP: 1 sessions
To              From            State   Rt Style Labelin Labelout LSPname
10.255.0.1      10.255.0.2      Up       0  1 FF       3        - from-pe2
Total 1 displayed, Up 1, Down 0

Transit RSVP: 0 sessions
Total 0 displayed, Up 0, Down 0";

pub const MPLS_LSP: &str = "Ingress LSP: 2 sessions
To              From            State Rt P     ActivePath       LSPname
10.255.0.2      10.255.0.1      Up     0 *                      to-pe2
10.255.0.3      10.255.0.1      Up     0 *     secondary-path   to-pe3
Total 2 displayed, Up 2, Down 0

Egress LSP: 1 sessions
To              From            State   Rt Style Labelin Labelout LSPname
10.255.0.1      10.255.0.2      Up       0  1 FF       3        - from-pe2
Total 1 displayed, Up 1, Down 0

Transit LSP: 0 sessions
Total 0 displayed, Up 0, Down 0";

pub const MPLS_LSP_P2MP: &str = "Ingress LSP: 1 sessions
P2MP name: vpls-tree, P2MP branch count: 2
To              From            State Rt P     ActivePath       LSPname
10.255.0.2      10.255.0.1      Up     0 *                      branch-pe2
10.255.0.3      10.255.0.1      Up     0 *                      branch-pe3
Total 2 displayed, Up 2, Down 0";

pub const INET3: &str = "inet.3: 2 destinations, 2 routes (2 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

10.255.0.2/32      *[RSVP/7/1] 2w1d 03:04:05, metric 20
                    > to 10.0.0.2 via ge-0/0/0.0, label-switched-path to-pe2
10.255.0.3/32      *[LDP/9] 1d 02:00:00, metric 1
                    > to 10.0.1.2 via ge-0/0/1.0, Push 299792";

pub const MPLS0: &str = "mpls.0: 4 destinations, 4 routes (4 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

0                  *[MPLS/0] 2w1d 03:04:05, metric 1
                      Receive
1                  *[MPLS/0] 2w1d 03:04:05, metric 1
                      Receive
299776             *[RSVP/7/1] 1d 02:00:00, metric 1
                    > to 10.0.0.2 via ge-0/0/0.0, label-switched-path to-pe2
299792(S=0)        *[LDP/9] 1d 02:00:00, metric 1
                    > to 10.0.1.2 via ge-0/0/1.0, Pop";

pub const MPLS_INTERFACE: &str = "Interface        State       Administrative groups (x: extended)
ge-0/0/0.0       Up         <none>
ge-0/0/1.0       Up         gold silver";

pub const IOS_BRIEF: &str = "Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
GigabitEthernet0/1     unassigned      YES NVRAM  administratively down down
Loopback0              10.255.0.1      YES NVRAM  up                    up";

/// Junos session transcript: banner, then each command behind a prompt
#[allow(dead_code)]
pub fn junos_transcript(blocks: &[(&str, &str)]) -> String {
    let mut out = String::from(JUNOS_BANNER);
    for (command, output) in blocks {
        out.push_str("\n{master}\n");
        out.push_str(&format!("admin@{}> {} | no-more\n", DEVICE, command));
        out.push_str(output);
        out.push('\n');
    }
    out.push_str(&format!("\n{{master}}\nadmin@{}> \n", DEVICE));
    out
}

/// IOS session transcript with exec timestamps
#[allow(dead_code)]
pub fn ios_transcript(blocks: &[(&str, &str)]) -> String {
    let mut out = String::from("\r\nUser Access Verification\r\n\r\ncore-sw1>enable\r\n");
    for (command, output) in blocks {
        out.push_str(&format!("core-sw1#{}\r\n", command));
        out.push_str("Load for five secs: 2%/0%; one minute: 1%; five minutes: 1%\r\n");
        out.push_str("Time source is NTP, 09:12:44.123 UTC Sun Oct 18 2026\r\n\r\n");
        out.push_str(&output.replace('\n', "\r\n"));
        out.push_str("\r\n");
    }
    out.push_str("core-sw1#\r\n");
    out
}

#[allow(dead_code)]
pub fn all_junos_pre() -> String {
    junos_transcript(&[
        ("show version", VERSION_PRE),
        ("show interfaces terse", TERSE_PRE),
        ("show arp no-resolve", ARP),
        ("show vrrp summary", VRRP),
        ("show lldp neighbors", LLDP),
        ("show bfd session", BFD),
        ("show bgp summary", BGP_PRE),
        ("show route table inet.0", ROUTES_PRE),
        ("show isis adjacency", ISIS),
    ])
}

#[allow(dead_code)]
pub fn all_junos_post() -> String {
    junos_transcript(&[
        ("show version", VERSION_POST),
        ("show interfaces terse", TERSE_POST),
        ("show arp no-resolve", ARP),
        ("show vrrp summary", VRRP),
        ("show lldp neighbors", LLDP),
        ("show bfd session", BFD),
        ("show bgp summary", BGP_POST),
        ("show route table inet.0", ROUTES_POST),
        ("show isis adjacency", ISIS),
    ])
}

#[allow(dead_code)]
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::builtin().expect("builtin schemas load")
}

/// Segment, parse and assemble a snapshot the way the engine pipeline does
#[allow(dead_code)]
pub fn snapshot_from(registry: &SchemaRegistry, vendor: Vendor, phase: Phase, text: &str) -> Snapshot {
    let dialect = vendor.dialect();
    let segmentation = segment(text, dialect, registry).expect("capture segments");
    let mut builder = SnapshotBuilder::new(DEVICE, phase);
    for block in segmentation.blocks() {
        let Some(entry) = registry.get(&block.command) else {
            continue;
        };
        match dialect.parse(entry, &block.output) {
            Ok(parsed) => {
                if let Err(err) = builder.insert_command(block.command.clone(), parsed.records) {
                    builder.exclude(
                        block.command.clone(),
                        Failure::new(ExErrorKind::DuplicateKey, DEVICE, err.to_string())
                            .with_command(block.command.clone()),
                    );
                }
            }
            Err(failure) => builder.exclude(
                block.command.clone(),
                Failure::new(ExErrorKind::ParseFailure, DEVICE, failure.reason)
                    .with_phase(phase)
                    .with_command(block.command.clone()),
            ),
        }
    }
    builder.build().expect("snapshot builds")
}

#[allow(dead_code)]
pub fn cmd(text: &str) -> CommandId {
    CommandId::new(text)
}
