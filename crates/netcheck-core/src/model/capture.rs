use super::Phase;
use crate::dialect::Vendor;
use chrono::{DateTime, Utc};

/// Raw CLI text for one device at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct RawCapture {
    pub device_id: String,
    pub phase: Phase,
    pub vendor: Vendor,
    pub body: CaptureBody,
    pub captured_at: Option<DateTime<Utc>>,
}

/// How the transport handed over the output
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureBody {
    /// A single session transcript with prompts and command echoes
    Transcript(String),
    /// Already split into (command as typed, output) pairs
    Blocks(Vec<(String, String)>),
}

impl RawCapture {
    pub fn transcript(
        device_id: impl Into<String>,
        phase: Phase,
        vendor: Vendor,
        text: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            phase,
            vendor,
            body: CaptureBody::Transcript(text.into()),
            captured_at: None,
        }
    }

    pub fn blocks(
        device_id: impl Into<String>,
        phase: Phase,
        vendor: Vendor,
        blocks: Vec<(String, String)>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            phase,
            vendor,
            body: CaptureBody::Blocks(blocks),
            captured_at: None,
        }
    }

    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }
}
