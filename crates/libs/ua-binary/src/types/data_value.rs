use super::{DateTime, StatusCode, Variant};

/// A value with its quality and timestamps.
///
/// Each optional field is written only when present *and* different from its
/// default: a `GOOD` status, a `MIN` timestamp or zero picoseconds are
/// indistinguishable from an absent field once encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status: Option<StatusCode>,
    pub source_timestamp: Option<DateTime>,
    pub server_timestamp: Option<DateTime>,
    pub source_picoseconds: Option<u16>,
    pub server_picoseconds: Option<u16>,
}

impl DataValue {
    pub const VALUE: u8 = 0x01;
    pub const STATUS: u8 = 0x02;
    pub const SOURCE_TIMESTAMP: u8 = 0x04;
    pub const SERVER_TIMESTAMP: u8 = 0x08;
    pub const SOURCE_PICOSECONDS: u8 = 0x10;
    pub const SERVER_PICOSECONDS: u8 = 0x20;

    pub fn new(value: Variant) -> Self {
        Self { value: Some(value), ..Self::default() }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source_timestamp(mut self, timestamp: DateTime, picoseconds: u16) -> Self {
        self.source_timestamp = Some(timestamp);
        self.source_picoseconds = Some(picoseconds);
        self
    }

    pub fn with_server_timestamp(mut self, timestamp: DateTime, picoseconds: u16) -> Self {
        self.server_timestamp = Some(timestamp);
        self.server_picoseconds = Some(picoseconds);
        self
    }

    pub(crate) fn encoding_mask(&self) -> u8 {
        let mut mask = 0;
        if self.value.is_some() {
            mask |= Self::VALUE;
        }
        if self.status.is_some_and(|status| status != StatusCode::GOOD) {
            mask |= Self::STATUS;
        }
        if self.source_timestamp.is_some_and(|ts| ts != DateTime::MIN) {
            mask |= Self::SOURCE_TIMESTAMP;
        }
        if self.server_timestamp.is_some_and(|ts| ts != DateTime::MIN) {
            mask |= Self::SERVER_TIMESTAMP;
        }
        if self.source_picoseconds.is_some_and(|ps| ps != 0) {
            mask |= Self::SOURCE_PICOSECONDS;
        }
        if self.server_picoseconds.is_some_and(|ps| ps != 0) {
            mask |= Self::SERVER_PICOSECONDS;
        }
        mask
    }
}
