use core::fmt;
use core::str::FromStr;

use malachite::Integer;

use super::{ExpandedNodeId, ExtensionObject};
use crate::error::EncodingError;

/// Arbitrary-precision decimal: `unscaled × 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub unscaled: Integer,
    pub scale: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal literal: {0:?}")]
pub struct ParseDecimalError(String);

impl Decimal {
    /// Type identifier of the decimal wire structure (namespace 0).
    pub const TYPE_ID: u32 = 50;

    pub fn new(unscaled: impl Into<Integer>, scale: i32) -> Self {
        Self { unscaled: unscaled.into(), scale }
    }

    pub fn type_id() -> ExpandedNodeId {
        ExpandedNodeId::numeric(0, Self::TYPE_ID)
    }

    /// Wire body: 2-byte little-endian scale, then the unscaled value as
    /// minimal little-endian two's complement.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let scale = i16::try_from(self.scale)
            .map_err(|_| EncodingError::ScaleOverflow(i64::from(self.scale)))?;
        let mut bytes = scale.to_le_bytes().to_vec();
        bytes.extend(twos_complement_le(&self.unscaled));
        Ok(bytes)
    }

    /// The decimal as an already-serialized extension object.
    pub fn to_extension_object(&self) -> Result<ExtensionObject, EncodingError> {
        Ok(ExtensionObject::binary(Self::type_id(), self.to_wire_bytes()?))
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };
        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        let unsigned_whole = whole.strip_prefix(['-', '+']).unwrap_or(whole);
        if !digits_only(unsigned_whole) || !digits_only(fraction) {
            return Err(invalid());
        }
        if unsigned_whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let scale = i32::try_from(fraction.len()).map_err(|_| invalid())?;
        let magnitude = format!("{unsigned_whole}{fraction}");
        let magnitude = match magnitude.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        let digits = if whole.starts_with('-') && magnitude != "0" {
            format!("-{magnitude}")
        } else {
            magnitude.to_string()
        };
        let unscaled = Integer::from_str(&digits).map_err(|_| invalid())?;
        Ok(Self { unscaled, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}E{}", self.unscaled, -i64::from(self.scale))
    }
}

/// Minimal two's complement bytes, least significant first.
fn twos_complement_le(value: &Integer) -> Vec<u8> {
    let mut bytes: Vec<u8> = value
        .to_twos_complement_limbs_asc()
        .into_iter()
        .flat_map(|limb| limb.to_le_bytes())
        .collect();
    while bytes.len() > 1 {
        let top = bytes[bytes.len() - 1];
        let next_sign = bytes[bytes.len() - 2] & 0x80;
        let redundant = (top == 0x00 && next_sign == 0) || (top == 0xff && next_sign != 0);
        if !redundant {
            break;
        }
        bytes.pop();
    }
    if bytes.is_empty() {
        bytes.push(0);
    }
    bytes
}
