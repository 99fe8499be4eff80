//! The binary encoder.
//!
//! One [`BinaryEncoder`] is bound to one sink and one shared
//! [`EncodingContext`]. Every `put_*` operation writes the little-endian wire
//! form of one value, or fails with an [`EncodingError`]. Failed writes are
//! not rolled back.

mod identifier;
mod structure;
mod structured;
mod variant;

use uuid::Uuid;

use crate::buffer::{BinaryWrite, ByteOrder};
use crate::config::EncodingContext;
use crate::error::{EncodingError, LimitKind};
use crate::types::{DateTime, StatusCode, XmlElement};

/// Null handling for scalar fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncoderMode {
    /// Null scalars fail with [`EncodingError::NullValue`].
    Strict,
    /// Null scalars are written as their type's zero value.
    #[default]
    NonStrict,
}

pub struct BinaryEncoder<'a> {
    out: &'a mut dyn BinaryWrite,
    ctx: &'a EncodingContext,
    mode: EncoderMode,
    depth: usize,
}

impl<'a> BinaryEncoder<'a> {
    pub fn new(
        out: &'a mut dyn BinaryWrite,
        ctx: &'a EncodingContext,
    ) -> Result<Self, EncodingError> {
        if out.order() != ByteOrder::LittleEndian {
            return Err(EncodingError::unsupported("output sink must be little-endian"));
        }
        Ok(Self { out, ctx, mode: EncoderMode::default(), depth: 0 })
    }

    pub fn with_mode(mut self, mode: EncoderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> EncoderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EncoderMode) {
        self.mode = mode;
    }

    pub fn context(&self) -> &'a EncodingContext {
        self.ctx
    }

    /// Bytes written to the sink so far.
    pub fn position(&self) -> usize {
        self.out.position()
    }

    fn check_null(&self, type_name: &'static str) -> Result<(), EncodingError> {
        match self.mode {
            EncoderMode::Strict => Err(EncodingError::NullValue { type_name }),
            EncoderMode::NonStrict => Ok(()),
        }
    }

    fn or_null<T>(
        &self,
        value: Option<T>,
        type_name: &'static str,
        zero: T,
    ) -> Result<T, EncodingError> {
        match value {
            Some(value) => Ok(value),
            None => {
                self.check_null(type_name)?;
                Ok(zero)
            }
        }
    }

    fn configured_limit(&self, kind: LimitKind) -> usize {
        let limits = self.ctx.limits();
        match kind {
            LimitKind::Array => limits.max_array_length,
            LimitKind::String => limits.max_string_length,
            LimitKind::ByteString => limits.max_byte_string_length,
            LimitKind::Buffer => limits.max_message_size,
            LimitKind::Nesting => limits.max_nesting_depth,
        }
    }

    pub(crate) fn check_limit(&self, kind: LimitKind, length: usize) -> Result<(), EncodingError> {
        let limit = self.configured_limit(kind);
        if limit > 0 && length > limit {
            let err = EncodingError::LimitsExceeded { kind, length, limit };
            log::warn!("encoder: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Writes a 4-byte length prefix. Lengths past `i32::MAX` are reported
    /// against `kind`.
    fn put_length(&mut self, kind: LimitKind, length: usize) -> Result<(), EncodingError> {
        let length = i32::try_from(length).map_err(|_| EncodingError::LimitsExceeded {
            kind,
            length,
            limit: i32::MAX as usize,
        })?;
        self.out.put_int_le(length)?;
        Ok(())
    }

    /// Shared array layout: `-1` for null, otherwise the checked element
    /// count followed by each element.
    pub(crate) fn put_array_with<T>(
        &mut self,
        values: Option<&[T]>,
        mut put: impl FnMut(&mut Self, &T) -> Result<(), EncodingError>,
    ) -> Result<(), EncodingError> {
        let Some(values) = values else {
            self.out.put_int_le(-1)?;
            return Ok(());
        };
        self.check_limit(LimitKind::Array, values.len())?;
        self.put_length(LimitKind::Array, values.len())?;
        for value in values {
            put(self, value)?;
        }
        Ok(())
    }

    /// Runs `encode` one nesting level deeper.
    pub(crate) fn nested<R>(
        &mut self,
        encode: impl FnOnce(&mut Self) -> Result<R, EncodingError>,
    ) -> Result<R, EncodingError> {
        self.check_limit(LimitKind::Nesting, self.depth + 1)?;
        self.depth += 1;
        let result = encode(self);
        self.depth -= 1;
        result
    }

    pub fn put_boolean(&mut self, value: impl Into<Option<bool>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Boolean", false)?;
        self.out.put_byte(u8::from(value))?;
        Ok(())
    }

    pub fn put_sbyte(&mut self, value: impl Into<Option<i8>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "SByte", 0)?;
        self.out.put_bytes(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn put_byte(&mut self, value: impl Into<Option<u8>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Byte", 0)?;
        self.out.put_byte(value)?;
        Ok(())
    }

    pub fn put_int16(&mut self, value: impl Into<Option<i16>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Int16", 0)?;
        self.out.put_short_le(value)?;
        Ok(())
    }

    pub fn put_uint16(&mut self, value: impl Into<Option<u16>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "UInt16", 0)?;
        self.out.put_bytes(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn put_int32(&mut self, value: impl Into<Option<i32>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Int32", 0)?;
        self.out.put_int_le(value)?;
        Ok(())
    }

    pub fn put_uint32(&mut self, value: impl Into<Option<u32>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "UInt32", 0)?;
        self.out.put_bytes(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn put_int64(&mut self, value: impl Into<Option<i64>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Int64", 0)?;
        self.out.put_long_le(value)?;
        Ok(())
    }

    pub fn put_uint64(&mut self, value: impl Into<Option<u64>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "UInt64", 0)?;
        self.out.put_bytes(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn put_float(&mut self, value: impl Into<Option<f32>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Float", 0.0)?;
        self.out.put_float_le(value)?;
        Ok(())
    }

    pub fn put_double(&mut self, value: impl Into<Option<f64>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Double", 0.0)?;
        self.out.put_double_le(value)?;
        Ok(())
    }

    /// UTF-8 bytes with a 4-byte length prefix. The length limit applies to
    /// the byte count.
    pub fn put_string<'s>(
        &mut self,
        value: impl Into<Option<&'s str>>,
    ) -> Result<(), EncodingError> {
        let Some(value) = value.into() else {
            self.check_null("String")?;
            self.out.put_int_le(-1)?;
            return Ok(());
        };
        self.check_limit(LimitKind::String, value.len())?;
        self.put_length(LimitKind::String, value.len())?;
        self.out.put_bytes(value.as_bytes())?;
        Ok(())
    }

    pub fn put_date_time(
        &mut self,
        value: impl Into<Option<DateTime>>,
    ) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "DateTime", DateTime::MIN)?;
        self.out.put_long_le(value.wire_ticks())?;
        Ok(())
    }

    /// GUIDs use the mixed-endian layout: the first three fields little
    /// endian, the last eight bytes as-is.
    pub fn put_guid(&mut self, value: impl Into<Option<Uuid>>) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "Guid", Uuid::nil())?;
        self.out.put_bytes(&value.to_bytes_le())?;
        Ok(())
    }

    pub fn put_byte_string<'s>(
        &mut self,
        value: impl Into<Option<&'s [u8]>>,
    ) -> Result<(), EncodingError> {
        let Some(value) = value.into() else {
            self.out.put_int_le(-1)?;
            return Ok(());
        };
        self.check_limit(LimitKind::ByteString, value.len())?;
        self.put_length(LimitKind::ByteString, value.len())?;
        self.out.put_bytes(value)?;
        Ok(())
    }

    pub fn put_xml_element(&mut self, value: Option<&XmlElement>) -> Result<(), EncodingError> {
        self.put_byte_string(value.map(XmlElement::as_bytes))
    }

    pub fn put_status_code(
        &mut self,
        value: impl Into<Option<StatusCode>>,
    ) -> Result<(), EncodingError> {
        let value = self.or_null(value.into(), "StatusCode", StatusCode::GOOD)?;
        self.out.put_bytes(&value.value().to_le_bytes())?;
        Ok(())
    }

    /// Enumerations travel as their 32-bit value; null is 0 in every mode.
    pub fn put_enumeration(&mut self, value: impl Into<Option<i32>>) -> Result<(), EncodingError> {
        self.out.put_int_le(value.into().unwrap_or(0))?;
        Ok(())
    }

    pub fn put_boolean_array(&mut self, values: Option<&[bool]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_boolean(*value))
    }

    pub fn put_sbyte_array(&mut self, values: Option<&[i8]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_sbyte(*value))
    }

    pub fn put_byte_array(&mut self, values: Option<&[u8]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_byte(*value))
    }

    pub fn put_int16_array(&mut self, values: Option<&[i16]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_int16(*value))
    }

    pub fn put_uint16_array(&mut self, values: Option<&[u16]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_uint16(*value))
    }

    pub fn put_int32_array(&mut self, values: Option<&[i32]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_int32(*value))
    }

    pub fn put_uint32_array(&mut self, values: Option<&[u32]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_uint32(*value))
    }

    pub fn put_int64_array(&mut self, values: Option<&[i64]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_int64(*value))
    }

    pub fn put_uint64_array(&mut self, values: Option<&[u64]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_uint64(*value))
    }

    pub fn put_float_array(&mut self, values: Option<&[f32]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_float(*value))
    }

    pub fn put_double_array(&mut self, values: Option<&[f64]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_double(*value))
    }

    pub fn put_string_array(&mut self, values: Option<&[String]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_string(value.as_str()))
    }

    pub fn put_date_time_array(
        &mut self,
        values: Option<&[DateTime]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_date_time(*value))
    }

    pub fn put_guid_array(&mut self, values: Option<&[Uuid]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_guid(*value))
    }

    pub fn put_byte_string_array(
        &mut self,
        values: Option<&[Vec<u8>]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_byte_string(value.as_slice()))
    }

    pub fn put_xml_element_array(
        &mut self,
        values: Option<&[XmlElement]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_xml_element(Some(value)))
    }

    pub fn put_status_code_array(
        &mut self,
        values: Option<&[StatusCode]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_status_code(*value))
    }

    pub fn put_enumeration_array(&mut self, values: Option<&[i32]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_enumeration(*value))
    }
}
