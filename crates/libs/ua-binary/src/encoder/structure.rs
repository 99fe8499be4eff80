use super::{BinaryEncoder, EncoderMode};
use crate::buffer::{BinaryWrite, LimitedBuffer};
use crate::config::EncodingContext;
use crate::error::EncodingError;
use crate::types::{Decimal, ExtensionBody, ExtensionObject, Record, RecordRef};

/// Presence marker written after a structure's type identifier.
const BODY_ABSENT: u8 = 0;
const BODY_PRESENT: u8 = 1;

impl BinaryEncoder<'_> {
    /// Serializes the fields of `record` into a fresh buffer, capped by the
    /// smaller of the context's byte-string and message-size limits.
    pub fn encode_record_body(
        ctx: &EncodingContext,
        record: &dyn Record,
    ) -> Result<Vec<u8>, EncodingError> {
        sub_encode(ctx, EncoderMode::default(), 0, record)
    }

    /// Type identifier, presence byte, then the field encoding as a length
    /// prefixed byte string.
    ///
    /// A null structure writes a null identifier, a zero presence byte and
    /// length `-1`; decoders reject it.
    pub fn put_structure(&mut self, value: Option<&dyn Record>) -> Result<(), EncodingError> {
        let Some(record) = value else {
            self.check_null("Structure")?;
            self.put_node_id(None)?;
            self.out.put_byte(BODY_ABSENT)?;
            self.out.put_int_le(-1)?;
            return Ok(());
        };
        let type_id = self.ctx.record_encoding_id(record)?;
        let node_id = self.ctx.namespaces().to_node_id(&type_id)?;
        let body = sub_encode(self.ctx, self.mode, self.depth, record)?;
        self.put_node_id(Some(&node_id))?;
        self.out.put_byte(BODY_PRESENT)?;
        self.put_byte_string(body.as_slice())
    }

    pub fn put_structure_array(
        &mut self,
        values: Option<&[RecordRef]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_structure(Some(value.as_record())))
    }

    /// Type identifier, body discriminant, then the body. Records not yet
    /// serialized are encoded to a binary body first.
    pub fn put_extension_object(
        &mut self,
        value: Option<&ExtensionObject>,
    ) -> Result<(), EncodingError> {
        let Some(object) = value else {
            self.check_null("ExtensionObject")?;
            self.put_node_id(None)?;
            self.out.put_byte(BODY_ABSENT)?;
            return Ok(());
        };
        match object {
            ExtensionObject::Unserialized(record) => {
                let record = record.as_record();
                log::trace!("encoder: serializing {} extension object", record.type_name());
                let type_id = self.ctx.record_encoding_id(record)?;
                let body = sub_encode(self.ctx, self.mode, self.depth, record)?;
                self.put_extension_object(Some(&ExtensionObject::binary(type_id, body)))
            }
            ExtensionObject::Serialized { type_id, body } => {
                let node_id = self.ctx.namespaces().to_node_id(type_id)?;
                self.put_node_id(Some(&node_id))?;
                self.out.put_byte(body.discriminant())?;
                match body {
                    ExtensionBody::None => Ok(()),
                    ExtensionBody::Binary(bytes) => self.put_byte_string(bytes.as_slice()),
                    ExtensionBody::Xml(xml) => self.put_xml_element(Some(xml)),
                }
            }
        }
    }

    pub fn put_extension_object_array(
        &mut self,
        values: Option<&[ExtensionObject]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_extension_object(Some(value)))
    }

    /// Decimals travel as an extension object of type `i=50`.
    pub fn put_decimal(&mut self, value: Option<&Decimal>) -> Result<(), EncodingError> {
        match value {
            Some(decimal) => self.put_extension_object(Some(&decimal.to_extension_object()?)),
            None => self.put_extension_object(None),
        }
    }

    pub fn put_decimal_array(&mut self, values: Option<&[Decimal]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_decimal(Some(value)))
    }

    /// Record fields only, without identifier or length.
    pub fn put_encodeable(&mut self, record: &dyn Record) -> Result<(), EncodingError> {
        self.nested(|enc| record.encode_fields(enc))
    }

    pub fn put_encodeable_array(
        &mut self,
        values: Option<&[RecordRef]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_encodeable(value.as_record()))
    }

    /// Binary-encoding identifier followed by the record fields.
    pub fn put_message(&mut self, record: &dyn Record) -> Result<(), EncodingError> {
        let type_id = self.ctx.record_encoding_id(record)?;
        let node_id = self.ctx.namespaces().to_node_id(&type_id)?;
        self.put_node_id(Some(&node_id))?;
        self.put_encodeable(record)
    }
}

/// Child encoder over a bounded in-memory sink; shares only the read-only
/// context with its parent.
fn sub_encode(
    ctx: &EncodingContext,
    mode: EncoderMode,
    depth: usize,
    record: &dyn Record,
) -> Result<Vec<u8>, EncodingError> {
    let mut sink = match ctx.limits().record_buffer_limit() {
        Some(limit) => LimitedBuffer::with_limit(limit),
        None => LimitedBuffer::new(),
    };
    let mut child = BinaryEncoder { out: &mut sink, ctx, mode, depth };
    child.put_encodeable(record)?;
    log::trace!("encoder: {} encoded into {} bytes", record.type_name(), sink.position());
    Ok(sink.into_inner())
}

#[cfg(test)]
mod tests {
    use crate::buffer::LimitedBuffer;
    use crate::config::{EncodingContext, EncodingLimits};
    use crate::encoder::{BinaryEncoder, EncoderMode};
    use crate::error::{EncodingError, LimitKind};
    use crate::types::{ExpandedNodeId, ExtensionObject, Record, XmlElement};

    #[derive(Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Record for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError> {
            encoder.put_int32(self.x)?;
            encoder.put_int32(self.y)
        }
    }

    fn context(limits: EncodingLimits) -> EncodingContext {
        EncodingContext::builder()
            .limits(limits)
            .record_type("Point", ExpandedNodeId::numeric(2, 5001))
            .build()
    }

    fn hex_of(
        ctx: &EncodingContext,
        mode: EncoderMode,
        write: impl FnOnce(&mut BinaryEncoder<'_>) -> Result<(), EncodingError>,
    ) -> Result<String, EncodingError> {
        let mut sink = LimitedBuffer::new();
        let mut encoder = BinaryEncoder::new(&mut sink, ctx)?.with_mode(mode);
        write(&mut encoder)?;
        Ok(hex::encode(sink.as_slice()))
    }

    #[test]
    fn structure_wraps_fields_in_byte_string() {
        let ctx = context(EncodingLimits::default());
        let point: &dyn Record = &Point { x: 1, y: -1 };
        let bytes = hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_structure(Some(point)))
            .expect("encode");
        assert_eq!(bytes, "01028913010800000001000000ffffffff");
    }

    #[test]
    fn null_structure_depends_on_mode() {
        let ctx = context(EncodingLimits::default());
        let bytes =
            hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_structure(None)).expect("encode");
        assert_eq!(bytes, "000000ffffffff");

        let mut sink = LimitedBuffer::new();
        let mut encoder =
            BinaryEncoder::new(&mut sink, &ctx).expect("encoder").with_mode(EncoderMode::Strict);
        assert!(matches!(encoder.put_structure(None), Err(EncodingError::NullValue { .. })));
        assert!(sink.as_slice().is_empty());
    }

    #[test]
    fn unregistered_record_fails_resolution() {
        let ctx = EncodingContext::default();
        let point: &dyn Record = &Point { x: 0, y: 0 };
        let err = hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_structure(Some(point)))
            .expect_err("unregistered");
        assert!(matches!(err, EncodingError::TypeResolution { .. }));
    }

    #[test]
    fn record_body_is_capped_by_byte_string_limit() {
        let ctx =
            context(EncodingLimits { max_byte_string_length: 4, ..EncodingLimits::default() });
        let point: &dyn Record = &Point { x: 1, y: 2 };
        let err = hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_structure(Some(point)))
            .expect_err("too large");
        assert!(matches!(
            err,
            EncodingError::LimitsExceeded { kind: LimitKind::Buffer, length: 8, limit: 4 }
        ));
    }

    #[test]
    fn lazy_extension_object_matches_eager_form() {
        let ctx = context(EncodingLimits::default());
        let lazy = ExtensionObject::record(Point { x: 3, y: 4 });
        let eager = lazy.binary_encode(&ctx).expect("serialize");
        assert!(!lazy.is_serialized());
        assert!(eager.is_serialized());

        let lazy_bytes =
            hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_extension_object(Some(&lazy)))
                .expect("encode");
        let eager_bytes =
            hex_of(&ctx, EncoderMode::NonStrict, |enc| enc.put_extension_object(Some(&eager)))
                .expect("encode");
        assert_eq!(lazy_bytes, eager_bytes);
        assert_eq!(lazy_bytes, "0102891301080000000300000004000000");
    }

    #[test]
    fn extension_object_body_kinds() {
        let ctx = EncodingContext::default();
        let id = ExpandedNodeId::numeric(0, 7);
        let empty = ExtensionObject::empty(id.clone());
        let xml = ExtensionObject::xml(id, XmlElement::from("<a/>"));
        let bytes = hex_of(&ctx, EncoderMode::NonStrict, |enc| {
            enc.put_extension_object(Some(&empty))?;
            enc.put_extension_object(Some(&xml))?;
            enc.put_extension_object(None)
        })
        .expect("encode");
        assert_eq!(bytes, "000700000702040000003c612f3e000000");
    }

    #[test]
    fn message_carries_identifier_without_length() {
        let ctx = context(EncodingLimits::default());
        let bytes = hex_of(&ctx, EncoderMode::NonStrict, |enc| {
            enc.put_message(&Point { x: 1, y: 2 })
        })
        .expect("encode");
        assert_eq!(bytes, "010289130100000002000000");
    }
}
