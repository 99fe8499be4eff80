use ua_binary::{
    BinaryEncoder, EncoderMode, EncodingContext, EncodingError, EncodingLimits, ExpandedNodeId,
    ExtensionObject, Identifier, LimitKind, LimitedBuffer, Record, RecordRef, Variant,
};

const PLANT: &str = "urn:example:plant";

#[derive(Debug)]
struct Motor {
    name: String,
    rpm: i32,
}

impl Record for Motor {
    fn type_name(&self) -> &str {
        "Motor"
    }

    fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError> {
        encoder.put_string(self.name.as_str())?;
        encoder.put_int32(self.rpm)
    }
}

#[derive(Debug)]
struct Line {
    motor: Motor,
}

impl Record for Line {
    fn type_name(&self) -> &str {
        "Line"
    }

    fn binary_encoding_id(&self) -> Option<ExpandedNodeId> {
        Some(ExpandedNodeId::numeric(1, 3002))
    }

    fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError> {
        let motor: &dyn Record = &self.motor;
        encoder.put_structure(Some(motor))
    }
}

#[derive(Debug)]
struct Broken;

impl Record for Broken {
    fn type_name(&self) -> &str {
        "Motor"
    }

    fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError> {
        encoder.put_int32(1)?;
        Err(EncodingError::unsupported("broken record"))
    }
}

const MOTOR_HEX: &str = "0101b90b010a000000020000006d31dc050000";

fn plant_context() -> EncodingContext {
    EncodingContext::builder()
        .namespace(PLANT)
        .record_type("Motor", ExpandedNodeId::with_namespace_uri(PLANT, Identifier::Numeric(3001)))
        .build()
}

fn motor() -> Motor {
    Motor { name: "m1".to_string(), rpm: 1500 }
}

fn put_record(enc: &mut BinaryEncoder<'_>, record: &dyn Record) -> Result<(), EncodingError> {
    enc.put_structure(Some(record))
}

fn encode_hex(
    ctx: &EncodingContext,
    write: impl FnOnce(&mut BinaryEncoder<'_>) -> Result<(), EncodingError>,
) -> Result<String, EncodingError> {
    let mut sink = LimitedBuffer::new();
    let mut encoder = BinaryEncoder::new(&mut sink, ctx)?;
    write(&mut encoder)?;
    Ok(hex::encode(sink.as_slice()))
}

#[test]
fn namespace_uri_type_ids_resolve_through_the_table() {
    let ctx = plant_context();
    let bytes = encode_hex(&ctx, |enc| put_record(enc, &motor())).expect("encode");
    assert_eq!(bytes, MOTOR_HEX);
}

#[test]
fn nested_structures_are_length_prefixed_twice() {
    let ctx = plant_context();
    let line = Line { motor: motor() };
    let bytes = encode_hex(&ctx, |enc| put_record(enc, &line)).expect("encode");
    assert_eq!(bytes, format!("0101ba0b0113000000{MOTOR_HEX}"));
}

#[test]
fn records_inside_variants_use_the_extension_object_tag() {
    let ctx = plant_context();
    let variant = Variant::scalar(RecordRef::new(motor()));
    let bytes = encode_hex(&ctx, |enc| enc.put_variant(Some(&variant))).expect("encode");
    assert_eq!(bytes, format!("16{MOTOR_HEX}"));
}

#[test]
fn structure_arrays_share_the_array_layout() {
    let ctx = plant_context();
    let records = [RecordRef::new(motor()), RecordRef::new(motor())];
    let bytes =
        encode_hex(&ctx, |enc| enc.put_structure_array(Some(&records[..]))).expect("encode");
    assert_eq!(bytes, format!("02000000{MOTOR_HEX}{MOTOR_HEX}"));
}

#[test]
fn serialized_extension_object_reuses_the_body() {
    let ctx = plant_context();
    let lazy = ExtensionObject::record(motor());
    let eager = lazy.binary_encode(&ctx).expect("serialize");
    let again = eager.binary_encode(&ctx).expect("already serialized");
    assert_eq!(eager, again);

    let bytes = encode_hex(&ctx, |enc| enc.put_extension_object(Some(&eager))).expect("encode");
    assert_eq!(bytes, MOTOR_HEX);
}

#[test]
fn failed_body_leaves_no_header() {
    let ctx = plant_context();
    let mut sink = LimitedBuffer::new();
    let mut encoder = BinaryEncoder::new(&mut sink, &ctx).expect("encoder");
    let err = put_record(&mut encoder, &Broken).expect_err("body fails");
    assert!(matches!(err, EncodingError::UnsupportedType(_)));
    assert!(sink.as_slice().is_empty());
}

#[test]
fn record_body_is_capped_by_the_smaller_limit() {
    let ctx = EncodingContext::builder()
        .limits(EncodingLimits {
            max_byte_string_length: 64,
            max_message_size: 8,
            ..EncodingLimits::default()
        })
        .namespace(PLANT)
        .record_type("Motor", ExpandedNodeId::with_namespace_uri(PLANT, Identifier::Numeric(3001)))
        .build();
    let mut sink = LimitedBuffer::new();
    let mut encoder = BinaryEncoder::new(&mut sink, &ctx).expect("encoder");
    let err = put_record(&mut encoder, &motor()).expect_err("body larger than a message");
    assert!(matches!(
        err,
        EncodingError::LimitsExceeded { kind: LimitKind::Buffer, length: 10, limit: 8 }
    ));
    assert!(sink.as_slice().is_empty());
}

#[test]
fn unregistered_namespace_uri_fails_resolution() {
    let ctx = EncodingContext::builder()
        .record_type("Motor", ExpandedNodeId::with_namespace_uri(PLANT, Identifier::Numeric(3001)))
        .build();
    let err = encode_hex(&ctx, |enc| put_record(enc, &motor())).expect_err("unknown uri");
    assert!(matches!(err, EncodingError::TypeResolution { .. }));
}

#[test]
fn sub_encoding_inherits_strict_mode() {
    #[derive(Debug)]
    struct Optional(Option<i32>);

    impl Record for Optional {
        fn type_name(&self) -> &str {
            "Optional"
        }

        fn binary_encoding_id(&self) -> Option<ExpandedNodeId> {
            Some(ExpandedNodeId::numeric(0, 900))
        }

        fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError> {
            encoder.put_int32(self.0)
        }
    }

    let ctx = EncodingContext::default();
    let lenient =
        encode_hex(&ctx, |enc| put_record(enc, &Optional(None))).expect("non-strict");
    assert_eq!(lenient, "01008403010400000000000000");

    let mut sink = LimitedBuffer::new();
    let mut encoder =
        BinaryEncoder::new(&mut sink, &ctx).expect("encoder").with_mode(EncoderMode::Strict);
    let err = put_record(&mut encoder, &Optional(None)).expect_err("strict");
    assert!(matches!(err, EncodingError::NullValue { type_name: "Int32" }));
}
