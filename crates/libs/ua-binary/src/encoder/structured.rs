use super::BinaryEncoder;
use crate::error::EncodingError;
use crate::types::{DataValue, DiagnosticInfo, LocalizedText, QualifiedName};

impl BinaryEncoder<'_> {
    pub fn put_qualified_name(
        &mut self,
        value: Option<&QualifiedName>,
    ) -> Result<(), EncodingError> {
        let Some(value) = value else {
            self.put_uint16(0)?;
            return self.put_string(None);
        };
        self.put_uint16(value.namespace_index)?;
        self.put_string(value.name.as_deref())
    }

    pub fn put_localized_text(
        &mut self,
        value: Option<&LocalizedText>,
    ) -> Result<(), EncodingError> {
        let Some(value) = value else {
            self.out.put_byte(0)?;
            return Ok(());
        };
        self.out.put_byte(value.encoding_mask())?;
        if let Some(locale) = &value.locale {
            self.put_string(locale.as_str())?;
        }
        if let Some(text) = &value.text {
            self.put_string(text.as_str())?;
        }
        Ok(())
    }

    /// Fields are written value, status, source timestamp, source
    /// picoseconds, server timestamp, server picoseconds; not in mask order.
    pub fn put_data_value(&mut self, value: Option<&DataValue>) -> Result<(), EncodingError> {
        let Some(value) = value else {
            self.out.put_byte(0)?;
            return Ok(());
        };
        let mask = value.encoding_mask();
        self.out.put_byte(mask)?;
        if mask & DataValue::VALUE != 0 {
            self.put_variant(value.value.as_ref())?;
        }
        if mask & DataValue::STATUS != 0 {
            self.put_status_code(value.status)?;
        }
        if mask & DataValue::SOURCE_TIMESTAMP != 0 {
            self.put_date_time(value.source_timestamp)?;
        }
        if mask & DataValue::SOURCE_PICOSECONDS != 0 {
            self.put_uint16(value.source_picoseconds)?;
        }
        if mask & DataValue::SERVER_TIMESTAMP != 0 {
            self.put_date_time(value.server_timestamp)?;
        }
        if mask & DataValue::SERVER_PICOSECONDS != 0 {
            self.put_uint16(value.server_picoseconds)?;
        }
        Ok(())
    }

    /// Inner diagnostics are written recursively, each one counting against
    /// the nesting limit.
    pub fn put_diagnostic_info(
        &mut self,
        value: Option<&DiagnosticInfo>,
    ) -> Result<(), EncodingError> {
        let Some(value) = value else {
            self.out.put_byte(0)?;
            return Ok(());
        };
        self.nested(|enc| {
            enc.out.put_byte(value.encoding_mask())?;
            if let Some(symbolic_id) = value.symbolic_id {
                enc.put_int32(symbolic_id)?;
            }
            if let Some(namespace_uri) = value.namespace_uri {
                enc.put_int32(namespace_uri)?;
            }
            if let Some(localized_text) = value.localized_text {
                enc.put_int32(localized_text)?;
            }
            if let Some(locale) = value.locale {
                enc.put_int32(locale)?;
            }
            if let Some(additional_info) = &value.additional_info {
                enc.put_string(additional_info.as_str())?;
            }
            if let Some(status) = value.inner_status_code {
                enc.put_status_code(status)?;
            }
            if let Some(inner) = value.inner_diagnostic_info.as_deref() {
                enc.put_diagnostic_info(Some(inner))?;
            }
            Ok(())
        })
    }

    pub fn put_qualified_name_array(
        &mut self,
        values: Option<&[QualifiedName]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_qualified_name(Some(value)))
    }

    pub fn put_localized_text_array(
        &mut self,
        values: Option<&[LocalizedText]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_localized_text(Some(value)))
    }

    pub fn put_data_value_array(
        &mut self,
        values: Option<&[DataValue]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_data_value(Some(value)))
    }

    pub fn put_diagnostic_info_array(
        &mut self,
        values: Option<&[DiagnosticInfo]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_diagnostic_info(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::LimitedBuffer;
    use crate::config::{EncodingContext, EncodingLimits};
    use crate::encoder::{BinaryEncoder, EncoderMode};
    use crate::error::{EncodingError, LimitKind};
    use crate::types::{
        DataValue, DateTime, DiagnosticInfo, LocalizedText, QualifiedName, StatusCode, Variant,
    };

    fn hex_of(
        ctx: &EncodingContext,
        write: impl FnOnce(&mut BinaryEncoder<'_>) -> Result<(), EncodingError>,
    ) -> Result<String, EncodingError> {
        let mut sink = LimitedBuffer::new();
        let mut encoder = BinaryEncoder::new(&mut sink, ctx)?;
        write(&mut encoder)?;
        Ok(hex::encode(sink.as_slice()))
    }

    #[test]
    fn qualified_name_keeps_null_name() {
        let ctx = EncodingContext::default();
        let bytes = hex_of(&ctx, |enc| {
            enc.put_qualified_name(Some(&QualifiedName::new(2, "x")))?;
            enc.put_qualified_name(None)
        })
        .expect("encode");
        assert_eq!(bytes, "020001000000780000ffffffff");
    }

    #[test]
    fn localized_text_forms() {
        let ctx = EncodingContext::default();
        assert_eq!(hex_of(&ctx, |enc| enc.put_localized_text(None)).expect("encode"), "00");
        assert_eq!(
            hex_of(&ctx, |enc| enc.put_localized_text(Some(&LocalizedText::text("hi"))))
                .expect("encode"),
            "02020000006869"
        );
        assert_eq!(
            hex_of(&ctx, |enc| enc.put_localized_text(Some(&LocalizedText::new("en", "hi"))))
                .expect("encode"),
            "0302000000656e020000006869"
        );
    }

    #[test]
    fn data_value_writes_in_wire_order() {
        let ctx = EncodingContext::default();
        let value = DataValue::new(Variant::scalar(true))
            .with_source_timestamp(DateTime::from_ticks(1), 2)
            .with_server_timestamp(DateTime::from_ticks(3), 4);
        let bytes = hex_of(&ctx, |enc| enc.put_data_value(Some(&value))).expect("encode");
        assert_eq!(
            bytes,
            concat!(
                "3d",
                "0101",
                "0100000000000000",
                "0200",
                "0300000000000000",
                "0400"
            )
        );
    }

    #[test]
    fn data_value_sentinels_do_not_round_trip() {
        // GOOD, MIN and zero picoseconds are indistinguishable from absent
        // fields once encoded.
        let ctx = EncodingContext::default();
        let value = DataValue {
            status: Some(StatusCode::GOOD),
            server_timestamp: Some(DateTime::MIN),
            source_picoseconds: Some(0),
            ..DataValue::default()
        };
        assert_eq!(hex_of(&ctx, |enc| enc.put_data_value(Some(&value))).expect("encode"), "00");
    }

    #[test]
    fn diagnostic_info_fields_follow_mask_order() {
        let ctx = EncodingContext::default();
        let info = DiagnosticInfo {
            symbolic_id: Some(1),
            locale: Some(2),
            additional_info: Some("x".to_string()),
            inner_status_code: Some(StatusCode::BAD_ENCODING_ERROR),
            ..DiagnosticInfo::default()
        }
        .with_inner(DiagnosticInfo { namespace_uri: Some(3), ..DiagnosticInfo::default() });
        let bytes = hex_of(&ctx, |enc| enc.put_diagnostic_info(Some(&info))).expect("encode");
        assert_eq!(
            bytes,
            concat!(
                "79",
                "01000000",
                "02000000",
                "0100000078",
                "00000680",
                "02",
                "03000000"
            )
        );
    }

    #[test]
    fn diagnostic_chain_respects_nesting_limit() {
        let ctx = EncodingContext::builder()
            .limits(EncodingLimits { max_nesting_depth: 3, ..EncodingLimits::default() })
            .build();
        let chain = |depth: usize| {
            (1..depth).fold(DiagnosticInfo::default(), |inner, _| {
                DiagnosticInfo::default().with_inner(inner)
            })
        };
        assert!(hex_of(&ctx, |enc| enc.put_diagnostic_info(Some(&chain(3)))).is_ok());
        let err = hex_of(&ctx, |enc| enc.put_diagnostic_info(Some(&chain(4)))).expect_err("deep");
        assert!(matches!(
            err,
            EncodingError::LimitsExceeded { kind: LimitKind::Nesting, length: 4, limit: 3 }
        ));
    }

    #[test]
    fn strict_mode_rejects_null_qualified_name() {
        let ctx = EncodingContext::default();
        let mut sink = LimitedBuffer::new();
        let mut encoder =
            BinaryEncoder::new(&mut sink, &ctx).expect("encoder").with_mode(EncoderMode::Strict);
        let err = encoder.put_qualified_name(None).expect_err("strict");
        assert!(matches!(err, EncodingError::NullValue { .. }));
    }
}
