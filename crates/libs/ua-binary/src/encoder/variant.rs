use super::BinaryEncoder;
use crate::error::{EncodingError, LimitKind};
use crate::types::{Value, ValueKind, Variant};

const ARRAY_FLAG: u8 = 0x80;
const MATRIX_FLAG: u8 = 0xC0;

impl BinaryEncoder<'_> {
    /// Tag byte, then the payload.
    ///
    /// The tag's low bits name the builtin type; `0x80` marks a 1-D array
    /// and `0xC0` a matrix. An empty or absent variant is a single zero
    /// byte in every mode.
    pub fn put_variant(&mut self, value: Option<&Variant>) -> Result<(), EncodingError> {
        match value {
            None | Some(Variant::Empty) | Some(Variant::Scalar(Value::Null)) => {
                self.out.put_byte(0)?;
                Ok(())
            }
            Some(variant) => self.nested(|enc| enc.put_variant_payload(variant)),
        }
    }

    fn put_variant_payload(&mut self, variant: &Variant) -> Result<(), EncodingError> {
        match variant {
            Variant::Empty => {
                self.out.put_byte(0)?;
            }
            Variant::Scalar(value) => {
                let kind = value.kind().ok_or_else(|| {
                    EncodingError::unsupported("nested arrays need an array or matrix variant")
                })?;
                self.out.put_byte(kind.builtin_type().id())?;
                self.put_scalar(kind, value)?;
            }
            Variant::Array { kind, elements } => {
                self.check_limit(LimitKind::Array, elements.len())?;
                self.out.put_byte(kind.builtin_type().id() | ARRAY_FLAG)?;
                self.put_array(*kind, Some(elements.as_slice()))?;
            }
            Variant::Matrix { kind, dimensions, elements } => {
                let expected = dimensions.iter().try_fold(1usize, |product, dimension| {
                    usize::try_from(*dimension).ok().and_then(|d| product.checked_mul(d))
                });
                if expected != Some(elements.len()) {
                    return Err(EncodingError::RaggedMatrix(format!(
                        "dimensions {dimensions:?} do not describe {} elements",
                        elements.len()
                    )));
                }
                self.check_limit(LimitKind::Array, elements.len())?;
                self.out.put_byte(kind.builtin_type().id() | MATRIX_FLAG)?;
                self.put_length(LimitKind::Array, elements.len())?;
                for element in elements {
                    self.put_scalar(*kind, element)?;
                }
                self.put_int32_array(Some(dimensions.as_slice()))?;
            }
        }
        Ok(())
    }

    pub fn put_variant_array(&mut self, values: Option<&[Variant]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_variant(Some(value)))
    }

    /// Writes one value of `kind`. `Value::Null` takes the kind's null form.
    pub fn put_scalar(&mut self, kind: ValueKind, value: &Value) -> Result<(), EncodingError> {
        match (kind, value) {
            (_, Value::Null) => self.put_null(kind),
            (ValueKind::Boolean, Value::Boolean(v)) => self.put_boolean(*v),
            (ValueKind::SByte, Value::SByte(v)) => self.put_sbyte(*v),
            (ValueKind::Byte, Value::Byte(v)) => self.put_byte(*v),
            (ValueKind::Int16, Value::Int16(v)) => self.put_int16(*v),
            (ValueKind::UInt16, Value::UInt16(v)) => self.put_uint16(*v),
            (ValueKind::Int32, Value::Int32(v)) => self.put_int32(*v),
            (ValueKind::UInt32, Value::UInt32(v)) => self.put_uint32(*v),
            (ValueKind::Int64, Value::Int64(v)) => self.put_int64(*v),
            (ValueKind::UInt64, Value::UInt64(v)) => self.put_uint64(*v),
            (ValueKind::Float, Value::Float(v)) => self.put_float(*v),
            (ValueKind::Double, Value::Double(v)) => self.put_double(*v),
            (ValueKind::String, Value::String(v)) => self.put_string(v.as_str()),
            (ValueKind::DateTime, Value::DateTime(v)) => self.put_date_time(*v),
            (ValueKind::Guid, Value::Guid(v)) => self.put_guid(*v),
            (ValueKind::ByteString, Value::ByteString(v)) => self.put_byte_string(v.as_slice()),
            (ValueKind::XmlElement, Value::XmlElement(v)) => self.put_xml_element(Some(v)),
            (ValueKind::NodeId, Value::NodeId(v)) => self.put_node_id(Some(v)),
            (ValueKind::ExpandedNodeId, Value::ExpandedNodeId(v)) => {
                self.put_expanded_node_id(Some(v))
            }
            (ValueKind::StatusCode, Value::StatusCode(v)) => self.put_status_code(*v),
            (ValueKind::QualifiedName, Value::QualifiedName(v)) => self.put_qualified_name(Some(v)),
            (ValueKind::LocalizedText, Value::LocalizedText(v)) => self.put_localized_text(Some(v)),
            (ValueKind::ExtensionObject, Value::ExtensionObject(v)) => {
                self.put_extension_object(Some(v))
            }
            (ValueKind::ExtensionObject | ValueKind::Record, Value::Record(v)) => {
                self.put_structure(Some(v.as_record()))
            }
            (ValueKind::ExtensionObject | ValueKind::Decimal, Value::Decimal(v)) => {
                self.put_decimal(Some(v))
            }
            (ValueKind::DataValue, Value::DataValue(v)) => self.put_data_value(Some(&**v)),
            (ValueKind::Variant, Value::Variant(v)) => self.put_variant(Some(&**v)),
            (ValueKind::Variant, other) => {
                let wrapped = Variant::from_value(other.clone())?;
                self.put_variant(Some(&wrapped))
            }
            (ValueKind::DiagnosticInfo, Value::DiagnosticInfo(v)) => {
                self.put_diagnostic_info(Some(&**v))
            }
            (ValueKind::Enumeration, Value::Enumeration(v)) => self.put_enumeration(*v),
            (kind, other) => Err(EncodingError::unsupported(format!(
                "expected a {kind} value, found {}",
                describe(other)
            ))),
        }
    }

    /// Length prefix, then each element as a scalar of `kind`.
    pub fn put_array(
        &mut self,
        kind: ValueKind,
        values: Option<&[Value]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_scalar(kind, value))
    }

    fn put_null(&mut self, kind: ValueKind) -> Result<(), EncodingError> {
        match kind {
            ValueKind::Boolean => self.put_boolean(None),
            ValueKind::SByte => self.put_sbyte(None),
            ValueKind::Byte => self.put_byte(None),
            ValueKind::Int16 => self.put_int16(None),
            ValueKind::UInt16 => self.put_uint16(None),
            ValueKind::Int32 => self.put_int32(None),
            ValueKind::UInt32 => self.put_uint32(None),
            ValueKind::Int64 => self.put_int64(None),
            ValueKind::UInt64 => self.put_uint64(None),
            ValueKind::Float => self.put_float(None),
            ValueKind::Double => self.put_double(None),
            ValueKind::String => self.put_string(None),
            ValueKind::DateTime => self.put_date_time(None),
            ValueKind::Guid => self.put_guid(None),
            ValueKind::ByteString => self.put_byte_string(None),
            ValueKind::XmlElement => self.put_xml_element(None),
            ValueKind::NodeId => self.put_node_id(None),
            ValueKind::ExpandedNodeId => self.put_expanded_node_id(None),
            ValueKind::StatusCode => self.put_status_code(None),
            ValueKind::QualifiedName => self.put_qualified_name(None),
            ValueKind::LocalizedText => self.put_localized_text(None),
            ValueKind::ExtensionObject => self.put_extension_object(None),
            ValueKind::Record => self.put_structure(None),
            ValueKind::Decimal => self.put_decimal(None),
            ValueKind::DataValue => self.put_data_value(None),
            ValueKind::Variant => self.put_variant(None),
            ValueKind::DiagnosticInfo => self.put_diagnostic_info(None),
            ValueKind::Enumeration => self.put_enumeration(None),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value.kind() {
        Some(kind) => kind.name(),
        None if value.is_null() => "null",
        None => "nested array",
    }
}
