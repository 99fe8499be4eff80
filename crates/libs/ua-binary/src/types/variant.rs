use uuid::Uuid;

use super::{
    DataValue, DateTime, Decimal, DiagnosticInfo, ExpandedNodeId, ExtensionObject, LocalizedText,
    NodeId, QualifiedName, RecordRef, StatusCode, ValueKind, XmlElement,
};
use crate::error::EncodingError;
use crate::matrix;

/// A runtime value of any kind the encoder understands.
///
/// `Array` nests: a rank-2 value is an `Array` of `Array`s. `Null` stands for
/// an absent value of whatever type the surrounding descriptor names.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime),
    Guid(Uuid),
    ByteString(Vec<u8>),
    XmlElement(XmlElement),
    NodeId(NodeId),
    ExpandedNodeId(ExpandedNodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    ExtensionObject(ExtensionObject),
    Record(RecordRef),
    Decimal(Decimal),
    DataValue(Box<DataValue>),
    Variant(Box<Variant>),
    DiagnosticInfo(Box<DiagnosticInfo>),
    Enumeration(i32),
    Array(Vec<Value>),
}

impl Value {
    /// Kind of a scalar value. `None` for `Null` and `Array`.
    pub fn kind(&self) -> Option<ValueKind> {
        let kind = match self {
            Self::Null | Self::Array(_) => return None,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::SByte(_) => ValueKind::SByte,
            Self::Byte(_) => ValueKind::Byte,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Guid(_) => ValueKind::Guid,
            Self::ByteString(_) => ValueKind::ByteString,
            Self::XmlElement(_) => ValueKind::XmlElement,
            Self::NodeId(_) => ValueKind::NodeId,
            Self::ExpandedNodeId(_) => ValueKind::ExpandedNodeId,
            Self::StatusCode(_) => ValueKind::StatusCode,
            Self::QualifiedName(_) => ValueKind::QualifiedName,
            Self::LocalizedText(_) => ValueKind::LocalizedText,
            Self::ExtensionObject(_) => ValueKind::ExtensionObject,
            Self::Record(_) => ValueKind::Record,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::DataValue(_) => ValueKind::DataValue,
            Self::Variant(_) => ValueKind::Variant,
            Self::DiagnosticInfo(_) => ValueKind::DiagnosticInfo,
            Self::Enumeration(_) => ValueKind::Enumeration,
        };
        Some(kind)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Builds a nested array value from rows of values.
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime => DateTime,
    Uuid => Guid,
    XmlElement => XmlElement,
    NodeId => NodeId,
    ExpandedNodeId => ExpandedNodeId,
    StatusCode => StatusCode,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
    RecordRef => Record,
    Decimal => Decimal,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<DataValue> for Value {
    fn from(value: DataValue) -> Self {
        Self::DataValue(Box::new(value))
    }
}

impl From<Variant> for Value {
    fn from(value: Variant) -> Self {
        Self::Variant(Box::new(value))
    }
}

impl From<DiagnosticInfo> for Value {
    fn from(value: DiagnosticInfo) -> Self {
        Self::DiagnosticInfo(Box::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Tagged union carried on the wire with a builtin-type tag byte.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    Scalar(Value),
    Array { kind: ValueKind, elements: Vec<Value> },
    Matrix { kind: ValueKind, dimensions: Vec<i32>, elements: Vec<Value> },
}

impl Variant {
    pub fn scalar(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Self::Empty,
            value => Self::Scalar(value),
        }
    }

    pub fn array(kind: ValueKind, elements: Vec<Value>) -> Self {
        Self::Array { kind, elements }
    }

    /// Matrix from row-major elements. The dimension product must equal the
    /// element count.
    pub fn matrix(
        kind: ValueKind,
        dimensions: Vec<i32>,
        elements: Vec<Value>,
    ) -> Result<Self, EncodingError> {
        let expected = dimensions.iter().try_fold(1usize, |product, dimension| {
            usize::try_from(*dimension).ok().and_then(|dimension| product.checked_mul(dimension))
        });
        if expected != Some(elements.len()) {
            return Err(EncodingError::RaggedMatrix(format!(
                "dimensions {dimensions:?} do not describe {} elements",
                elements.len()
            )));
        }
        Ok(Self::Matrix { kind, dimensions, elements })
    }

    /// Matrix from a nested `Value::Array` of the given rank.
    pub fn from_nested(
        kind: ValueKind,
        nested: &Value,
        rank: usize,
    ) -> Result<Self, EncodingError> {
        let flat = matrix::flatten(nested, rank)?;
        let elements = flat.elements.into_iter().cloned().collect();
        Ok(Self::Matrix { kind, dimensions: flat.dimensions, elements })
    }

    /// Wraps an untyped value, inferring kind and shape from its contents.
    pub fn from_value(value: Value) -> Result<Self, EncodingError> {
        if !matches!(value, Value::Array(_)) {
            return Ok(Self::scalar(value));
        }
        let rank = matrix::rank_of(&value);
        let (kind, mixed) = match matrix::uniform_kind(&value) {
            Some(kind) => (kind, false),
            None => (ValueKind::Variant, true),
        };
        let mut variant = match value {
            Value::Array(items) if rank <= 1 => Self::Array { kind, elements: items },
            nested => Self::from_nested(kind, &nested, rank)?,
        };
        if mixed {
            if let Self::Array { elements, .. } | Self::Matrix { elements, .. } = &mut variant {
                for element in elements.iter_mut() {
                    *element = wrap_in_variant(std::mem::replace(element, Value::Null));
                }
            }
        }
        Ok(variant)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Element kind, when the variant holds anything.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Empty => None,
            Self::Scalar(value) => value.kind(),
            Self::Array { kind, .. } | Self::Matrix { kind, .. } => Some(*kind),
        }
    }
}

fn wrap_in_variant(value: Value) -> Value {
    match value {
        Value::Variant(_) => value,
        other => Value::Variant(Box::new(Variant::scalar(other))),
    }
}

impl From<Value> for Variant {
    fn from(value: Value) -> Self {
        Self::scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_scalar_is_empty() {
        assert!(Variant::scalar(Value::Null).is_empty());
        assert_eq!(Variant::scalar(5i32).kind(), Some(ValueKind::Int32));
    }

    #[test]
    fn matrix_dimensions_must_match_elements() {
        let elements = (1..=6i16).map(Value::from).collect::<Vec<_>>();
        assert!(Variant::matrix(ValueKind::Int16, vec![2, 3], elements.clone()).is_ok());
        assert!(matches!(
            Variant::matrix(ValueKind::Int16, vec![2, 2], elements),
            Err(EncodingError::RaggedMatrix(_))
        ));
    }

    #[test]
    fn infers_matrix_from_nested_rows() {
        let rows = Value::array([Value::array([1i16, 2, 3]), Value::array([4i16, 5, 6])]);
        let variant = Variant::from_value(rows).expect("matrix");
        match variant {
            Variant::Matrix { kind, dimensions, elements } => {
                assert_eq!(kind, ValueKind::Int16);
                assert_eq!(dimensions, vec![2, 3]);
                assert_eq!(elements[3], Value::Int16(4));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn mixed_arrays_become_variant_arrays() {
        let variant = Variant::from_value(Value::array([Value::from(1i32), Value::from("a")]))
            .expect("array");
        assert_eq!(
            variant,
            Variant::Array {
                kind: ValueKind::Variant,
                elements: vec![
                    Value::from(Variant::scalar(1i32)),
                    Value::from(Variant::scalar("a")),
                ],
            }
        );
    }

    #[test]
    fn empty_array_falls_back_to_variant_elements() {
        let variant = Variant::from_value(Value::Array(Vec::new())).expect("array");
        assert_eq!(variant, Variant::Array { kind: ValueKind::Variant, elements: Vec::new() });
    }
}
