use core::fmt;

use super::{Value, ValueKind};
use crate::error::EncodingError;
use crate::matrix;

/// Element type named by a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Kind(ValueKind),
    /// Untyped element; each value is wrapped in a variant.
    Any,
    /// Resolved against builtin names and the context tables at encode time.
    Named(String),
}

/// Element type plus array rank (0 scalar, 1 flat array, 2+ matrix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub element: ElementType,
    pub rank: usize,
}

impl TypeDescriptor {
    pub fn scalar(kind: ValueKind) -> Self {
        Self { element: ElementType::Kind(kind), rank: 0 }
    }

    pub fn array(kind: ValueKind) -> Self {
        Self { element: ElementType::Kind(kind), rank: 1 }
    }

    pub fn matrix(kind: ValueKind, rank: usize) -> Self {
        Self { element: ElementType::Kind(kind), rank }
    }

    pub fn any(rank: usize) -> Self {
        Self { element: ElementType::Any, rank }
    }

    pub fn named(name: impl Into<String>, rank: usize) -> Self {
        Self { element: ElementType::Named(name.into()), rank }
    }

    /// Descriptor matching the shape of `value`.
    pub fn infer(value: &Value) -> Result<Self, EncodingError> {
        match value {
            Value::Null => {
                Err(EncodingError::unsupported("cannot encode null without type information"))
            }
            Value::Array(_) => {
                let rank = matrix::rank_of(value);
                let element = match matrix::uniform_kind(value) {
                    Some(kind) => ElementType::Kind(kind),
                    None => ElementType::Any,
                };
                Ok(Self { element, rank })
            }
            scalar => match scalar.kind() {
                Some(kind) => Ok(Self::scalar(kind)),
                None => Err(EncodingError::unsupported("value has no kind")),
            },
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            ElementType::Kind(kind) => write!(f, "{kind}")?,
            ElementType::Any => f.write_str("BaseDataType")?,
            ElementType::Named(name) => f.write_str(name)?,
        }
        for _ in 0..self.rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_rank_and_kind() {
        let value = Value::array([Value::array([Value::Null, Value::Double(1.0)])]);
        let descriptor = TypeDescriptor::infer(&value).expect("infer");
        assert_eq!(descriptor, TypeDescriptor::matrix(ValueKind::Double, 2));
        assert_eq!(descriptor.to_string(), "Double[][]");
        assert_eq!(
            TypeDescriptor::infer(&Value::from("x")).expect("scalar"),
            TypeDescriptor::scalar(ValueKind::String)
        );
    }

    #[test]
    fn bare_null_needs_a_descriptor() {
        let err = TypeDescriptor::infer(&Value::Null).expect_err("null");
        assert!(matches!(err, EncodingError::UnsupportedType(_)));
    }
}
