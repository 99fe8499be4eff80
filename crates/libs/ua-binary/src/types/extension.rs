use core::fmt;
use std::sync::Arc;

use super::{ExpandedNodeId, XmlElement};
use crate::config::EncodingContext;
use crate::encoder::BinaryEncoder;
use crate::error::EncodingError;

/// A user-defined structured record.
///
/// The encoder never knows a record's shape; it only asks the record to
/// write its own fields, in wire order, through the encoder it is handed.
pub trait Record: fmt::Debug + Send + Sync {
    /// Name used to look the record's binary-encoding identifier up in the
    /// context's type table.
    fn type_name(&self) -> &str;

    /// Binary-encoding identifier carried by the record itself. When `None`
    /// the context's type table is consulted.
    fn binary_encoding_id(&self) -> Option<ExpandedNodeId> {
        None
    }

    fn encode_fields(&self, encoder: &mut BinaryEncoder<'_>) -> Result<(), EncodingError>;
}

/// Shared handle to a record. Two handles are equal when they point at the
/// same record.
#[derive(Clone)]
pub struct RecordRef(Arc<dyn Record>);

impl RecordRef {
    pub fn new(record: impl Record + 'static) -> Self {
        Self(Arc::new(record))
    }

    pub fn as_record(&self) -> &dyn Record {
        self.0.as_ref()
    }
}

impl From<Arc<dyn Record>> for RecordRef {
    fn from(record: Arc<dyn Record>) -> Self {
        Self(record)
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Body of a serialized extension object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionBody {
    None,
    Binary(Vec<u8>),
    Xml(XmlElement),
}

impl ExtensionBody {
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Binary(_) => 1,
            Self::Xml(_) => 2,
        }
    }
}

/// Polymorphic payload wrapper.
///
/// Either still a live record, or already reduced to a type identifier and a
/// body. [`ExtensionObject::binary_encode`] moves from the first state to the
/// second without mutating the receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionObject {
    Unserialized(RecordRef),
    Serialized { type_id: ExpandedNodeId, body: ExtensionBody },
}

impl ExtensionObject {
    pub fn record(record: impl Record + 'static) -> Self {
        Self::Unserialized(RecordRef::new(record))
    }

    pub fn binary(type_id: ExpandedNodeId, body: Vec<u8>) -> Self {
        Self::Serialized { type_id, body: ExtensionBody::Binary(body) }
    }

    pub fn xml(type_id: ExpandedNodeId, body: XmlElement) -> Self {
        Self::Serialized { type_id, body: ExtensionBody::Xml(body) }
    }

    pub fn empty(type_id: ExpandedNodeId) -> Self {
        Self::Serialized { type_id, body: ExtensionBody::None }
    }

    pub fn is_serialized(&self) -> bool {
        matches!(self, Self::Serialized { .. })
    }

    /// Serialized form of this object. Already serialized objects are
    /// returned as an identical copy.
    pub fn binary_encode(&self, ctx: &EncodingContext) -> Result<ExtensionObject, EncodingError> {
        match self {
            Self::Serialized { .. } => Ok(self.clone()),
            Self::Unserialized(record) => {
                let record = record.as_record();
                let type_id = ctx.record_encoding_id(record)?;
                let body = BinaryEncoder::encode_record_body(ctx, record)?;
                Ok(Self::binary(type_id, body))
            }
        }
    }
}
