//! In-memory data model for the builtin type system.

mod builtin;
mod data_value;
mod date_time;
mod decimal;
mod descriptor;
mod diagnostic;
mod extension;
mod node_id;
mod status;
mod text;
mod variant;

pub use builtin::{BuiltinType, ValueKind};
pub use data_value::DataValue;
pub use date_time::DateTime;
pub use decimal::{Decimal, ParseDecimalError};
pub use descriptor::{ElementType, TypeDescriptor};
pub use diagnostic::DiagnosticInfo;
pub use extension::{ExtensionBody, ExtensionObject, Record, RecordRef};
pub use node_id::{ExpandedNodeId, Identifier, NodeId};
pub use status::StatusCode;
pub use text::{LocalizedText, QualifiedName, XmlElement};
pub use variant::{Value, Variant};
