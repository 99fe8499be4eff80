use core::fmt;

/// Wire identifiers of the builtin types (1–25).
///
/// A variant's tag byte carries one of these in its low six bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BuiltinType {
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

impl BuiltinType {
    pub fn from_id(id: u8) -> Option<Self> {
        let builtin = match id {
            1 => Self::Boolean,
            2 => Self::SByte,
            3 => Self::Byte,
            4 => Self::Int16,
            5 => Self::UInt16,
            6 => Self::Int32,
            7 => Self::UInt32,
            8 => Self::Int64,
            9 => Self::UInt64,
            10 => Self::Float,
            11 => Self::Double,
            12 => Self::String,
            13 => Self::DateTime,
            14 => Self::Guid,
            15 => Self::ByteString,
            16 => Self::XmlElement,
            17 => Self::NodeId,
            18 => Self::ExpandedNodeId,
            19 => Self::StatusCode,
            20 => Self::QualifiedName,
            21 => Self::LocalizedText,
            22 => Self::ExtensionObject,
            23 => Self::DataValue,
            24 => Self::Variant,
            25 => Self::DiagnosticInfo,
            _ => return None,
        };
        Some(builtin)
    }

    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Every kind of scalar the encoder knows how to write.
///
/// This is a closed set; user-defined records all share [`ValueKind::Record`].
/// `ExtensionObject`, `Record` and `Decimal` share builtin id 22 but take
/// different paths once on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
    XmlElement,
    NodeId,
    ExpandedNodeId,
    StatusCode,
    QualifiedName,
    LocalizedText,
    ExtensionObject,
    Record,
    Decimal,
    DataValue,
    Variant,
    DiagnosticInfo,
    Enumeration,
}

impl ValueKind {
    /// Leaf kinds that match only themselves during kind resolution.
    pub const SEALED: [ValueKind; 20] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Guid,
        Self::ByteString,
        Self::XmlElement,
        Self::NodeId,
        Self::ExpandedNodeId,
        Self::StatusCode,
        Self::QualifiedName,
        Self::LocalizedText,
    ];

    /// Open families, in the order they are tried after the sealed table.
    pub const FAMILIES: [ValueKind; 8] = [
        Self::ExtensionObject,
        Self::Record,
        Self::DataValue,
        Self::Variant,
        Self::DiagnosticInfo,
        Self::Enumeration,
        Self::DateTime,
        Self::Decimal,
    ];

    pub fn builtin_type(self) -> BuiltinType {
        match self {
            Self::Boolean => BuiltinType::Boolean,
            Self::SByte => BuiltinType::SByte,
            Self::Byte => BuiltinType::Byte,
            Self::Int16 => BuiltinType::Int16,
            Self::UInt16 => BuiltinType::UInt16,
            Self::Int32 | Self::Enumeration => BuiltinType::Int32,
            Self::UInt32 => BuiltinType::UInt32,
            Self::Int64 => BuiltinType::Int64,
            Self::UInt64 => BuiltinType::UInt64,
            Self::Float => BuiltinType::Float,
            Self::Double => BuiltinType::Double,
            Self::String => BuiltinType::String,
            Self::DateTime => BuiltinType::DateTime,
            Self::Guid => BuiltinType::Guid,
            Self::ByteString => BuiltinType::ByteString,
            Self::XmlElement => BuiltinType::XmlElement,
            Self::NodeId => BuiltinType::NodeId,
            Self::ExpandedNodeId => BuiltinType::ExpandedNodeId,
            Self::StatusCode => BuiltinType::StatusCode,
            Self::QualifiedName => BuiltinType::QualifiedName,
            Self::LocalizedText => BuiltinType::LocalizedText,
            Self::ExtensionObject | Self::Record | Self::Decimal => BuiltinType::ExtensionObject,
            Self::DataValue => BuiltinType::DataValue,
            Self::Variant => BuiltinType::Variant,
            Self::DiagnosticInfo => BuiltinType::DiagnosticInfo,
        }
    }

    pub fn is_sealed(self) -> bool {
        Self::SEALED.contains(&self)
    }

    /// Canonical type name, used when descriptors name their element type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::XmlElement => "XmlElement",
            Self::NodeId => "NodeId",
            Self::ExpandedNodeId => "ExpandedNodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::ExtensionObject => "ExtensionObject",
            Self::Record => "Structure",
            Self::Decimal => "Decimal",
            Self::DataValue => "DataValue",
            Self::Variant => "Variant",
            Self::DiagnosticInfo => "DiagnosticInfo",
            Self::Enumeration => "Enumeration",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
