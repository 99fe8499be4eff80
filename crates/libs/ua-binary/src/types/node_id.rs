use core::fmt;

use uuid::Uuid;

/// The value part of a node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Opaque(Vec<u8>),
    Guid(Uuid),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "i={value}"),
            Self::String(value) => write!(f, "s={value}"),
            Self::Opaque(value) => write!(f, "b={}", hex::encode(value)),
            Self::Guid(value) => write!(f, "g={value}"),
        }
    }
}

/// Node identifier within one server's address space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
}

impl NodeId {
    /// The canonical null identifier: namespace 0, numeric 0.
    pub const NULL: NodeId = NodeId { namespace_index: 0, identifier: Identifier::Numeric(0) };

    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self { namespace_index, identifier: Identifier::Numeric(value) }
    }

    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self { namespace_index, identifier: Identifier::String(value.into()) }
    }

    pub fn opaque(namespace_index: u16, value: impl Into<Vec<u8>>) -> Self {
        Self { namespace_index, identifier: Identifier::Opaque(value.into()) }
    }

    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self { namespace_index, identifier: Identifier::Guid(value) }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }
        write!(f, "{}", self.identifier)
    }
}

/// Node identifier that may point into another namespace (by URI) or
/// another server (by index).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedNodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
    pub namespace_uri: Option<String>,
    pub server_index: Option<u32>,
}

impl ExpandedNodeId {
    pub const NULL: ExpandedNodeId = ExpandedNodeId {
        namespace_index: 0,
        identifier: Identifier::Numeric(0),
        namespace_uri: None,
        server_index: None,
    };

    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self::from(NodeId::numeric(namespace_index, value))
    }

    /// Identifier whose namespace is given by URI rather than index.
    pub fn with_namespace_uri(uri: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            namespace_index: 0,
            identifier,
            namespace_uri: Some(uri.into()),
            server_index: None,
        }
    }

    pub fn server_index(mut self, server_index: u32) -> Self {
        self.server_index = Some(server_index);
        self
    }

    /// True when the identifier refers to the local server.
    pub fn is_local(&self) -> bool {
        self.server_index.unwrap_or(0) == 0
    }

    pub fn node_id(&self) -> NodeId {
        NodeId { namespace_index: self.namespace_index, identifier: self.identifier.clone() }
    }
}

impl Default for ExpandedNodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self {
            namespace_index: node_id.namespace_index,
            identifier: node_id.identifier,
            namespace_uri: None,
            server_index: None,
        }
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(server_index) = self.server_index {
            write!(f, "svr={server_index};")?;
        }
        match &self.namespace_uri {
            Some(uri) => write!(f, "nsu={uri};{}", self.identifier),
            None => write!(f, "{}", self.node_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
        assert_eq!(NodeId::string(2, "Pump").to_string(), "ns=2;s=Pump");
        assert_eq!(NodeId::opaque(1, vec![0xde, 0xad]).to_string(), "ns=1;b=dead");

        let expanded =
            ExpandedNodeId::with_namespace_uri("urn:plant", Identifier::Numeric(7)).server_index(3);
        assert_eq!(expanded.to_string(), "svr=3;nsu=urn:plant;i=7");
        assert!(!expanded.is_local());
    }

    #[test]
    fn null_identifier() {
        assert!(NodeId::default().is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
        assert_eq!(ExpandedNodeId::from(NodeId::NULL), ExpandedNodeId::NULL);
    }
}
