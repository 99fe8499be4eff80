//! Session-scoped encoding configuration.
//!
//! An [`EncodingContext`] is built once, then shared read-only by every
//! encoder of the session.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::EncodingError;
use crate::types::{ExpandedNodeId, NodeId, Record};

/// Size limits checked before any length-prefixed value is written.
/// Zero means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncodingLimits {
    pub max_array_length: usize,
    pub max_string_length: usize,
    pub max_byte_string_length: usize,
    pub max_message_size: usize,
    pub max_nesting_depth: usize,
}

impl EncodingLimits {
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 100;

    pub const UNLIMITED: Self = Self {
        max_array_length: 0,
        max_string_length: 0,
        max_byte_string_length: 0,
        max_message_size: 0,
        max_nesting_depth: 0,
    };

    /// Cap for the temporary buffer a record body is serialized into: the
    /// smaller of the byte-string and message-size limits that are set.
    pub fn record_buffer_limit(&self) -> Option<usize> {
        [self.max_byte_string_length, self.max_message_size]
            .into_iter()
            .filter(|limit| *limit > 0)
            .min()
    }
}

impl Default for EncodingLimits {
    fn default() -> Self {
        Self { max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH, ..Self::UNLIMITED }
    }
}

/// File form of the encoding configuration.
///
/// ```toml
/// namespaces = ["urn:example:plant"]
///
/// [limits]
/// max_string_length = 65535
/// max_array_length = 10000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EncodingConfig {
    #[serde(default)]
    pub limits: EncodingLimits,
    /// Namespace URIs after the protocol namespace, starting at index 1.
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl EncodingConfig {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}

/// Ordered namespace URIs; a URI's position is its namespace index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl NamespaceTable {
    pub const PROTOCOL_NAMESPACE: &'static str = "http://opcfoundation.org/UA/";

    pub fn new() -> Self {
        Self { uris: vec![Self::PROTOCOL_NAMESPACE.to_string()] }
    }

    /// Appends `uri` unless already present; returns its index.
    pub fn add(&mut self, uri: impl Into<String>) -> u16 {
        let uri = uri.into();
        if let Some(index) = self.index_of(&uri) {
            return index;
        }
        self.uris.push(uri);
        u16::try_from(self.uris.len() - 1).unwrap_or(u16::MAX)
    }

    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.uris.iter().position(|known| known == uri).and_then(|index| u16::try_from(index).ok())
    }

    pub fn uri(&self, index: u16) -> Option<&str> {
        self.uris.get(usize::from(index)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Resolves an expanded identifier to a local one.
    pub fn to_node_id(&self, id: &ExpandedNodeId) -> Result<NodeId, EncodingError> {
        if !id.is_local() {
            return Err(EncodingError::type_resolution(id, "identifier refers to a remote server"));
        }
        let namespace_index = match &id.namespace_uri {
            Some(uri) => self.index_of(uri).ok_or_else(|| {
                EncodingError::type_resolution(id, format!("namespace {uri} is not registered"))
            })?,
            None => id.namespace_index,
        };
        Ok(NodeId { namespace_index, identifier: id.identifier.clone() })
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Record type name to binary-encoding identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    encodings: HashMap<String, ExpandedNodeId>,
}

impl TypeTable {
    pub fn insert(&mut self, type_name: impl Into<String>, binary_encoding_id: ExpandedNodeId) {
        self.encodings.insert(type_name.into(), binary_encoding_id);
    }

    pub fn get(&self, type_name: &str) -> Option<&ExpandedNodeId> {
        self.encodings.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.encodings.contains_key(type_name)
    }
}

/// Read-only configuration shared by all encoders of a session.
#[derive(Debug, Clone, Default)]
pub struct EncodingContext {
    limits: EncodingLimits,
    namespaces: NamespaceTable,
    types: TypeTable,
    enumerations: HashSet<String>,
}

impl EncodingContext {
    pub fn builder() -> EncodingContextBuilder {
        EncodingContextBuilder::default()
    }

    pub fn from_config(config: &EncodingConfig) -> Self {
        let mut builder = Self::builder().limits(config.limits);
        for uri in &config.namespaces {
            builder = builder.namespace(uri.clone());
        }
        builder.build()
    }

    pub fn limits(&self) -> &EncodingLimits {
        &self.limits
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn is_enumeration(&self, type_name: &str) -> bool {
        self.enumerations.contains(type_name)
    }

    /// Binary-encoding identifier of `record`, from the record itself or
    /// from the type table.
    pub fn record_encoding_id(&self, record: &dyn Record) -> Result<ExpandedNodeId, EncodingError> {
        if let Some(id) = record.binary_encoding_id() {
            return Ok(id);
        }
        match self.types.get(record.type_name()) {
            Some(id) => Ok(id.clone()),
            None => {
                log::warn!("encoder: no binary encoding registered for {}", record.type_name());
                Err(EncodingError::type_resolution(
                    record.type_name(),
                    "no binary encoding identifier registered",
                ))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct EncodingContextBuilder {
    limits: EncodingLimits,
    namespaces: NamespaceTable,
    types: TypeTable,
    enumerations: HashSet<String>,
}

impl EncodingContextBuilder {
    pub fn limits(mut self, limits: EncodingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespaces.add(uri);
        self
    }

    pub fn record_type(
        mut self,
        type_name: impl Into<String>,
        binary_encoding_id: ExpandedNodeId,
    ) -> Self {
        self.types.insert(type_name, binary_encoding_id);
        self
    }

    pub fn enumeration(mut self, type_name: impl Into<String>) -> Self {
        self.enumerations.insert(type_name.into());
        self
    }

    pub fn build(self) -> EncodingContext {
        EncodingContext {
            limits: self.limits,
            namespaces: self.namespaces,
            types: self.types,
            enumerations: self.enumerations,
        }
    }
}
