use super::BinaryEncoder;
use crate::error::EncodingError;
use crate::types::{ExpandedNodeId, Identifier, NodeId};

const TWO_BYTE: u8 = 0x00;
const FOUR_BYTE: u8 = 0x01;
const NUMERIC: u8 = 0x02;
const STRING: u8 = 0x03;
const GUID: u8 = 0x04;
const BYTE_STRING: u8 = 0x05;

const NAMESPACE_URI_FLAG: u8 = 0x80;
const SERVER_INDEX_FLAG: u8 = 0x40;

impl BinaryEncoder<'_> {
    /// Writes the smallest form that holds the identifier. Null writes the
    /// null identifier `00 00`.
    pub fn put_node_id(&mut self, value: Option<&NodeId>) -> Result<(), EncodingError> {
        let null = NodeId::NULL;
        let node_id = value.unwrap_or(&null);
        self.put_identifier(node_id.namespace_index, &node_id.identifier, 0)
    }

    /// Same tag byte as a node identifier, with the high bits announcing the
    /// trailing namespace URI and server index.
    pub fn put_expanded_node_id(
        &mut self,
        value: Option<&ExpandedNodeId>,
    ) -> Result<(), EncodingError> {
        let null = ExpandedNodeId::NULL;
        let id = value.unwrap_or(&null);
        let mut flags = 0;
        if id.namespace_uri.is_some() {
            flags |= NAMESPACE_URI_FLAG;
        }
        if id.server_index.is_some() {
            flags |= SERVER_INDEX_FLAG;
        }
        self.put_identifier(id.namespace_index, &id.identifier, flags)?;
        if let Some(uri) = &id.namespace_uri {
            self.put_string(uri.as_str())?;
        }
        if let Some(server_index) = id.server_index {
            self.put_uint32(server_index)?;
        }
        Ok(())
    }

    fn put_identifier(
        &mut self,
        namespace_index: u16,
        identifier: &Identifier,
        flags: u8,
    ) -> Result<(), EncodingError> {
        match identifier {
            Identifier::Numeric(value) => {
                match (u8::try_from(namespace_index), u8::try_from(*value), u16::try_from(*value)) {
                    (_, Ok(byte), _) if namespace_index == 0 => {
                        self.out.put_byte(TWO_BYTE | flags)?;
                        self.out.put_byte(byte)?;
                    }
                    (Ok(namespace), _, Ok(short)) => {
                        self.out.put_byte(FOUR_BYTE | flags)?;
                        self.out.put_byte(namespace)?;
                        self.out.put_bytes(&short.to_le_bytes())?;
                    }
                    _ => {
                        self.out.put_byte(NUMERIC | flags)?;
                        self.put_uint16(namespace_index)?;
                        self.put_uint32(*value)?;
                    }
                }
            }
            Identifier::String(value) => {
                self.out.put_byte(STRING | flags)?;
                self.put_uint16(namespace_index)?;
                self.put_string(value.as_str())?;
            }
            Identifier::Guid(value) => {
                self.out.put_byte(GUID | flags)?;
                self.put_uint16(namespace_index)?;
                self.put_guid(*value)?;
            }
            Identifier::Opaque(value) => {
                self.out.put_byte(BYTE_STRING | flags)?;
                self.put_uint16(namespace_index)?;
                self.put_byte_string(value.as_slice())?;
            }
        }
        Ok(())
    }

    pub fn put_node_id_array(&mut self, values: Option<&[NodeId]>) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_node_id(Some(value)))
    }

    pub fn put_expanded_node_id_array(
        &mut self,
        values: Option<&[ExpandedNodeId]>,
    ) -> Result<(), EncodingError> {
        self.put_array_with(values, |enc, value| enc.put_expanded_node_id(Some(value)))
    }
}
