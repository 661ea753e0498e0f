use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use smol_str::SmolStr;

use crate::blocks::Block;
use crate::error::DecodeError;
use crate::nsid;

/// One entry of a page: the block itself plus page-level presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEnvelope {
    pub block: Block,
    pub alignment: Option<SmolStr>,
}

impl From<Block> for BlockEnvelope {
    fn from(block: Block) -> Self {
        Self {
            block,
            alignment: None,
        }
    }
}

impl BlockEnvelope {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::expected_object("blocks[]", &value));
        };
        let block = match map.remove("block") {
            Some(block) => Block::from_value(block)?,
            None => {
                return Err(DecodeError::Shape {
                    field: "block",
                    expected: "an object",
                    found: "nothing",
                });
            }
        };
        let alignment = map
            .get("alignment")
            .and_then(Value::as_str)
            .map(SmolStr::new);
        Ok(Self { block, alignment })
    }
}

impl Serialize for BlockEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.alignment.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("BlockEnvelope", len)?;
        state.serialize_field("$type", nsid::LINEAR_DOCUMENT_BLOCK)?;
        state.serialize_field("block", &self.block)?;
        if let Some(alignment) = &self.alignment {
            state.serialize_field("alignment", alignment)?;
        }
        state.end()
    }
}

/// An ordered page of blocks. Order is significant and preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearDocument {
    pub blocks: Vec<BlockEnvelope>,
}

impl LinearDocument {
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self {
            blocks: blocks.into_iter().map(BlockEnvelope::from).collect(),
        }
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks.into_iter().map(|entry| entry.block).collect()
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::expected_object("document", &value));
        };
        let blocks = match map.remove("blocks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries
                .into_iter()
                .map(BlockEnvelope::from_value)
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(DecodeError::Shape {
                    field: "blocks",
                    expected: "an array",
                    found: crate::error::json_kind(&other),
                });
            }
        };
        Ok(Self { blocks })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for LinearDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LinearDocument", 2)?;
        state.serialize_field("$type", nsid::LINEAR_DOCUMENT)?;
        state.serialize_field("blocks", &self.blocks)?;
        state.end()
    }
}
