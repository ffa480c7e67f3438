//! Document root
//!
//! The output of one conversion: an append-only, ordered list of blocks.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A complete rich-text document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Document content blocks in commit order
    pub blocks: Vec<Block>,
}

impl DocumentModel {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Number of paragraph blocks
    pub fn paragraph_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_paragraph()).count()
    }
}

impl Extend<Block> for DocumentModel {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        self.blocks.extend(iter);
    }
}
