//! Commit protocol for rich-document serializers
//!
//! A sink receives a document as a forward-only stream of commit operations.
//! Opening a block (`add_heading`, `add_paragraph`, `add_table`) implicitly
//! closes the previous one; runs and rows always target the most recently
//! opened block. Nothing already committed can be revisited.

use crate::block::HeadingLevel;
use crate::run::{ImageAsset, Run};

/// Receiver of document commit operations
pub trait DocumentSink {
    /// Error raised when the sink cannot accept or write an operation
    type Error;

    /// Open a heading block
    fn add_heading(&mut self, level: HeadingLevel) -> Result<(), Self::Error>;

    /// Open a paragraph block
    fn add_paragraph(&mut self) -> Result<(), Self::Error>;

    /// Append a text run with its style flags to the open heading or paragraph
    fn append_run(&mut self, run: &Run) -> Result<(), Self::Error>;

    /// Append an inline image to the open heading or paragraph
    fn add_image(&mut self, image: &ImageAsset) -> Result<(), Self::Error>;

    /// Open a table with a fixed column count
    fn add_table(&mut self, column_count: usize) -> Result<(), Self::Error>;

    /// Append a row of plain-text cells to the open table
    fn add_row(&mut self, cells: &[String]) -> Result<(), Self::Error>;
}
