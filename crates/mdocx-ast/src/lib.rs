//! mdocx-ast - Markup tree and rich-document model
//!
//! This crate provides the types shared by every stage of mdocx:
//!
//! - [`SourceNode`]: the parsed markup element tree handed to the converter
//! - [`DocumentModel`], [`Block`], [`Run`], [`TableRow`]: the flat rich-text
//!   model produced by the converter
//! - [`DocumentSink`]: the forward-only commit protocol a serializer implements

pub mod block;
pub mod document;
pub mod run;
pub mod sink;
pub mod source;

pub use block::{Block, HeadingLevel, TableCell, TableRow};
pub use document::DocumentModel;
pub use run::{ImageAsset, ImageFormat, Run, BODY_FONT_SIZE_PT};
pub use sink::DocumentSink;
pub use source::SourceNode;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
