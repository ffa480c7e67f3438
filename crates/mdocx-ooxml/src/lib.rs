//! # mdocx-ooxml
//!
//! DOCX (Office Open XML) generation for mdocx.
//!
//! This crate provides:
//! - [`DocxWriter`], a streaming implementation of the
//!   [`DocumentSink`](mdocx_ast::DocumentSink) commit protocol
//! - [`OoxmlArchive`], an in-memory view of a package for writing and
//!   reading parts back
//! - [`Relationships`], the `.rels` table shared by both
//!
//! ## Example: Converting and Packaging
//!
//! ```no_run
//! use mdocx_core::{convert_markdown, ConversionConfig, ResourceResolver};
//! use mdocx_ooxml::DocxWriter;
//!
//! let config = ConversionConfig::default();
//! let resolver = ResourceResolver::new(&config.images)?;
//! let conversion = convert_markdown("# Notes\n\nHello\n", &config, &resolver)?;
//!
//! let bytes = DocxWriter::generate(&conversion.document)?;
//! std::fs::write("notes.docx", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod error;
pub mod package;
pub mod relationships;
pub mod writer;
mod xml;

pub use archive::OoxmlArchive;
pub use error::{OoxmlError, Result};
pub use relationships::Relationships;
pub use writer::DocxWriter;

/// MIME type of a produced document
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
