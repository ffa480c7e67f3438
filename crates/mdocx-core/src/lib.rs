//! mdocx-core - Markdown to rich-document conversion
//!
//! Maps a shallow, loosely-typed markup tree onto the flat
//! [`DocumentModel`](mdocx_ast::DocumentModel) and streams it to a
//! [`DocumentSink`](mdocx_ast::DocumentSink). Local failures never abort a
//! conversion; they come back as [`Diagnostics`].
//!
//! # Example
//!
//! ```
//! use mdocx_ast::{Block, ImageAsset};
//! use mdocx_core::{convert_markdown, ConversionConfig, ImageError};
//!
//! let no_images = |_: &str| -> Result<ImageAsset, ImageError> { Err(ImageError::EmptySource) };
//! let conversion = convert_markdown(
//!     "# Title\n\nHello world\n",
//!     &ConversionConfig::default(),
//!     &no_images,
//! )
//! .unwrap();
//!
//! assert_eq!(conversion.document.len(), 2);
//! assert!(matches!(conversion.document.blocks[0], Block::Heading { .. }));
//! assert!(conversion.diagnostics.is_empty());
//! ```

pub mod assemble;
pub mod classify;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod dispatch;
pub mod image;
pub mod inline;
pub mod parse;
pub mod table;

// Re-export main types and functions
pub use assemble::assemble;
pub use classify::NodeKind;
pub use config::{ConversionConfig, ImageSettings, TextSettings, DEFAULT_MATH_FONT};
pub use convert::{convert, convert_markdown, Conversion};
pub use diagnostics::{Diagnostic, Diagnostics, IssueKind, Severity};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use image::{ImageError, ImageResolver, ResourceResolver};
pub use inline::{InlineSpan, RunDecomposer, RunTarget};
pub use parse::{
    markdown_to_html, parse_html, parse_html_tree, parse_markdown, ParseError, ParsedTree,
    MAX_NESTING_DEPTH,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
