//! Node classification
//!
//! Maps a loosely-typed [`SourceNode`] onto the closed set of kinds the
//! converter knows about. Consumers match on [`NodeKind`] exhaustively, so a
//! new kind cannot slip through any stage unnoticed.

use mdocx_ast::{HeadingLevel, SourceNode};

/// Class marking an inline math span
pub const MATH_CLASS: &str = "math";

/// Every node kind the converter distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1`, `h2` or `h3`
    Heading(HeadingLevel),
    /// `p`
    Paragraph,
    /// `table`
    Table,
    /// Plain text node
    Text,
    /// `strong` or `b`
    Strong,
    /// `em` or `i`
    Emphasis,
    /// `a`
    Anchor,
    /// `img`
    Image,
    /// `br`
    LineBreak,
    /// `span` whose class list contains `math`
    MathSpan,
    /// Anything else
    Unsupported,
}

impl NodeKind {
    /// Classify a source node
    pub fn classify(node: &SourceNode) -> Self {
        let Some(tag) = node.tag() else {
            return NodeKind::Text;
        };

        match tag {
            "h1" => NodeKind::Heading(HeadingLevel::H1),
            "h2" => NodeKind::Heading(HeadingLevel::H2),
            "h3" => NodeKind::Heading(HeadingLevel::H3),
            "p" => NodeKind::Paragraph,
            "table" => NodeKind::Table,
            "strong" | "b" => NodeKind::Strong,
            "em" | "i" => NodeKind::Emphasis,
            "a" => NodeKind::Anchor,
            "img" => NodeKind::Image,
            "br" => NodeKind::LineBreak,
            "span" if node.has_class(MATH_CLASS) => NodeKind::MathSpan,
            _ => NodeKind::Unsupported,
        }
    }
}
