//! Block Dispatcher
//!
//! Walks the top-level siblings of a parsed tree and routes each one to a
//! block builder. Every top-level node ends in exactly one named
//! [`DispatchOutcome`]; nothing is dropped without a trace.

use mdocx_ast::{Block, HeadingLevel, Run, SourceNode};

use crate::classify::NodeKind;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::image::ImageResolver;
use crate::inline::RunDecomposer;
use crate::table::extract_table;

/// What became of one top-level node
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Zero or more blocks to append, in order
    Blocks(Vec<Block>),
    /// Stray top-level text, ignored
    IgnoredText,
    /// Element outside the dispatch table; carries the tag
    Unsupported(String),
}

/// Routes top-level nodes to block builders
pub struct Dispatcher<'a> {
    decomposer: RunDecomposer<'a>,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher
    pub fn new(resolver: &'a dyn ImageResolver, math_font: &'a str) -> Self {
        Self {
            decomposer: RunDecomposer::new(resolver, math_font),
        }
    }

    /// Dispatch every child of `root`, collecting blocks in source order
    pub fn dispatch(&self, root: &SourceNode, diagnostics: &mut Diagnostics) -> Vec<Block> {
        let mut blocks = Vec::new();
        for node in &root.children {
            match self.dispatch_node(node, diagnostics) {
                DispatchOutcome::Blocks(built) => blocks.extend(built),
                DispatchOutcome::IgnoredText => {}
                DispatchOutcome::Unsupported(tag) => {
                    diagnostics.push(Diagnostic::unsupported_node(&tag).with_help(
                        "Only h1-h3, p and table are converted at the top level",
                    ));
                }
            }
        }
        blocks
    }

    /// Dispatch a single top-level node
    pub fn dispatch_node(
        &self,
        node: &SourceNode,
        diagnostics: &mut Diagnostics,
    ) -> DispatchOutcome {
        let kind = NodeKind::classify(node);
        tracing::debug!(?kind, "dispatching top-level node");

        match kind {
            NodeKind::Heading(level) => DispatchOutcome::Blocks(vec![heading_block(node, level)]),
            NodeKind::Paragraph => {
                DispatchOutcome::Blocks(self.decomposer.decompose(node, diagnostics))
            }
            NodeKind::Table => {
                DispatchOutcome::Blocks(extract_table(node, diagnostics).into_iter().collect())
            }
            NodeKind::Text => DispatchOutcome::IgnoredText,
            NodeKind::Strong
            | NodeKind::Emphasis
            | NodeKind::Anchor
            | NodeKind::Image
            | NodeKind::LineBreak
            | NodeKind::MathSpan
            | NodeKind::Unsupported => {
                DispatchOutcome::Unsupported(node.tag().unwrap_or_default().to_string())
            }
        }
    }
}

/// A heading holds one bold run of its full text at the level's size
fn heading_block(node: &SourceNode, level: HeadingLevel) -> Block {
    Block::Heading {
        level,
        runs: vec![Run::bold(node.text_content()).with_size(level.font_size_pt())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IssueKind;
    use crate::image::ImageError;
    use mdocx_ast::ImageAsset;
    use pretty_assertions::assert_eq;

    fn no_images(_: &str) -> Result<ImageAsset, ImageError> {
        Err(ImageError::UnsupportedFormat)
    }

    fn dispatcher() -> Dispatcher<'static> {
        Dispatcher::new(&no_images, "Cambria Math")
    }

    #[test]
    fn test_heading_sizes() {
        let mut diags = Diagnostics::new();
        for (tag, size) in [("h1", 16), ("h2", 14), ("h3", 12)] {
            let node = SourceNode::element(tag).with_text("T");
            match dispatcher().dispatch_node(&node, &mut diags) {
                DispatchOutcome::Blocks(blocks) => {
                    assert_eq!(blocks[0].runs(), &[Run::bold("T").with_size(size)]);
                }
                other => panic!("expected blocks, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_heading_flattens_markup() {
        let node = SourceNode::element("h2")
            .with_text("Big ")
            .with_child(SourceNode::element("em").with_text("idea"));
        let mut diags = Diagnostics::new();
        let blocks = dispatcher().dispatch(&SourceNode::root(vec![node]), &mut diags);
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: HeadingLevel::H2,
                runs: vec![Run::bold("Big idea").with_size(14)],
            }]
        );
    }

    #[test]
    fn test_top_level_text_is_ignored() {
        let mut diags = Diagnostics::new();
        let outcome = dispatcher().dispatch_node(&SourceNode::text("\n"), &mut diags);
        assert_eq!(outcome, DispatchOutcome::IgnoredText);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unsupported_nodes_are_reported() {
        let root = SourceNode::root(vec![
            SourceNode::element("ul").with_child(SourceNode::element("li").with_text("x")),
            SourceNode::element("strong").with_text("loose"),
            SourceNode::element("h4").with_text("deep"),
        ]);
        let mut diags = Diagnostics::new();
        let blocks = dispatcher().dispatch(&root, &mut diags);

        assert!(blocks.is_empty());
        assert_eq!(diags.count_of(IssueKind::UnsupportedNode), 3);
        assert!(diags.as_slice()[0].message.contains("<ul>"));
    }

    #[test]
    fn test_unsupported_outcome_names_tag() {
        let mut diags = Diagnostics::new();
        let outcome = dispatcher().dispatch_node(&SourceNode::element("blockquote"), &mut diags);
        assert_eq!(outcome, DispatchOutcome::Unsupported("blockquote".to_string()));
    }

    #[test]
    fn test_order_is_preserved() {
        let root = SourceNode::root(vec![
            SourceNode::element("p").with_text("one"),
            SourceNode::text("\n"),
            SourceNode::element("h3").with_text("two"),
            SourceNode::element("p").with_text("three"),
        ]);
        let mut diags = Diagnostics::new();
        let blocks = dispatcher().dispatch(&root, &mut diags);

        let texts: Vec<&str> = blocks.iter().map(|b| b.runs()[0].text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }
}
