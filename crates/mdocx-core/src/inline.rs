//! Inline Run Decomposer
//!
//! A paragraph's direct children are first lifted into a small styled-span
//! tree ([`InlineSpan`]) and then flattened into the flat [`Run`] list the
//! document model supports.
//!
//! # Flattening policy
//!
//! The outer style wins. Each direct child of the paragraph yields exactly one
//! run carrying that child's own style; any markup nested inside it contributes
//! its text only. `<strong>b <em>c</em></strong>` becomes a single bold run
//! `"b c"`, never a bold+italic run.
//!
//! # Math spans
//!
//! Traversal keeps an explicit [`RunTarget`]. A math span always opens a fresh
//! paragraph holding the math run and moves the target there, so every later
//! sibling of the source paragraph lands in that fresh paragraph. The source
//! paragraph itself is always emitted, even when it ends up empty.

use mdocx_ast::{Block, Run, SourceNode};

use crate::classify::NodeKind;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::image::ImageResolver;

/// Nesting depth below a paragraph child past which markup is lifted as text
pub const MAX_INLINE_DEPTH: usize = 32;

/// Styled span tree lifted from one inline node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    /// Plain text
    Text(String),
    /// Bold content
    Strong(Vec<InlineSpan>),
    /// Italic content
    Emphasis(Vec<InlineSpan>),
    /// Hyperlink; `href` is absent when the anchor has none
    Link {
        href: Option<String>,
        children: Vec<InlineSpan>,
    },
    /// Image reference
    Image { src: String },
    /// Hard line break
    LineBreak,
    /// Inline math, already reduced to its text
    Math(String),
    /// Markup with no inline meaning; contributes text only
    Other(Vec<InlineSpan>),
}

impl InlineSpan {
    /// Lift a source node and its descendants into a span tree
    ///
    /// Markup nested deeper than [`MAX_INLINE_DEPTH`] only ever contributes
    /// text, so it is lifted as a single text span.
    pub fn lift(node: &SourceNode) -> Self {
        Self::lift_at(node, 0)
    }

    fn lift_at(node: &SourceNode, depth: usize) -> Self {
        if depth >= MAX_INLINE_DEPTH {
            return InlineSpan::Text(node.text_content());
        }
        let children = || -> Vec<InlineSpan> {
            node.children
                .iter()
                .map(|child| InlineSpan::lift_at(child, depth + 1))
                .collect()
        };

        match NodeKind::classify(node) {
            NodeKind::Text => InlineSpan::Text(node.text.clone()),
            NodeKind::Strong => InlineSpan::Strong(children()),
            NodeKind::Emphasis => InlineSpan::Emphasis(children()),
            NodeKind::Anchor => InlineSpan::Link {
                href: node.attr("href").map(str::to_string),
                children: children(),
            },
            NodeKind::Image => InlineSpan::Image {
                src: node.attr("src").unwrap_or_default().to_string(),
            },
            NodeKind::LineBreak => InlineSpan::LineBreak,
            NodeKind::MathSpan => InlineSpan::Math(node.text_content()),
            NodeKind::Heading(_)
            | NodeKind::Paragraph
            | NodeKind::Table
            | NodeKind::Unsupported => InlineSpan::Other(children()),
        }
    }

    /// Text of this span with all styling discarded
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            InlineSpan::Text(text) | InlineSpan::Math(text) => out.push_str(text),
            InlineSpan::Strong(children)
            | InlineSpan::Emphasis(children)
            | InlineSpan::Link { children, .. }
            | InlineSpan::Other(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            InlineSpan::LineBreak => out.push('\n'),
            InlineSpan::Image { .. } => {}
        }
    }
}

/// Which paragraph receives the next run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTarget {
    /// The paragraph being decomposed
    CurrentParagraph,
    /// The fresh paragraph opened by the n-th math span (1-based)
    MathParagraph(usize),
}

impl RunTarget {
    /// Transition rule: a math span moves the target to the paragraph it
    /// opens; every other span leaves it unchanged.
    pub fn after(self, span: &InlineSpan, opened: usize) -> Self {
        match span {
            InlineSpan::Math(_) => RunTarget::MathParagraph(opened),
            _ => self,
        }
    }

    fn index(self) -> usize {
        match self {
            RunTarget::CurrentParagraph => 0,
            RunTarget::MathParagraph(n) => n,
        }
    }
}

/// Converts paragraph children into runs
pub struct RunDecomposer<'a> {
    resolver: &'a dyn ImageResolver,
    math_font: &'a str,
}

impl<'a> RunDecomposer<'a> {
    /// Create a decomposer resolving images with `resolver`
    pub fn new(resolver: &'a dyn ImageResolver, math_font: &'a str) -> Self {
        Self {
            resolver,
            math_font,
        }
    }

    /// Decompose a paragraph node into one or more paragraph blocks
    ///
    /// The first block is always the source paragraph; one more follows for
    /// each math span encountered.
    pub fn decompose(&self, paragraph: &SourceNode, diagnostics: &mut Diagnostics) -> Vec<Block> {
        let mut paragraphs: Vec<Vec<Run>> = vec![Vec::new()];
        let mut target = RunTarget::CurrentParagraph;

        for child in &paragraph.children {
            let span = InlineSpan::lift(child);
            if matches!(span, InlineSpan::Math(_)) {
                paragraphs.push(Vec::new());
            }
            target = target.after(&span, paragraphs.len() - 1);

            let run = self.run_for(&span, diagnostics);
            paragraphs[target.index()].push(run);
        }

        if paragraphs.len() > 1 {
            tracing::debug!(
                math_paragraphs = paragraphs.len() - 1,
                "paragraph split at math span"
            );
        }

        paragraphs
            .into_iter()
            .map(|runs| Block::Paragraph { runs })
            .collect()
    }

    /// Flatten one direct child into its single run
    pub fn run_for(&self, span: &InlineSpan, diagnostics: &mut Diagnostics) -> Run {
        match span {
            InlineSpan::Text(text) => Run::plain(text.clone()),
            InlineSpan::LineBreak => Run::plain("\n"),
            InlineSpan::Strong(_) => Run::bold(span.plain_text()),
            InlineSpan::Emphasis(_) => Run::italic(span.plain_text()),
            InlineSpan::Link {
                href: Some(href), ..
            } => Run::link(span.plain_text(), href.clone()),
            InlineSpan::Link { href: None, .. } | InlineSpan::Other(_) => {
                Run::plain(span.plain_text())
            }
            InlineSpan::Image { src } => self.image_run(src, diagnostics),
            InlineSpan::Math(text) => Run::plain(text.clone()).with_font(self.math_font),
        }
    }

    fn image_run(&self, src: &str, diagnostics: &mut Diagnostics) -> Run {
        match self.resolver.resolve(src) {
            Ok(asset) => Run::image(asset),
            Err(err) => {
                diagnostics.push(Diagnostic::unresolved_image(src, &err));
                Run::plain(fallback_text(src))
            }
        }
    }
}

/// Text substituted for an image that could not be resolved
pub fn fallback_text(src: &str) -> String {
    format!("Image could not be loaded: {}", src)
}
