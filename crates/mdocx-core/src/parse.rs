//! Markup front-end
//!
//! Markdown is rendered to HTML with `pulldown-cmark`, then parsed into a
//! [`SourceNode`] tree with `html5ever`. The converter only ever sees the
//! tree; grammar compliance is the parsers' business.

use std::rc::Rc;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Node, NodeData, RcDom};
use mdocx_ast::SourceNode;
use pulldown_cmark::{html, Event, Options, Parser};
use thiserror::Error;

/// Errors raised by the markup front-end
#[derive(Error, Debug)]
pub enum ParseError {
    /// The HTML byte stream could not be read
    #[error("failed to read HTML: {0}")]
    Io(#[from] std::io::Error),
}

/// Elements nested deeper than this below `<body>` keep their tag but have
/// their content reduced to a single text node
pub const MAX_NESTING_DEPTH: usize = 128;

/// A parsed tree plus what the depth limit flattened
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTree {
    /// Tag-less root whose children are the children of `<body>`
    pub root: SourceNode,
    /// Elements at the depth limit whose nested markup was flattened
    pub flattened: usize,
}

/// Render Markdown to HTML
///
/// Tables, strikethrough and `$...$` math are enabled. Inline math renders
/// as `<span class="math math-inline">`. Soft breaks become spaces and hard
/// breaks a bare `<br />`.
pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_MATH;
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::Text(" ".into()),
        Event::HardBreak => Event::InlineHtml("<br />".into()),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Parse an HTML document or fragment into a tag-less root
///
/// The root's children are the children of `<body>`. Comments, doctypes and
/// processing instructions are dropped.
pub fn parse_html(html: &str) -> Result<SourceNode, ParseError> {
    Ok(parse_html_tree(html)?.root)
}

/// Parse HTML, reporting how many elements hit [`MAX_NESTING_DEPTH`]
pub fn parse_html_tree(html: &str) -> Result<ParsedTree, ParseError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut builder = TreeBuilder::default();
    let children = match find_element(&dom.document, "body") {
        Some(body) => builder.children(&body, 1),
        None => Vec::new(),
    };

    if builder.flattened > 0 {
        tracing::debug!(
            flattened = builder.flattened,
            limit = MAX_NESTING_DEPTH,
            "flattened deeply nested markup"
        );
    }

    Ok(ParsedTree {
        root: SourceNode::root(children),
        flattened: builder.flattened,
    })
}

/// Parse Markdown source into a tag-less root
pub fn parse_markdown(source: &str) -> Result<SourceNode, ParseError> {
    parse_html(&markdown_to_html(source))
}

/// Depth-first search without recursion
fn find_element(root: &Rc<Node>, local: &str) -> Option<Rc<Node>> {
    let mut stack = vec![Rc::clone(root)];
    while let Some(node) = stack.pop() {
        let is_match = matches!(
            &node.data,
            NodeData::Element { name, .. } if name.local.as_ref() == local
        );
        if is_match {
            return Some(node);
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}

#[derive(Default)]
struct TreeBuilder {
    flattened: usize,
}

impl TreeBuilder {
    fn children(&mut self, node: &Rc<Node>, depth: usize) -> Vec<SourceNode> {
        node.children
            .borrow()
            .iter()
            .filter_map(|child| self.node(child, depth))
            .collect()
    }

    fn node(&mut self, node: &Rc<Node>, depth: usize) -> Option<SourceNode> {
        match &node.data {
            NodeData::Text { contents } => Some(SourceNode::text(contents.borrow().to_string())),
            NodeData::Element { name, attrs, .. } => {
                let mut element = SourceNode::element(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    element = element.with_attr(attr.name.local.as_ref(), attr.value.to_string());
                }

                if depth < MAX_NESTING_DEPTH {
                    element.children = self.children(node, depth + 1);
                } else {
                    if has_element_children(node) {
                        self.flattened += 1;
                    }
                    let text = flat_text(node);
                    if !text.is_empty() {
                        element.children.push(SourceNode::text(text));
                    }
                }
                Some(element)
            }
            _ => None,
        }
    }
}

fn has_element_children(node: &Rc<Node>) -> bool {
    node.children
        .borrow()
        .iter()
        .any(|child| matches!(child.data, NodeData::Element { .. }))
}

/// All descendant text in document order, without recursion
fn flat_text(node: &Rc<Node>) -> String {
    let mut out = String::new();
    let mut stack: Vec<Rc<Node>> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_level_tags(root: &SourceNode) -> Vec<&str> {
        root.element_children().filter_map(|n| n.tag()).collect()
    }

    #[test]
    fn test_markdown_to_html_math() {
        let html = markdown_to_html("x $E=mc^2$ y");
        assert!(html.contains(r#"<span class="math math-inline">E=mc^2</span>"#));
    }

    #[test]
    fn test_parse_html_body_children() {
        let root = parse_html("<h1>Title</h1><p>Hello <em>world</em></p>").unwrap();
        assert!(root.tag().is_none());
        assert_eq!(top_level_tags(&root), vec!["h1", "p"]);

        let para = &root.children[1];
        assert_eq!(para.text_content(), "Hello world");
        assert_eq!(para.children[1].tag(), Some("em"));
    }

    #[test]
    fn test_parse_html_attributes() {
        let root = parse_html(r#"<p><a href="https://example.com" class="ext">x</a></p>"#).unwrap();
        let anchor = &root.children[0].children[0];
        assert_eq!(anchor.attr("href"), Some("https://example.com"));
        assert!(anchor.has_class("ext"));
    }

    #[test]
    fn test_parse_html_drops_comments() {
        let root = parse_html("<!-- note --><p>kept</p>").unwrap();
        assert_eq!(top_level_tags(&root), vec!["p"]);
        assert!(root.children.iter().all(|n| n.tag().is_some() || !n.text.contains("note")));
    }

    #[test]
    fn test_parse_markdown_blocks() {
        let root = parse_markdown("# Title\n\nHello world\n\n- item\n").unwrap();
        assert_eq!(top_level_tags(&root), vec!["h1", "p", "ul"]);
    }

    #[test]
    fn test_parse_markdown_table() {
        let root = parse_markdown("| Name | Age |\n|---|---|\n| Alice | 30 |\n").unwrap();
        let table = root.element_children().next().unwrap();
        assert_eq!(table.tag(), Some("table"));
        let head = table.children_with_tag("thead").next().unwrap();
        let body = table.children_with_tag("tbody").next().unwrap();
        let header_row = head.children_with_tag("tr").next().unwrap();
        assert_eq!(header_row.children_with_tag("th").count(), 2);
        assert_eq!(body.children_with_tag("tr").count(), 1);
    }

    #[test]
    fn test_hard_break_becomes_br() {
        let html = markdown_to_html("line one  \nline two\nline three\n");
        assert!(html.contains("line one<br />line two line three"));
    }

    #[test]
    fn test_deep_nesting_is_flattened() {
        let html = format!("{}deep", "<div>".repeat(5_000));
        let parsed = parse_html_tree(&html).unwrap();

        assert_eq!(parsed.flattened, 1);
        assert_eq!(parsed.root.text_content(), "deep");
    }

    #[test]
    fn test_shallow_tree_is_untouched() {
        let parsed = parse_html_tree("<p>a <strong>b</strong></p>").unwrap();
        assert_eq!(parsed.flattened, 0);
        assert_eq!(parsed.root.children[0].children[1].tag(), Some("strong"));
    }

    #[test]
    fn test_parse_empty_input() {
        let root = parse_markdown("").unwrap();
        assert_eq!(root.element_children().count(), 0);
    }
}
