//! Parsed markup tree
//!
//! A [`SourceNode`] is one element (or text node) of the intermediate tree
//! produced by the markup front-end. The tree is read-only input to a single
//! conversion call.

use std::collections::BTreeMap;

/// A parsed markup element or text node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceNode {
    /// Lower-case tag name, `None` for text nodes and the synthetic root
    pub tag: Option<String>,
    /// Element attributes
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in source order
    pub children: Vec<SourceNode>,
    /// Raw text (only meaningful for text nodes)
    pub text: String,
}

impl SourceNode {
    /// Create an element node with the given tag
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into().to_ascii_lowercase()),
            ..Default::default()
        }
    }

    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a tag-less root holding top-level nodes
    pub fn root(children: Vec<SourceNode>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child node (builder style)
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a text child (builder style)
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(SourceNode::text(text))
    }

    /// Whether this is a text node
    pub fn is_text(&self) -> bool {
        self.tag.is_none() && self.children.is_empty()
    }

    /// Get the tag name
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Iterate over the whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Check whether the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.preorder() {
            if node.tag.is_none() {
                out.push_str(&node.text);
            }
        }
        out
    }

    /// This node and every descendant in document order, walked with an
    /// explicit stack so depth never grows the call stack
    fn preorder(&self) -> impl Iterator<Item = &SourceNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Element children only (text nodes skipped)
    pub fn element_children(&self) -> impl Iterator<Item = &SourceNode> {
        self.children.iter().filter(|c| c.tag.is_some())
    }

    /// Direct element children with the given tag
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SourceNode> {
        self.element_children().filter(move |c| c.tag() == Some(tag))
    }
}
