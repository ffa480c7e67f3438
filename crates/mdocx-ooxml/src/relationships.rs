//! Part relationships
//!
//! OOXML maps relationship IDs (`rIdN`) to targets in `_rels/*.rels` parts.
//! The writer registers styles, hyperlinks and media here while streaming,
//! then serializes the table once the document is finished.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::escape;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Common relationship type URIs
impl Relationships {
    /// Main document relationship type
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Core properties relationship type
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Hyperlink relationship type
    pub const TYPE_HYPERLINK: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    /// Image relationship type
    pub const TYPE_IMAGE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

/// An ordered relationship table
///
/// Maintains insertion order for deterministic XML serialization.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Relationship IDs in insertion order
    order: Vec<String>,
    /// Map of relationship ID to target
    map: HashMap<String, RelationshipTarget>,
    /// Counter for generating unique IDs (starts at 1)
    next_id_counter: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
            next_id_counter: 1,
        }
    }
}

/// A relationship target with its type and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// The target URL or part path
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
    /// `External` for URLs, `None` for parts inside the package
    pub target_mode: Option<String>,
}

impl Relationships {
    /// Create an empty relationship table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse relationships from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Self::new();
        let mut max_id: u32 = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;
                    let mut target_mode = None;

                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value().ok().map(|s| s.to_string());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Target" => target = value,
                            b"Type" => rel_type = value,
                            b"TargetMode" => target_mode = value,
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target)) = (id, target) {
                        if let Some(num) = id.strip_prefix("rId").and_then(|n| n.parse().ok()) {
                            max_id = max_id.max(num);
                        }
                        rels.insert(
                            id,
                            RelationshipTarget {
                                target,
                                rel_type: rel_type.unwrap_or_default(),
                                target_mode,
                            },
                        );
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        rels.next_id_counter = max_id + 1;
        Ok(rels)
    }

    /// Add a relationship to a part inside the package
    pub fn add(&mut self, target: impl Into<String>, rel_type: &str) -> String {
        self.add_with_mode(target, rel_type, None)
    }

    /// Add a relationship to an external resource (hyperlinks)
    pub fn add_external(&mut self, target: impl Into<String>, rel_type: &str) -> String {
        self.add_with_mode(target, rel_type, Some("External".to_string()))
    }

    /// Add a relationship with explicit target mode and return its ID
    pub fn add_with_mode(
        &mut self,
        target: impl Into<String>,
        rel_type: &str,
        target_mode: Option<String>,
    ) -> String {
        let id = format!("rId{}", self.next_id_counter);
        self.next_id_counter += 1;

        self.insert(
            id.clone(),
            RelationshipTarget {
                target: target.into(),
                rel_type: rel_type.to_string(),
                target_mode,
            },
        );
        id
    }

    fn insert(&mut self, id: String, target: RelationshipTarget) {
        self.order.push(id.clone());
        self.map.insert(id, target);
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        for (id, rel) in self.iter() {
            xml.push_str("  <Relationship");
            xml.push_str(&format!(r#" Id="{}""#, escape(id)));
            xml.push_str(&format!(r#" Type="{}""#, escape(rel.rel_type.as_str())));
            xml.push_str(&format!(r#" Target="{}""#, escape(rel.target.as_str())));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape(mode.as_str())));
            }
            xml.push_str("/>\n");
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Get the target for a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(|r| r.target.as_str())
    }

    /// Get the full relationship for an ID
    pub fn get_target(&self, id: &str) -> Option<&RelationshipTarget> {
        self.map.get(id)
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add("styles.xml", Relationships::TYPE_STYLES), "rId1");
        assert_eq!(
            rels.add("media/image1.png", Relationships::TYPE_IMAGE),
            "rId2"
        );
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_external_mode() {
        let mut rels = Relationships::new();
        let id = rels.add_external("https://example.com", Relationships::TYPE_HYPERLINK);
        let rel = rels.get_target(&id).unwrap();
        assert_eq!(rel.target_mode.as_deref(), Some("External"));
    }

    #[test]
    fn test_to_xml_escapes_targets() {
        let mut rels = Relationships::new();
        rels.add_external("https://example.com/?a=1&b=2", Relationships::TYPE_HYPERLINK);

        let xml = rels.to_xml();
        assert!(xml.contains(r#"Target="https://example.com/?a=1&amp;b=2""#));
        assert!(xml.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        rels.add_external("https://example.com/?q=a&b", Relationships::TYPE_HYPERLINK);

        let mut parsed = Relationships::parse(rels.to_xml().as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("rId1"), Some("styles.xml"));
        assert_eq!(parsed.get("rId2"), Some("https://example.com/?q=a&b"));

        // New IDs continue after the highest parsed one
        assert_eq!(parsed.add("media/image1.png", Relationships::TYPE_IMAGE), "rId3");
    }

    #[test]
    fn test_iteration_order() {
        let mut rels = Relationships::new();
        rels.add("b.xml", Relationships::TYPE_STYLES);
        rels.add("a.xml", Relationships::TYPE_STYLES);

        let targets: Vec<&str> = rels.iter().map(|(_, r)| r.target.as_str()).collect();
        assert_eq!(targets, vec!["b.xml", "a.xml"]);
    }
}
