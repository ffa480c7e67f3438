//! DOCX Writer
//!
//! [`DocxWriter`] implements the [`DocumentSink`] commit protocol and streams
//! WordprocessingML into a body buffer as operations arrive. Opening a block
//! closes the previous one; nothing already written is revisited.
//! [`DocxWriter::finish`] closes the last block and packages the result.
//!
//! # Example
//!
//! ```
//! use mdocx_ast::{Block, DocumentModel, HeadingLevel, Run};
//! use mdocx_ooxml::{DocxWriter, OoxmlArchive};
//!
//! let mut doc = DocumentModel::new();
//! doc.push(Block::Heading {
//!     level: HeadingLevel::H1,
//!     runs: vec![Run::bold("Hello").with_size(16)],
//! });
//!
//! let bytes = DocxWriter::generate(&doc)?;
//! let archive = OoxmlArchive::from_bytes(&bytes)?;
//! assert!(archive.document_xml()?.contains("Hello"));
//! # Ok::<(), mdocx_ooxml::OoxmlError>(())
//! ```

use std::collections::{BTreeSet, HashMap};

use mdocx_ast::{DocumentModel, DocumentSink, HeadingLevel, ImageAsset, ImageFormat, Run};
use sha2::{Digest, Sha256};

use crate::archive::{OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART};
use crate::error::{OoxmlError, Result};
use crate::package::{
    content_types_xml, core_properties_xml, package_rels_xml, styles_xml, CORE_PROPERTIES_PART,
    DOCUMENT_RELS_PART, PACKAGE_RELS_PART, STYLES_PART,
};
use crate::relationships::Relationships;
use crate::xml::escape;

/// Usable text width of a Letter page with 1" margins, in twips
const TEXT_WIDTH_TWIPS: usize = 9360;

/// The block currently accepting content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    None,
    Paragraph,
    Table { columns: usize, rows: usize },
}

/// Streaming DOCX writer
pub struct DocxWriter {
    /// `w:body` content written so far
    body: String,
    /// Block receiving runs or rows
    open: OpenBlock,
    /// Document relationships (word/_rels/document.xml.rels)
    relationships: Relationships,
    /// Embedded media parts (path, bytes)
    media_files: Vec<(String, Vec<u8>)>,
    /// SHA-256 of embedded bytes to relationship ID
    media_by_hash: HashMap<String, String>,
    /// Image formats present, for content types
    formats: BTreeSet<ImageFormat>,
    /// Next drawing ID for docPr
    next_drawing_id: usize,
    /// Document title for core properties
    title: Option<String>,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Create a new writer
    pub fn new() -> Self {
        let mut relationships = Relationships::new();
        relationships.add("styles.xml", Relationships::TYPE_STYLES);

        Self {
            body: String::new(),
            open: OpenBlock::None,
            relationships,
            media_files: Vec::new(),
            media_by_hash: HashMap::new(),
            formats: BTreeSet::new(),
            next_drawing_id: 1,
            title: None,
        }
    }

    /// Set the document title written to core properties
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Assemble a whole document and package it
    pub fn generate(doc: &DocumentModel) -> Result<Vec<u8>> {
        let mut writer = Self::new();
        mdocx_core::assemble(doc, &mut writer)?;
        writer.finish()
    }

    /// Close the open block and serialize the package
    pub fn finish(self) -> Result<Vec<u8>> {
        self.into_archive()?.to_bytes()
    }

    /// Close the open block and build the package in memory
    pub fn into_archive(mut self) -> Result<OoxmlArchive> {
        self.close_block();

        let mut archive = OoxmlArchive::new();
        archive.set_string(CONTENT_TYPES_PART, content_types_xml(&self.formats));
        archive.set_string(PACKAGE_RELS_PART, package_rels_xml());
        archive.set_string(DOCUMENT_PART, self.document_xml());
        archive.set_string(DOCUMENT_RELS_PART, self.relationships.to_xml());
        archive.set_string(STYLES_PART, styles_xml());
        archive.set_string(
            CORE_PROPERTIES_PART,
            core_properties_xml(self.title.as_deref()),
        );
        for (path, bytes) in self.media_files {
            archive.set(path, bytes);
        }

        tracing::debug!(parts = archive.len(), "packaged docx");
        Ok(archive)
    }

    /// Wrap the body in the document root
    fn document_xml(&self) -> String {
        let mut xml = String::with_capacity(self.body.len() + 1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<w:document "#);
        xml.push_str(r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(
            r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
        xml.push('\n');
        xml.push_str("<w:body>\n");
        xml.push_str(&self.body);
        xml.push_str(
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        );
        xml.push('\n');
        xml.push_str("</w:body>\n");
        xml.push_str("</w:document>");
        xml
    }

    fn close_block(&mut self) {
        match self.open {
            OpenBlock::None => {}
            OpenBlock::Paragraph => self.body.push_str("</w:p>\n"),
            OpenBlock::Table { .. } => self.body.push_str("</w:tbl>\n"),
        }
        self.open = OpenBlock::None;
    }

    fn require_paragraph(&self, op: &str) -> Result<()> {
        if self.open != OpenBlock::Paragraph {
            return Err(OoxmlError::InvalidStructure(format!(
                "{} with no open paragraph",
                op
            )));
        }
        Ok(())
    }

    fn open_paragraph(&mut self, style: Option<&str>) {
        self.close_block();
        self.body.push_str("<w:p>\n");
        if let Some(style) = style {
            self.body.push_str(&format!(
                "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>\n",
                escape(style)
            ));
        }
        self.open = OpenBlock::Paragraph;
    }

    /// Write a `w:r` for a text run
    fn push_run(&mut self, run: &Run, char_style: Option<&str>) {
        self.body.push_str("<w:r>");

        let mut props = String::new();
        if let Some(style) = char_style {
            props.push_str(&format!("<w:rStyle w:val=\"{}\"/>", escape(style)));
        }
        if let Some(font) = &run.font_name {
            let font = escape(font.as_str());
            props.push_str(&format!(
                "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:cs=\"{0}\"/>",
                font
            ));
        }
        if run.bold {
            props.push_str("<w:b/>");
        }
        if run.italic {
            props.push_str("<w:i/>");
        }
        if let Some(size) = run.font_size_pt {
            // Sizes are in half-points
            props.push_str(&format!(
                "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>",
                size * 2
            ));
        }
        if !props.is_empty() {
            self.body.push_str("<w:rPr>");
            self.body.push_str(&props);
            self.body.push_str("</w:rPr>");
        }

        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                self.body.push_str("<w:br/>");
            }
            if !line.is_empty() {
                self.body.push_str(&format!(
                    "<w:t xml:space=\"preserve\">{}</w:t>",
                    escape(line)
                ));
            }
        }

        self.body.push_str("</w:r>\n");
    }

    /// Register image bytes once per distinct content and return the rel ID
    fn embed_media(&mut self, image: &ImageAsset) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&image.bytes);
        let hash = format!("{:x}", hasher.finalize());

        if let Some(rel_id) = self.media_by_hash.get(&hash) {
            return rel_id.clone();
        }

        let index = self.media_files.len() + 1;
        let name = format!("image{}.{}", index, image.format.extension());
        let rel_id = self
            .relationships
            .add(format!("media/{}", name), Relationships::TYPE_IMAGE);

        self.media_files
            .push((format!("word/media/{}", name), image.bytes.clone()));
        self.formats.insert(image.format);
        self.media_by_hash.insert(hash, rel_id.clone());
        rel_id
    }

    /// Write an inline `w:drawing` run
    fn push_drawing(&mut self, rel_id: &str, image: &ImageAsset) {
        let drawing_id = self.next_drawing_id;
        self.next_drawing_id += 1;

        let name = format!("Picture {}", drawing_id);
        let descr = image.source.rsplit('/').next().unwrap_or(&image.source);
        let (cx, cy) = (image.width_emu, image.height_emu);

        self.body.push_str("<w:r>\n<w:drawing>\n");
        self.body
            .push_str(r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#);
        self.body
            .push_str(&format!(r#"<wp:extent cx="{}" cy="{}"/>"#, cx, cy));
        self.body
            .push_str(r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#);
        self.body.push_str(&format!(
            r#"<wp:docPr id="{}" name="{}" descr="{}"/>"#,
            drawing_id,
            escape(name.as_str()),
            escape(descr)
        ));
        self.body.push_str(
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
        );
        self.body.push_str(
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic>"#,
        );
        self.body.push_str(&format!(
            r#"<pic:nvPicPr><pic:cNvPr id="{}" name="{}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            drawing_id,
            escape(name.as_str())
        ));
        self.body.push_str(&format!(
            r#"<pic:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            rel_id
        ));
        self.body.push_str(&format!(
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            cx, cy
        ));
        self.body
            .push_str("</pic:pic></a:graphicData></a:graphic></wp:inline>\n");
        self.body.push_str("</w:drawing>\n</w:r>\n");
    }
}

impl DocumentSink for DocxWriter {
    type Error = OoxmlError;

    fn add_heading(&mut self, level: HeadingLevel) -> Result<()> {
        let style = format!("Heading{}", level.number());
        self.open_paragraph(Some(style.as_str()));
        Ok(())
    }

    fn add_paragraph(&mut self) -> Result<()> {
        self.open_paragraph(None);
        Ok(())
    }

    fn append_run(&mut self, run: &Run) -> Result<()> {
        self.require_paragraph("run appended")?;

        match run.hyperlink_href.as_deref() {
            Some(href) if href.starts_with('#') => {
                self.body.push_str(&format!(
                    "<w:hyperlink w:anchor=\"{}\">\n",
                    escape(&href[1..])
                ));
                self.push_run(run, Some("Hyperlink"));
                self.body.push_str("</w:hyperlink>\n");
            }
            Some(href) => {
                let rel_id = self
                    .relationships
                    .add_external(href, Relationships::TYPE_HYPERLINK);
                self.body
                    .push_str(&format!("<w:hyperlink r:id=\"{}\">\n", rel_id));
                self.push_run(run, Some("Hyperlink"));
                self.body.push_str("</w:hyperlink>\n");
            }
            None => self.push_run(run, None),
        }
        Ok(())
    }

    fn add_image(&mut self, image: &ImageAsset) -> Result<()> {
        self.require_paragraph("image added")?;
        let rel_id = self.embed_media(image);
        self.push_drawing(&rel_id, image);
        Ok(())
    }

    fn add_table(&mut self, column_count: usize) -> Result<()> {
        if column_count == 0 {
            return Err(OoxmlError::InvalidStructure(
                "table must have at least one column".to_string(),
            ));
        }
        self.close_block();

        let col_width = TEXT_WIDTH_TWIPS / column_count;
        self.body.push_str("<w:tbl>\n");
        self.body.push_str(
            "<w:tblPr><w:tblStyle w:val=\"TableGrid\"/><w:tblW w:w=\"5000\" w:type=\"pct\"/></w:tblPr>\n",
        );
        self.body.push_str("<w:tblGrid>");
        for _ in 0..column_count {
            self.body
                .push_str(&format!("<w:gridCol w:w=\"{}\"/>", col_width));
        }
        self.body.push_str("</w:tblGrid>\n");

        self.open = OpenBlock::Table {
            columns: column_count,
            rows: 0,
        };
        Ok(())
    }

    fn add_row(&mut self, cells: &[String]) -> Result<()> {
        let OpenBlock::Table { columns, rows } = self.open else {
            return Err(OoxmlError::InvalidStructure(
                "row added with no open table".to_string(),
            ));
        };
        if cells.len() != columns {
            return Err(OoxmlError::InvalidStructure(format!(
                "row has {} cells but the table has {} columns",
                cells.len(),
                columns
            )));
        }

        let is_header = rows == 0;
        let col_width = TEXT_WIDTH_TWIPS / columns;

        self.body.push_str("<w:tr>\n");
        if is_header {
            self.body.push_str("<w:trPr><w:tblHeader/></w:trPr>\n");
        }
        for text in cells {
            self.body.push_str(&format!(
                "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr><w:p>",
                col_width
            ));
            if !text.is_empty() {
                let run = Run {
                    text: text.clone(),
                    bold: is_header,
                    ..Default::default()
                };
                self.push_run(&run, None);
            }
            self.body.push_str("</w:p></w:tc>\n");
        }
        self.body.push_str("</w:tr>\n");

        self.open = OpenBlock::Table {
            columns,
            rows: rows + 1,
        };
        Ok(())
    }
}
