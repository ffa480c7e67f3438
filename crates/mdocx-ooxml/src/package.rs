//! Fixed package parts
//!
//! Everything in a DOCX besides the document body and its relationships:
//! content types, the package relationships, the style sheet and the core
//! properties.

use std::collections::BTreeSet;

use mdocx_ast::ImageFormat;

use crate::relationships::Relationships;
use crate::xml::escape;

/// Path of the style sheet part
pub const STYLES_PART: &str = "word/styles.xml";

/// Path of the document relationships part
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Path of the package relationships part
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// Path of the core properties part
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Build `[Content_Types].xml` for a package embedding the given formats
pub fn content_types_xml(formats: &BTreeSet<ImageFormat>) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push('\n');
    xml.push_str(r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push('\n');
    xml.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push('\n');

    for format in formats {
        xml.push_str(&format!(
            r#"  <Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.content_type()
        ));
        xml.push('\n');
    }

    xml.push_str(r#"  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push('\n');
    xml.push_str(r#"  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    xml.push('\n');
    xml.push_str(r#"  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push('\n');
    xml.push_str("</Types>");
    xml
}

/// Build `_rels/.rels`
pub fn package_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add("word/document.xml", Relationships::TYPE_OFFICE_DOCUMENT);
    rels.add(CORE_PROPERTIES_PART, Relationships::TYPE_CORE_PROPERTIES);
    rels.to_xml()
}

/// Build `docProps/core.xml`
pub fn core_properties_xml(title: Option<&str>) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    xml.push('\n');
    if let Some(title) = title {
        xml.push_str(&format!("  <dc:title>{}</dc:title>\n", escape(title)));
    }
    xml.push_str("  <dc:creator>mdocx</dc:creator>\n");
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Build `word/styles.xml`
///
/// Defines the body default (Calibri 11pt), `Heading1`-`Heading3`, the
/// `Hyperlink` character style and the `TableGrid` table style.
pub fn styles_xml() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );
    xml.push('\n');

    xml.push_str(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
    );
    xml.push('\n');

    xml.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    );
    xml.push('\n');

    for (level, half_points) in [(1, 32), (2, 28), (3, 24)] {
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/></w:rPr></w:style>"#,
            level = level,
            outline = level - 1,
            half_points = half_points,
        ));
        xml.push('\n');
    }

    xml.push_str(
        r#"<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/><w:rPr><w:color w:val="0563C1"/><w:u w:val="single"/></w:rPr></w:style>"#,
    );
    xml.push('\n');

    xml.push_str(
        r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style>"#,
    );
    xml.push('\n');

    xml.push_str("</w:styles>");
    xml
}
