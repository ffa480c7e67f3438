//! Integration tests for the mdocx CLI commands
//!
//! Each test gets its own database and output directory.

use std::fs;
use std::path::Path;

use mdocx_cli::{
    convert_command, delete_command, export_command, list_command, show_command, upload_command,
    OutputFormat, Settings,
};
use mdocx_ooxml::OoxmlArchive;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.store.database = dir.path().join("markdown_files.db");
    settings.images.allow_remote = false;
    settings
}

fn write_file(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data
}

fn output_of(f: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut out = Vec::new();
    f(&mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_upload_list_show_delete() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let input = write_file(dir.path(), "notes.md", "# Notes\n\nBody text\n");

    let id = upload_command(&settings, &input, &mut Vec::new()).unwrap();

    let listing = output_of(|out| list_command(&settings, out).unwrap());
    assert_eq!(listing, format!("{}  notes.md\n", id));

    let shown = output_of(|out| show_command(&settings, id, out).unwrap());
    assert_eq!(shown, "# Notes\n\nBody text\n");

    delete_command(&settings, id, &mut Vec::new()).unwrap();
    let listing = output_of(|out| list_command(&settings, out).unwrap());
    assert_eq!(listing, "No Markdown files saved yet.\n");
}

#[test]
fn test_show_missing_id_fails() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let err = show_command(&settings, 99, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("99"));
}

#[test]
fn test_delete_missing_id_fails() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    assert!(delete_command(&settings, 5, &mut Vec::new()).is_err());
}

#[test]
fn test_upload_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let result = upload_command(&settings, &dir.path().join("absent.md"), &mut Vec::new());
    assert!(result.is_err());
}

#[test]
fn test_upload_rejects_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let input = write_file(dir.path(), "binary.md", [0xFF, 0xFE, 0x00, 0x41]);

    assert!(upload_command(&settings, &input, &mut Vec::new()).is_err());
    let listing = output_of(|out| list_command(&settings, out).unwrap());
    assert_eq!(listing, "No Markdown files saved yet.\n");
}

#[test]
fn test_export_writes_docx() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let input = write_file(
        dir.path(),
        "report.md",
        "# Report\n\nSome **bold** text and $x^2$ inline.\n",
    );
    let id = upload_command(&settings, &input, &mut Vec::new()).unwrap();

    let target = dir.path().join("report.docx");
    let text = output_of(|out| {
        export_command(&settings, id, Some(&target), OutputFormat::Text, out).unwrap();
    });
    assert!(text.contains("report.md"));
    assert!(text.contains("No issues found."));

    let archive = OoxmlArchive::open(&target).unwrap();
    let xml = archive.document_xml().unwrap();
    assert!(xml.contains("Report"));
    assert!(xml.contains("<w:b/>"));
    assert!(xml.contains(r#"w:ascii="Cambria Math""#));

    let core = archive.get_string("docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>report</dc:title>"));
}

#[test]
fn test_export_missing_id_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let target = dir.path().join("never.docx");

    let result = export_command(&settings, 12, Some(&target), OutputFormat::Text, &mut Vec::new());
    assert!(result.is_err());
    assert!(!target.exists());
}

#[test]
fn test_export_json_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let input = write_file(
        dir.path(),
        "mixed.md",
        "![logo](https://example.com/logo.png)\n\n- one\n- two\n",
    );
    let id = upload_command(&settings, &input, &mut Vec::new()).unwrap();

    let target = dir.path().join("mixed.docx");
    let json = output_of(|out| {
        export_command(&settings, id, Some(&target), OutputFormat::Json, out).unwrap();
    });

    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    let codes: Vec<&str> = report["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["W001", "W003"]);
    assert_eq!(report["blocks"], 1);

    let xml = OoxmlArchive::open(&target).unwrap().document_xml().unwrap();
    assert!(xml.contains("Image could not be loaded: https://example.com/logo.png"));
}

#[test]
fn test_convert_embeds_relative_image() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    write_file(dir.path(), "chart.png", png_bytes(200, 100));
    let input = write_file(dir.path(), "doc.md", "Chart: ![chart](chart.png)\n");

    let written = convert_command(&settings, &input, None, OutputFormat::Text, &mut Vec::new())
        .unwrap();
    assert_eq!(written, dir.path().join("doc.docx"));

    let archive = OoxmlArchive::open(&written).unwrap();
    assert!(archive.contains("word/media/image1.png"));
    assert!(archive.document_xml().unwrap().contains("<w:drawing>"));
}

#[test]
fn test_convert_does_not_touch_store() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let input = write_file(dir.path(), "plain.md", "Hello\n");

    convert_command(&settings, &input, None, OutputFormat::Text, &mut Vec::new()).unwrap();
    assert!(!settings.store.database.exists());
}
