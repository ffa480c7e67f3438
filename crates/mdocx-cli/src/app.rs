//! CLI Application logic
//!
//! Store commands run their queries on a current-thread tokio runtime that
//! is dropped before conversion starts. Conversion may block on image
//! fetches, so it always runs outside the runtime.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mdocx_core::{convert_markdown, Conversion, Diagnostic, ResourceResolver};
use mdocx_ooxml::DocxWriter;
use mdocx_store::{MarkdownStore, StoredFile};

use crate::config::Settings;

/// Output format for conversion reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(author, version, about = "Store Markdown, export DOCX", long_about = None)]
struct Cli {
    /// Configuration file (default: ./mdocx.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database, overriding [store] database
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a Markdown file
    Upload {
        /// Markdown file to store
        input: PathBuf,
    },

    /// List stored files
    List,

    /// Print the content of a stored file
    Show {
        /// Stored file id
        id: i64,
    },

    /// Delete a stored file
    Delete {
        /// Stored file id
        id: i64,
    },

    /// Convert a stored file to DOCX
    Export {
        /// Stored file id
        id: i64,

        /// Output DOCX file (default: <stem>.docx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Convert a Markdown file on disk to DOCX without storing it
    Convert {
        /// Input Markdown file
        input: PathBuf,

        /// Output DOCX file (default: input with .docx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Outcome of an export or convert command
#[derive(Debug, Serialize)]
pub struct ExportReport<'a> {
    /// Where the Markdown came from
    pub source: String,
    /// Written DOCX file
    pub output: String,
    /// Blocks in the converted document
    pub blocks: usize,
    /// Recovered conversion issues
    pub diagnostics: &'a [Diagnostic],
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It installs logging, loads settings and dispatches to the command.
pub fn run_cli() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::discover(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        settings.store.database = database;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Upload { input } => {
            upload_command(&settings, &input, &mut out)?;
        }
        Commands::List => list_command(&settings, &mut out)?,
        Commands::Show { id } => show_command(&settings, id, &mut out)?,
        Commands::Delete { id } => delete_command(&settings, id, &mut out)?,
        Commands::Export { id, output, format } => {
            export_command(&settings, id, output.as_deref(), format, &mut out)?;
        }
        Commands::Convert {
            input,
            output,
            format,
        } => {
            convert_command(&settings, &input, output.as_deref(), format, &mut out)?;
        }
    }

    Ok(())
}

/// Execute the upload command, returning the new id
pub fn upload_command(settings: &Settings, input: &Path, out: &mut impl Write) -> Result<i64> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Input has no file name: {}", input.display()))?;

    let id = with_store(settings, |store| async move {
        store.create(&filename, &content).await
    })?;

    writeln!(out, "Stored {} as {}", input.display(), id)?;
    Ok(id)
}

/// Execute the list command
pub fn list_command(settings: &Settings, out: &mut impl Write) -> Result<()> {
    let files = with_store(settings, |store| async move { store.list().await })?;

    if files.is_empty() {
        writeln!(out, "No Markdown files saved yet.")?;
        return Ok(());
    }

    for file in files {
        writeln!(out, "{}  {}", file.id, file.filename)?;
    }
    Ok(())
}

/// Execute the show command
pub fn show_command(settings: &Settings, id: i64, out: &mut impl Write) -> Result<()> {
    let content = with_store(settings, |store| async move { store.read(id).await })?;
    write!(out, "{}", content)?;
    Ok(())
}

/// Execute the delete command
pub fn delete_command(settings: &Settings, id: i64, out: &mut impl Write) -> Result<()> {
    with_store(settings, |store| async move { store.delete(id).await })?;
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}

/// Execute the export command
///
/// A missing id fails here, before any conversion work starts.
pub fn export_command(
    settings: &Settings,
    id: i64,
    output: Option<&Path>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let (file, content): (StoredFile, String) =
        with_store(settings, |store| async move { store.get(id).await })?;

    let stem = document_stem(Path::new(&file.filename));
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(format!("{}.docx", stem)),
    };

    let resolver = ResourceResolver::new(&settings.images)
        .context("Failed to set up image resolution")?;
    let conversion = convert_markdown(&content, &settings.conversion(), &resolver)
        .with_context(|| format!("Failed to parse stored file {}", id))?;

    write_docx(&conversion, &stem, &output_path)?;

    let source = format!("{} (id {})", file.filename, id);
    report(&source, &output_path, &conversion, format, out)?;
    Ok(output_path)
}

/// Execute the convert command
///
/// Relative image paths resolve against the input's directory unless
/// `[images] base_dir` is set.
pub fn convert_command(
    settings: &Settings,
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<PathBuf> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("docx"),
    };

    let mut resolver = ResourceResolver::new(&settings.images)
        .context("Failed to set up image resolution")?;
    if settings.images.base_dir.is_none() {
        if let Some(parent) = input.parent() {
            resolver = resolver.with_base_dir(parent);
        }
    }

    let conversion = convert_markdown(&content, &settings.conversion(), &resolver)
        .with_context(|| format!("Failed to parse input file: {}", input.display()))?;

    write_docx(&conversion, &document_stem(input), &output_path)?;

    report(
        &input.display().to_string(),
        &output_path,
        &conversion,
        format,
        out,
    )?;
    Ok(output_path)
}

/// Open the store, run one operation and close it again
fn with_store<T, F, Fut>(settings: &Settings, op: F) -> Result<T>
where
    F: FnOnce(MarkdownStore) -> Fut,
    Fut: std::future::Future<Output = mdocx_store::Result<T>>,
{
    let database = &settings.store.database;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let store = MarkdownStore::open(database)
            .await
            .with_context(|| format!("Failed to open database: {}", database.display()))?;
        let result = op(store.clone()).await;
        store.close().await;
        Ok(result?)
    })
}

fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

fn write_docx(conversion: &Conversion, title: &str, output_path: &Path) -> Result<()> {
    let mut writer = DocxWriter::new().with_title(title);
    mdocx_core::assemble(&conversion.document, &mut writer)
        .context("Failed to assemble DOCX document")?;
    let archive = writer.into_archive().context("Failed to package DOCX")?;

    archive
        .write_to_file(output_path)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), "wrote docx");
    Ok(())
}

fn report(
    source: &str,
    output_path: &Path,
    conversion: &Conversion,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = ExportReport {
                source: source.to_string(),
                output: output_path.display().to_string(),
                blocks: conversion.document.len(),
                diagnostics: conversion.diagnostics.as_slice(),
            };
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize report to JSON")?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Converted: {}", source)?;
            writeln!(out, "  Created: {}", output_path.display())?;

            let diagnostics = conversion.diagnostics.as_slice();
            if diagnostics.is_empty() {
                writeln!(out, "  No issues found.")?;
            } else {
                writeln!(out)?;
                for diag in diagnostics {
                    writeln!(out, "{}", diag)?;
                }
                writeln!(out)?;
                writeln!(out, "{} warning(s)", conversion.diagnostics.warning_count())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["mdocx", "list", "--database", "x.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_export_arguments() {
        let cli =
            Cli::try_parse_from(["mdocx", "export", "7", "-o", "out.docx", "--format", "json"])
                .unwrap();
        match cli.command {
            Commands::Export { id, output, format } => {
                assert_eq!(id, 7);
                assert_eq!(output, Some(PathBuf::from("out.docx")));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem(Path::new("notes.md")), "notes");
        assert_eq!(document_stem(Path::new("dir/report.markdown")), "report");
        assert_eq!(document_stem(Path::new("")), "document");
    }
}
