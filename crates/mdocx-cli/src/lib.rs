//! mdocx CLI - Command-line interface library
//!
//! Wires the Markdown store, the conversion core and the DOCX writer:
//! - Upload, list, show and delete stored Markdown files
//! - Export a stored file to DOCX
//! - Convert a Markdown file on disk without storing it
//!
//! # Library Usage
//!
//! ```ignore
//! use mdocx_cli::{export_command, upload_command, OutputFormat, Settings};
//!
//! let settings = Settings::discover(None)?;
//! let mut out = std::io::stdout();
//! let id = upload_command(&settings, Path::new("notes.md"), &mut out)?;
//! export_command(&settings, id, None, OutputFormat::Json, &mut out)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Store a file, then export it
//! mdocx upload notes.md
//! mdocx export 1 --output notes.docx
//!
//! # Convert directly, reporting diagnostics as JSON
//! mdocx convert README.md --format json
//! ```

pub mod app;
pub mod config;

pub use app::{
    convert_command, delete_command, export_command, list_command, show_command, upload_command,
};
pub use app::{run_cli, ExportReport, OutputFormat};
pub use config::{ConfigError, Settings, DEFAULT_CONFIG_FILE};
