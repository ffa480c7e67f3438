//! Conversion diagnostics
//!
//! Local conversion failures never abort a document. Each one is recovered
//! in place and recorded as a [`Diagnostic`] so the caller can see what was
//! substituted, padded, truncated or dropped.

use serde::{Deserialize, Serialize};

/// A diagnostic message from the converter
///
/// # Example
///
/// ```
/// use mdocx_core::diagnostics::{Diagnostic, IssueKind, Severity};
///
/// let diag = Diagnostic::unsupported_node("ul")
///     .with_help("Only h1-h3, p and table are converted at the top level");
/// assert_eq!(diag.kind, IssueKind::UnsupportedNode);
/// assert_eq!(diag.severity, Severity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// Which recovery path produced this diagnostic
    pub kind: IssueKind,

    /// The diagnostic message
    pub message: String,

    /// Stable code (e.g., "W001")
    pub code: String,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Related notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Content was altered or dropped but conversion continued
    Warning,
}

/// Recoverable conversion issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// An image could not be resolved; a fallback text run was emitted
    UnresolvedImage,
    /// A table row did not match the header width, or the table had no header
    MalformedTable,
    /// A top-level node outside the dispatch table was skipped
    UnsupportedNode,
    /// Markup nested too deeply was reduced to its text
    DeepNesting,
}

impl IssueKind {
    /// Stable diagnostic code
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::UnresolvedImage => "W001",
            IssueKind::MalformedTable => "W002",
            IssueKind::UnsupportedNode => "W003",
            IssueKind::DeepNesting => "W004",
        }
    }
}

impl Diagnostic {
    /// Create a warning diagnostic of the given kind
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            code: kind.code().to_string(),
            help: None,
            notes: Vec::new(),
        }
    }

    /// An image reference that could not be turned into embeddable bytes
    pub fn unresolved_image(src: &str, reason: impl std::fmt::Display) -> Self {
        Self::warning(
            IssueKind::UnresolvedImage,
            format!("Image could not be loaded: {}", src),
        )
        .with_note(reason.to_string())
    }

    /// A table that needed padding, truncation or was dropped
    pub fn malformed_table(message: impl Into<String>) -> Self {
        Self::warning(IssueKind::MalformedTable, message)
    }

    /// A top-level node that has no block builder
    pub fn unsupported_node(tag: &str) -> Self {
        Self::warning(
            IssueKind::UnsupportedNode,
            format!("Unsupported top-level element <{}> was skipped", tag),
        )
    }

    /// Elements below the nesting limit whose markup was flattened to text
    pub fn deep_nesting(flattened: usize, limit: usize) -> Self {
        Self::warning(
            IssueKind::DeepNesting,
            format!(
                "{} element(s) nested deeper than {} levels were reduced to plain text",
                flattened, limit
            ),
        )
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: severity[code]: message
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;

        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }

        Ok(())
    }
}

/// A collection of diagnostics
///
/// Every pushed diagnostic is also emitted as a `tracing` warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            code = %diagnostic.code,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics of the given kind
    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Get all diagnostics
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the count
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// View as a slice
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(Diagnostic::unresolved_image("x.png", "gone").code, "W001");
        assert_eq!(Diagnostic::malformed_table("short row").code, "W002");
        assert_eq!(Diagnostic::unsupported_node("ul").code, "W003");
        assert_eq!(Diagnostic::deep_nesting(1, 128).code, "W004");
    }

    #[test]
    fn test_unresolved_image_keeps_reason_as_note() {
        let diag = Diagnostic::unresolved_image("http://unreachable", "connection refused");
        assert_eq!(diag.message, "Image could not be loaded: http://unreachable");
        assert_eq!(diag.notes, vec!["connection refused".to_string()]);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::unsupported_node("ul"));
        diags.push(Diagnostic::unsupported_node("blockquote"));
        diags.push(Diagnostic::malformed_table("row 2 padded"));

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.warning_count(), 3);
        assert_eq!(diags.count_of(IssueKind::UnsupportedNode), 2);
        assert_eq!(diags.count_of(IssueKind::UnresolvedImage), 0);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::unsupported_node("ul").with_help("Lists are not converted");

        let display = format!("{}", diag);
        assert!(display.contains("warning[W003]"));
        assert!(display.contains("<ul>"));
        assert!(display.contains("help: Lists are not converted"));
    }

    #[test]
    fn test_diagnostic_serialize() {
        let diag = Diagnostic::malformed_table("row 1 truncated from 3 to 2 cells");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"kind\":\"malformed_table\""));

        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, diag);
    }
}
