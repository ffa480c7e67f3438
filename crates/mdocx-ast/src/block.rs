//! Block-level elements of the output document

use serde::{Deserialize, Serialize};

use crate::run::Run;

/// Top-level structural unit of the output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A section heading
    Heading { level: HeadingLevel, runs: Vec<Run> },
    /// A paragraph of runs
    Paragraph { runs: Vec<Run> },
    /// A plain-text table with a fixed column count
    Table {
        header_row: TableRow,
        body_rows: Vec<TableRow>,
    },
}

impl Block {
    /// Runs of a heading or paragraph, empty for tables
    pub fn runs(&self) -> &[Run] {
        match self {
            Block::Heading { runs, .. } | Block::Paragraph { runs } => runs,
            Block::Table { .. } => &[],
        }
    }

    /// Check if this block is a paragraph
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph { .. })
    }
}

/// Supported heading levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric level
    pub fn number(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// Fixed font size for the heading run
    pub fn font_size_pt(self) -> u32 {
        match self {
            Self::H1 => 16,
            Self::H2 => 14,
            Self::H3 => 12,
        }
    }
}

/// A table row of plain-text cells
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in column order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Build a row from cell texts
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts
                .into_iter()
                .map(|t| TableCell { text: t.into() })
                .collect(),
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell texts in order
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }
}

/// A plain-text table cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
}
