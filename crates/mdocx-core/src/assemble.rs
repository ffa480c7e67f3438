//! Document Assembler
//!
//! Streams a finished [`DocumentModel`] into a [`DocumentSink`] in a single
//! forward pass: blocks in document order, runs in source order, table rows
//! row by row. The first sink error stops the stream and is returned.

use mdocx_ast::{Block, DocumentModel, DocumentSink, Run};

/// Commit every block of `document` to `sink`
pub fn assemble<S: DocumentSink>(document: &DocumentModel, sink: &mut S) -> Result<(), S::Error> {
    for block in &document.blocks {
        commit_block(block, sink)?;
    }
    tracing::debug!(blocks = document.len(), "document assembled");
    Ok(())
}

fn commit_block<S: DocumentSink>(block: &Block, sink: &mut S) -> Result<(), S::Error> {
    match block {
        Block::Heading { level, runs } => {
            sink.add_heading(*level)?;
            commit_runs(runs, sink)
        }
        Block::Paragraph { runs } => {
            sink.add_paragraph()?;
            commit_runs(runs, sink)
        }
        Block::Table {
            header_row,
            body_rows,
        } => {
            sink.add_table(header_row.len())?;
            sink.add_row(&header_row.texts())?;
            for row in body_rows {
                sink.add_row(&row.texts())?;
            }
            Ok(())
        }
    }
}

fn commit_runs<S: DocumentSink>(runs: &[Run], sink: &mut S) -> Result<(), S::Error> {
    for run in runs {
        match &run.image {
            Some(image) => sink.add_image(image)?,
            None => sink.append_run(run)?,
        }
    }
    Ok(())
}
