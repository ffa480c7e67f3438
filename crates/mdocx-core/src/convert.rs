//! Conversion entry points

use mdocx_ast::{DocumentModel, SourceNode};

use crate::config::ConversionConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dispatch::Dispatcher;
use crate::image::ImageResolver;
use crate::parse::{markdown_to_html, parse_html_tree, ParseError, MAX_NESTING_DEPTH};

/// Result of one conversion: the document plus everything recovered on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    /// The converted document
    pub document: DocumentModel,
    /// Local failures that were recovered
    pub diagnostics: Diagnostics,
}

/// Convert a parsed tree into a document model
///
/// Never fails: unresolved images, malformed tables and unsupported nodes are
/// recovered in place and reported in [`Conversion::diagnostics`].
pub fn convert(
    root: &SourceNode,
    config: &ConversionConfig,
    resolver: &dyn ImageResolver,
) -> Conversion {
    let mut diagnostics = Diagnostics::new();
    let dispatcher = Dispatcher::new(resolver, &config.convert.math_font);

    let mut document = DocumentModel::new();
    document.extend(dispatcher.dispatch(root, &mut diagnostics));

    tracing::info!(
        blocks = document.len(),
        warnings = diagnostics.warning_count(),
        "conversion finished"
    );

    Conversion {
        document,
        diagnostics,
    }
}

/// Parse Markdown and convert it
///
/// Markup nested past [`MAX_NESTING_DEPTH`] is reduced to its text and
/// reported once as a `DeepNesting` diagnostic.
pub fn convert_markdown(
    source: &str,
    config: &ConversionConfig,
    resolver: &dyn ImageResolver,
) -> Result<Conversion, ParseError> {
    let parsed = parse_html_tree(&markdown_to_html(source))?;
    let mut conversion = convert(&parsed.root, config, resolver);
    if parsed.flattened > 0 {
        conversion
            .diagnostics
            .push(Diagnostic::deep_nesting(parsed.flattened, MAX_NESTING_DEPTH));
    }
    Ok(conversion)
}
