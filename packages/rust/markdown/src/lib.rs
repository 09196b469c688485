//! Summary markup translation.
//!
//! Converts the lightweight markdown-like dialect returned by the
//! summarization service (bold, italic, numbered/bulleted lists,
//! newline-separated paragraphs) into structural markup for display, and
//! parses that markup into a [`MarkupNode`] tree.

mod passes;
mod tree;

use tracing::{debug, instrument};

pub use tree::{List, MarkupNode, parse_markup, render_plain};

/// Translate raw summary text into structural markup.
///
/// Pure and deterministic: the same input always yields byte-identical
/// output. Malformed or unmatched markers are kept as literal text; this
/// never fails.
#[instrument(skip_all, fields(input_len = text.len()))]
pub fn translate(text: &str) -> String {
    let markup = passes::run_pipeline(text);
    debug!(output_len = markup.len(), "summary markup translated");
    markup
}

/// Translate raw summary text straight into a node tree.
pub fn translate_to_nodes(text: &str) -> Vec<MarkupNode> {
    parse_markup(&translate(text))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
