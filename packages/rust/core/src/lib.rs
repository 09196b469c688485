//! Core trigger flow and display logic for Course Summary.
//!
//! This crate ties together extraction, prompting, summarization, and markup
//! translation, and owns the summary panel state handed to a display surface.

pub mod panel;
pub mod pipeline;
pub mod prompt;
pub mod styles;

pub use panel::{Disclosure, PanelBody, PanelHeight, PanelRegistry, SummaryPanel};
pub use pipeline::{PreparedPrompt, RenderedSummary, Summarizer, prepare, render_summary, summarize};
pub use prompt::build_prompt;
pub use styles::ensure_styles_registered;
