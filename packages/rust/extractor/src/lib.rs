//! Content extraction from lesson and course pages.
//!
//! This crate provides:
//! - [`Extractor`]: classifies a document view and builds its [`TextBlock`]
//! - [`walker`]: the depth-first text node walk shared by every phase
//! - [`frames`]: embedded frame discovery and the [`FrameResolver`] seam
//! - [`Markers`]: the compiled structural selectors

pub mod frames;
mod lesson;
mod markers;
mod overview;
pub mod walker;

use scraper::Html;
use tracing::{debug, info, instrument};

use coursesummary_shared::{MarkersConfig, Result, TextBlock, ViewKind};

pub use frames::{
    FrameDiscovery, FrameReference, FrameResolver, FromFn, LocalFrames, NoFrames, from_fn,
};
pub use lesson::FRAME_PLACEHOLDER;
pub use markers::Markers;
pub use walker::{collect_text, non_empty, text_nodes};

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Extracts the text of a lesson or course page.
///
/// Every call re-reads the document from scratch; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct Extractor<R = NoFrames> {
    markers: Markers,
    resolver: R,
}

impl Extractor<NoFrames> {
    /// Extractor that ignores embedded frame documents.
    pub fn new(markers: Markers) -> Self {
        Self::with_resolver(markers, NoFrames)
    }
}

impl Default for Extractor<NoFrames> {
    fn default() -> Self {
        Self::new(Markers::default())
    }
}

impl<R: FrameResolver> Extractor<R> {
    pub fn with_resolver(markers: Markers, resolver: R) -> Self {
        Self { markers, resolver }
    }

    /// Compile the configured markers and build an extractor.
    pub fn from_config(config: &MarkersConfig, resolver: R) -> Result<Self> {
        Ok(Self::with_resolver(Markers::compile(config)?, resolver))
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// A view is a single-item view exactly when the selected-item marker is
    /// present.
    pub fn classify(&self, doc: &Html) -> ViewKind {
        if doc.select(&self.markers.selected_item).next().is_some() {
            ViewKind::SingleItem
        } else {
            ViewKind::CollectionOverview
        }
    }

    /// Extract the ordered text block for the view.
    ///
    /// Missing optional elements are omitted; an unreadable frame is skipped.
    /// An empty block means there is nothing to summarize.
    #[instrument(skip_all)]
    pub fn extract(&self, doc: &Html) -> TextBlock {
        let block = match doc.select(&self.markers.selected_item).next() {
            Some(lesson) => lesson::extract(doc, lesson, &self.markers, &self.resolver),
            None => overview::extract(doc, &self.markers),
        };

        debug!(
            segments = ?block.segments().iter().map(|s| s.kind).collect::<Vec<_>>(),
            "segments extracted"
        );
        info!(
            view = %block.view,
            segments = block.segments().len(),
            "content extracted"
        );

        block
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
