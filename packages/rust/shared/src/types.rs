//! Core domain types shared by the extractor, the translator, and the panel.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Separator placed between rendered segments.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

// ---------------------------------------------------------------------------
// ViewKind
// ---------------------------------------------------------------------------

/// Which kind of page the document view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// One lesson is selected and its detail is shown.
    SingleItem,
    /// A course overview listing rather than one selected lesson.
    CollectionOverview,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleItem => "single_item",
            Self::CollectionOverview => "collection_overview",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// Label of a text segment. Variant order is extraction-phase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Title,
    Metadata,
    Body,
    Description,
    Auxiliary,
    EmbeddedFrame,
}

impl SegmentKind {
    /// Literal header line rendered above the segment text, if any.
    pub fn header(&self) -> Option<&'static str> {
        match self {
            Self::Auxiliary => Some("Additional Content:"),
            Self::EmbeddedFrame => Some("Embedded Frame Content:"),
            _ => None,
        }
    }
}

/// One labeled piece of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    /// Render the segment, header first when the kind has one.
    pub fn render(&self) -> String {
        match self.kind.header() {
            Some(header) => format!("{header}{SEGMENT_SEPARATOR}{}", self.text),
            None => self.text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// TextBlock
// ---------------------------------------------------------------------------

/// Ordered sequence of segments extracted from one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub view: ViewKind,
    segments: Vec<Segment>,
}

impl TextBlock {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            segments: Vec::new(),
        }
    }

    /// Append a segment. Blank text is dropped.
    ///
    /// Segments must arrive in phase order; several segments of the same
    /// kind (one per embedded frame) are allowed.
    pub fn push(&mut self, kind: SegmentKind, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        debug_assert!(
            self.segments.last().is_none_or(|last| last.kind <= kind),
            "segment {kind:?} pushed out of phase order"
        );
        self.segments.push(Segment { kind, text });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments joined with a blank line; empty when nothing was found.
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(Segment::render)
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }

    /// SHA-256 of the rendered text, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// PanelId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one summary panel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub Uuid);

impl PanelId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
