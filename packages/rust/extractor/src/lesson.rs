//! Single-item (selected lesson) extraction path.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use coursesummary_shared::{SegmentKind, TextBlock, ViewKind};

use crate::frames::{self, FrameReference, FrameResolver};
use crate::markers::Markers;
use crate::walker::{collect_text, text_content};

/// Stands in for a frame that rendered elements but no text.
pub const FRAME_PLACEHOLDER: &str = "[Embedded lesson content present]";

/// Fallback for a missing date or period.
const NOT_AVAILABLE: &str = "N/A";

/// Build the text block for a selected lesson.
///
/// Segments are pushed in phase order: title, metadata, body, auxiliary
/// panels, embedded frames.
pub(crate) fn extract<R: FrameResolver + ?Sized>(
    doc: &Html,
    lesson: ElementRef<'_>,
    markers: &Markers,
    resolver: &R,
) -> TextBlock {
    let mut block = TextBlock::new(ViewKind::SingleItem);

    if let Some(title) = first_text(lesson, &markers.title) {
        block.push(SegmentKind::Title, format!("Lesson: {title}"));
    }

    if let Some(metadata) = metadata(lesson, markers) {
        block.push(SegmentKind::Metadata, metadata);
    }

    if let Some(content) = doc.select(&markers.primary_content).next() {
        block.push(SegmentKind::Body, collect_text(content));
    }

    if let Some(wrapper) = doc.select(&markers.auxiliary_wrapper).next() {
        let panels: Vec<String> = wrapper
            .children()
            .filter_map(ElementRef::wrap)
            .map(collect_text)
            .filter(|text| !text.is_empty())
            .collect();
        block.push(SegmentKind::Auxiliary, panels.join("\n"));
    }

    for frame in frames::discover(doc, markers) {
        if let Some(text) = frame_text(&frame, resolver) {
            block.push(SegmentKind::EmbeddedFrame, text);
        }
    }

    block
}

/// `Date: <date>, Period: <period>` when at least one of the two is present.
fn metadata(lesson: ElementRef<'_>, markers: &Markers) -> Option<String> {
    let sequence = lesson.select(&markers.sequence).next()?;
    let date = first_text(sequence, &markers.date);
    let period = first_text(sequence, &markers.period);

    if date.is_none() && period.is_none() {
        return None;
    }

    Some(format!(
        "Date: {}, Period: {}",
        date.as_deref().unwrap_or(NOT_AVAILABLE),
        period.as_deref().unwrap_or(NOT_AVAILABLE)
    ))
}

/// Trimmed text of the first match under `scope`; empty counts as absent.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_content)
        .filter(|text| !text.is_empty())
}

/// Text of one embedded frame, the placeholder for a text-less frame with
/// content, or `None`.
fn frame_text<R: FrameResolver + ?Sized>(
    frame: &FrameReference<'_>,
    resolver: &R,
) -> Option<String> {
    static BODY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("body").expect("valid selector"));

    let doc = match resolver.resolve(frame) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            debug!(frame = frame.label(), "frame has no document");
            return None;
        }
        Err(e) => {
            debug!(frame = frame.label(), error = %e, "skipping inaccessible frame");
            return None;
        }
    };

    let body = doc.select(&BODY).next()?;
    let text = collect_text(body);
    if !text.is_empty() {
        return Some(text);
    }

    if body.children().any(|child| child.value().is_element()) {
        return Some(FRAME_PLACEHOLDER.to_string());
    }

    None
}
