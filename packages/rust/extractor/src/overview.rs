//! Collection-overview (course page) extraction path.

use scraper::Html;

use coursesummary_shared::{SegmentKind, TextBlock, ViewKind};

use crate::markers::Markers;
use crate::walker::text_content;

/// Course name and description. No frame or deep traversal.
pub(crate) fn extract(doc: &Html, markers: &Markers) -> TextBlock {
    let mut block = TextBlock::new(ViewKind::CollectionOverview);

    if let Some(title) = doc.select(&markers.collection_title).next() {
        let title = text_content(title);
        if !title.is_empty() {
            block.push(SegmentKind::Title, format!("Course: {title}"));
        }
    }

    if let Some(description) = doc.select(&markers.collection_description).next() {
        block.push(SegmentKind::Description, text_content(description));
    }

    block
}
