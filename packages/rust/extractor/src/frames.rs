//! Embedded frame discovery and resolution.
//!
//! Frames are found through two paths (the explicit marker class and
//! membership in the auxiliary wrapper) and deduplicated by node identity.
//! Their documents come from a [`FrameResolver`]; a frame that cannot be read
//! is skipped without affecting the others.

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use url::Url;

use coursesummary_shared::{CourseSummaryError, Result};

use crate::markers::Markers;

// ---------------------------------------------------------------------------
// FrameReference
// ---------------------------------------------------------------------------

/// Which discovery path first produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDiscovery {
    /// Matched the explicit frame marker (`iframe.userHTML`).
    MarkerClass,
    /// Nested under the auxiliary wrapper (`.iframeWrapper iframe`).
    AuxiliaryWrapper,
}

/// Handle to one embedded frame element in the host document.
#[derive(Debug, Clone, Copy)]
pub struct FrameReference<'a> {
    element: ElementRef<'a>,
    discovered_by: FrameDiscovery,
}

impl<'a> FrameReference<'a> {
    pub fn new(element: ElementRef<'a>, discovered_by: FrameDiscovery) -> Self {
        Self {
            element,
            discovered_by,
        }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    pub fn discovered_by(&self) -> FrameDiscovery {
        self.discovered_by
    }

    /// The `src` attribute, if any.
    pub fn src(&self) -> Option<&'a str> {
        self.element.value().attr("src")
    }

    /// The inline `srcdoc` document, if any.
    pub fn srcdoc(&self) -> Option<&'a str> {
        self.element.value().attr("srcdoc")
    }

    /// Short description for logs.
    pub fn label(&self) -> &'a str {
        if self.srcdoc().is_some() {
            "srcdoc"
        } else {
            self.src().unwrap_or("<iframe>")
        }
    }
}

/// Collect frames from both discovery paths, keeping the first occurrence of
/// each element.
pub(crate) fn discover<'a>(doc: &'a Html, markers: &Markers) -> Vec<FrameReference<'a>> {
    let marked = doc
        .select(&markers.frame_marker)
        .map(|el| FrameReference::new(el, FrameDiscovery::MarkerClass));
    let wrapped = doc
        .select(&markers.wrapper_frame)
        .map(|el| FrameReference::new(el, FrameDiscovery::AuxiliaryWrapper));

    let mut seen = HashSet::new();
    let frames: Vec<FrameReference<'a>> = marked
        .chain(wrapped)
        .filter(|frame| seen.insert(frame.element.id()))
        .collect();

    trace!(count = frames.len(), "embedded frames discovered");
    frames
}

// ---------------------------------------------------------------------------
// Resolvers
// ---------------------------------------------------------------------------

/// Supplies the document behind an embedded frame.
///
/// `Ok(None)` means the frame has nothing loaded. `Err` means the frame
/// exists but cannot be read; the extractor skips it.
pub trait FrameResolver {
    fn resolve(&self, frame: &FrameReference<'_>) -> Result<Option<Html>>;
}

impl<R: FrameResolver + ?Sized> FrameResolver for &R {
    fn resolve(&self, frame: &FrameReference<'_>) -> Result<Option<Html>> {
        (**self).resolve(frame)
    }
}

impl<R: FrameResolver + ?Sized> FrameResolver for Box<R> {
    fn resolve(&self, frame: &FrameReference<'_>) -> Result<Option<Html>> {
        (**self).resolve(frame)
    }
}

/// Resolver backed by a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Use a closure as a [`FrameResolver`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&FrameReference<'_>) -> Result<Option<Html>>,
{
    FromFn(f)
}

impl<F> FrameResolver for FromFn<F>
where
    F: Fn(&FrameReference<'_>) -> Result<Option<Html>>,
{
    fn resolve(&self, frame: &FrameReference<'_>) -> Result<Option<Html>> {
        (self.0)(frame)
    }
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Resolver that never loads a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrames;

impl FrameResolver for NoFrames {
    fn resolve(&self, _frame: &FrameReference<'_>) -> Result<Option<Html>> {
        Ok(None)
    }
}

/// Resolver backed by inline `srcdoc` content and a map of frame documents
/// supplied by the host.
///
/// When a page URL is set, `src` values are resolved against it and frames
/// from another origin are rejected, mirroring the browser's same-origin
/// policy.
#[derive(Debug, Clone, Default)]
pub struct LocalFrames {
    page_url: Option<Url>,
    documents: HashMap<String, String>,
}

impl LocalFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL of the host page.
    pub fn with_page_url(mut self, url: Url) -> Self {
        self.page_url = Some(url);
        self
    }

    /// Register the HTML served for a frame `src` (raw or absolute).
    pub fn insert(&mut self, src: impl Into<String>, html: impl Into<String>) {
        self.documents.insert(src.into(), html.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn lookup(&self, src: &str) -> Result<Option<&String>> {
        let Some(page) = &self.page_url else {
            return Ok(self.documents.get(src));
        };

        let resolved = page
            .join(src)
            .map_err(|e| CourseSummaryError::parse(format!("invalid frame src '{src}': {e}")))?;

        if resolved.origin() != page.origin() {
            return Err(CourseSummaryError::frame_denied(resolved.as_str()));
        }

        Ok(self
            .documents
            .get(resolved.as_str())
            .or_else(|| self.documents.get(src)))
    }
}

impl FrameResolver for LocalFrames {
    fn resolve(&self, frame: &FrameReference<'_>) -> Result<Option<Html>> {
        if let Some(srcdoc) = frame.srcdoc() {
            return Ok(Some(Html::parse_document(srcdoc)));
        }

        let src = match frame.src().map(str::trim) {
            None | Some("") | Some("about:blank") => return Ok(None),
            Some(src) => src,
        };

        match self.lookup(src)? {
            Some(html) => Ok(Some(Html::parse_document(html))),
            None => {
                debug!(src, "no document registered for frame");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn frame_in(doc: &Html) -> FrameReference<'_> {
        let sel = Selector::parse("iframe").unwrap();
        FrameReference::new(doc.select(&sel).next().unwrap(), FrameDiscovery::MarkerClass)
    }

    fn body_text(doc: &Html) -> String {
        let sel = Selector::parse("body").unwrap();
        doc.select(&sel)
            .next()
            .map(|b| b.text().collect::<String>())
            .unwrap_or_default()
    }

    #[test]
    fn discover_deduplicates_in_discovery_order() {
        let doc = Html::parse_document(
            r#"<div class="iframeWrapper">
                 <iframe id="a" class="userHTML"></iframe>
                 <iframe id="b"></iframe>
               </div>
               <iframe id="c" class="userHTML"></iframe>"#,
        );
        let frames = discover(&doc, &Markers::default());
        let ids: Vec<&str> = frames
            .iter()
            .map(|f| f.element().value().id().unwrap())
            .collect();
        assert_eq!(ids, ["a", "c", "b"]);
        assert_eq!(frames[0].discovered_by(), FrameDiscovery::MarkerClass);
        assert_eq!(frames[2].discovered_by(), FrameDiscovery::AuxiliaryWrapper);
    }

    #[test]
    fn srcdoc_is_parsed_inline() {
        let doc = Html::parse_document(r#"<iframe srcdoc="<p>inline</p>"></iframe>"#);
        let resolved = LocalFrames::new().resolve(&frame_in(&doc)).unwrap().unwrap();
        assert_eq!(body_text(&resolved), "inline");
    }

    #[test]
    fn registered_src_is_loaded() {
        let doc = Html::parse_document(r#"<iframe src="/embed/1"></iframe>"#);
        let mut frames = LocalFrames::new();
        frames.insert("/embed/1", "<p>from map</p>");
        let resolved = frames.resolve(&frame_in(&doc)).unwrap().unwrap();
        assert_eq!(body_text(&resolved), "from map");
    }

    #[test]
    fn relative_src_resolves_against_page_url() {
        let doc = Html::parse_document(r#"<iframe src="embed/1"></iframe>"#);
        let page = Url::parse("https://school.example.com/courses/10/").unwrap();
        let mut frames = LocalFrames::new().with_page_url(page);
        frames.insert("https://school.example.com/courses/10/embed/1", "<p>same origin</p>");
        let resolved = frames.resolve(&frame_in(&doc)).unwrap().unwrap();
        assert_eq!(body_text(&resolved), "same origin");
    }

    #[test]
    fn cross_origin_src_is_denied() {
        let doc = Html::parse_document(r#"<iframe src="https://videos.example.net/e/42"></iframe>"#);
        let page = Url::parse("https://school.example.com/courses/10").unwrap();
        let frames = LocalFrames::new().with_page_url(page);
        let err = frames.resolve(&frame_in(&doc)).unwrap_err();
        assert!(matches!(err, CourseSummaryError::FrameAccessDenied { .. }));
    }

    #[test]
    fn blank_or_unknown_frames_resolve_to_nothing() {
        for html in [
            r#"<iframe></iframe>"#,
            r#"<iframe src="about:blank"></iframe>"#,
            r#"<iframe src="/not/registered"></iframe>"#,
        ] {
            let doc = Html::parse_document(html);
            assert!(LocalFrames::new().resolve(&frame_in(&doc)).unwrap().is_none());
        }
    }

    #[test]
    fn closure_resolver() {
        let doc = Html::parse_document(r#"<iframe src="/lab"></iframe>"#);
        let resolver = from_fn(|frame| match frame.src() {
            Some("/lab") => Ok(Some(Html::parse_document("<p>lab notes</p>"))),
            _ => Ok(None),
        });
        let resolved = resolver.resolve(&frame_in(&doc)).unwrap().unwrap();
        assert_eq!(body_text(&resolved), "lab notes");
    }

    #[test]
    fn no_frames_loads_nothing() {
        let doc = Html::parse_document(r#"<iframe srcdoc="<p>x</p>"></iframe>"#);
        assert!(NoFrames.resolve(&frame_in(&doc)).unwrap().is_none());
    }
}
