//! Summary panel state and the per-mount-point re-entrancy guard.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use coursesummary_shared::{CourseSummaryError, PanelId, Result};

use crate::pipeline::RenderedSummary;

/// Text shown while a summary is in flight.
pub const LOADING_TEXT: &str = "Summarizing…";

/// Length of the expand transition, after which the height settles to auto.
pub const EXPAND_TRANSITION: Duration = Duration::from_millis(400);

/// Default cap on the expanded content height.
pub const DEFAULT_MAX_HEIGHT: u32 = 300;

/// Error text displayed in place of a summary.
pub fn error_message(err: &CourseSummaryError) -> String {
    format!("Error generating summary: {err}. Please try again.")
}

// ---------------------------------------------------------------------------
// SummaryPanel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum PanelBody {
    Idle,
    Loading,
    Summary(RenderedSummary),
    Error(String),
}

/// Content height as the display surface should apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelHeight {
    Zero,
    /// Transition target in content units.
    Fixed(u32),
    Auto,
}

/// One summary instance.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryPanel {
    id: PanelId,
    disclosure: Disclosure,
    body: PanelBody,
    height: PanelHeight,
    max_height: u32,
}

impl SummaryPanel {
    pub fn new(max_height: u32) -> Self {
        Self {
            id: PanelId::new(),
            disclosure: Disclosure::Collapsed,
            body: PanelBody::Idle,
            height: PanelHeight::Zero,
            max_height,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn disclosure(&self) -> Disclosure {
        self.disclosure
    }

    pub fn body(&self) -> &PanelBody {
        &self.body
    }

    pub fn height(&self) -> PanelHeight {
        self.height
    }

    pub fn is_expanded(&self) -> bool {
        self.disclosure == Disclosure::Expanded
    }

    /// Show the loading indicator. The disclosure state is left alone.
    pub fn start_loading(&mut self) {
        self.body = PanelBody::Loading;
    }

    /// Display a translated summary and expand from zero height.
    pub fn show_summary(&mut self, summary: RenderedSummary) {
        self.body = PanelBody::Summary(summary);
        self.expand();
    }

    /// Display an error in place of the summary and expand.
    pub fn show_error(&mut self, err: &CourseSummaryError) {
        self.body = PanelBody::Error(error_message(err));
        self.expand();
    }

    /// Apply a summarization outcome.
    pub fn apply(&mut self, outcome: Result<RenderedSummary>) {
        match outcome {
            Ok(summary) => self.show_summary(summary),
            Err(e) => self.show_error(&e),
        }
    }

    fn expand(&mut self) {
        self.disclosure = Disclosure::Expanded;
        self.height = PanelHeight::Zero;
    }

    /// Start the height transition for content of the given natural height.
    /// Returns the target height, capped at `max_height`.
    pub fn begin_transition(&mut self, natural_height: u32) -> u32 {
        let target = natural_height.min(self.max_height);
        self.height = PanelHeight::Fixed(target);
        target
    }

    /// Called once [`EXPAND_TRANSITION`] has elapsed.
    pub fn settle(&mut self) {
        if self.is_expanded() {
            self.height = PanelHeight::Auto;
        }
    }

    /// Text a plain display surface should show for the body.
    pub fn body_text(&self) -> Option<&str> {
        match &self.body {
            PanelBody::Idle => None,
            PanelBody::Loading => Some(LOADING_TEXT),
            PanelBody::Summary(summary) => Some(summary.markup.as_str()),
            PanelBody::Error(message) => Some(message.as_str()),
        }
    }
}

impl Default for SummaryPanel {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEIGHT)
    }
}

// ---------------------------------------------------------------------------
// PanelRegistry
// ---------------------------------------------------------------------------

/// Panels keyed by mount point. At most one panel per mount point.
#[derive(Debug)]
pub struct PanelRegistry {
    max_height: u32,
    mounted: HashMap<String, PanelId>,
    panels: HashMap<PanelId, SummaryPanel>,
}

impl PanelRegistry {
    pub fn new(max_height: u32) -> Self {
        Self {
            max_height,
            mounted: HashMap::new(),
            panels: HashMap::new(),
        }
    }

    /// Mount a new panel. Returns `None` when the mount point already has one.
    pub fn mount(&mut self, mount_point: impl Into<String>) -> Option<PanelId> {
        let mount_point = mount_point.into();
        if self.mounted.contains_key(&mount_point) {
            debug!(%mount_point, "panel already mounted, skipping");
            return None;
        }

        let panel = SummaryPanel::new(self.max_height);
        let id = panel.id();
        self.panels.insert(id, panel);
        self.mounted.insert(mount_point, id);
        Some(id)
    }

    /// Remove the panel at `mount_point`, if any.
    pub fn unmount(&mut self, mount_point: &str) -> Option<SummaryPanel> {
        let id = self.mounted.remove(mount_point)?;
        self.panels.remove(&id)
    }

    pub fn is_mounted(&self, mount_point: &str) -> bool {
        self.mounted.contains_key(mount_point)
    }

    pub fn get(&self, id: PanelId) -> Option<&SummaryPanel> {
        self.panels.get(&id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut SummaryPanel> {
        self.panels.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Hand a summarization outcome to its panel.
    ///
    /// Returns `false` when the panel has been unmounted; the outcome is
    /// dropped.
    pub fn deliver(&mut self, id: PanelId, outcome: Result<RenderedSummary>) -> bool {
        match self.panels.get_mut(&id) {
            Some(panel) => {
                panel.apply(outcome);
                true
            }
            None => {
                debug!(panel = %id, "discarding result for unmounted panel");
                false
            }
        }
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEIGHT)
    }
}
