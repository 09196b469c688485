//! Compiled structural markers.

use scraper::Selector;

use coursesummary_shared::{CourseSummaryError, MarkersConfig, Result};

/// The CSS selectors the extractor queries, parsed once up front.
#[derive(Debug, Clone)]
pub struct Markers {
    pub(crate) selected_item: Selector,
    pub(crate) title: Selector,
    pub(crate) sequence: Selector,
    pub(crate) date: Selector,
    pub(crate) period: Selector,
    pub(crate) primary_content: Selector,
    pub(crate) auxiliary_wrapper: Selector,
    pub(crate) frame_marker: Selector,
    pub(crate) wrapper_frame: Selector,
    pub(crate) collection_title: Selector,
    pub(crate) collection_description: Selector,
}

impl Markers {
    /// Parse every selector in `config`. Fails on the first invalid one.
    pub fn compile(config: &MarkersConfig) -> Result<Self> {
        Ok(Self {
            selected_item: compile("selected_item", &config.selected_item)?,
            title: compile("title", &config.title)?,
            sequence: compile("sequence", &config.sequence)?,
            date: compile("date", &config.date)?,
            period: compile("period", &config.period)?,
            primary_content: compile("primary_content", &config.primary_content)?,
            auxiliary_wrapper: compile("auxiliary_wrapper", &config.auxiliary_wrapper)?,
            frame_marker: compile("frame_marker", &config.frame_marker)?,
            wrapper_frame: compile("wrapper_frame", &config.wrapper_frame)?,
            collection_title: compile("collection_title", &config.collection_title)?,
            collection_description: compile(
                "collection_description",
                &config.collection_description,
            )?,
        })
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::compile(&MarkersConfig::default()).expect("built-in marker selectors are valid")
    }
}

fn compile(name: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        CourseSummaryError::config(format!(
            "invalid selector for markers.{name} '{selector}': {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers_compile() {
        assert!(Markers::compile(&MarkersConfig::default()).is_ok());
    }

    #[test]
    fn invalid_selector_names_the_marker() {
        let config = MarkersConfig {
            primary_content: "div[data-contents=".into(),
            ..MarkersConfig::default()
        };
        let err = Markers::compile(&config).unwrap_err();
        assert!(matches!(err, CourseSummaryError::Config { .. }));
        assert!(err.to_string().contains("markers.primary_content"));
    }
}
