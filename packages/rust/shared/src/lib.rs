//! Shared types, error model, and configuration for Course Summary.
//!
//! This crate is the foundation depended on by all other Course Summary crates.
//! It provides:
//! - [`CourseSummaryError`]: the unified error type
//! - Domain types ([`ViewKind`], [`TextBlock`], [`Segment`], [`PanelId`])
//! - Configuration ([`AppConfig`], [`MarkersConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GeminiConfig, GenerationConfig, MarkersConfig, PanelConfig, config_dir,
    config_file_path, init_config, init_config_at, load_config, load_config_from,
    resolve_api_key,
};
pub use error::{CourseSummaryError, Result};
pub use types::{PanelId, SEGMENT_SEPARATOR, Segment, SegmentKind, TextBlock, ViewKind};
