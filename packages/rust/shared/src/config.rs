//! Application configuration for Course Summary.
//!
//! User config lives at `~/.coursesummary/coursesummary.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourseSummaryError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursesummary.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursesummary";

// ---------------------------------------------------------------------------
// Config structs (matching coursesummary.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini summarization settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Structural markers used to locate content in a page.
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Summary panel presentation.
    #[serde(default)]
    pub panel: PanelConfig,
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for `generateContent`.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (scheme + host, no trailing path).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling parameters sent as `generationConfig`.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            generation: GenerationConfig::default(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_timeout_secs() -> u64 {
    60
}

/// `[gemini.generation]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}
fn default_top_k() -> u32 {
    40
}
fn default_top_p() -> f32 {
    0.95
}
fn default_max_output_tokens() -> u32 {
    1024
}

/// `[markers]` section: CSS selectors for every structural marker the
/// extractor queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Present only when a single lesson is selected.
    pub selected_item: String,
    /// Lesson topic label, relative to the selected item.
    pub title: String,
    /// Date/period container, relative to the selected item.
    pub sequence: String,
    /// Date label, relative to the sequence container.
    pub date: String,
    /// Period label, relative to the sequence container.
    pub period: String,
    /// Primary lesson content container.
    pub primary_content: String,
    /// Wrapper holding auxiliary panels and embedded frames.
    pub auxiliary_wrapper: String,
    /// Frames carrying the explicit marker class.
    pub frame_marker: String,
    /// Frames nested under the auxiliary wrapper.
    pub wrapper_frame: String,
    /// Course name label on the overview page.
    pub collection_title: String,
    /// Course description on the overview page.
    pub collection_description: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            selected_item: ".lesson.selected".into(),
            title: ".meta .topic".into(),
            sequence: ".meta .sequence".into(),
            date: ".date".into(),
            period: ".period".into(),
            primary_content: r#"div[data-contents="true"]"#.into(),
            auxiliary_wrapper: ".iframeWrapper".into(),
            frame_marker: "iframe.userHTML".into(),
            wrapper_frame: ".iframeWrapper iframe".into(),
            collection_title: "#title span".into(),
            collection_description: ".course .description".into(),
        }
    }
}

/// `[panel]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Cap on the expanded height of the summary body, in content units.
    #[serde(default = "default_max_height")]
    pub max_height: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
        }
    }
}

fn default_max_height() -> u32 {
    300
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursesummary/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CourseSummaryError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursesummary/coursesummary.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseSummaryError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CourseSummaryError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_file_path()?)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CourseSummaryError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CourseSummaryError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| CourseSummaryError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Read the Gemini API key from the env var named in the config.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.gemini.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(CourseSummaryError::config(format!(
            "Gemini API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://aistudio.google.com/app/apikey"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("gemini-2.0-flash"));
        assert!(toml_str.contains("selected_item"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.gemini.generation, GenerationConfig::default());
        assert_eq!(parsed.panel.max_height, 300);
        assert_eq!(parsed.markers.primary_content, r#"div[data-contents="true"]"#);
    }

    #[test]
    fn partial_markers_keep_other_defaults() {
        let toml_str = r#"
[markers]
selected_item = ".unit.active"

[gemini.generation]
temperature = 0.2
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.markers.selected_item, ".unit.active");
        assert_eq!(config.markers.title, ".meta .topic");
        assert_eq!(config.gemini.generation.temperature, 0.2);
        assert_eq!(config.gemini.generation.top_k, 40);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/coursesummary.toml")).unwrap_err();
        assert!(matches!(err, CourseSummaryError::Io { .. }));
    }

    #[test]
    fn api_key_resolution() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.gemini.api_key_env = "CS_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn init_config_at_writes_loadable_defaults() {
        let dir = std::env::temp_dir().join(format!("cs-config-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("nested").join("coursesummary.toml");

        let written = init_config_at(&path).unwrap();
        assert_eq!(written, path);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.panel.max_height, 300);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");

        std::fs::remove_dir_all(&dir).ok();
    }
}
