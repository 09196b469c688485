//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use coursesummary_core::panel::LOADING_TEXT;
use coursesummary_core::{
    PanelBody, PanelRegistry, RenderedSummary, ensure_styles_registered, prepare, render_summary,
    summarize,
};
use coursesummary_extractor::{Extractor, LocalFrames};
use coursesummary_gemini::GeminiClient;
use coursesummary_markdown::render_plain;
use coursesummary_shared::{
    AppConfig, init_config, init_config_at, load_config, load_config_from, resolve_api_key,
};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Course Summary: summarize course and lesson pages with Gemini.
#[derive(Parser)]
#[command(
    name = "coursesummary",
    version,
    about = "Extract lesson and course pages and summarize them with Gemini.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.coursesummary/coursesummary.toml.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Output format for extracted text.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ExtractFormat {
    Text,
    Json,
}

/// Output format for a translated summary.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum SummaryFormat {
    /// Structural markup.
    Html,
    /// Node tree as JSON.
    Json,
    /// Plain text for terminals.
    Text,
}

/// A saved page and the frame documents it embeds.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Saved HTML page.
    pub file: PathBuf,

    /// Document for an embedded frame, as SRC=PATH (repeatable).
    #[arg(long = "frame", value_name = "SRC=PATH", value_parser = parse_frame_arg)]
    pub frames: Vec<(String, PathBuf)>,

    /// URL the page was served from; frames on other origins are skipped.
    #[arg(long)]
    pub page_url: Option<Url>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the text extracted from a page.
    Extract {
        #[command(flatten)]
        page: PageArgs,

        #[arg(short, long, default_value = "text")]
        format: ExtractFormat,
    },

    /// Print the summarization prompt built for a page.
    Prompt {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Translate summary text (from FILE or stdin) into display markup.
    Render {
        /// Summary text file. Reads stdin when omitted.
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "html")]
        format: SummaryFormat,

        /// Wrap HTML output in a styled standalone document.
        #[arg(long)]
        standalone: bool,
    },

    /// Extract a page, summarize it with Gemini, and print the result.
    Summarize {
        #[command(flatten)]
        page: PageArgs,

        #[arg(short, long, default_value = "text")]
        format: SummaryFormat,

        /// Wrap HTML output in a styled standalone document.
        #[arg(long)]
        standalone: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

fn parse_frame_arg(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((src, path)) if !src.is_empty() && !path.is_empty() => {
            Ok((src.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected SRC=PATH, got '{value}'")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursesummary=info",
        1 => "coursesummary=debug",
        _ => "coursesummary=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path.as_deref();
    match cli.command {
        Command::Extract { page, format } => cmd_extract(config_path, &page, format),
        Command::Prompt { page } => cmd_prompt(config_path, &page),
        Command::Render {
            file,
            format,
            standalone,
        } => cmd_render(file.as_deref(), format, standalone),
        Command::Summarize {
            page,
            format,
            standalone,
        } => cmd_summarize(config_path, &page, format, standalone).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(config_path: Option<&Path>, page: &PageArgs, format: ExtractFormat) -> Result<()> {
    let config = resolve_config(config_path)?;
    let extractor = build_extractor(&config, page)?;
    let doc = read_document(&page.file)?;
    let block = extractor.extract(&doc);

    match format {
        ExtractFormat::Text => println!("{}", block.render()),
        ExtractFormat::Json => println!("{}", serde_json::to_string_pretty(&block)?),
    }
    Ok(())
}

fn cmd_prompt(config_path: Option<&Path>, page: &PageArgs) -> Result<()> {
    let config = resolve_config(config_path)?;
    let extractor = build_extractor(&config, page)?;
    let doc = read_document(&page.file)?;
    let prepared = prepare(&extractor, &doc)?;
    println!("{}", prepared.prompt);
    Ok(())
}

fn cmd_render(file: Option<&Path>, format: SummaryFormat, standalone: bool) -> Result<()> {
    let raw = match file {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| eyre!("failed to read stdin: {e}"))?;
            buf
        }
    };

    print_summary(&render_summary(raw), format, standalone)
}

async fn cmd_summarize(
    config_path: Option<&Path>,
    page: &PageArgs,
    format: SummaryFormat,
    standalone: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let api_key = resolve_api_key(&config)?;
    let client = GeminiClient::from_config(&config.gemini, api_key)?;
    let extractor = build_extractor(&config, page)?;

    let mut registry = PanelRegistry::new(config.panel.max_height);
    let mount_point = page.file.display().to_string();
    let Some(id) = registry.mount(mount_point) else {
        return Ok(());
    };
    if let Some(panel) = registry.get_mut(id) {
        panel.start_loading();
    }

    info!(file = %page.file.display(), model = client.model(), "summarizing page");

    // The parsed document is dropped before the request is awaited.
    let prepared = {
        let doc = read_document(&page.file)?;
        prepare(&extractor, &doc)
    };

    let spinner = loading_spinner();
    let outcome = match prepared {
        Ok(prepared) => summarize(&prepared, &client).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    registry.deliver(id, outcome);
    let panel = registry
        .get(id)
        .ok_or_else(|| eyre!("summary panel was unmounted"))?;

    match panel.body() {
        PanelBody::Summary(summary) => print_summary(summary, format, standalone),
        PanelBody::Error(message) => Err(eyre!("{message}")),
        PanelBody::Idle | PanelBody::Loading => Err(eyre!("summary did not complete")),
    }
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => init_config_at(path)?,
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_extractor(config: &AppConfig, page: &PageArgs) -> Result<Extractor<LocalFrames>> {
    let mut frames = LocalFrames::new();
    if let Some(url) = &page.page_url {
        frames = frames.with_page_url(url.clone());
    }
    for (src, path) in &page.frames {
        frames.insert(src.clone(), read_file(path)?);
    }

    Ok(Extractor::from_config(&config.markers, frames)?)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| eyre!("failed to read {}: {e}", path.display()))
}

fn read_document(path: &Path) -> Result<Html> {
    Ok(Html::parse_document(&read_file(path)?))
}

fn print_summary(summary: &RenderedSummary, format: SummaryFormat, standalone: bool) -> Result<()> {
    match format {
        SummaryFormat::Html if standalone => println!("{}", standalone_document(&summary.markup)),
        SummaryFormat::Html => println!("{}", summary.markup),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&summary.nodes)?),
        SummaryFormat::Text => println!("{}", render_plain(&summary.nodes)),
    }
    Ok(())
}

/// HTML page holding the summary panel, with the stylesheet on first use.
fn standalone_document(markup: &str) -> String {
    let styles = ensure_styles_registered()
        .map(|css| format!("<style id=\"course-summary-styles\">\n{css}</style>\n"))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{styles}</head>\n<body>\n\
         <div class=\"course-summary-container\"><div class=\"course-summary-box\">\
         <h3>Course Summary</h3>\
         <div class=\"course-summary-content\" style=\"height: auto\">{markup}</div>\
         </div></div>\n</body>\n</html>"
    )
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message(LOADING_TEXT);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_arg_splits_on_first_equals() {
        assert_eq!(
            parse_frame_arg("/embed?id=4=frame.html").unwrap(),
            ("/embed?id".to_string(), PathBuf::from("4=frame.html"))
        );
        assert!(parse_frame_arg("no-separator").is_err());
        assert!(parse_frame_arg("=frame.html").is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "coursesummary",
            "extract",
            "page.html",
            "--frame",
            "/e/1=one.html",
            "--config",
            "alt.toml",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_path, Some(PathBuf::from("alt.toml")));
        match cli.command {
            Command::Extract { page, .. } => {
                assert_eq!(page.file, PathBuf::from("page.html"));
                assert_eq!(page.frames.len(), 1);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn standalone_document_embeds_markup() {
        let html = standalone_document("<strong>x</strong>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<strong>x</strong>"));
    }
}
