//! End-to-end trigger flow: document → text block → prompt → summary → markup.
//!
//! [`prepare`] runs synchronously against the parsed document. The document
//! is not needed afterwards, so only the owned [`PreparedPrompt`] crosses the
//! await in [`summarize`].

use std::future::Future;

use scraper::Html;
use serde::Serialize;
use tracing::{info, instrument};

use coursesummary_extractor::{Extractor, FrameResolver};
use coursesummary_gemini::GeminiClient;
use coursesummary_markdown::{MarkupNode, parse_markup, translate};
use coursesummary_shared::{CourseSummaryError, Result, TextBlock, ViewKind};

use crate::prompt::build_prompt;

/// Remote (or fake) service turning a prompt into raw summary text.
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

impl Summarizer for GeminiClient {
    fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        self.generate(prompt)
    }
}

/// Extracted text and the prompt built from it.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedPrompt {
    pub block: TextBlock,
    pub prompt: String,
    /// SHA-256 of the rendered text block.
    pub fingerprint: String,
}

impl PreparedPrompt {
    pub fn view(&self) -> ViewKind {
        self.block.view
    }
}

/// Raw summary text with its translated markup and node tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSummary {
    pub raw: String,
    pub markup: String,
    pub nodes: Vec<MarkupNode>,
}

/// Extract `doc` and build the prompt. Fails with
/// [`CourseSummaryError::EmptyContent`] when there is no text at all.
#[instrument(skip_all)]
pub fn prepare<R: FrameResolver>(extractor: &Extractor<R>, doc: &Html) -> Result<PreparedPrompt> {
    let block = extractor.extract(doc);
    if block.is_empty() {
        return Err(CourseSummaryError::EmptyContent);
    }

    let fingerprint = block.fingerprint();
    let prompt = build_prompt(&block);
    info!(
        view = %block.view,
        fingerprint = &fingerprint[..12],
        prompt_len = prompt.len(),
        "prompt prepared"
    );

    Ok(PreparedPrompt {
        block,
        prompt,
        fingerprint,
    })
}

/// Translate raw summary text for display.
pub fn render_summary(raw: String) -> RenderedSummary {
    let markup = translate(&raw);
    let nodes = parse_markup(&markup);
    RenderedSummary { raw, markup, nodes }
}

/// Send the prepared prompt and translate the answer.
#[instrument(skip_all, fields(view = %prepared.view()))]
pub async fn summarize<S: Summarizer + ?Sized>(
    prepared: &PreparedPrompt,
    summarizer: &S,
) -> Result<RenderedSummary> {
    let raw = summarizer.summarize(&prepared.prompt).await?;
    let rendered = render_summary(raw);
    info!(nodes = rendered.nodes.len(), "summary rendered");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use coursesummary_extractor::LocalFrames;
    use coursesummary_markdown::List;

    use crate::panel::PanelRegistry;
    use crate::prompt::LESSON_INSTRUCTIONS;

    /// Returns a canned answer and records the prompts it received.
    struct FakeSummarizer {
        answer: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeSummarizer {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                answer: Err(CourseSummaryError::Summarization(message.to_string())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl Summarizer for FakeSummarizer {
        fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let answer = match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(CourseSummaryError::Summarization(e.to_string())),
            };
            async move { answer }
        }
    }

    fn lesson_doc() -> Html {
        Html::parse_document(
            r#"<div class="lesson selected">
                 <div class="meta">
                   <span class="topic">Week 3</span>
                   <div class="sequence"><span class="date">12 May</span><span class="period">2</span></div>
                 </div>
               </div>
               <div data-contents="true"><p>Read chapter 4.</p></div>"#,
        )
    }

    #[test]
    fn prepare_builds_lesson_prompt() {
        let prepared = prepare(&Extractor::default(), &lesson_doc()).unwrap();
        assert_eq!(prepared.view(), ViewKind::SingleItem);
        assert_eq!(
            prepared.prompt,
            format!(
                "{LESSON_INSTRUCTIONS}Lesson: Week 3\n\nDate: 12 May, Period: 2\n\nRead chapter 4."
            )
        );
        assert_eq!(prepared.fingerprint.len(), 64);
    }

    #[test]
    fn prepare_empty_view_is_empty_content() {
        let doc = Html::parse_document("<html><body><p>   </p></body></html>");
        let err = prepare(&Extractor::default(), &doc).unwrap_err();
        assert!(matches!(err, CourseSummaryError::EmptyContent));
    }

    #[test]
    fn prepare_with_frame_resolver() {
        let doc = Html::parse_document(
            r#"<div class="lesson selected"></div>
               <iframe class="userHTML" srcdoc="<p>Lab rules</p>"></iframe>"#,
        );
        let extractor = Extractor::with_resolver(Default::default(), LocalFrames::new());
        let prepared = prepare(&extractor, &doc).unwrap();
        assert!(prepared.prompt.ends_with("Embedded Frame Content:\n\nLab rules"));
    }

    #[tokio::test]
    async fn summarize_translates_answer() {
        let prepared = prepare(&Extractor::default(), &lesson_doc()).unwrap();
        let summarizer = FakeSummarizer::answering("**1. Topics:** stuff\n- a\n- b");

        let rendered = summarize(&prepared, &summarizer).await.unwrap();

        assert_eq!(
            rendered.markup,
            "<h4>1. Topics:</h4> stuff<ul><li>a</li><li>b</li></ul>"
        );
        assert_eq!(
            rendered.nodes[2],
            MarkupNode::List(List {
                ordered: false,
                items: vec![
                    vec![MarkupNode::Text("a".into())],
                    vec![MarkupNode::Text("b".into())],
                ],
            })
        );
        assert_eq!(summarizer.prompts.lock().unwrap().as_slice(), [prepared.prompt]);
    }

    #[tokio::test]
    async fn summarize_propagates_failure() {
        let prepared = prepare(&Extractor::default(), &lesson_doc()).unwrap();
        let summarizer = FakeSummarizer::failing("API request failed: 500 - Unknown error");

        let err = summarize(&prepared, &summarizer).await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed: 500 - Unknown error");
    }

    #[tokio::test]
    async fn trigger_flow_fills_panel() {
        let mut registry = PanelRegistry::default();
        let id = registry.mount("lesson").unwrap();
        registry.get_mut(id).unwrap().start_loading();

        let prepared = prepare(&Extractor::default(), &lesson_doc()).unwrap();
        let outcome = summarize(&prepared, &FakeSummarizer::answering("Done")).await;
        assert!(registry.deliver(id, outcome));

        let panel = registry.get(id).unwrap();
        assert!(panel.is_expanded());
        assert_eq!(panel.body_text(), Some("Done"));
    }

    #[tokio::test]
    async fn empty_view_shows_error_in_panel() {
        let mut registry = PanelRegistry::default();
        let id = registry.mount("course").unwrap();

        let doc = Html::parse_document("<html></html>");
        let outcome = match prepare(&Extractor::default(), &doc) {
            Ok(prepared) => summarize(&prepared, &FakeSummarizer::answering("unused")).await,
            Err(e) => Err(e),
        };
        registry.deliver(id, outcome);

        assert_eq!(
            registry.get(id).unwrap().body_text(),
            Some("Error generating summary: no course content found. Please try again.")
        );
    }
}
