//! Substitution passes for summary markup translation.
//!
//! Each pass is a function `&str -> String` applied in sequence over the
//! running text. Later passes see the output of earlier ones, so the order in
//! [`PIPELINE`] is part of the contract.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

/// A named translation pass.
pub(crate) struct Pass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// All passes, in application order.
pub(crate) const PIPELINE: [Pass; 8] = [
    Pass {
        name: "normalize",
        apply: normalize,
    },
    Pass {
        name: "bold",
        apply: bold,
    },
    Pass {
        name: "italic",
        apply: italic,
    },
    Pass {
        name: "numbered_items",
        apply: numbered_items,
    },
    Pass {
        name: "bulleted_items",
        apply: bulleted_items,
    },
    Pass {
        name: "wrap_lists",
        apply: wrap_lists,
    },
    Pass {
        name: "promote_headings",
        apply: promote_headings,
    },
    Pass {
        name: "line_breaks",
        apply: line_breaks,
    },
];

/// Run every pass over `text`.
pub(crate) fn run_pipeline(text: &str) -> String {
    let mut result = text.to_string();
    for pass in &PIPELINE {
        result = (pass.apply)(&result);
        trace!(pass = pass.name, len = result.len(), "pass applied");
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 0: Normalize line endings and escape markup characters
// ---------------------------------------------------------------------------

/// Replace CRLF with LF and escape `&`, `<`, `>`.
///
/// The translated output is displayed as markup, so tags must only come from
/// the passes below.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.replace("\r\n", "\n").chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Pass 1: Bold
// ---------------------------------------------------------------------------

/// `**text**` → `<strong>text</strong>`, shortest span first.
fn bold(text: &str) -> String {
    static BOLD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

    BOLD_RE.replace_all(text, "<strong>$1</strong>").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Italic
// ---------------------------------------------------------------------------

/// `*text*` → `<em>text</em>`. Runs after [`bold`] has consumed double markers.
fn italic(text: &str) -> String {
    static ITALIC_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));

    ITALIC_RE.replace_all(text, "<em>$1</em>").to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Numbered list lines
// ---------------------------------------------------------------------------

/// A line starting with `N. ` becomes a list item. The preceding newline is
/// consumed, so the first line of the text never matches.
fn numbered_items(text: &str) -> String {
    static NUMBERED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*[0-9]+\. ([^\n]*)").expect("valid regex"));

    NUMBERED_RE.replace_all(text, "<li>$1</li>").to_string()
}

// ---------------------------------------------------------------------------
// Pass 4: Bulleted list lines
// ---------------------------------------------------------------------------

/// A line starting with `- ` or `* ` becomes a list item.
///
/// A `* ` bullet survives [`italic`] only when no second asterisk follows on
/// the same line.
fn bulleted_items(text: &str) -> String {
    static BULLET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*[-*] ([^\n]*)").expect("valid regex"));

    BULLET_RE.replace_all(text, "<li>$1</li>").to_string()
}

// ---------------------------------------------------------------------------
// Pass 5: Wrap list runs
// ---------------------------------------------------------------------------

/// Wrap each run of consecutive items in `<ol>` or `<ul>`.
///
/// The run is ordered when its own text still contains a `N.` pattern. Item
/// numbers were consumed by [`numbered_items`], so this looks at item text.
fn wrap_lists(text: &str) -> String {
    static RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)(?:<li>.*?</li>)+").expect("valid regex"));
    static NUMERAL_DOT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[0-9]+\.").expect("valid regex"));

    RUN_RE
        .replace_all(text, |caps: &Captures| {
            let run = &caps[0];
            if NUMERAL_DOT_RE.is_match(run) {
                format!("<ol>{run}</ol>")
            } else {
                format!("<ul>{run}</ul>")
            }
        })
        .to_string()
}

// ---------------------------------------------------------------------------
// Pass 6: Heading promotion
// ---------------------------------------------------------------------------

/// `<strong>N. Label:</strong>` → `<h4>N. Label:</h4>`. Depends on [`bold`].
fn promote_headings(text: &str) -> String {
    static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<strong>([0-9]+\..*?:)</strong>").expect("valid regex")
    });

    HEADING_RE.replace_all(text, "<h4>$1</h4>").to_string()
}

// ---------------------------------------------------------------------------
// Pass 7: Line breaks
// ---------------------------------------------------------------------------

/// Every newline left over becomes `<br>`.
fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_escapes_markup() {
        assert_eq!(
            normalize("a < b && c > d"),
            "a &lt; b &amp;&amp; c &gt; d"
        );
        assert_eq!(normalize("<script>"), "&lt;script&gt;");
    }

    #[test]
    fn normalize_converts_crlf() {
        assert_eq!(normalize("one\r\ntwo\r\n"), "one\ntwo\n");
    }

    #[test]
    fn bold_is_non_greedy() {
        assert_eq!(
            bold("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn bold_does_not_cross_lines() {
        assert_eq!(bold("**a\nb**"), "**a\nb**");
    }

    #[test]
    fn italic_after_bold_leaves_strong_alone() {
        let text = bold("**strong** and *soft*");
        assert_eq!(
            italic(&text),
            "<strong>strong</strong> and <em>soft</em>"
        );
    }

    #[test]
    fn italic_leaves_single_marker() {
        assert_eq!(italic("*unclosed"), "*unclosed");
    }

    #[test]
    fn numbered_items_need_preceding_newline() {
        assert_eq!(numbered_items("1. first"), "1. first");
        assert_eq!(
            numbered_items("Intro\n1. first\n2. second"),
            "Intro<li>first</li><li>second</li>"
        );
    }

    #[test]
    fn numbered_items_swallow_blank_lines_before_item() {
        assert_eq!(numbered_items("Intro\n\n  3. third"), "Intro<li>third</li>");
    }

    #[test]
    fn bulleted_items_accept_dash_and_star() {
        assert_eq!(
            bulleted_items("List\n- a\n* b"),
            "List<li>a</li><li>b</li>"
        );
    }

    #[test]
    fn bulleted_items_require_space_after_marker() {
        assert_eq!(bulleted_items("List\n-a"), "List\n-a");
    }

    #[test]
    fn wrap_lists_unordered_by_default() {
        assert_eq!(
            wrap_lists("x<li>a</li><li>b</li>y"),
            "x<ul><li>a</li><li>b</li></ul>y"
        );
    }

    #[test]
    fn wrap_lists_ordered_when_numeral_dot_in_items() {
        assert_eq!(
            wrap_lists("<li>Read 4.2</li><li>Done</li>"),
            "<ol><li>Read 4.2</li><li>Done</li></ol>"
        );
    }

    #[test]
    fn wrap_lists_separate_runs() {
        assert_eq!(
            wrap_lists("<li>a</li>gap<li>b</li>"),
            "<ul><li>a</li></ul>gap<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn promote_headings_requires_number_and_colon() {
        assert_eq!(
            promote_headings("<strong>1. Topics:</strong>"),
            "<h4>1. Topics:</h4>"
        );
        assert_eq!(
            promote_headings("<strong>Topics:</strong>"),
            "<strong>Topics:</strong>"
        );
        assert_eq!(
            promote_headings("<strong>1. Topics</strong>"),
            "<strong>1. Topics</strong>"
        );
    }

    #[test]
    fn line_breaks_replace_all_newlines() {
        assert_eq!(line_breaks("a\nb\n"), "a<br>b<br>");
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<&str> = PIPELINE.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "normalize",
                "bold",
                "italic",
                "numbered_items",
                "bulleted_items",
                "wrap_lists",
                "promote_headings",
                "line_breaks",
            ]
        );
    }
}
