//! One-time stylesheet registration for the summary panel.
//!
//! The host calls [`ensure_styles_registered`] once at startup and injects the
//! returned stylesheet. Later calls return `None`.

use std::sync::atomic::{AtomicBool, Ordering};

/// Element id the host gives the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "course-summary-styles";

/// Default panel stylesheet.
pub const STYLESHEET: &str = r#".course-summary-container {
  width: 100%;
  display: flex;
  justify-content: center;
  margin: 32px 0 24px 0;
}
.course-summary-box {
  width: 90vw;
  max-width: 900px;
  min-width: 320px;
  border-radius: 48px;
  background: #23242a;
  color: #fff;
  font-family: 'Segoe UI', 'Roboto', Arial, sans-serif;
  display: flex;
  flex-direction: column;
  align-items: flex-start;
  padding: 32px 40px 28px 40px;
}
.course-summary-box h3 {
  margin: 0 0 16px 0;
  font-size: 2rem;
  font-weight: 700;
}
.course-summary-content {
  max-height: 300px;
  overflow-y: auto;
  padding-right: 8px;
  height: 0;
  margin-bottom: 20px;
  font-size: 1.1rem;
  line-height: 1.6;
  word-break: break-word;
  transition: height 0.4s cubic-bezier(0.4, 0, 0.2, 1);
}
.course-summary-loading {
  width: 100%;
  display: flex;
  align-items: center;
  gap: 12px;
}
.course-summary-shimmer {
  height: 1.2em;
  width: 120px;
  border-radius: 12px;
  background: linear-gradient(90deg, #444 25%, #666 50%, #444 75%);
  background-size: 200% 100%;
  animation: course-summary-shimmer 1.2s infinite linear;
  display: inline-block;
}
@keyframes course-summary-shimmer {
  0% { background-position: 200% 0; }
  100% { background-position: -200% 0; }
}
"#;

/// Idempotence guard for stylesheet registration.
#[derive(Debug, Default)]
pub struct StyleGuard {
    registered: AtomicBool,
}

impl StyleGuard {
    pub const fn new() -> Self {
        Self {
            registered: AtomicBool::new(false),
        }
    }

    /// The stylesheet on the first call, `None` afterwards.
    pub fn register(&self) -> Option<&'static str> {
        if self.registered.swap(true, Ordering::AcqRel) {
            None
        } else {
            tracing::debug!(id = STYLE_ELEMENT_ID, "panel styles registered");
            Some(STYLESHEET)
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}

static STYLES: StyleGuard = StyleGuard::new();

/// Process-wide registration. Returns the stylesheet exactly once.
pub fn ensure_styles_registered() -> Option<&'static str> {
    STYLES.register()
}
