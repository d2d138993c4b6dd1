//! # Rich-text sanitization
//!
//! Rich-text fields (notice bodies, descriptions, the CEO message) are stored
//! as submitted and cleaned on the way out. Two interchangeable backends are
//! available; the one in use is picked once at startup from configuration and
//! shared through the application state.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

mod html5;
mod pattern;

pub use html5::Html5Sanitizer;
pub use pattern::PatternSanitizer;

/// Upper bound on cleaning passes before giving up on reaching a fixpoint.
const MAX_PASSES: usize = 8;

/// A strategy that removes unsafe markup from an HTML fragment.
///
/// Implementations strip `<script>`/`<style>` elements with their content,
/// `on*` event-handler attributes and `javascript:` URLs. A single pass does
/// not need to be idempotent; [`sanitize`] repeats passes until the output is
/// stable.
pub trait HtmlSanitizer: Send + Sync {
    /// Runs one cleaning pass.
    fn clean(&self, html: &str) -> String;

    /// Backend this sanitizer implements.
    fn backend(&self) -> SanitizerBackend;
}

/// Available sanitizer backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerBackend {
    /// DOM-based cleaning with an allow-list of tags and attributes.
    #[default]
    Html5,
    /// Regex stripping of known-dangerous constructs; keeps all other markup.
    Pattern,
}

impl SanitizerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizerBackend::Html5 => "html5",
            SanitizerBackend::Pattern => "pattern",
        }
    }

    /// Builds the sanitizer for this backend.
    pub fn build(self) -> Result<Arc<dyn HtmlSanitizer>, regex::Error> {
        Ok(match self {
            SanitizerBackend::Html5 => Arc::new(Html5Sanitizer::new()),
            SanitizerBackend::Pattern => Arc::new(PatternSanitizer::new()?),
        })
    }
}

impl fmt::Display for SanitizerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizerBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html5" | "ammonia" | "server" => Ok(SanitizerBackend::Html5),
            "pattern" | "regex" | "client" => Ok(SanitizerBackend::Pattern),
            other => Err(other.to_string()),
        }
    }
}

/// Cleans `html` with `sanitizer`, repeating passes until the output stops
/// changing so that `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(sanitizer: &dyn HtmlSanitizer, html: &str) -> String {
    let mut current = sanitizer.clean(html);
    for _ in 1..MAX_PASSES {
        let next = sanitizer.clean(&current);
        if next == current {
            return current;
        }
        current = next;
    }

    tracing::warn!(
        backend = %sanitizer.backend(),
        "sanitizer did not converge; returning escaped text"
    );
    escape_text(&current)
}

/// Escapes every markup-significant character, yielding inert text.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "<p>Hello <b>world</b></p><script>alert(1)</script>",
        "<script>alert(1)</script>",
        "before<script>alert(1)</script>after",
        "<img src=\"logo.png\" onerror=\"alert(1)\">",
        "<a href=\"javascript:alert(1)\">click</a>",
        "<style>body { display: none }</style><p>text</p>",
        "<scr<script>alert(1)</script>ipt>alert(2)</script>",
        "<svg/onload=alert(1)>",
        "<img src=x title=\">\" onerror=alert(1)>",
        "<a href=\"java&#115;cript:alert(1)\">x</a>",
        "<a href=\"java\tscript:alert(1)\">x</a>",
        "plain text with no markup",
        "",
    ];

    fn backends() -> Vec<Arc<dyn HtmlSanitizer>> {
        vec![
            SanitizerBackend::Html5.build().unwrap(),
            SanitizerBackend::Pattern.build().unwrap(),
        ]
    }

    #[test]
    fn strips_script_fragment_in_every_backend() {
        for sanitizer in backends() {
            let cleaned = sanitize(
                sanitizer.as_ref(),
                "<p>Hello</p><script>alert(1)</script>",
            );
            assert!(
                !cleaned.contains("<script>alert(1)</script>"),
                "{} kept the script: {cleaned}",
                sanitizer.backend()
            );
            assert!(!cleaned.contains("alert(1)"));
            assert!(cleaned.contains("Hello"));
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        for sanitizer in backends() {
            for sample in SAMPLES {
                let once = sanitize(sanitizer.as_ref(), sample);
                let twice = sanitize(sanitizer.as_ref(), &once);
                assert_eq!(once, twice, "{} on {sample:?}", sanitizer.backend());
            }
        }
    }

    #[test]
    fn sanitize_is_deterministic() {
        for sanitizer in backends() {
            for sample in SAMPLES {
                assert_eq!(
                    sanitize(sanitizer.as_ref(), sample),
                    sanitize(sanitizer.as_ref(), sample)
                );
            }
        }
    }

    #[test]
    fn event_handlers_and_javascript_urls_removed() {
        let inputs = [
            "<img src=\"logo.png\" onerror=\"alert(1)\"><a href=\"javascript:alert(2)\">x</a>",
            "<svg/onload=alert(1)>",
            "<img src=x title=\">\" onerror=alert(1)>",
            "<a href=\"java&#115;cript:alert(1)\">x</a>",
            "<a href=\"java\tscript:alert(1)\">x</a>",
        ];
        for sanitizer in backends() {
            for input in inputs {
                let cleaned = sanitize(sanitizer.as_ref(), input);
                let lower = cleaned.to_ascii_lowercase();
                let backend = sanitizer.backend();
                assert!(!lower.contains("onerror"), "{backend} on {input:?}: {cleaned}");
                assert!(!lower.contains("onload"), "{backend} on {input:?}: {cleaned}");
                assert!(!lower.contains("cript:"), "{backend} on {input:?}: {cleaned}");
            }
        }
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("html5".parse(), Ok(SanitizerBackend::Html5));
        assert_eq!("PATTERN".parse(), Ok(SanitizerBackend::Pattern));
        assert_eq!("server".parse(), Ok(SanitizerBackend::Html5));
        assert_eq!("client".parse(), Ok(SanitizerBackend::Pattern));
        assert!("dompurify".parse::<SanitizerBackend>().is_err());
        assert_eq!(SanitizerBackend::default(), SanitizerBackend::Html5);
    }

    #[test]
    fn escape_text_neutralizes_markup() {
        assert_eq!(escape_text("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
    }
}
