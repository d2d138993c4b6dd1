//! Regex-based sanitizer for contexts where a full HTML parser is not wanted.
//!
//! Unlike the HTML5 backend this keeps unknown tags and attributes; it only
//! removes constructs that execute code.

use regex::{Captures, Regex};

use super::{HtmlSanitizer, SanitizerBackend};

/// Attribute run of a start tag, split the way the HTML tokenizer splits it:
/// whitespace or `/` separators, then a name with an optional quoted or
/// unquoted value. A `>` inside a quoted value does not end the tag.
const ATTRIBUTES: &str = r#"(?:[\s/]+|[^\s/>][^\s/>=]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*))?)*"#;

/// Attributes whose value is loaded or navigated to as a URL.
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "xlink:href",
    "poster",
    "background",
    "data",
    "cite",
];

const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:text/html"];

/// Strips script/style elements, inline event handlers and script URLs with
/// a fixed set of patterns.
#[derive(Debug, Clone)]
pub struct PatternSanitizer {
    blocks: Vec<Regex>,
    stray_tags: Regex,
    open_tag: Regex,
    attribute: Regex,
    char_ref: Regex,
}

impl PatternSanitizer {
    /// Compiles the pattern set.
    pub fn new() -> Result<Self, regex::Error> {
        let blocks = [
            format!(r"(?is)<script\b{ATTRIBUTES}>.*?</script\b[^>]*>"),
            format!(r"(?is)<style\b{ATTRIBUTES}>.*?</style\b[^>]*>"),
            // An unterminated element swallows the rest of the fragment.
            r"(?is)<script\b.*\z".to_string(),
            r"(?is)<style\b.*\z".to_string(),
        ]
        .iter()
        .map(|pattern| Regex::new(pattern))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            blocks,
            stray_tags: Regex::new(&format!(
                r"(?i)</?(?:script|style)\b{ATTRIBUTES}(?:>|\z)"
            ))?,
            open_tag: Regex::new(&format!(r"<([a-zA-Z][^\s/>]*)({ATTRIBUTES})(>|\z)"))?,
            attribute: Regex::new(
                r#"(\s*)([^\s/>][^\s/>=]*)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s>]*))?"#,
            )?,
            char_ref: Regex::new(r"(?i)&(?:#x([0-9a-f]+)|#([0-9]+)|([a-z]+));?")?,
        })
    }

    /// Rebuilds one start tag without handler attributes and with script URLs
    /// replaced by `#`. Kept attributes are copied verbatim.
    fn clean_tag(&self, tag: &Captures<'_>) -> String {
        let attributes = self.attribute.replace_all(&tag[2], |attr: &Captures<'_>| {
            let name = attr[2].to_ascii_lowercase();
            if name.starts_with("on") || name == "srcdoc" {
                return String::new();
            }
            match attr.get(3) {
                Some(value)
                    if URL_ATTRIBUTES.contains(&name.as_str())
                        && self.is_script_url(value.as_str()) =>
                {
                    format!("{}{}=\"#\"", &attr[1], &attr[2])
                }
                _ => attr[0].to_string(),
            }
        });
        format!("<{}{}{}", &tag[1], attributes, &tag[3])
    }

    /// Checks a raw attribute value the way a browser resolves it: character
    /// references decoded, whitespace and control characters ignored.
    fn is_script_url(&self, value: &str) -> bool {
        let unquoted = value
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .or_else(|| {
                value
                    .strip_prefix('\'')
                    .and_then(|inner| inner.strip_suffix('\''))
            })
            .unwrap_or(value);
        let decoded = self.char_ref.replace_all(unquoted, decode_char_ref);
        let normalized: String = decoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
            .flat_map(char::to_lowercase)
            .collect();
        SCRIPT_SCHEMES
            .iter()
            .any(|scheme| normalized.starts_with(scheme))
    }
}

fn decode_char_ref(reference: &Captures<'_>) -> String {
    let code_point = match (reference.get(1), reference.get(2), reference.get(3)) {
        (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16).ok(),
        (_, Some(decimal), _) => decimal.as_str().parse().ok(),
        (_, _, Some(name)) => {
            let decoded = match name.as_str().to_ascii_lowercase().as_str() {
                "colon" => ':',
                "tab" => '\t',
                "newline" => '\n',
                "sol" => '/',
                "lpar" => '(',
                "rpar" => ')',
                "amp" => '&',
                _ => return reference[0].to_string(),
            };
            return decoded.to_string();
        }
        _ => None,
    };
    code_point
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

impl HtmlSanitizer for PatternSanitizer {
    fn clean(&self, html: &str) -> String {
        let mut output = html.to_string();
        for block in &self.blocks {
            output = block.replace_all(&output, "").into_owned();
        }
        output = self.stray_tags.replace_all(&output, "").into_owned();
        self.open_tag
            .replace_all(&output, |tag: &Captures<'_>| self.clean_tag(tag))
            .into_owned()
    }

    fn backend(&self) -> SanitizerBackend {
        SanitizerBackend::Pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> PatternSanitizer {
        PatternSanitizer::new().expect("patterns compile")
    }

    #[test]
    fn removes_script_blocks_case_insensitively() {
        let cleaned = sanitizer().clean("<p>a</p><SCRIPT type=\"text/javascript\">x()</SCRIPT><p>b</p>");
        assert_eq!(cleaned, "<p>a</p><p>b</p>");
    }

    #[test]
    fn unterminated_script_swallows_rest() {
        let cleaned = sanitizer().clean("<p>a</p><script>alert(1)");
        assert_eq!(cleaned, "<p>a</p>");
    }

    #[test]
    fn script_tag_with_quoted_gt_is_removed_whole() {
        let cleaned = sanitizer().clean("<script title=\">\">alert(1)</script><p>b</p>");
        assert_eq!(cleaned, "<p>b</p>");
    }

    #[test]
    fn strips_event_handlers_only_inside_tags() {
        let cleaned =
            sanitizer().clean("<div onclick=\"go()\" class='x'>turn on=off</div>");
        assert_eq!(cleaned, "<div class='x'>turn on=off</div>");
    }

    #[test]
    fn strips_handler_after_slash_separator() {
        assert_eq!(sanitizer().clean("<svg/onload=alert(1)>"), "<svg/>");
    }

    #[test]
    fn quoted_gt_does_not_end_the_tag() {
        let cleaned = sanitizer().clean("<img src=x title=\">\" onerror=alert(1)>");
        assert_eq!(cleaned, "<img src=x title=\">\">");
    }

    #[test]
    fn handler_text_inside_quoted_value_is_kept() {
        let html = "<p title=\"a onclick=b\">x</p>";
        assert_eq!(sanitizer().clean(html), html);
    }

    #[test]
    fn unterminated_tag_still_loses_handlers() {
        assert_eq!(sanitizer().clean("<img src=x onerror=alert(1)"), "<img src=x");
    }

    #[test]
    fn neutralizes_script_urls() {
        let cleaned = sanitizer().clean("<a href=\"JavaScript:alert(1)\">x</a>");
        assert_eq!(cleaned, "<a href=\"#\">x</a>");
    }

    #[test]
    fn neutralizes_obfuscated_script_urls() {
        for html in [
            "<a href=\"java&#115;cript:alert(1)\">x</a>",
            "<a href=\"java&#x73;cript:alert(1)\">x</a>",
            "<a href=\"java\tscript:alert(1)\">x</a>",
            "<a href=\" \u{1}javascript&colon;alert(1)\">x</a>",
            "<a href='vbscript:msgbox(1)'>x</a>",
        ] {
            assert_eq!(sanitizer().clean(html), "<a href=\"#\">x</a>", "{html:?}");
        }
        assert_eq!(
            sanitizer().clean("<iframe src=java&#115;cript:alert(1)></iframe>"),
            "<iframe src=\"#\"></iframe>"
        );
    }

    #[test]
    fn keeps_ordinary_urls() {
        let html = "<a href=\"/ko/notices/3?tab=javascript\">x</a><img src='logo.png'>";
        assert_eq!(sanitizer().clean(html), html);
    }

    #[test]
    fn keeps_unknown_markup() {
        let html = "<custom-card data-id=\"7\"><p>text</p></custom-card>";
        assert_eq!(sanitizer().clean(html), html);
    }
}
