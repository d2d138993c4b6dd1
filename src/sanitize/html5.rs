//! DOM-based sanitizer backed by `ammonia`.

use std::fmt;

use super::{HtmlSanitizer, SanitizerBackend};

/// Attributes allowed on every tag in addition to ammonia's defaults.
const EXTRA_GENERIC_ATTRIBUTES: &[&str] = &["class"];

/// Parses the fragment with an HTML5 parser and re-serializes only
/// allow-listed tags, attributes and URL schemes.
pub struct Html5Sanitizer {
    builder: ammonia::Builder<'static>,
}

impl Html5Sanitizer {
    /// Configures the allow-list once; every pass reuses it.
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder.add_generic_attributes(EXTRA_GENERIC_ATTRIBUTES);
        Self { builder }
    }
}

impl Default for Html5Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Html5Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Html5Sanitizer").finish_non_exhaustive()
    }
}

impl HtmlSanitizer for Html5Sanitizer {
    fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }

    fn backend(&self) -> SanitizerBackend {
        SanitizerBackend::Html5
    }
}
