// src/core/html.rs
//
// Small helpers over `scraper`'s DOM.
use scraper::{ElementRef, Selector};

use crate::config::ConfigError;

/// Compile a CSS selector for the named marker.
pub fn compile(marker: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::BadSelector {
        marker,
        selector: s!(css),
        reason: e.to_string(),
    })
}

/// All descendant text of `el`, concatenated as-is (no trimming).
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// First following sibling *element* with tag `name`; text and comment nodes
/// and elements with other tags in between are skipped.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name().eq_ignore_ascii_case(name))
}

/// True if `s` contains at least one thing shaped like a tag (`<a`, `</a`, `<!`).
/// Plain text with stray `<` characters does not count.
pub fn looks_like_markup(s: &str) -> bool {
    let b = s.as_bytes();
    b.windows(2).any(|w| {
        w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'/' || w[1] == b'!')
    })
}
