// src/core/sanitize.rs

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Short single-line preview for log lines.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = normalize_ws(s);
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// File stem safe on every platform: ASCII alphanumerics, '-' and '_',
/// whitespace runs become a single '_'. Falls back to `doc_<idx>`.
pub fn sanitize_stem(name: &str, idx: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() || ch == '_' { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' { out.push(ch); last_us = false; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { format!("doc_{}", idx) } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        assert_eq!(sanitize_stem("Amazon 1", 0), "Amazon_1");
        assert_eq!(sanitize_stem("  page__two  ", 0), "page_two");
        assert_eq!(sanitize_stem("***", 7), "doc_7");
        assert_eq!(sanitize_stem("über-page", 0), "ber-page");
    }

    #[test]
    fn preview_flattens_and_cuts() {
        assert_eq!(preview("  a\n\n b  ", 10), "a b");
        assert_eq!(preview("abcdefgh", 3), "abc…");
    }
}
