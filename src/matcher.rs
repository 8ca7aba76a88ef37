//! Glob-like pattern matching for repository-relative paths.
//!
//! Patterns come in three shapes, checked in this order:
//!
//! 1. **Directory prefix** — a trailing `/` selects a path itself and
//!    everything nested beneath it (`.config/` matches `.config` and
//!    `.config/nvim/init.lua`).
//! 2. **Any-depth** — a leading `**/` lets the remainder match at any
//!    directory depth (`**/.git/` matches `.git`, `foo/.git`, …).
//! 3. **Single-level glob** — `*` matches any run of characters within
//!    one path segment; every other character is literal.
//!
//! There is no `?` or character-class support.

/// Check whether `path` is selected by `pattern`.
///
/// Both arguments are POSIX-style forward-slash-separated relative
/// paths. Pure function, no I/O. An empty pattern never matches.
///
/// # Examples
///
/// ```
/// use dotfiles_bundle_cli::matcher::glob_match;
///
/// assert!(glob_match(".zshrc", ".zshrc"));
/// assert!(glob_match(".config/", ".config/nvim/init.lua"));
/// assert!(glob_match("**/.git/", "foo/bar/.git"));
/// assert!(glob_match(".bin/*", ".bin/script.sh"));
/// assert!(!glob_match(".bin/*", ".bin/nested/script.sh"));
/// ```
#[must_use]
pub fn glob_match(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    // Directory prefix: match the base itself or any ancestor of `path`.
    if let Some(base) = pattern.strip_suffix('/') {
        if glob_match(base, path) {
            return true;
        }
        let segments: Vec<&str> = path.split('/').collect();
        return (1..segments.len()).any(|end| glob_match(base, &segments[..end].join("/")));
    }

    // Any-depth: try the remainder against every segment suffix.
    if let Some(rest) = pattern.strip_prefix("**/") {
        let segments: Vec<&str> = path.split('/').collect();
        return (0..segments.len()).any(|start| match_segments(rest, &segments[start..].join("/")));
    }

    match_segments(pattern, path)
}

/// Match pattern and path segment-by-segment.
///
/// Segment counts must agree exactly, so a single `*` never crosses a
/// path separator.
fn match_segments(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    pattern_segments.len() == path_segments.len()
        && pattern_segments
            .iter()
            .zip(&path_segments)
            .all(|(pat, seg)| match_segment(pat, seg))
}

/// Match one path segment against one pattern segment, where `*`
/// matches any (possibly empty) run of characters.
fn match_segment(pattern: &str, text: &str) -> bool {
    match pattern.chars().next() {
        None => text.is_empty(),
        Some('*') => {
            let rest = &pattern[1..];
            (0..=text.len())
                .filter(|&i| text.is_char_boundary(i))
                .any(|i| match_segment(rest, &text[i..]))
        }
        Some(c) => {
            text.chars().next() == Some(c)
                && match_segment(&pattern[c.len_utf8()..], &text[c.len_utf8()..])
        }
    }
}
