//! Query-centred excerpts of matched content.

/// Default snippet length in characters.
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

/// Marker for elided text.
const ELLIPSIS: &str = "...";

/// Extract an excerpt of `content` around the first case-insensitive match of `query`.
///
/// The window starts `max_length / 4` characters before the match and spans
/// `max_length` characters. Without a match (or with empty input) the leading
/// `max_length` characters are returned.
pub fn extract_snippet(content: &str, query: &str, max_length: usize) -> String {
    if content.is_empty() || query.is_empty() {
        return leading_excerpt(content, max_length);
    }

    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&ch| fold_case(ch)).collect();
    let needle: Vec<char> = query.chars().map(fold_case).collect();

    let Some(position) = find_subsequence(&folded, &needle) else {
        return leading_excerpt(content, max_length);
    };

    let start = position.saturating_sub(max_length / 4);
    let end = (start + max_length).min(chars.len());

    let mut snippet = String::with_capacity(max_length + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// First `max_length` characters, ellipsis-marked when cut.
fn leading_excerpt(content: &str, max_length: usize) -> String {
    if content.chars().count() > max_length {
        let truncated: String = content.chars().take(max_length).collect();
        format!("{truncated}{ELLIPSIS}")
    } else {
        content.to_owned()
    }
}

/// One-to-one lowercase mapping so folded positions line up with the original.
fn fold_case(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

fn find_subsequence(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
