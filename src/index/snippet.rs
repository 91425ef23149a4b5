//! Query-focused snippet selection

use std::collections::HashSet;

pub const SNIPPET_WINDOW: usize = 200;
pub const SNIPPET_STRIDE: usize = 50;

const ELLIPSIS: &str = "...";

/// Picks the body window holding the most distinct query tokens
///
/// Windows of [`SNIPPET_WINDOW`] characters are taken every
/// [`SNIPPET_STRIDE`] characters; the first best-scoring one wins. Edges cut
/// mid-document are trimmed back to a word boundary and marked with an
/// ellipsis.
pub fn extract_snippet(body: &str, tokens: &[String]) -> String {
    let chars: Vec<char> = body.chars().collect();
    if chars.len() <= SNIPPET_WINDOW {
        return body.trim().to_string();
    }

    let mut best_start = 0;
    let mut best_score = 0;
    let mut start = 0;

    loop {
        let end = (start + SNIPPET_WINDOW).min(chars.len());
        let window: String = chars[start..end].iter().collect::<String>().to_lowercase();
        let score = tokens
            .iter()
            .filter(|t| window.contains(t.as_str()))
            .collect::<HashSet<_>>()
            .len();

        if score > best_score {
            best_score = score;
            best_start = start;
        }

        if end >= chars.len() {
            break;
        }
        start += SNIPPET_STRIDE;
    }

    let best_end = (best_start + SNIPPET_WINDOW).min(chars.len());
    trim_window(&chars[best_start..best_end], best_start > 0, best_end < chars.len())
}

fn trim_window(window: &[char], cut_start: bool, cut_end: bool) -> String {
    let mut text: &[char] = window;

    if cut_start {
        if let Some(pos) = text.iter().position(|c| c.is_whitespace()) {
            text = &text[pos + 1..];
        }
    }

    if cut_end {
        if let Some(pos) = text.iter().rposition(|c| c.is_whitespace()) {
            text = &text[..pos];
        }
    }

    let core: String = text.iter().collect();
    let core = core.trim();

    let mut snippet = String::with_capacity(core.len() + 2 * ELLIPSIS.len());
    if cut_start {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(core);
    if cut_end {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}
