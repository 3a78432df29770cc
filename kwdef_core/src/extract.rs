//! Keyword/definition extraction from plain document text.
//!
//! A keyword starts at the beginning of the text or right after a newline and
//! is a run of word characters, whitespace, `/`, `(` and `)` terminated by a
//! colon. Its definition runs up to the next newline that is followed by
//! another keyword head, or to the end of the text, and may span lines.

use std::sync::OnceLock;
use tracing::debug;

use crate::KeywordMap;

/// Keyword head anchored at the start of the haystack: the keyword run and
/// its terminating colon.
static KEYWORD_HEAD: OnceLock<regex::Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn keyword_head() -> &'static regex::Regex {
    KEYWORD_HEAD.get_or_init(|| {
        regex::Regex::new(r"^[\w\s/()]+:").expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Extract every keyword/definition pair from `text`.
///
/// Keywords and definitions are trimmed. A keyword seen again later replaces
/// the earlier definition. Text without any keyword head yields an empty map.
#[must_use]
pub fn extract_keywords(text: &str) -> KeywordMap {
    let mut map = KeywordMap::new();
    let mut line_start = Some(0);

    while let Some(start) = line_start {
        let Some(colon) = keyword_colon_at(text, start) else {
            line_start = newline_from(text, start).map(|nl| nl + 1);
            continue;
        };

        let def_start = skip_whitespace(text, colon + 1);
        let def_end = definition_end(text, def_start);

        let keyword = text[start..colon].trim();
        let definition = text[def_start..def_end].trim();
        debug!("Extracted keyword '{keyword}' ({} bytes)", definition.len());

        if map.insert(keyword, definition).is_some() {
            debug!("Keyword '{keyword}' repeated, keeping the later definition");
        }

        line_start = line_start_from(text, def_end);
    }

    map
}

/// Byte offset of the terminating colon when a keyword head begins at `pos`.
///
/// `pos` is always `0` or just past a newline, so it sits on a char boundary.
fn keyword_colon_at(text: &str, pos: usize) -> Option<usize> {
    keyword_head()
        .find(&text[pos..])
        .map(|m| pos + m.end() - 1)
}

/// End of a definition starting at `from`: the first newline followed by a
/// keyword head, or the end of the text.
fn definition_end(text: &str, from: usize) -> usize {
    let mut cursor = from;
    while let Some(nl) = newline_from(text, cursor) {
        if keyword_colon_at(text, nl + 1).is_some() {
            return nl;
        }
        cursor = nl + 1;
    }
    text.len()
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + rest.len() - rest.trim_start().len()
}

fn newline_from(text: &str, from: usize) -> Option<usize> {
    text.as_bytes()
        .get(from..)?
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| from + i)
}

/// First line start at or after `from`.
fn line_start_from(text: &str, from: usize) -> Option<usize> {
    if from == 0 || text.as_bytes().get(from - 1) == Some(&b'\n') {
        return Some(from);
    }
    newline_from(text, from).map(|nl| nl + 1)
}
