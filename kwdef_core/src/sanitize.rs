/// Upper bound, in characters, of a sanitized file name stem.
pub const MAX_FILENAME_CHARS: usize = 255;

const FORBIDDEN: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strip characters that are unsafe in file names and cap the length.
///
/// Total and idempotent: every input maps to a usable stem, and sanitizing a
/// sanitized name returns it unchanged.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_FILENAME_CHARS)
        .collect()
}
