//! Content hashing for stable vector identifiers.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 content hash for a chunk of an indexed source.
///
/// Concatenates source, chunk position and chunk text, then returns the
/// hex-encoded digest. Re-indexing the same listing produces the same ids.
#[must_use]
pub fn content_hash(source: &str, position: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b":");
    hasher.update(position.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash() {
        let h1 = content_hash("keywords_definitions.txt", 0, "Apple: A fruit.");
        let h2 = content_hash("keywords_definitions.txt", 0, "Apple: A fruit.");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex length
    }

    #[test]
    fn different_inputs_different_hashes() {
        let h1 = content_hash("keywords_definitions.txt", 0, "Apple: A fruit.");
        let h2 = content_hash("keywords_definitions.txt", 1, "Apple: A fruit.");
        let h3 = content_hash("other.txt", 0, "Apple: A fruit.");
        assert_ne!(h1, h2);
        assert_ne!(h1, h3);
    }
}
