//! Cache keys

use sha2::{Digest, Sha256};

/// Hex characters of the text digest kept in the key
const HASH_PREFIX_LEN: usize = 16;

/// `{prefix}:{sha256(text)[..16]}:{rating}`
pub fn cache_key(prefix: &str, text: &str, rating: u8) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}:{}:{}", prefix, &digest[..HASH_PREFIX_LEN], rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = cache_key("review_analysis", "hello", 5);
        // sha256("hello") = 2cf24dba5fb0a30e...
        assert_eq!(key, "review_analysis:2cf24dba5fb0a30e:5");
    }

    #[test]
    fn test_key_depends_on_text_and_rating() {
        let base = cache_key("p", "Great food", 4);
        assert_eq!(base, cache_key("p", "Great food", 4));
        assert_ne!(base, cache_key("p", "Great food", 5));
        assert_ne!(base, cache_key("p", "Great food!", 4));
        assert_ne!(base, cache_key("q", "Great food", 4));
    }
}
