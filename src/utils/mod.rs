pub mod config;
pub mod logging;
pub mod time;

use std::hash::Hasher;

/// Hash a string using xxHash64 for use as cache keys
pub fn hash_string(s: &str) -> u64 {
    let mut hasher = twox_hash::XxHash64::default();
    hasher.write(s.to_lowercase().as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ignores_case() {
        assert_eq!(hash_string("Feeling Anxious"), hash_string("feeling anxious"));
        assert_ne!(hash_string("feeling anxious"), hash_string("feeling calm"));
    }
}
