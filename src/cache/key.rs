//! Cache key derivation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Deterministic cache key derived from arbitrary input text.
///
/// Keys are the full-width SHA-256 digest of the text, hex-encoded. Using
/// the full 256-bit digest (no truncation) keeps the residual collision
/// probability between distinct texts in birthday-bound territory
/// (~2^-128 for any realistic corpus), which we accept and do not detect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `text`.
    pub fn from_text(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash: String = hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect();
        Self(hash)
    }

    /// The hex digest backing this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
