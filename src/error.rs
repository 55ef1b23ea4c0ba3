//! Classified error taxonomy for pipeline operations.
//!
//! Every failure the retry executor can observe carries a machine-readable
//! code, an HTTP-like status, and a retryability flag. The retry layer uses
//! only those three pieces of metadata to decide between fail-fast and
//! backoff, so classification happens once, at the point the failure is
//! detected, and the error is never mutated afterwards.
//!
//! ## Error Codes
//!
//! | Code | Status | Retryable |
//! |------|--------|-----------|
//! | `EMBEDDING_FAILED` | 503 | yes |
//! | `SEARCH_FAILED` | 503 | yes |
//! | `GENERATION_FAILED` | 503 | yes |
//! | `RATE_LIMITED` | 429 | yes |
//! | `INVALID_INPUT` | 400 | no |
//! | `UNCLASSIFIED` | 500 | yes |
//!
//! Unclassified failures default to retryable: only an explicit
//! non-retryable classification short-circuits the retry loop.

use thiserror::Error;

/// Machine-readable error code carried by every [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The embedding provider failed to produce a vector.
    EmbeddingFailed,
    /// A retrieval/search call against the vector index failed.
    SearchFailed,
    /// Answer generation from retrieved context failed.
    GenerationFailed,
    /// The remote service rejected the request due to rate limiting.
    RateLimited,
    /// The input was malformed; retrying cannot succeed.
    InvalidInput,
    /// Failure that carries no explicit classification.
    Unclassified,
}

impl ErrorCode {
    /// Returns the canonical code string (e.g., `"EMBEDDING_FAILED"`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmbeddingFailed => "EMBEDDING_FAILED",
            Self::SearchFailed => "SEARCH_FAILED",
            Self::GenerationFailed => "GENERATION_FAILED",
            Self::RateLimited => "RATE_LIMITED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Returns the HTTP-like status code associated with this kind.
    #[inline]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmbeddingFailed | Self::SearchFailed | Self::GenerationFailed => 503,
            Self::RateLimited => 429,
            Self::InvalidInput => 400,
            Self::Unclassified => 500,
        }
    }

    /// Returns whether this kind is retryable.
    ///
    /// Unclassified errors are retryable by default; only explicit
    /// non-retryable classifications fail fast.
    #[inline]
    pub fn retryable(&self) -> bool {
        !matches!(self, Self::InvalidInput)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the reliability core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("embedding failed: {message}")]
    EmbeddingFailed { message: String },

    #[error("search failed: {message}")]
    SearchFailed { message: String },

    #[error("generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    Unclassified { message: String },
}

impl Error {
    /// Create an `EMBEDDING_FAILED` error (503, retryable).
    pub fn embedding_failed(msg: impl Into<String>) -> Self {
        Error::EmbeddingFailed { message: msg.into() }
    }

    /// Create a `SEARCH_FAILED` error (503, retryable).
    pub fn search_failed(msg: impl Into<String>) -> Self {
        Error::SearchFailed { message: msg.into() }
    }

    /// Create a `GENERATION_FAILED` error (503, retryable).
    pub fn generation_failed(msg: impl Into<String>) -> Self {
        Error::GenerationFailed { message: msg.into() }
    }

    /// Create a `RATE_LIMITED` error (429, retryable with doubled backoff).
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Error::RateLimited { message: msg.into() }
    }

    /// Create an `INVALID_INPUT` error (400, never retried).
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput { message: msg.into() }
    }

    /// Create an unclassified error (500, retryable by default).
    pub fn unclassified(msg: impl Into<String>) -> Self {
        Error::Unclassified { message: msg.into() }
    }

    /// Returns the classification code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::EmbeddingFailed { .. } => ErrorCode::EmbeddingFailed,
            Error::SearchFailed { .. } => ErrorCode::SearchFailed,
            Error::GenerationFailed { .. } => ErrorCode::GenerationFailed,
            Error::RateLimited { .. } => ErrorCode::RateLimited,
            Error::InvalidInput { .. } => ErrorCode::InvalidInput,
            Error::Unclassified { .. } => ErrorCode::Unclassified,
        }
    }

    /// Returns the HTTP-like status code for this error.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }

    /// Returns whether the retry executor may re-attempt after this error.
    #[inline]
    pub fn retryable(&self) -> bool {
        self.code().retryable()
    }
}
