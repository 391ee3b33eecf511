pub mod aggregate;
pub mod insights;
pub mod normalize;
pub mod provider;
pub mod tmdb;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use aggregate::Aggregator;
pub use normalize::ImageBase;
pub use provider::CatalogSource;
pub use tmdb::{CatalogConfig, Credential, TmdbClient};

/// Classified failure of a catalog call. Carries no retry state; every
/// request is resolved independently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamFailure {
    #[error("rate limited by catalog provider")]
    RateLimited,
    #[error("not found")]
    NotFound,
    /// No credential is configured, so no call was attempted.
    #[error("catalog credential is not configured")]
    Unauthorized,
    #[error("upstream error: {message}")]
    UpstreamError {
        status: Option<u16>,
        message: String,
    },
}

impl UpstreamFailure {
    /// The catalog answered, but not in the shape we rely on.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::UpstreamError {
            status: None,
            message: message.into(),
        }
    }
}

/// Per-deployment settings that shape outgoing calls and normalized output.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Response language for list and detail calls.
    pub language: String,
    /// Language for the videos call; English trailers are the most complete.
    pub video_language: String,
    pub images: ImageBase,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            language: "ko-KR".to_string(),
            video_language: "en-US".to_string(),
            images: ImageBase::default(),
        }
    }
}
