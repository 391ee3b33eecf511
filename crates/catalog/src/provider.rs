use serde_json::Value;

use crate::UpstreamFailure;

/// A source of raw catalog resources.
///
/// Implementations attach credentials, perform the call and classify
/// failures; they never retry and never cache.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one resource (e.g. `/movie/550/credits`) and return its parsed JSON.
    async fn fetch_resource(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamFailure>;

    /// Whether calls can be made at all. Sources without a credential
    /// fail every call with [`UpstreamFailure::Unauthorized`].
    fn is_configured(&self) -> bool {
        true
    }
}

/// Catalog resource paths.
pub mod paths {
    pub const POPULAR: &str = "/movie/popular";
    pub const SEARCH: &str = "/search/movie";
    pub const DISCOVER: &str = "/discover/movie";
    pub const TRENDING_WEEK: &str = "/trending/movie/week";

    pub fn movie(id: u64) -> String {
        format!("/movie/{id}")
    }

    pub fn credits(id: u64) -> String {
        format!("/movie/{id}/credits")
    }

    pub fn videos(id: u64) -> String {
        format!("/movie/{id}/videos")
    }
}
