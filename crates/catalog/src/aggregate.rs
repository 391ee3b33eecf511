//! Resolves an [`Intent`] into one normalized response, composing as many
//! catalog calls as the intent needs.

use reelscope_core::types::{DetailRecord, Intent, Resolved};
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{to_detail_record, to_list_items};
use crate::provider::{CatalogSource, paths};
use crate::{CatalogSettings, UpstreamFailure};

pub struct Aggregator<'a> {
    pub(crate) source: &'a dyn CatalogSource,
    pub(crate) settings: &'a CatalogSettings,
}

impl<'a> Aggregator<'a> {
    pub fn new(source: &'a dyn CatalogSource, settings: &'a CatalogSettings) -> Self {
        Self { source, settings }
    }

    pub(crate) fn language_param(&self) -> (String, String) {
        ("language".to_string(), self.settings.language.clone())
    }

    pub async fn resolve(&self, intent: &Intent) -> Result<Resolved, UpstreamFailure> {
        debug!(source = self.source.name(), intent = intent.kind(), "resolving intent");

        let (path, params) = match intent {
            Intent::Detail { id } => {
                return self.detail(*id).await.map(|d| Resolved::Detail(Box::new(d)));
            }
            Intent::Popular { page } => (
                paths::POPULAR,
                vec![self.language_param(), ("page".into(), page.to_string())],
            ),
            Intent::Search { query, page } => (
                paths::SEARCH,
                vec![
                    ("query".into(), query.clone()),
                    self.language_param(),
                    ("page".into(), page.to_string()),
                ],
            ),
            Intent::Discover { filters, page } => {
                let mut params = vec![self.language_param(), ("page".into(), page.to_string())];
                params.extend(filters.to_params());
                (paths::DISCOVER, params)
            }
        };

        let page = self.source.fetch_resource(path, &params).await?;
        to_list_items(&page, &self.settings.images).map(Resolved::List)
    }

    /// Core data is mandatory; credits and videos are best-effort.
    pub async fn detail(&self, id: u64) -> Result<DetailRecord, UpstreamFailure> {
        let lang = [self.language_param()];
        let video_lang = [(
            "language".to_string(),
            self.settings.video_language.clone(),
        )];
        let core_path = paths::movie(id);
        let credits_path = paths::credits(id);
        let videos_path = paths::videos(id);

        let (core, credits, videos) = tokio::join!(
            self.source.fetch_resource(&core_path, &lang),
            self.source.fetch_resource(&credits_path, &lang),
            self.source.fetch_resource(&videos_path, &video_lang),
        );

        let core = core?;
        let credits = credits
            .inspect_err(|e| warn!(movie_id = id, error = %e, "credits unavailable, continuing without cast"))
            .ok();
        let videos = videos
            .inspect_err(|e| warn!(movie_id = id, error = %e, "videos unavailable, continuing without trailer"))
            .ok();

        to_detail_record(&core, credits.as_ref(), videos.as_ref(), &self.settings.images)
    }
}

/// First crew member whose job is "Director".
pub fn pick_director(credits: &Value) -> Option<&str> {
    credits["crew"]
        .as_array()?
        .iter()
        .find(|p| p["job"].as_str() == Some("Director"))
        .and_then(|p| p["name"].as_str())
}

/// Key of the first YouTube trailer, if any.
pub fn pick_trailer_key(videos: &Value) -> Option<&str> {
    videos["results"]
        .as_array()?
        .iter()
        .find(|v| v["type"].as_str() == Some("Trailer") && v["site"].as_str() == Some("YouTube"))
        .and_then(|v| v["key"].as_str())
}
