use std::time::Duration;

use anyhow::Context;
use reelscope_catalog::normalize::DEFAULT_IMAGE_BASE;
use reelscope_catalog::tmdb::DEFAULT_BASE_URL;
use reelscope_catalog::{CatalogConfig, CatalogSettings, Credential, ImageBase};

/// Server configuration, read once at startup.
///
/// | Env Var               | Default                           |
/// |-----------------------|-----------------------------------|
/// | `REELSCOPE_BIND`      | `0.0.0.0:3000`                    |
/// | `TMDB_ACCESS_TOKEN`   | (bearer token, preferred)         |
/// | `TMDB_API_KEY`        | (query-string key, fallback)      |
/// | `TMDB_BASE_URL`       | `https://api.themoviedb.org/3`    |
/// | `TMDB_IMAGE_BASE`     | `https://image.tmdb.org/t/p/w500` |
/// | `TMDB_LANGUAGE`       | `ko-KR`                           |
/// | `TMDB_VIDEO_LANGUAGE` | `en-US`                           |
/// | `TMDB_TIMEOUT_SECS`   | `10`                              |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub catalog: CatalogConfig,
    pub settings: CatalogSettings,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credential = get("TMDB_ACCESS_TOKEN")
            .map(Credential::Bearer)
            .or_else(|| get("TMDB_API_KEY").map(Credential::ApiKey));

        let timeout_secs: u64 = match get("TMDB_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TMDB_TIMEOUT_SECS must be a whole number, got '{raw}'"))?,
            None => 10,
        };

        Ok(Self {
            bind_addr: get("REELSCOPE_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            catalog: CatalogConfig {
                credential,
                base_url: get("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            settings: CatalogSettings {
                language: get("TMDB_LANGUAGE").unwrap_or_else(|| "ko-KR".to_string()),
                video_language: get("TMDB_VIDEO_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
                images: ImageBase::new(
                    get("TMDB_IMAGE_BASE").unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string()),
                ),
            },
        })
    }
}
