//! Mapping raw catalog JSON into the stable response shapes.
//!
//! Every function here is pure: the same input always yields the same
//! output, and missing optional fields resolve to fixed defaults.

use reelscope_core::types::{CastMember, DetailRecord, ListItem};
use serde_json::Value;

use crate::UpstreamFailure;
use crate::aggregate::{pick_director, pick_trailer_key};

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";
const MAX_CAST: usize = 5;
const UNKNOWN_DIRECTOR: &str = "unknown";

/// Prefix for turning catalog image paths into absolute URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBase(String);

impl ImageBase {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Absolute URL for an image path, or `None` when the path is null,
    /// absent or blank.
    pub fn url(&self, path: &Value) -> Option<String> {
        let path = path.as_str()?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with('/') {
            Some(format!("{}{path}", self.0))
        } else {
            Some(format!("{}/{path}", self.0))
        }
    }
}

impl Default for ImageBase {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}

pub fn trailer_embed_url(key: &str) -> String {
    format!("{YOUTUBE_EMBED_BASE}{key}")
}

fn non_empty_str(v: &Value) -> Option<String> {
    v.as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn require_id(raw: &Value, what: &str) -> Result<u64, UpstreamFailure> {
    raw["id"]
        .as_u64()
        .ok_or_else(|| UpstreamFailure::malformed(format!("{what} is missing an id")))
}

pub fn to_list_item(raw: &Value, images: &ImageBase) -> Result<ListItem, UpstreamFailure> {
    Ok(ListItem {
        id: require_id(raw, "catalog item")?,
        title: raw["title"]
            .as_str()
            .or_else(|| raw["name"].as_str())
            .unwrap_or_default()
            .to_string(),
        poster_url: images.url(&raw["poster_path"]),
        vote_average: raw["vote_average"].as_f64(),
        release_date: non_empty_str(&raw["release_date"]),
    })
}

/// Normalize a paged list response (`{"page": …, "results": [...]}`).
pub fn to_list_items(page: &Value, images: &ImageBase) -> Result<Vec<ListItem>, UpstreamFailure> {
    let results = page["results"]
        .as_array()
        .ok_or_else(|| UpstreamFailure::malformed("list response has no results array"))?;
    results.iter().map(|r| to_list_item(r, images)).collect()
}

/// Build a full record from the core item plus best-effort credits and
/// videos. `None` means that sub-call failed.
pub fn to_detail_record(
    core: &Value,
    credits: Option<&Value>,
    videos: Option<&Value>,
    images: &ImageBase,
) -> Result<DetailRecord, UpstreamFailure> {
    let id = require_id(core, "movie")?;
    let title = core["title"]
        .as_str()
        .ok_or_else(|| UpstreamFailure::malformed(format!("movie {id} has no title")))?
        .to_string();

    let genres = core["genres"]
        .as_array()
        .map(|gs| {
            gs.iter()
                .filter_map(|g| g["name"].as_str().or_else(|| g.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(DetailRecord {
        id,
        title,
        overview: core["overview"].as_str().unwrap_or_default().to_string(),
        release_date: core["release_date"].as_str().unwrap_or_default().to_string(),
        poster_url: images.url(&core["poster_path"]),
        backdrop_url: images.url(&core["backdrop_path"]),
        vote_average: core["vote_average"].as_f64(),
        genres,
        runtime_minutes: core["runtime"].as_u64().and_then(|r| u32::try_from(r).ok()),
        cast: credits.map(|c| to_cast(c, images)).unwrap_or_default(),
        director: credits
            .and_then(pick_director)
            .unwrap_or(UNKNOWN_DIRECTOR)
            .to_string(),
        trailer_embed_url: videos.and_then(pick_trailer_key).map(trailer_embed_url),
    })
}

fn to_cast(credits: &Value, images: &ImageBase) -> Vec<CastMember> {
    let Some(cast) = credits["cast"].as_array() else {
        return Vec::new();
    };

    // Upstream already orders by billing.
    cast.iter()
        .take(MAX_CAST)
        .map(|person| CastMember {
            id: person["id"].as_u64().unwrap_or_default(),
            name: person["name"].as_str().unwrap_or_default().to_string(),
            character: person["character"].as_str().unwrap_or_default().to_string(),
            photo_url: images.url(&person["profile_path"]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn images() -> ImageBase {
        ImageBase::new("https://img.test/w500/")
    }

    fn core_json() -> Value {
        json!({
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets...",
            "release_date": "2010-07-15",
            "runtime": 148,
            "vote_average": 8.4,
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 878, "name": "Science Fiction" }
            ]
        })
    }

    fn credits_json() -> Value {
        let cast: Vec<Value> = (1..=7)
            .map(|i| {
                let profile = if i == 2 {
                    Value::Null
                } else {
                    json!(format!("/p{i}.jpg"))
                };
                json!({
                    "id": i,
                    "name": format!("Actor {i}"),
                    "character": format!("Role {i}"),
                    "profile_path": profile
                })
            })
            .collect();
        json!({
            "cast": cast,
            "crew": [
                { "name": "Emma Thomas", "job": "Producer" },
                { "name": "Christopher Nolan", "job": "Director" },
                { "name": "Someone Else", "job": "Director" }
            ]
        })
    }

    fn videos_json() -> Value {
        json!({
            "results": [
                { "key": "teaser1", "site": "YouTube", "type": "Teaser" },
                { "key": "vimeo1", "site": "Vimeo", "type": "Trailer" },
                { "key": "YoGHX", "site": "YouTube", "type": "Trailer" },
                { "key": "later", "site": "YouTube", "type": "Trailer" }
            ]
        })
    }

    #[test]
    fn list_item_null_poster_stays_null() {
        let item = to_list_item(
            &json!({ "id": 1, "title": "No Poster", "poster_path": null, "vote_average": 6.1 }),
            &images(),
        )
        .unwrap();
        assert_eq!(item.poster_url, None);
        assert_eq!(item.vote_average, Some(6.1));
        assert_eq!(item.release_date, None);
    }

    #[test]
    fn list_item_absent_or_blank_poster_is_null() {
        let absent = to_list_item(&json!({ "id": 2, "title": "A" }), &images()).unwrap();
        let blank =
            to_list_item(&json!({ "id": 3, "title": "B", "poster_path": "" }), &images()).unwrap();
        assert_eq!(absent.poster_url, None);
        assert_eq!(blank.poster_url, None);
    }

    #[test]
    fn list_item_prefixes_image_base() {
        let item = to_list_item(
            &json!({ "id": 4, "title": "Heat", "poster_path": "/heat.jpg", "release_date": "1995-12-15" }),
            &images(),
        )
        .unwrap();
        assert_eq!(item.poster_url.as_deref(), Some("https://img.test/w500/heat.jpg"));
        assert_eq!(item.release_date.as_deref(), Some("1995-12-15"));
    }

    #[test]
    fn missing_rating_is_not_zero() {
        let unknown = to_list_item(&json!({ "id": 5, "title": "X" }), &images()).unwrap();
        let zero = to_list_item(&json!({ "id": 6, "title": "Y", "vote_average": 0 }), &images())
            .unwrap();
        assert_eq!(unknown.vote_average, None);
        assert_eq!(zero.vote_average, Some(0.0));
    }

    #[test]
    fn list_items_requires_results_array() {
        assert!(to_list_items(&json!({ "page": 1 }), &images()).is_err());
        let items = to_list_items(
            &json!({ "results": [ { "id": 1, "title": "a" }, { "id": 2, "title": "b" } ] }),
            &images(),
        )
        .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn item_without_id_is_malformed() {
        let err = to_list_item(&json!({ "title": "ghost" }), &images()).unwrap_err();
        assert!(matches!(err, UpstreamFailure::UpstreamError { status: None, .. }));
    }

    #[test]
    fn detail_record_full() {
        let record = to_detail_record(
            &core_json(),
            Some(&credits_json()),
            Some(&videos_json()),
            &images(),
        )
        .unwrap();

        assert_eq!(record.id, 27205);
        assert_eq!(record.genres, ["Action", "Science Fiction"]);
        assert_eq!(record.runtime_minutes, Some(148));
        assert_eq!(record.backdrop_url, None);
        assert_eq!(record.poster_url.as_deref(), Some("https://img.test/w500/poster.jpg"));

        assert_eq!(record.cast.len(), 5);
        let names: Vec<&str> = record.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Actor 1", "Actor 2", "Actor 3", "Actor 4", "Actor 5"]);
        assert_eq!(record.cast[1].photo_url, None);
        assert_eq!(record.cast[0].photo_url.as_deref(), Some("https://img.test/w500/p1.jpg"));

        assert_eq!(record.director, "Christopher Nolan");
        assert_eq!(
            record.trailer_embed_url.as_deref(),
            Some("https://www.youtube.com/embed/YoGHX")
        );
    }

    #[test]
    fn detail_record_without_supplements() {
        let record = to_detail_record(&core_json(), None, None, &images()).unwrap();
        assert!(record.cast.is_empty());
        assert_eq!(record.director, "unknown");
        assert_eq!(record.trailer_embed_url, None);
    }

    #[test]
    fn detail_record_defaults_optional_text() {
        let record = to_detail_record(&json!({ "id": 9, "title": "Bare" }), None, None, &images())
            .unwrap();
        assert_eq!(record.overview, "");
        assert_eq!(record.release_date, "");
        assert!(record.genres.is_empty());
        assert_eq!(record.runtime_minutes, None);
        assert_eq!(record.vote_average, None);
    }

    #[test]
    fn detail_record_requires_identity() {
        assert!(to_detail_record(&json!({ "title": "No id" }), None, None, &images()).is_err());
        assert!(to_detail_record(&json!({ "id": 3 }), None, None, &images()).is_err());
    }

    #[test]
    fn normalization_is_deterministic() {
        let a = to_detail_record(&core_json(), Some(&credits_json()), Some(&videos_json()), &images())
            .unwrap();
        let b = to_detail_record(&core_json(), Some(&credits_json()), Some(&videos_json()), &images())
            .unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
