use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Highest page number the catalog provider will serve.
pub const MAX_PAGE: u32 = 500;

/// What a client is asking the catalog for. Built once per request and
/// only after validation, so every variant carries what it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Popular { page: u32 },
    Search { query: String, page: u32 },
    Discover { filters: FilterSet, page: u32 },
    Detail { id: u64 },
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Popular { .. } => "popular",
            Self::Search { .. } => "search",
            Self::Discover { .. } => "discover",
            Self::Detail { .. } => "detail",
        }
    }
}

/// Discover filter keys, named by the catalog parameter they map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Genres,
    MinRating,
    ReleaseYear,
    SortBy,
    OriginalLanguage,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        Self::Genres,
        Self::MinRating,
        Self::ReleaseYear,
        Self::SortBy,
        Self::OriginalLanguage,
    ];

    /// Parameter name understood by the catalog's discover endpoint.
    pub fn param(self) -> &'static str {
        match self {
            Self::Genres => "with_genres",
            Self::MinRating => "vote_average.gte",
            Self::ReleaseYear => "primary_release_year",
            Self::SortBy => "sort_by",
            Self::OriginalLanguage => "with_original_language",
        }
    }

    /// Short query-string alias accepted in addition to [`FilterKey::param`].
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Self::Genres => Some("genre"),
            Self::MinRating => Some("rating"),
            Self::ReleaseYear => Some("year"),
            Self::SortBy => Some("sort"),
            Self::OriginalLanguage => None,
        }
    }
}

/// Set of discover filters. Blank values are never stored: the catalog
/// treats an empty parameter as a constraint rather than "unset".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    values: BTreeMap<FilterKey, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter value. Returns `false` (and stores nothing) for blank input.
    pub fn insert(&mut self, key: FilterKey, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.values.insert(key, value.to_string());
        true
    }

    pub fn with(mut self, key: FilterKey, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Catalog parameters in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.param().to_string(), v.clone()))
            .collect()
    }
}

/// Flattened summary used by every list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub photo_url: Option<String>,
}

/// Full record for a single movie, with credits and trailer folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub vote_average: Option<f64>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<u32>,
    pub cast: Vec<CastMember>,
    pub director: String,
    pub trailer_embed_url: Option<String>,
}

/// Outcome of resolving an [`Intent`]: an array for list intents, a
/// single object for detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    List(Vec<ListItem>),
    Detail(Box<DetailRecord>),
}

/// Aggregated statistics computed across several catalog calls.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightIntent {
    TopActorsByGenre { genre_id: u64, limit: usize },
    TrendingWords { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Insight {
    Actors(Vec<ActorCount>),
    Words(Vec<WordCount>),
}
