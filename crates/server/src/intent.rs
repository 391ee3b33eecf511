//! Query-string parsing into validated intents. Nothing here touches the
//! catalog: a request that fails validation never reaches upstream.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use reelscope_core::error::ApiError;
use reelscope_core::types::{FilterKey, FilterSet, InsightIntent, Intent, MAX_PAGE};

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());
static GENRES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+([,|][0-9]+)*$").unwrap());

const DEFAULT_GENRE_ID: u64 = 28;
const DEFAULT_INSIGHT_LIMIT: usize = 5;
const MAX_INSIGHT_LIMIT: usize = 50;

type Params = HashMap<String, String>;

/// Trimmed, non-empty parameter value.
fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str, ApiError> {
    param(params, name)
        .ok_or_else(|| ApiError::bad_request(name, format!("missing required parameter: {name}")))
}

fn parse_page(params: &Params) -> Result<u32, ApiError> {
    let Some(raw) = param(params, "page") else {
        return Ok(1);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|p| (1..=MAX_PAGE).contains(p))
        .ok_or_else(|| {
            ApiError::bad_request("page", format!("page must be an integer between 1 and {MAX_PAGE}"))
        })
}

fn parse_filters(params: &Params) -> Result<FilterSet, ApiError> {
    let mut filters = FilterSet::new();

    for key in FilterKey::ALL {
        let value = param(params, key.param()).or_else(|| key.alias().and_then(|a| param(params, a)));
        let Some(value) = value else { continue };

        let valid = match key {
            FilterKey::Genres => GENRES_RE.is_match(value),
            FilterKey::MinRating => value
                .parse::<f64>()
                .is_ok_and(|r| (0.0..=10.0).contains(&r)),
            FilterKey::ReleaseYear => YEAR_RE.is_match(value),
            FilterKey::SortBy | FilterKey::OriginalLanguage => true,
        };
        if !valid {
            let hint = match key {
                FilterKey::Genres => "must be genre ids separated by ',' or '|'",
                FilterKey::MinRating => "must be a number between 0 and 10",
                FilterKey::ReleaseYear => "must be a four-digit year",
                FilterKey::SortBy | FilterKey::OriginalLanguage => "is invalid",
            };
            return Err(ApiError::bad_request(
                key.param(),
                format!("{} {hint}", key.param()),
            ));
        }

        filters.insert(key, value);
    }

    Ok(filters)
}

/// Parse a catalog request (`type=popular|search|discover|detail|movie`).
pub fn parse_intent(params: &Params) -> Result<Intent, ApiError> {
    let kind = required(params, "type")?;

    match kind {
        "popular" => Ok(Intent::Popular {
            page: parse_page(params)?,
        }),
        "search" => Ok(Intent::Search {
            query: required(params, "query")?.to_string(),
            page: parse_page(params)?,
        }),
        "discover" => Ok(Intent::Discover {
            filters: parse_filters(params)?,
            page: parse_page(params)?,
        }),
        "detail" | "movie" => {
            let raw = required(params, "id")?;
            let id = raw
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| ApiError::bad_request("id", "id must be a positive integer"))?;
            Ok(Intent::Detail { id })
        }
        other => Err(ApiError::bad_request(
            "type",
            format!("invalid type '{other}': expected popular, search, discover or detail"),
        )),
    }
}

/// Parse an insight request (`type=top_actors_by_genre|trending_overview_summary`).
pub fn parse_insight(params: &Params) -> Result<InsightIntent, ApiError> {
    let kind = required(params, "type")?;

    let limit = match param(params, "limit") {
        None => DEFAULT_INSIGHT_LIMIT,
        // Oversized limits are clamped rather than rejected.
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|l| *l >= 1)
            .map(|l| l.min(MAX_INSIGHT_LIMIT))
            .ok_or_else(|| ApiError::bad_request("limit", "limit must be a positive integer"))?,
    };

    match kind {
        "top_actors_by_genre" => {
            let genre_id = match param(params, "genre_id") {
                None => DEFAULT_GENRE_ID,
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    ApiError::bad_request("genre_id", "genre_id must be a genre id")
                })?,
            };
            Ok(InsightIntent::TopActorsByGenre { genre_id, limit })
        }
        "trending_overview_summary" => Ok(InsightIntent::TrendingWords { limit }),
        other => Err(ApiError::bad_request(
            "type",
            format!("invalid process type '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn field_of(err: ApiError) -> String {
        match err {
            ApiError::BadRequest { field, .. } => field,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn popular_defaults_to_first_page() {
        assert_eq!(
            parse_intent(&params(&[("type", "popular")])).unwrap(),
            Intent::Popular { page: 1 }
        );
        assert_eq!(
            parse_intent(&params(&[("type", "popular"), ("page", "4")])).unwrap(),
            Intent::Popular { page: 4 }
        );
    }

    #[test]
    fn missing_type_is_rejected() {
        assert_eq!(field_of(parse_intent(&params(&[])).unwrap_err()), "type");
        assert_eq!(
            field_of(parse_intent(&params(&[("type", "trending")])).unwrap_err()),
            "type"
        );
    }

    #[test]
    fn search_requires_query() {
        assert_eq!(
            field_of(parse_intent(&params(&[("type", "search")])).unwrap_err()),
            "query"
        );
        assert_eq!(
            field_of(parse_intent(&params(&[("type", "search"), ("query", "   ")])).unwrap_err()),
            "query"
        );
        assert_eq!(
            parse_intent(&params(&[("type", "search"), ("query", " alien ")])).unwrap(),
            Intent::Search {
                query: "alien".into(),
                page: 1
            }
        );
    }

    #[test]
    fn detail_requires_numeric_id() {
        assert_eq!(
            field_of(parse_intent(&params(&[("type", "detail")])).unwrap_err()),
            "id"
        );
        assert_eq!(
            field_of(parse_intent(&params(&[("type", "movie"), ("id", "abc")])).unwrap_err()),
            "id"
        );
        assert_eq!(
            parse_intent(&params(&[("type", "movie"), ("id", "603")])).unwrap(),
            Intent::Detail { id: 603 }
        );
    }

    #[test]
    fn page_out_of_range() {
        for bad in ["0", "501", "-1", "two"] {
            let err = parse_intent(&params(&[("type", "popular"), ("page", bad)])).unwrap_err();
            assert_eq!(field_of(err), "page");
        }
    }

    #[test]
    fn discover_collects_filters_and_aliases() {
        let intent = parse_intent(&params(&[
            ("type", "discover"),
            ("with_genres", "28"),
            ("rating", "7"),
            ("primary_release_year", ""),
            ("sort", "vote_average.desc"),
        ]))
        .unwrap();

        let Intent::Discover { filters, page } = intent else {
            panic!("expected discover");
        };
        assert_eq!(page, 1);
        assert_eq!(filters.get(FilterKey::Genres), Some("28"));
        assert_eq!(filters.get(FilterKey::MinRating), Some("7"));
        assert_eq!(filters.get(FilterKey::ReleaseYear), None);
        assert_eq!(filters.get(FilterKey::SortBy), Some("vote_average.desc"));
    }

    #[test]
    fn discover_without_filters_is_valid() {
        let intent = parse_intent(&params(&[("type", "discover")])).unwrap();
        assert_eq!(
            intent,
            Intent::Discover {
                filters: FilterSet::new(),
                page: 1
            }
        );
    }

    #[test]
    fn discover_rejects_malformed_filters() {
        let cases = [
            ("vote_average.gte", "eleven", "vote_average.gte"),
            ("vote_average.gte", "11", "vote_average.gte"),
            ("year", "99", "primary_release_year"),
            ("genre", "action", "with_genres"),
            ("year", "２０２４", "primary_release_year"),
            ("genre", "٢٨", "with_genres"),
            ("genre", "28,١٢", "with_genres"),
        ];
        for (key, value, field) in cases {
            let err = parse_intent(&params(&[("type", "discover"), (key, value)])).unwrap_err();
            assert_eq!(field_of(err), field);
        }
    }

    #[test]
    fn insight_defaults() {
        assert_eq!(
            parse_insight(&params(&[("type", "top_actors_by_genre")])).unwrap(),
            InsightIntent::TopActorsByGenre {
                genre_id: 28,
                limit: 5
            }
        );
        assert_eq!(
            parse_insight(&params(&[("type", "trending_overview_summary"), ("limit", "3")]))
                .unwrap(),
            InsightIntent::TrendingWords { limit: 3 }
        );
    }

    #[test]
    fn insight_limit_is_clamped() {
        assert_eq!(
            parse_insight(&params(&[("type", "trending_overview_summary"), ("limit", "100")]))
                .unwrap(),
            InsightIntent::TrendingWords { limit: 50 }
        );
    }

    #[test]
    fn insight_rejects_bad_input() {
        assert_eq!(field_of(parse_insight(&params(&[])).unwrap_err()), "type");
        assert_eq!(
            field_of(parse_insight(&params(&[("type", "word_cloud")])).unwrap_err()),
            "type"
        );
        assert_eq!(
            field_of(
                parse_insight(&params(&[("type", "trending_overview_summary"), ("limit", "0")]))
                    .unwrap_err()
            ),
            "limit"
        );
        assert_eq!(
            field_of(
                parse_insight(&params(&[("type", "top_actors_by_genre"), ("genre_id", "x")]))
                    .unwrap_err()
            ),
            "genre_id"
        );
    }
}
