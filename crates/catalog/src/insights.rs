//! Statistics computed across several catalog calls: most frequent lead
//! actors in a genre, and the most common words in trending overviews.

use std::collections::HashMap;
use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use reelscope_core::types::{ActorCount, Insight, InsightIntent, WordCount};
use serde_json::Value;
use tracing::warn;

use crate::aggregate::Aggregator;
use crate::provider::paths;
use crate::UpstreamFailure;

/// Movies sampled from the top of the genre's popularity ranking.
const MOVIES_PER_GENRE: usize = 10;
/// Billing positions that count as a lead role.
const LEAD_ROLES: usize = 3;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

const STOP_WORDS: &[&str] = &[
    "is", "the", "a", "an", "and", "to", "of", "in", "it", "for", "on", "with", "from", "as",
    "but", "by", "that", "this", "he", "she", "they", "what", "who", "when", "where", "why",
    "how",
];

/// Occurrence counter that breaks ties by first appearance.
#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn top(mut self, limit: usize) -> Vec<(String, u32)> {
        // Stable: equal counts keep first-seen order.
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(limit);
        self.entries
    }
}

impl Aggregator<'_> {
    pub async fn insight(&self, intent: &InsightIntent) -> Result<Insight, UpstreamFailure> {
        match intent {
            InsightIntent::TopActorsByGenre { genre_id, limit } => self
                .top_actors_by_genre(*genre_id, *limit)
                .await
                .map(Insight::Actors),
            InsightIntent::TrendingWords { limit } => {
                self.trending_words(*limit).await.map(Insight::Words)
            }
        }
    }

    /// The discover call is mandatory; a failed credits call only drops
    /// that movie from the tally.
    pub async fn top_actors_by_genre(
        &self,
        genre_id: u64,
        limit: usize,
    ) -> Result<Vec<ActorCount>, UpstreamFailure> {
        let params = vec![
            self.language_param(),
            ("sort_by".to_string(), "popularity.desc".to_string()),
            ("with_genres".to_string(), genre_id.to_string()),
            ("page".to_string(), "1".to_string()),
        ];
        let page = self.source.fetch_resource(paths::DISCOVER, &params).await?;
        let ids: Vec<u64> = page["results"]
            .as_array()
            .ok_or_else(|| UpstreamFailure::malformed("discover response has no results array"))?
            .iter()
            .take(MOVIES_PER_GENRE)
            .filter_map(|m| m["id"].as_u64())
            .collect();

        let lang = [self.language_param()];
        let credit_paths: Vec<String> = ids.iter().map(|&id| paths::credits(id)).collect();
        let results = join_all(
            credit_paths
                .iter()
                .map(|path| self.source.fetch_resource(path, &lang)),
        )
        .await;

        let mut tally = Tally::default();
        for (id, result) in ids.iter().zip(results) {
            let credits = match result {
                Ok(credits) => credits,
                Err(e) => {
                    warn!(movie_id = id, error = %e, "skipping movie without credits");
                    continue;
                }
            };
            for name in lead_actors(&credits) {
                tally.add(name);
            }
        }

        Ok(tally
            .top(limit)
            .into_iter()
            .map(|(name, count)| ActorCount { name, count })
            .collect())
    }

    pub async fn trending_words(&self, limit: usize) -> Result<Vec<WordCount>, UpstreamFailure> {
        let page = self
            .source
            .fetch_resource(paths::TRENDING_WEEK, &[self.language_param()])
            .await?;
        let results = page["results"]
            .as_array()
            .ok_or_else(|| UpstreamFailure::malformed("trending response has no results array"))?;

        let text = results
            .iter()
            .filter_map(|m| m["overview"].as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        Ok(count_words(&text, limit)
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect())
    }
}

fn lead_actors(credits: &Value) -> impl Iterator<Item = &str> {
    credits["cast"]
        .as_array()
        .into_iter()
        .flatten()
        .take(LEAD_ROLES)
        .filter(|c| c["known_for_department"].as_str() == Some("Acting"))
        .filter_map(|c| c["name"].as_str())
}

fn count_words(text: &str, limit: usize) -> Vec<(String, u32)> {
    let mut tally = Tally::default();
    for m in WORD_RE.find_iter(text) {
        let word = m.as_str();
        if word.chars().count() > 2 && !STOP_WORDS.contains(&word) {
            tally.add(word);
        }
    }
    tally.top(limit)
}
