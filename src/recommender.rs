//! # Music Lookup Adapter
//!
//! Turns a [`MoodLabel`] into an ordered list of songs from two sources:
//!
//! 1. **Regional** - the live catalogue behind [`SongSearch`], queried with the
//!    mood's search terms in order until enough playable songs are found
//! 2. **International** - the mock dataset in [`Catalog`]
//!
//! The same cap is applied to each source. Regional songs come first, then
//! international ones; duplicates (same title and artist) are dropped. When the
//! regional catalogue fails the answer is just the international list, and an
//! empty list is a valid answer, never an error.

use crate::catalog::{default_catalog, Catalog};
use crate::config::Config;
use crate::error::MoodifyResult;
use crate::mood::MoodLabel;
use crate::saavn::{SaavnClient, SongSearch};
use crate::song::SongRecommendation;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Mood → songs.
pub trait MusicLookup {
    fn recommend(&self, mood: MoodLabel) -> Vec<SongRecommendation>;
}

/// [`MusicLookup`] over a live catalogue plus a static one.
#[derive(Debug, Clone)]
pub struct MusicRecommender<S> {
    search: S,
    catalog: Catalog,
    limit: usize,
}

impl<S: SongSearch> MusicRecommender<S> {
    #[must_use]
    pub fn new(search: S, catalog: Catalog, limit: usize) -> Self {
        Self {
            search,
            catalog,
            limit,
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Up to `limit` unique playable songs from the live catalogue.
    ///
    /// One call per search term, no retries. A failure before anything was
    /// found fails the whole source; a later failure keeps what was found.
    fn regional(&self, mood: MoodLabel) -> MoodifyResult<Vec<SongRecommendation>> {
        let mut found: Vec<SongRecommendation> = Vec::new();
        let mut seen = HashSet::new();

        for term in self.catalog.query_terms(mood) {
            if found.len() >= self.limit {
                break;
            }

            let results = match self.search.search(term, self.limit.saturating_mul(2)) {
                Ok(results) => results,
                Err(e) if found.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Regional search for {term:?} failed, keeping {} songs: {e}", found.len());
                    break;
                }
            };
            debug!("Regional search {term:?} returned {} songs", results.len());

            for song in results.into_iter().filter(SongRecommendation::is_playable) {
                if seen.insert(song.dedup_key()) {
                    found.push(song);
                    if found.len() >= self.limit {
                        break;
                    }
                }
            }
        }

        Ok(found)
    }
}

impl MusicRecommender<SaavnClient> {
    /// JioSaavn plus the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> MoodifyResult<Self> {
        Ok(Self::new(
            SaavnClient::from_config(config)?,
            default_catalog().clone(),
            config.recommendation_limit,
        ))
    }
}

impl<S: SongSearch> MusicLookup for MusicRecommender<S> {
    fn recommend(&self, mood: MoodLabel) -> Vec<SongRecommendation> {
        info!("Finding music recommendations for mood: {mood}");

        let mut songs = self.regional(mood).unwrap_or_else(|e| {
            warn!("Regional music lookup failed, using international songs only: {e}");
            Vec::new()
        });
        let regional_count = songs.len();

        let mut seen: HashSet<String> = songs.iter().map(SongRecommendation::dedup_key).collect();
        for song in self.catalog.songs(mood).iter().take(self.limit) {
            if seen.insert(song.dedup_key()) {
                songs.push(song.clone());
            }
        }

        info!(
            "Recommending {} songs for {mood} ({regional_count} regional, {} international)",
            songs.len(),
            songs.len() - regional_count
        );
        songs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoodifyError;
    use crate::song::Source;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned answers per query; queries without an entry fail.
    #[derive(Default)]
    struct FakeSearch {
        answers: HashMap<String, Vec<SongRecommendation>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeSearch {
        fn answer(mut self, query: &str, songs: Vec<SongRecommendation>) -> Self {
            self.answers.insert(query.to_string(), songs);
            self
        }
    }

    impl SongSearch for FakeSearch {
        fn search(&self, query: &str, limit: usize) -> MoodifyResult<Vec<SongRecommendation>> {
            self.calls.borrow_mut().push(query.to_string());
            self.answers
                .get(query)
                .map(|songs| songs.iter().take(limit).cloned().collect())
                .ok_or_else(|| MoodifyError::upstream("fake", "unreachable"))
        }
    }

    fn regional(title: &str) -> SongRecommendation {
        let mut song = SongRecommendation::new(title, "Regional Artist", Source::Regional, "");
        song.stream_url = format!("https://stream/{title}");
        song
    }

    fn catalog() -> Catalog {
        Catalog::new(
            HashMap::from([(MoodLabel::Happy, vec!["first".to_string(), "second".to_string()])]),
            HashMap::from([(
                MoodLabel::Happy,
                vec![
                    SongRecommendation::new("Happy", "Pharrell Williams", Source::International, "u1"),
                    SongRecommendation::new("Uptown Funk", "Mark Ronson", Source::International, "u2"),
                    SongRecommendation::new("Good as Hell", "Lizzo", Source::International, "u3"),
                ],
            )]),
        )
    }

    #[test]
    fn test_regional_failure_returns_exactly_mock_entries() {
        let recommender = MusicRecommender::new(FakeSearch::default(), catalog(), 6);
        let songs = recommender.recommend(MoodLabel::Happy);
        assert_eq!(songs, catalog().songs(MoodLabel::Happy).to_vec());
        assert_eq!(recommender.search.calls.borrow().len(), 1, "no retries after failure");
    }

    #[test]
    fn test_regional_first_then_international() {
        let search = FakeSearch::default().answer("first", vec![regional("A"), regional("B")]);
        let recommender = MusicRecommender::new(search, catalog(), 2);
        let songs = recommender.recommend(MoodLabel::Happy);

        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "Happy", "Uptown Funk"]);
        assert_eq!(songs[0].source, Source::Regional);
        assert_eq!(songs[3].source, Source::International);
    }

    #[test]
    fn test_terms_tried_in_order_until_cap() {
        let search = FakeSearch::default()
            .answer("first", vec![regional("A")])
            .answer("second", vec![regional("A"), regional("B"), regional("C")]);
        let recommender = MusicRecommender::new(search, catalog(), 3);
        let songs = recommender.recommend(MoodLabel::Happy);

        let regional_titles: Vec<&str> = songs
            .iter()
            .filter(|s| s.source == Source::Regional)
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(regional_titles, ["A", "B", "C"]);
        assert_eq!(*recommender.search.calls.borrow(), ["first", "second"]);
    }

    #[test]
    fn test_unplayable_regional_songs_are_skipped() {
        let silent = SongRecommendation::new("Silent", "Nobody", Source::Regional, "");
        let search = FakeSearch::default()
            .answer("first", vec![silent, regional("A")])
            .answer("second", vec![]);
        let recommender = MusicRecommender::new(search, catalog(), 6);
        let songs = recommender.recommend(MoodLabel::Happy);
        assert!(songs.iter().all(|s| s.title != "Silent"));
        assert_eq!(songs[0].title, "A");
    }

    #[test]
    fn test_later_failure_keeps_partial_regional() {
        let search = FakeSearch::default().answer("first", vec![regional("A")]);
        let recommender = MusicRecommender::new(search, catalog(), 6);
        let songs = recommender.recommend(MoodLabel::Happy);
        assert_eq!(songs[0].title, "A");
        assert_eq!(songs.len(), 4);
    }

    #[test]
    fn test_duplicates_across_sources_dropped() {
        let mut dup = SongRecommendation::new("HAPPY", "pharrell williams", Source::Regional, "");
        dup.stream_url = "https://stream/happy".to_string();
        let search = FakeSearch::default()
            .answer("first", vec![dup])
            .answer("second", vec![]);
        let recommender = MusicRecommender::new(search, catalog(), 6);
        let songs = recommender.recommend(MoodLabel::Happy);
        assert_eq!(songs.len(), 3);
        assert_eq!(songs[0].source, Source::Regional);
    }

    #[test]
    fn test_unknown_mood_everywhere_is_empty() {
        let recommender = MusicRecommender::new(FakeSearch::default(), catalog(), 6);
        assert!(recommender.recommend(MoodLabel::Angry).is_empty());
        assert!(recommender.search.calls.borrow().is_empty());
    }

    #[test]
    fn test_huge_limit_does_not_overflow() {
        let search = FakeSearch::default()
            .answer("first", vec![regional("A")])
            .answer("second", vec![]);
        let recommender = MusicRecommender::new(search, catalog(), usize::MAX);
        let songs = recommender.recommend(MoodLabel::Happy);
        assert_eq!(songs.len(), 4);
        assert_eq!(songs[0].title, "A");
    }

    #[test]
    fn test_every_label_gets_songs_from_default_catalog() {
        let recommender = MusicRecommender::new(FakeSearch::default(), default_catalog().clone(), 6);
        for mood in MoodLabel::ALL {
            let songs = recommender.recommend(mood);
            assert_eq!(songs, default_catalog().songs(mood).to_vec(), "{mood}");
        }
    }
}
