//! # JioSaavn Client
//!
//! Regional music metadata source. One call per search term: `GET
//! {base}/search/songs?query=..&limit=..`, formatted into
//! [`SongRecommendation`]s tagged [`Source::Regional`].
//!
//! ## Formatting rules
//!
//! - artist: primary artists joined with ", ", else "Unknown Artist"
//! - image: the `500x500` rendition, else the first one
//! - stream: the `320kbps` download, else the first one

use crate::config::Config;
use crate::error::{MoodifyError, MoodifyResult};
use crate::song::{Source, SongRecommendation};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "saavn";

/// Searches a music catalogue by free-text query.
pub trait SongSearch {
    /// At most `limit` songs for `query`, in the catalogue's own order.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Upstream`] when the catalogue cannot be queried.
    fn search(&self, query: &str, limit: usize) -> MoodifyResult<Vec<SongRecommendation>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    results: Vec<RawSong>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSong {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub artists: Option<RawArtists>,
    #[serde(default)]
    pub image: Vec<RawLink>,
    #[serde(default)]
    pub download_url: Vec<RawLink>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAlbum {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtists {
    #[serde(default)]
    pub primary: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
pub struct RawArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub url: String,
}

fn pick_quality(links: &[RawLink], preferred: &str) -> String {
    links
        .iter()
        .find(|link| link.quality == preferred)
        .or_else(|| links.first())
        .map(|link| link.url.clone())
        .unwrap_or_default()
}

impl RawSong {
    /// Flatten the API shape into a recommendation.
    #[must_use]
    pub fn format(&self) -> SongRecommendation {
        let artists: Vec<&str> = self
            .artists
            .iter()
            .flat_map(|a| a.primary.iter().map(|artist| artist.name.as_str()))
            .collect();
        let artist = if artists.is_empty() {
            "Unknown Artist".to_string()
        } else {
            artists.join(", ")
        };

        SongRecommendation {
            title: self.name.clone().unwrap_or_default(),
            artist,
            source: Source::Regional,
            url: self.url.clone().unwrap_or_default(),
            image: pick_quality(&self.image, "500x500"),
            stream_url: pick_quality(&self.download_url, "320kbps"),
            duration_secs: self.duration.unwrap_or(0),
            album: self
                .album
                .as_ref()
                .and_then(|album| album.name.clone())
                .filter(|name| !name.is_empty()),
        }
    }
}

/// Parse a `search/songs` body into formatted songs.
///
/// # Errors
///
/// [`MoodifyError::Upstream`] on malformed JSON or `success: false`.
pub fn parse_search_response(body: &str) -> MoodifyResult<Vec<SongRecommendation>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| MoodifyError::upstream(SERVICE, format!("Failed to parse response: {e}")))?;

    if !response.success {
        return Err(MoodifyError::upstream(SERVICE, "API reported success=false"));
    }

    Ok(response
        .data
        .map(|data| data.results.iter().map(RawSong::format).collect())
        .unwrap_or_default())
}

/// Blocking JioSaavn search client.
#[derive(Debug, Clone)]
pub struct SaavnClient {
    client: Client,
    base_url: String,
}

impl SaavnClient {
    /// # Errors
    ///
    /// Returns [`MoodifyError::Configuration`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> MoodifyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MoodifyError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// See [`SaavnClient::new`].
    pub fn from_config(config: &Config) -> MoodifyResult<Self> {
        Self::new(&config.saavn_api_base, config.request_timeout())
    }
}

impl SongSearch for SaavnClient {
    fn search(&self, query: &str, limit: usize) -> MoodifyResult<Vec<SongRecommendation>> {
        let url = format!("{}/search/songs", self.base_url);
        debug!("GET {url} query={query:?} limit={limit}");

        let response = self
            .client
            .get(&url)
            .query(&[("query", query.to_string()), ("limit", limit.to_string())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MoodifyError::upstream(SERVICE, format!("API error ({status})")));
        }

        let body = response.text()?;

        let mut songs = parse_search_response(&body)?;
        songs.truncate(limit);
        Ok(songs)
    }
}
