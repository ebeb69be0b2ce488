use serde::{Deserialize, Serialize};

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Live regional music API (JioSaavn).
    Regional,
    /// Embedded international mock dataset.
    International,
}

/// A single song suggested for a mood.
///
/// Regional songs usually carry a `stream_url`; international ones only link
/// to a streaming page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecommendation {
    pub title: String,
    pub artist: String,
    pub source: Source,
    /// Web page for the song.
    pub url: String,
    /// Cover art.
    #[serde(default)]
    pub image: String,
    /// Direct audio stream, empty when unknown.
    #[serde(default)]
    pub stream_url: String,
    #[serde(default)]
    pub duration_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

impl SongRecommendation {
    pub fn new(title: &str, artist: &str, source: Source, url: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            source,
            url: url.to_string(),
            image: String::new(),
            stream_url: String::new(),
            duration_secs: 0,
            album: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = image.to_string();
        self
    }

    /// Lowercased "title artist", used to drop duplicates across queries and sources.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{} {}", self.title, self.artist).to_lowercase()
    }

    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.title.is_empty() && !self.stream_url.is_empty()
    }

    /// YouTube search link, the fallback when nothing streams directly.
    #[must_use]
    pub fn youtube_search_url(&self) -> String {
        format!(
            "https://www.youtube.com/results?search_query={}",
            urlencoding::encode(&format!("{} {}", self.title, self.artist))
        )
    }

    #[must_use]
    pub fn saavn_search_url(&self) -> String {
        format!(
            "https://www.jiosaavn.com/search/{}",
            urlencoding::encode(&format!("{} {}", self.title, self.artist))
        )
    }

    /// Best link to hand the user: the song page, else a YouTube search.
    #[must_use]
    pub fn listen_url(&self) -> String {
        if self.url.is_empty() {
            self.youtube_search_url()
        } else {
            self.url.clone()
        }
    }
}
