//! # Static Mood Tables
//!
//! Two immutable tables keyed by [`MoodLabel`]:
//!
//! - search terms sent to the regional music API for each mood
//! - an international mock dataset used as a supplement, and as the whole
//!   answer when the regional API is down
//!
//! The built-in tables are constructed once ([`default_catalog`]); tests and
//! callers that want different data build their own [`Catalog`].

use crate::mood::MoodLabel;
use crate::song::{Source, SongRecommendation};
use std::collections::HashMap;

/// Immutable mood → query terms and mood → songs lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    query_terms: HashMap<MoodLabel, Vec<String>>,
    songs: HashMap<MoodLabel, Vec<SongRecommendation>>,
}

impl Catalog {
    #[must_use]
    pub fn new(
        query_terms: HashMap<MoodLabel, Vec<String>>,
        songs: HashMap<MoodLabel, Vec<SongRecommendation>>,
    ) -> Self {
        Self { query_terms, songs }
    }

    /// Search terms for `mood`, in the order they should be tried.
    #[must_use]
    pub fn query_terms(&self, mood: MoodLabel) -> &[String] {
        self.query_terms.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mock songs for `mood`; empty when the dataset lacks the mood.
    #[must_use]
    pub fn songs(&self, mood: MoodLabel) -> &[SongRecommendation] {
        self.songs.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_CATALOG: Catalog = Catalog::new(build_query_terms(), build_mock_songs());
}

/// The built-in tables.
#[must_use]
pub fn default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn build_query_terms() -> HashMap<MoodLabel, Vec<String>> {
    let table: [(MoodLabel, [&str; 3]); 6] = [
        (MoodLabel::Happy, ["upbeat happy songs", "feel good indian songs", "cheerful bollywood hits"]),
        (MoodLabel::Sad, ["sad emotional songs", "heartbreak bollywood", "melancholy hindi songs"]),
        (MoodLabel::Angry, ["powerful indian songs", "intense hindi tracks", "energetic bollywood"]),
        (MoodLabel::Anxious, ["calming indian songs", "peaceful hindi music", "soothing bollywood"]),
        (MoodLabel::Relaxed, ["chill relaxing songs", "peaceful indian classical", "soft bollywood melodies"]),
        (MoodLabel::Neutral, ["popular hindi songs", "trending indian music", "top bollywood hits"]),
    ];

    table
        .into_iter()
        .map(|(mood, terms)| (mood, terms.iter().map(ToString::to_string).collect()))
        .collect()
}

/// (title, artist, spotify track id, cover image id)
type MockRow = (&'static str, &'static str, &'static str, &'static str);

const HAPPY: [MockRow; 6] = [
    ("Happy", "Pharrell Williams", "1z6WtY7X4HQJvzxC4UgkSf", "ab67616d0000b273f9208c46cef5d5695a8b8394"),
    ("Can't Stop the Feeling!", "Justin Timberlake", "1WkMMavIMc4JZ8cfMmxHkI", "ab67616d0000b273ca4d52e81604d5fb37b907f7"),
    ("Uptown Funk", "Mark Ronson ft. Bruno Mars", "32OlwWuMpZ6b0aN2RZOeMS", "ab67616d0000b2736accf4971a1f334c68e9e044"),
    ("Good as Hell", "Lizzo", "6KgBpzTuTRPebChN0VTyzV", "ab67616d0000b2739d9771f82c63ddb907b8d18e"),
    ("Don't Stop Me Now", "Queen", "5T8EDUDqKcs6OSOwEsfqG7", "ab67616d0000b2737c39dd9ad2f5e7fdee513547"),
    ("Walking On Sunshine", "Katrina & The Waves", "05wIrZSwuaVWhcv5FfqeH0", "ab67616d0000b273920dc1b272e5e4afd755b04b"),
];

const SAD: [MockRow; 6] = [
    ("Someone Like You", "Adele", "4qoBlK4GEBzF7pfUeId5vq", "ab67616d0000b273d3d53760259c6b19b72464b9"),
    ("Hurt", "Johnny Cash", "28cnXtME493VX9NOw9cIUh", "ab67616d0000b2735f4e5482e934e31d52e6f39c"),
    ("Fix You", "Coldplay", "7LVHVU3tWfcxj5aiPFEW4Q", "ab67616d0000b27309fd83d32aee93dceba78517"),
    ("When the Party's Over", "Billie Eilish", "43zdsphuZLzwA9k4DJhU0I", "ab67616d0000b2737005885df706891a3c182a57"),
    ("All I Want", "Kodaline", "7q2rPv1xYBuyhDOZqPwkQ5", "ab67616d0000b273f5dac9ef7300c786bda7d955"),
    ("Everybody Hurts", "R.E.M.", "1quRQmg5KH5WF2PcK3y6Cr", "ab67616d0000b273e488f16b4631c41c8dda2bae"),
];

const ANGRY: [MockRow; 6] = [
    ("Break Stuff", "Limp Bizkit", "5cZqsjJeZO7Z4hxHJuTgah", "ab67616d0000b273f0d2d02dafe49eec2cfa54b1"),
    ("Killing in the Name", "Rage Against the Machine", "59WN2psjkt1tyaxjspN8fp", "ab67616d0000b2737ba56b2e23f0c6886de08e97"),
    ("Last Resort", "Papa Roach", "5W8YXBz6MTQnj4qXzR6eVR", "ab67616d0000b273cb81eb3c1238d50b7acbb79f"),
    ("Numb", "Linkin Park", "2nLtzopw4rPReszdYBJU6h", "ab67616d0000b2736a450a9ca93c1d1c10d2f0df"),
    ("Down with the Sickness", "Disturbed", "40rvBMQizxkIqnjPdEWY1v", "ab67616d0000b273689ef07e0830d1b3fb22440b"),
    ("I Hate Everything About You", "Three Days Grace", "0M955bMOoilikPXwKLYpoi", "ab67616d0000b273ed75ea4d6b295adb36fb169d"),
];

const ANXIOUS: [MockRow; 6] = [
    ("Breathe Me", "Sia", "5rX6C5QVvvZB7XckETNych", "ab67616d0000b273b8b7594c979cd0c367489256"),
    ("Weightless", "Marconi Union", "0gZQWi4P7fJkWcC9lca9WJ", "ab67616d0000b2733610a0c193690951dcfc4c59"),
    ("Intro", "The xx", "2DnJjbjNTV9Nd5NOa1KGba", "ab67616d0000b273ada101c2e9e97feb8fae37a9"),
    ("Mad World", "Gary Jules", "3JOVTQ5h8HGFnDdp4VT3MP", "ab67616d0000b27363e77bc1700f3bf803a22aea"),
    ("Chasing Cars", "Snow Patrol", "11bD1JtSjlIgKgZG2134DZ", "ab67616d0000b2735f0f7895b5dea2e13161bccc"),
    ("The Scientist", "Coldplay", "75JFxkI2RXiU7L9VXzMkle", "ab67616d0000b273f0493b4a5314c0c891e93432"),
];

const RELAXED: [MockRow; 6] = [
    ("Dreams", "Fleetwood Mac", "0ofHAoxe9vBkTCp2UQIavz", "ab67616d0000b273e52a59a28efa4773dd2bfe1b"),
    ("Clair de Lune", "Claude Debussy", "5QTxFnGygVM4jFQiBovmRo", "ab67616d0000b273906d11c397c98725d6cba474"),
    ("Gymnopédie No.1", "Erik Satie", "5NGtFXVpXSvwunfCZzbV8b", "ab67616d0000b273161ed4beedc761e729573b88"),
    ("The Girl from Ipanema", "Stan Getz & Astrud Gilberto", "5kTyKj4tKKs7a75ErmiPZl", "ab67616d0000b273ef16c15ac30f14ff195b6d55"),
    ("River Flows in You", "Yiruma", "20iCRJgi3IK7O25rq7YPI8", "ab67616d0000b2738ec71d8a129beca9cb315043"),
    ("Watermark", "Enya", "0GBQ8OH1vLlGgHOKYjKqEO", "ab67616d0000b273546d02f29bc520ea49b2393f"),
];

const NEUTRAL: [MockRow; 6] = [
    ("Starboy", "The Weeknd ft. Daft Punk", "7MXVkk9YMctZqd1Srtv4MB", "ab67616d0000b273a048415db06a5b6fa7ec4e1a"),
    ("Shape of You", "Ed Sheeran", "7qiZfU4dY1lWllzX7mPBI3", "ab67616d0000b273ba5db46f4b838ef6027e6f96"),
    ("Don't Start Now", "Dua Lipa", "3PfIrDoz19wz7qK7tYeu62", "ab67616d0000b273d4daf28d55fe5050a26cf730"),
    ("bad guy", "Billie Eilish", "2Fxmhks0bxGSBdJ92vM42m", "ab67616d0000b2732a038d3bf875d23e4aeaa84e"),
    ("Sunflower", "Post Malone, Swae Lee", "0RiRZpuVDfi9ytboZQXbo0", "ab67616d0000b273e2e352d89826aef6dbd5ff8f"),
    ("Blinding Lights", "The Weeknd", "0VjIjW4GlUZAMYd2vXMi3b", "ab67616d0000b273b5d7fd7a54e7ffc047347369"),
];

fn build_mock_songs() -> HashMap<MoodLabel, Vec<SongRecommendation>> {
    let rows = |rows: &[MockRow]| -> Vec<SongRecommendation> {
        rows.iter()
            .map(|(title, artist, track, image)| {
                SongRecommendation::new(
                    title,
                    artist,
                    Source::International,
                    &format!("https://open.spotify.com/track/{track}"),
                )
                .with_image(&format!("https://i.scdn.co/image/{image}"))
            })
            .collect()
    };

    HashMap::from([
        (MoodLabel::Happy, rows(&HAPPY)),
        (MoodLabel::Sad, rows(&SAD)),
        (MoodLabel::Angry, rows(&ANGRY)),
        (MoodLabel::Anxious, rows(&ANXIOUS)),
        (MoodLabel::Relaxed, rows(&RELAXED)),
        (MoodLabel::Neutral, rows(&NEUTRAL)),
    ])
}
