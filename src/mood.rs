//! # Mood Labels
//!
//! The closed set of moods Moodify can classify a conversation into, plus the
//! lenient parser used to read a label back out of a language-model reply.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed-set classification of emotional state, used to key recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoodLabel {
    Happy,
    Sad,
    Angry,
    Anxious,
    Relaxed,
    Neutral,
}

impl MoodLabel {
    /// Every label, in prompt order.
    pub const ALL: [MoodLabel; 6] = [
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Angry,
        MoodLabel::Anxious,
        MoodLabel::Relaxed,
        MoodLabel::Neutral,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Happy => "Happy",
            MoodLabel::Sad => "Sad",
            MoodLabel::Angry => "Angry",
            MoodLabel::Anxious => "Anxious",
            MoodLabel::Relaxed => "Relaxed",
            MoodLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood '{}'", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for MoodLabel {
    type Err = UnknownMood;

    /// Case-insensitive exact match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MoodLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Read a mood label out of free-form model output.
///
/// Accepts a bare label with any surrounding whitespace, quotes, markdown or
/// punctuation (`"**Happy.**"`). Failing that, a reply that mentions exactly
/// one distinct label (`"The mood is: Sad"`) resolves to it. Anything else
/// resolves to `fallback` and the mismatch is logged.
#[must_use]
pub fn parse_mood_reply(reply: &str, fallback: MoodLabel) -> MoodLabel {
    let stripped = reply.trim().trim_matches(|c: char| !c.is_alphanumeric());
    if let Ok(label) = stripped.parse::<MoodLabel>() {
        return label;
    }

    let mut mentioned: Vec<MoodLabel> = reply
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.parse::<MoodLabel>().ok())
        .collect();
    mentioned.sort();
    mentioned.dedup();

    match mentioned.as_slice() {
        [only] => {
            debug!("Extracted mood {only} from reply {reply:?}");
            *only
        }
        _ => {
            warn!("Model reply {reply:?} is not a known mood, using {fallback}");
            fallback
        }
    }
}
