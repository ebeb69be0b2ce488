//! # Mood Classifier Adapter
//!
//! Mood detection is delegated entirely to a language model. The rest of the
//! crate only sees the [`MoodClassifier`] trait, so the provider can be swapped
//! or mocked without touching the orchestrator.
//!
//! The same model also powers the optional [`Companion`], which writes a short
//! supportive reply to each chat message.

use crate::config::Config;
use crate::error::{MoodifyError, MoodifyResult};
use crate::gemini::GeminiClient;
use crate::mood::{parse_mood_reply, MoodLabel};
use log::info;

/// Turns conversation text into a mood label.
pub trait MoodClassifier {
    /// # Errors
    ///
    /// [`MoodifyError::InvalidInput`] for empty text, [`MoodifyError::Upstream`]
    /// when the model cannot be reached. An unrecognised reply is not an error.
    fn classify(&self, text: &str) -> MoodifyResult<MoodLabel>;
}

/// Writes a conversational reply to the user.
pub trait Companion {
    /// # Errors
    ///
    /// [`MoodifyError::Upstream`] when the model cannot be reached.
    fn reply(&self, text: &str) -> MoodifyResult<String>;
}

/// Trimmed text, or `InvalidInput` when nothing is left.
pub(crate) fn require_text(text: &str) -> MoodifyResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MoodifyError::InvalidInput(
            "Please tell me how you're feeling first.".to_string(),
        ));
    }
    Ok(trimmed)
}

#[must_use]
pub fn mood_prompt(conversation: &str) -> String {
    let labels: Vec<String> = MoodLabel::ALL.iter().map(|m| format!("- {m}")).collect();
    format!(
        "Analyze the mood of the following conversation and respond with ONLY ONE of these moods:\n\
         {}\n\n\
         Conversation:\n\
         {conversation}\n",
        labels.join("\n")
    )
}

#[must_use]
pub fn companion_prompt(message: &str) -> String {
    format!(
        "You are an empathetic AI assistant named Moodify, who is collecting information about \
         the user's mood in order to recommend music that fits it. Respond to the following \
         message with a short (1-3 sentences), conversational reply that encourages the user to \
         share more about their feelings. Be supportive.\n\n\
         User message: {message}\n"
    )
}

/// [`MoodClassifier`] backed by Gemini.
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    client: GeminiClient,
    fallback: MoodLabel,
}

impl GeminiClassifier {
    /// `fallback` is returned whenever the reply is not a known label.
    #[must_use]
    pub fn new(client: GeminiClient, fallback: MoodLabel) -> Self {
        Self { client, fallback }
    }

    /// # Errors
    ///
    /// Returns [`MoodifyError::Configuration`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> MoodifyResult<Self> {
        Ok(Self::new(GeminiClient::from_config(config)?, config.fallback_mood))
    }
}

impl MoodClassifier for GeminiClassifier {
    fn classify(&self, text: &str) -> MoodifyResult<MoodLabel> {
        let text = require_text(text)?;
        let reply = self.client.generate_content(&mood_prompt(text))?;
        let mood = parse_mood_reply(&reply, self.fallback);
        info!("Using {} mood: {mood}", self.client.model());
        Ok(mood)
    }
}

/// [`Companion`] backed by Gemini.
#[derive(Debug, Clone)]
pub struct GeminiCompanion {
    client: GeminiClient,
}

impl GeminiCompanion {
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

impl Companion for GeminiCompanion {
    fn reply(&self, text: &str) -> MoodifyResult<String> {
        let text = require_text(text)?;
        self.client.generate_content(&companion_prompt(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_prompt_lists_every_label_and_text() {
        let prompt = mood_prompt("I got the job!");
        for label in MoodLabel::ALL {
            assert!(prompt.contains(&format!("- {label}")), "missing {label}");
        }
        assert!(prompt.contains("ONLY ONE"));
        assert!(prompt.ends_with("I got the job!\n"));
    }

    #[test]
    fn test_companion_prompt_includes_message() {
        let prompt = companion_prompt("rough day");
        assert!(prompt.contains("User message: rough day"));
        assert!(prompt.contains("1-3 sentences"));
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(matches!(require_text(""), Err(MoodifyError::InvalidInput(_))));
        assert!(matches!(require_text(" \n\t"), Err(MoodifyError::InvalidInput(_))));
        assert_eq!(require_text("  hi ").unwrap(), "hi");
    }

    #[test]
    fn test_empty_text_never_reaches_the_network() {
        // Port 9 on localhost is discard/closed; an attempt would be Upstream, not InvalidInput.
        let client = GeminiClient::new("http://127.0.0.1:9", "key", "m", Duration::from_secs(1)).unwrap();
        let classifier = GeminiClassifier::new(client, MoodLabel::Neutral);
        assert!(matches!(classifier.classify("   "), Err(MoodifyError::InvalidInput(_))));
    }
}
