//! # Conversation Orchestrator
//!
//! Drives one chat turn through the pipeline:
//!
//! ```text
//! AwaitingInput -> Classifying -> Recommending -> Persisting -> Responding
//! ```
//!
//! The steps run strictly in sequence and every transition is logged at
//! `debug`. [`Orchestrator::handle_turn`] never fails. Adapter errors are
//! absorbed here:
//!
//! - empty text: the turn is rejected before anything else runs
//! - classifier unreachable: the fallback mood is used and a notice is added
//! - no songs found: a notice is added
//! - history write failure: logged at `error`, the reply is unaffected
//! - companion failure: a canned encouragement is used instead
//!
//! The orchestrator owns the session [`Transcript`]. The classifier always sees
//! the whole recent conversation as `role: content` lines, companion replies
//! included, not just the latest message.

use crate::classifier::{require_text, Companion, GeminiClassifier, GeminiCompanion, MoodClassifier};
use crate::config::Config;
use crate::error::{MoodifyError, MoodifyResult};
use crate::gemini::GeminiClient;
use crate::history::{HistoryRecord, HistoryStore, SqliteHistory};
use crate::mood::MoodLabel;
use crate::recommender::{MusicLookup, MusicRecommender};
use crate::song::{SongRecommendation, Source};
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, error, info, warn};
use std::fmt;

pub const NOTICE_MOOD_UNKNOWN: &str = "could not determine mood";
pub const NOTICE_NO_RECOMMENDATIONS: &str = "no recommendations found";

/// Oldest messages are dropped past this many, keeping the prompt bounded.
pub const MAX_TRANSCRIPT_MESSAGES: usize = 20;

/// Used in turn order when the companion cannot answer.
pub const FALLBACK_REPLIES: [&str; 5] = [
    "Tell me more about how you're feeling.",
    "I see. What else is on your mind?",
    "Interesting. How does that make you feel?",
    "I'm listening. Please continue.",
    "That's good to know. What else would you like to share?",
];

/// One user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        })
    }
}

/// Ordered messages of the current chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<(Role, String)>,
}

impl Transcript {
    pub fn push(&mut self, role: Role, content: &str) {
        self.messages.push((role, content.to_string()));
        if self.messages.len() > MAX_TRANSCRIPT_MESSAGES {
            let excess = self.messages.len() - MAX_TRANSCRIPT_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `role: content` lines, oldest first.
    #[must_use]
    pub fn joined(&self) -> String {
        self.messages
            .iter()
            .map(|(role, content)| format!("{role}: {content}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingInput,
    Classifying,
    Recommending,
    Persisting,
    Responding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Mood detected and songs found.
    Recommended,
    /// An answer was produced, but with a fallback mood or no songs.
    Degraded,
    /// The input was unusable; nothing was classified or stored.
    Rejected,
}

/// Everything the shell needs to answer one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub mood: Option<MoodLabel>,
    pub recommendations: Vec<SongRecommendation>,
    pub notices: Vec<String>,
    pub reply: Option<String>,
}

impl TurnResponse {
    fn rejected(message: String) -> Self {
        Self {
            outcome: TurnOutcome::Rejected,
            mood: None,
            recommendations: Vec::new(),
            notices: vec![message],
            reply: None,
        }
    }

    /// Terminal text for this response.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TurnResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reply) = &self.reply {
            writeln!(f, "{reply}\n")?;
        }

        if let Some(mood) = self.mood {
            writeln!(f, "Mood: {mood}")?;
        }

        if !self.recommendations.is_empty() {
            writeln!(f, "Recommendations:")?;
            for (i, song) in self.recommendations.iter().enumerate() {
                let tag = match song.source {
                    Source::Regional => "regional",
                    Source::International => "international",
                };
                write!(f, "  {:>2}. {} - {}", i + 1, song.title, song.artist)?;
                if let Some(album) = &song.album {
                    write!(f, " ({album})")?;
                }
                writeln!(f, " [{tag}]")?;
                writeln!(f, "      {}", song.listen_url())?;
            }
        }

        for notice in &self.notices {
            writeln!(f, "Note: {notice}")?;
        }

        Ok(())
    }
}

/// Owns the adapters and the session transcript, and runs turns through them.
pub struct Orchestrator {
    classifier: Box<dyn MoodClassifier>,
    music: Box<dyn MusicLookup>,
    history: Box<dyn HistoryStore>,
    companion: Option<Box<dyn Companion>>,
    fallback: MoodLabel,
    transcript: Transcript,
    turns: usize,
}

impl Orchestrator {
    /// `fallback` is the mood used when the classifier cannot answer.
    #[must_use]
    pub fn new(
        classifier: Box<dyn MoodClassifier>,
        music: Box<dyn MusicLookup>,
        history: Box<dyn HistoryStore>,
        fallback: MoodLabel,
    ) -> Self {
        Self {
            classifier,
            music,
            history,
            companion: None,
            fallback,
            transcript: Transcript::default(),
            turns: 0,
        }
    }

    #[must_use]
    pub fn with_companion(mut self, companion: Box<dyn Companion>) -> Self {
        self.companion = Some(companion);
        self
    }

    /// Wire up Gemini, JioSaavn and the SQLite store from `config`.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Configuration`] if an HTTP client cannot be built, or
    /// [`MoodifyError::Persistence`] if the history store cannot be opened.
    pub fn from_config(config: &Config) -> MoodifyResult<Self> {
        let gemini = GeminiClient::from_config(config)?;
        let history = SqliteHistory::open(&config.db_path)?;

        let orchestrator = Self::new(
            Box::new(GeminiClassifier::new(gemini.clone(), config.fallback_mood)),
            Box::new(MusicRecommender::from_config(config)?),
            Box::new(history),
            config.fallback_mood,
        );

        info!(
            "Moodify ready (model {}, history at {}, companion {})",
            config.gemini_model,
            config.db_path.display(),
            if config.companion { "on" } else { "off" }
        );

        Ok(if config.companion {
            orchestrator.with_companion(Box::new(GeminiCompanion::new(gemini)))
        } else {
            orchestrator
        })
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn enter(state: TurnState) {
        debug!("Turn state -> {state:?}");
    }

    /// Run one chat message through classification, lookup and history.
    ///
    /// The message joins the session transcript, and the whole transcript is
    /// what gets classified.
    pub fn handle_turn(&mut self, text: &str) -> TurnResponse {
        Self::enter(TurnState::AwaitingInput);
        let turn = ChatTurn::new(text);

        let text = match require_text(&turn.text) {
            Ok(text) => text,
            Err(e) => {
                debug!("Rejected turn: {e}");
                let message = match e {
                    MoodifyError::InvalidInput(message) => message,
                    other => other.to_string(),
                };
                return TurnResponse::rejected(message);
            }
        };

        self.turns += 1;
        self.transcript.push(Role::User, text);
        let mut notices = Vec::new();

        Self::enter(TurnState::Classifying);
        let mood = match self.classifier.classify(&self.transcript.joined()) {
            Ok(mood) => mood,
            Err(e) => {
                warn!("Mood classification failed, falling back to {}: {e}", self.fallback);
                notices.push(NOTICE_MOOD_UNKNOWN.to_string());
                self.fallback
            }
        };

        Self::enter(TurnState::Recommending);
        let recommendations = self.music.recommend(mood);
        if recommendations.is_empty() {
            notices.push(NOTICE_NO_RECOMMENDATIONS.to_string());
        }

        Self::enter(TurnState::Persisting);
        let record = HistoryRecord {
            timestamp: turn.timestamp,
            mood,
            recommendations,
        };
        if let Err(e) = self.history.append(&record) {
            error!("Failed to save history: {e}");
        }

        Self::enter(TurnState::Responding);
        let reply = self.companion.as_ref().map(|companion| {
            companion.reply(text).unwrap_or_else(|e| {
                warn!("Companion reply unavailable, using a canned one: {e}");
                FALLBACK_REPLIES[(self.turns - 1) % FALLBACK_REPLIES.len()].to_string()
            })
        });
        if let Some(reply) = &reply {
            self.transcript.push(Role::Assistant, reply);
        }

        TurnResponse {
            outcome: if notices.is_empty() {
                TurnOutcome::Recommended
            } else {
                TurnOutcome::Degraded
            },
            mood: Some(mood),
            recommendations: record.recommendations,
            notices,
            reply,
        }
    }

    /// Up to `n` past turns, most recent first.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Persistence`] when the store cannot be read.
    pub fn recent_history(&self, n: usize) -> MoodifyResult<Vec<HistoryRecord>> {
        self.history.recent(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Answers with a fixed mood and remembers the text it was shown.
    struct FixedClassifier(MoodifyResult<MoodLabel>, Rc<RefCell<Vec<String>>>);

    impl MoodClassifier for FixedClassifier {
        fn classify(&self, text: &str) -> MoodifyResult<MoodLabel> {
            self.1.borrow_mut().push(text.to_string());
            match &self.0 {
                Ok(mood) => Ok(*mood),
                Err(_) => Err(MoodifyError::upstream("fake", "unreachable")),
            }
        }
    }

    struct FixedMusic(Vec<SongRecommendation>);

    impl MusicLookup for FixedMusic {
        fn recommend(&self, _mood: MoodLabel) -> Vec<SongRecommendation> {
            self.0.clone()
        }
    }

    #[derive(Default, Clone)]
    struct MemoryHistory {
        records: Rc<RefCell<Vec<HistoryRecord>>>,
        broken: bool,
    }

    impl HistoryStore for MemoryHistory {
        fn append(&self, record: &HistoryRecord) -> MoodifyResult<()> {
            if self.broken {
                return Err(MoodifyError::Persistence("disk full".to_string()));
            }
            self.records.borrow_mut().push(record.clone());
            Ok(())
        }

        fn recent(&self, n: usize) -> MoodifyResult<Vec<HistoryRecord>> {
            Ok(self.records.borrow().iter().rev().take(n).cloned().collect())
        }
    }

    struct EchoCompanion(bool);

    impl Companion for EchoCompanion {
        fn reply(&self, text: &str) -> MoodifyResult<String> {
            if self.0 {
                Ok(format!("You said: {text}"))
            } else {
                Err(MoodifyError::upstream("fake", "timeout"))
            }
        }
    }

    fn song() -> SongRecommendation {
        SongRecommendation::new("Happy", "Pharrell Williams", Source::International, "https://open.spotify.com/track/x")
    }

    fn build(
        mood: MoodifyResult<MoodLabel>,
        songs: Vec<SongRecommendation>,
        history: MemoryHistory,
    ) -> (Orchestrator, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = Orchestrator::new(
            Box::new(FixedClassifier(mood, Rc::clone(&seen))),
            Box::new(FixedMusic(songs)),
            Box::new(history),
            MoodLabel::Neutral,
        );
        (orchestrator, seen)
    }

    #[test]
    fn test_successful_turn_is_recorded() {
        let history = MemoryHistory::default();
        let (mut orchestrator, _) = build(Ok(MoodLabel::Happy), vec![song()], history.clone());

        let response = orchestrator.handle_turn("I just got a promotion!");
        assert_eq!(response.outcome, TurnOutcome::Recommended);
        assert_eq!(response.mood, Some(MoodLabel::Happy));
        assert_eq!(response.recommendations, vec![song()]);
        assert!(response.notices.is_empty());

        let records = history.records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mood, MoodLabel::Happy);
        assert_eq!(records[0].recommendations, vec![song()]);
    }

    #[test]
    fn test_empty_input_is_rejected_without_side_effects() {
        let history = MemoryHistory::default();
        let (mut orchestrator, seen) = build(Ok(MoodLabel::Happy), vec![song()], history.clone());

        let response = orchestrator.handle_turn("   ");
        assert_eq!(response.outcome, TurnOutcome::Rejected);
        assert_eq!(response.mood, None);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.notices.len(), 1);
        assert!(seen.borrow().is_empty());
        assert!(history.records.borrow().is_empty());
        assert!(orchestrator.transcript().is_empty());
    }

    #[test]
    fn test_classifier_sees_whole_conversation() {
        let (orchestrator, seen) = build(Ok(MoodLabel::Sad), vec![song()], MemoryHistory::default());
        let mut orchestrator = orchestrator.with_companion(Box::new(EchoCompanion(true)));

        orchestrator.handle_turn("my exam went badly");
        orchestrator.handle_turn("   ");
        orchestrator.handle_turn("and I missed the bus");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], "user: my exam went badly");
        assert_eq!(
            seen[1],
            "user: my exam went badly\n\
             assistant: You said: my exam went badly\n\
             user: and I missed the bus"
        );
        assert_eq!(orchestrator.transcript().len(), 4);
    }

    #[test]
    fn test_transcript_keeps_most_recent_messages() {
        let mut transcript = Transcript::default();
        for i in 0..MAX_TRANSCRIPT_MESSAGES + 3 {
            transcript.push(Role::User, &format!("message {i}"));
        }
        assert_eq!(transcript.len(), MAX_TRANSCRIPT_MESSAGES);
        let joined = transcript.joined();
        assert!(joined.starts_with("user: message 3\n"));
        assert!(joined.ends_with(&format!("user: message {}", MAX_TRANSCRIPT_MESSAGES + 2)));
    }

    #[test]
    fn test_classifier_failure_uses_fallback_and_still_records() {
        let history = MemoryHistory::default();
        let (mut orchestrator, _) = build(
            Err(MoodifyError::upstream("fake", "down")),
            vec![song()],
            history.clone(),
        );

        let response = orchestrator.handle_turn("hello");
        assert_eq!(response.outcome, TurnOutcome::Degraded);
        assert_eq!(response.mood, Some(MoodLabel::Neutral));
        assert_eq!(response.notices, [NOTICE_MOOD_UNKNOWN]);
        assert_eq!(history.records.borrow()[0].mood, MoodLabel::Neutral);
    }

    #[test]
    fn test_no_songs_adds_notice() {
        let history = MemoryHistory::default();
        let (mut orchestrator, _) = build(Ok(MoodLabel::Sad), Vec::new(), history.clone());

        let response = orchestrator.handle_turn("meh");
        assert_eq!(response.outcome, TurnOutcome::Degraded);
        assert_eq!(response.notices, [NOTICE_NO_RECOMMENDATIONS]);
        assert!(history.records.borrow()[0].recommendations.is_empty());
    }

    #[test]
    fn test_history_failure_does_not_change_response() {
        let history = MemoryHistory {
            broken: true,
            ..MemoryHistory::default()
        };
        let (mut orchestrator, _) = build(Ok(MoodLabel::Relaxed), vec![song()], history);

        let response = orchestrator.handle_turn("lazy sunday");
        assert_eq!(response.outcome, TurnOutcome::Recommended);
        assert_eq!(response.mood, Some(MoodLabel::Relaxed));
        assert!(response.notices.is_empty());
    }

    #[test]
    fn test_companion_reply_attached() {
        let (orchestrator, _) = build(Ok(MoodLabel::Happy), vec![song()], MemoryHistory::default());
        let mut orchestrator = orchestrator.with_companion(Box::new(EchoCompanion(true)));
        let response = orchestrator.handle_turn("great day");
        assert_eq!(response.reply.as_deref(), Some("You said: great day"));
    }

    #[test]
    fn test_companion_failure_uses_canned_replies_in_turn() {
        let (orchestrator, seen) = build(Ok(MoodLabel::Happy), vec![song()], MemoryHistory::default());
        let mut orchestrator = orchestrator.with_companion(Box::new(EchoCompanion(false)));

        let first = orchestrator.handle_turn("great day");
        assert_eq!(first.reply.as_deref(), Some(FALLBACK_REPLIES[0]));
        assert_eq!(first.outcome, TurnOutcome::Recommended);

        let second = orchestrator.handle_turn("really great");
        assert_eq!(second.reply.as_deref(), Some(FALLBACK_REPLIES[1]));
        assert!(seen.borrow()[1].contains(&format!("assistant: {}", FALLBACK_REPLIES[0])));
    }

    #[test]
    fn test_no_companion_means_no_reply() {
        let (mut orchestrator, _) = build(Ok(MoodLabel::Happy), vec![song()], MemoryHistory::default());
        assert_eq!(orchestrator.handle_turn("great day").reply, None);
        assert_eq!(orchestrator.transcript().len(), 1);
    }

    #[test]
    fn test_recent_history_passes_through() {
        let history = MemoryHistory::default();
        let (mut orchestrator, _) = build(Ok(MoodLabel::Angry), vec![], history);
        orchestrator.handle_turn("one");
        orchestrator.handle_turn("two");
        assert_eq!(orchestrator.recent_history(5).unwrap().len(), 2);
        assert_eq!(orchestrator.recent_history(1).unwrap().len(), 1);
    }

    #[test]
    fn test_render_lists_songs_and_notices() {
        let mut regional = song();
        regional.album = Some("G I R L".to_string());
        let response = TurnResponse {
            outcome: TurnOutcome::Degraded,
            mood: Some(MoodLabel::Neutral),
            recommendations: vec![song(), regional],
            notices: vec![NOTICE_MOOD_UNKNOWN.to_string()],
            reply: Some("Tell me more.".to_string()),
        };
        let text = response.render();
        assert!(text.starts_with("Tell me more.\n"));
        assert!(text.contains("Mood: Neutral"));
        assert!(text.contains(" 1. Happy - Pharrell Williams [international]"));
        assert!(text.contains(" 2. Happy - Pharrell Williams (G I R L) [international]"));
        assert!(text.contains("https://open.spotify.com/track/x"));
        assert!(text.ends_with("Note: could not determine mood\n"));
        assert_eq!(text, response.to_string());
    }

    #[test]
    fn test_render_rejected_shows_only_message() {
        let text = TurnResponse::rejected("Please tell me how you're feeling first.".to_string()).render();
        assert_eq!(text, "Note: Please tell me how you're feeling first.\n");
    }
}
