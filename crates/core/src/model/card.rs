use crate::model::ids::CardId;

//
// ─── CARD ─────────────────────────────────────────────────────────────────────
//

/// A prompt/answer pair served by the card source.
///
/// The active card is replaced wholesale on every load; it never merges state
/// with a previously shown card. `seen_count` starts at the value reported by
/// the source and is bumped locally after each recorded seen event so the
/// projection reflects the action without waiting for a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    prompt: String,
    answer: String,
    pronunciation: Option<String>,
    seen_count: u32,
}

impl Card {
    /// Create a card as fetched from the card source.
    ///
    /// An empty or whitespace-only pronunciation is normalized to `None`.
    #[must_use]
    pub fn new(
        id: CardId,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        pronunciation: Option<String>,
        seen_count: u32,
    ) -> Self {
        let pronunciation = pronunciation
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self {
            id,
            prompt: prompt.into(),
            answer: answer.into(),
            pronunciation,
            seen_count,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The answer text, possibly holding `|`-separated accepted synonyms.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn pronunciation(&self) -> Option<&str> {
        self.pronunciation.as_deref()
    }

    #[must_use]
    pub fn seen_count(&self) -> u32 {
        self.seen_count
    }

    /// Reflect a just-recorded seen event locally.
    pub fn record_seen(&mut self) {
        self.seen_count += 1;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
