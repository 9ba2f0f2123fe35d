use vocab_core::{Card, CategoryName, StudyMode};

//
// ─── PROJECTIONS ───────────────────────────────────────────────────────────────
//

/// Snapshot of the active card that is safe to project before a reveal.
///
/// Deliberately carries no answer field: an unrevealed answer can never reach
/// a rendering surface through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub prompt: String,
    pub pronunciation: Option<String>,
    pub seen_count: u32,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            prompt: card.prompt().to_string(),
            pronunciation: card.pronunciation().map(str::to_string),
            seen_count: card.seen_count(),
        }
    }
}

/// Outcome of a Test-mode answer check, ready for projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_answer: String },
}

/// The four counters projected into the stats region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsView {
    pub seen_this_session: u32,
    pub unique_seen_in_category: u32,
    pub total_in_category: u32,
    pub score: u32,
}

//
// ─── PRESENTATION PORT ─────────────────────────────────────────────────────────
//

/// Narrow port the session controller writes UI state into.
///
/// Implementations own every layout and widget concern; the controller only
/// pushes projections. Contract notes:
/// - `show_card` also clears all transient projections (answer hidden, answer
///   input cleared, feedback cleared, "next" hidden, "reveal" shown).
/// - `show_answer` and `show_feedback` end the current card's input phase
///   (show "next"; `show_answer` also hides "reveal", which keeps a second
///   reveal of the same card out of reach of normal interaction).
/// - `show_mode` controls which panel is visible and whether the score is
///   shown (Test mode only).
pub trait StudyView: Send + Sync {
    fn show_mode(&self, mode: StudyMode);
    fn show_categories(&self, categories: &[CategoryName]);
    fn show_card(&self, card: &CardView);
    fn show_answer(&self, answer: &str);
    fn show_seen_count(&self, seen_count: u32);
    fn show_feedback(&self, feedback: &Feedback);
    fn show_stats(&self, stats: &StatsView);
    /// Ergonomic cue for Test mode; not a correctness invariant.
    fn focus_answer_entry(&self);
    /// Terminal initialization failure, rendered in place of the prompt.
    fn show_fatal(&self, message: &str);
    /// Blocking interruption for a failed Learn/Test operation.
    fn show_error(&self, message: &str);
}
