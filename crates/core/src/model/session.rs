use crate::model::category::CategoryName;
use crate::model::mode::StudyMode;

//
// ─── STUDY SESSION ─────────────────────────────────────────────────────────────
//

/// In-memory session counters for one run of the client.
///
/// Lifecycle spans process start to exit; nothing here is ever persisted.
/// The reset rules live on the transition methods so they can be exercised
/// without any I/O:
/// - `seen_this_session` resets on category change only.
/// - `score` resets on every switch *into* Test mode and on a category change
///   while in Test mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudySession {
    mode: StudyMode,
    category: Option<CategoryName>,
    seen_this_session: u32,
    score: u32,
}

impl StudySession {
    /// Fresh session: Learn mode, no category selected, zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    /// The selected category; `None` until the category list has arrived.
    #[must_use]
    pub fn category(&self) -> Option<&CategoryName> {
        self.category.as_ref()
    }

    /// Cards marked seen since the last category change.
    #[must_use]
    pub fn seen_this_session(&self) -> u32 {
        self.seen_this_session
    }

    /// Correct Test-mode answers since the score was last reset.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Switch the visible mode.
    ///
    /// Entering Test mode starts a strict scoring round: the score resets to
    /// 0. Leaving Test mode keeps the score (it is merely hidden). The seen
    /// counter is untouched either way.
    pub fn switch_mode(&mut self, mode: StudyMode) {
        self.mode = mode;
        if mode.is_test() {
            self.score = 0;
        }
    }

    /// Select a category, resetting the per-category counters.
    pub fn select_category(&mut self, category: CategoryName) {
        self.seen_this_session = 0;
        if self.mode.is_test() {
            self.score = 0;
        }
        self.category = Some(category);
    }

    /// Record one completed seen round-trip.
    pub fn record_seen(&mut self) {
        self.seen_this_session += 1;
    }

    /// Record one correct Test-mode answer.
    pub fn record_correct(&mut self) {
        self.score += 1;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
