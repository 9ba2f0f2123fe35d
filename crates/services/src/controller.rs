use std::sync::Arc;

use tracing::{info, warn};

use vocab_core::{Card, CategoryName, StudyMode, StudySession};

use crate::card_api::CardApi;
use crate::error::ApiError;
use crate::view::{CardView, Feedback, StatsView, StudyView};

//
// ─── SESSION CONTROLLER ────────────────────────────────────────────────────────
//

/// Client-side state machine for one study session.
///
/// Owns the session counters and the active card, and mediates between UI
/// events and the card source. All mutating operations take `&mut self`: the
/// exclusive borrow is what guarantees that no two operations interleave on
/// the same card. Within an operation, network calls are awaited strictly in
/// sequence: for a Test submission the check call precedes the seen call,
/// which precedes the local counter bumps. Failures are never retried.
pub struct SessionController {
    api: Arc<dyn CardApi>,
    view: Arc<dyn StudyView>,
    session: StudySession,
    card: Option<Card>,
}

impl SessionController {
    #[must_use]
    pub fn new(api: Arc<dyn CardApi>, view: Arc<dyn StudyView>) -> Self {
        Self {
            api,
            view,
            session: StudySession::new(),
            card: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &StudySession {
        &self.session
    }

    /// The active card; `None` only before the first successful load.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    /// Boot the session: project the default mode, fetch the category list,
    /// select the first category, and load the first card.
    ///
    /// An initialization failure is terminal: its message replaces the
    /// prompt and no retry is offered.
    pub async fn initialize(&mut self) {
        self.view.show_mode(self.session.mode());
        if let Err(err) = self.try_initialize().await {
            self.view.show_fatal(&err.to_string());
        }
    }

    async fn try_initialize(&mut self) -> Result<(), ApiError> {
        let categories = self.api.list_categories().await?;
        self.view.show_categories(&categories);
        if let Some(first) = categories.into_iter().next() {
            self.session.select_category(first);
        }
        self.load_next().await?;
        info!(category = ?self.session.category().map(CategoryName::as_str), "session ready");
        Ok(())
    }

    /// Fetch and activate the next card for the current category.
    ///
    /// The previous card is replaced wholesale; projecting the new card
    /// clears every transient reveal/feedback projection. The stats refresh
    /// failure is surfaced to the caller here, unlike on a mode change.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the fetch or the stats refresh; the caller
    /// surfaces it without touching prior state.
    pub async fn load_next(&mut self) -> Result<(), ApiError> {
        let card = self.api.next_card(self.session.category()).await?;
        self.view.show_card(&CardView::from(&card));
        self.card = Some(card);
        self.refresh_stats().await?;
        if self.session.mode().is_test() {
            self.view.focus_answer_entry();
        }
        Ok(())
    }

    /// Record a seen event for the active card, then bump the session
    /// counter. No-op without an active card.
    ///
    /// Awaited to completion before any dependent counter logic in the
    /// reveal/submit flows; on failure the counter stays untouched.
    async fn mark_seen(&mut self) -> Result<(), ApiError> {
        let Some(card_id) = self.card.as_ref().map(Card::id) else {
            return Ok(());
        };
        self.api.mark_seen(card_id).await?;
        self.session.record_seen();
        Ok(())
    }

    /// Reveal the active card's answer (Learn flow).
    ///
    /// Silently ignored without an active card. The seen round-trip completes
    /// first; only then is the answer projected and the card's local seen
    /// count bumped. Revealing the same card twice records two seen events;
    /// that matches the card source's duplicate-tolerant accounting, and the
    /// port contract hides the reveal control after the first call. (If
    /// duplicates ever become unacceptable, an idempotency flag on the card
    /// is the place for the guard.)
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the seen call or the stats refresh fails.
    pub async fn reveal(&mut self) -> Result<(), ApiError> {
        if self.card.is_none() {
            return Ok(());
        }
        self.mark_seen().await?;
        if let Some(card) = self.card.as_mut() {
            self.view.show_answer(card.answer());
            card.record_seen();
            self.view.show_seen_count(card.seen_count());
        }
        self.refresh_stats().await
    }

    /// Check a typed answer for the active card (Test flow).
    ///
    /// Silently ignored without an active card. The check call strictly
    /// precedes the seen call for every input, so a failed check mutates
    /// nothing at all. The explicit submit control and the Enter keypress
    /// both route here.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the check, the seen call, or the stats refresh
    /// fails.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<(), ApiError> {
        let Some(card_id) = self.card.as_ref().map(Card::id) else {
            return Ok(());
        };
        let check = self.api.check_answer(card_id, answer).await?;
        self.mark_seen().await?;

        if check.is_correct {
            self.session.record_correct();
            self.view.show_feedback(&Feedback::Correct);
        } else {
            self.view.show_feedback(&Feedback::Incorrect {
                correct_answer: check.correct_answer,
            });
        }

        if let Some(card) = self.card.as_mut() {
            card.record_seen();
            self.view.show_seen_count(card.seen_count());
        }
        self.refresh_stats().await
    }

    /// Project the session counters alongside fresh category aggregates.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the stats fetch fails; callers decide whether
    /// to surface or swallow it.
    pub async fn refresh_stats(&self) -> Result<(), ApiError> {
        let stats = self.api.category_stats(self.session.category()).await?;
        self.view.show_stats(&StatsView {
            seen_this_session: self.session.seen_this_session(),
            unique_seen_in_category: stats.unique_seen_in_category,
            total_in_category: stats.total_in_category,
            score: self.session.score(),
        });
        Ok(())
    }

    /// Switch the visible mode.
    ///
    /// Entering Test resets the score and focuses the answer entry. The
    /// active card and the session seen counter are untouched, and no card
    /// is reloaded. The stats refresh is best-effort on this path only.
    pub async fn switch_mode(&mut self, mode: StudyMode) {
        self.session.switch_mode(mode);
        self.view.show_mode(mode);
        if let Err(err) = self.refresh_stats().await {
            warn!(%err, "stats refresh after mode change failed");
        }
        if mode.is_test() {
            self.view.focus_answer_entry();
        }
    }

    /// Select a new category and load its first card.
    ///
    /// The per-category counters reset before the load: the seen counter
    /// always, the score only while in Test mode.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the load; the reset still applies, matching
    /// the selector already showing the new category.
    pub async fn switch_category(&mut self, category: CategoryName) -> Result<(), ApiError> {
        info!(category = %category, "category changed");
        self.session.select_category(category);
        self.load_next().await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
