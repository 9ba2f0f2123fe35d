use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rand::rng;
use rand::seq::SliceRandom;
use reqwest::StatusCode;

use vocab_core::{Card, CardId, CategoryName};

use crate::card_api::{AnswerCheck, CardApi, CategoryStats};
use crate::error::ApiError;

//
// ─── SEED DATA ─────────────────────────────────────────────────────────────────
//

/// One card to preload into an [`InMemoryCardApi`].
#[derive(Debug, Clone)]
pub struct SeedCard {
    pub prompt: String,
    pub answer: String,
    pub pronunciation: Option<String>,
    pub category: CategoryName,
}

impl SeedCard {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        pronunciation: Option<&str>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            pronunciation: pronunciation.map(str::to_string),
            category: CategoryName::new(category.into()),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredCard {
    id: CardId,
    prompt: String,
    answer: String,
    pronunciation: Option<String>,
    category: CategoryName,
}

//
// ─── IN-MEMORY CARD SOURCE ─────────────────────────────────────────────────────
//

/// Card source holding its deck in memory, for tests and the built-in deck.
///
/// Behaves like the card server: next-card selection prefers the lowest seen
/// count with a random tie-break, an absent category falls back to the first
/// one, and answers are checked against `|`-separated synonyms after
/// normalization.
pub struct InMemoryCardApi {
    cards: Vec<StoredCard>,
    seen: Mutex<HashMap<CardId, u32>>,
}

impl InMemoryCardApi {
    /// Build a source from seed cards; ids are assigned in insertion order,
    /// starting at 1.
    #[must_use]
    pub fn new(seeds: Vec<SeedCard>) -> Self {
        let cards = seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| StoredCard {
                id: CardId::new(index as u64 + 1),
                prompt: seed.prompt,
                answer: seed.answer,
                pronunciation: seed.pronunciation,
                category: seed.category,
            })
            .collect();
        Self {
            cards,
            seen: Mutex::new(HashMap::new()),
        }
    }

    fn seen_guard(&self) -> Result<MutexGuard<'_, HashMap<CardId, u32>>, ApiError> {
        self.seen.lock().map_err(|e| ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        })
    }

    fn sorted_categories(&self) -> Vec<CategoryName> {
        let mut categories: Vec<CategoryName> =
            self.cards.iter().map(|c| c.category.clone()).collect();
        categories.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        categories.dedup();
        categories
    }

    fn not_found(message: String) -> ApiError {
        ApiError::Server {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

/// Collapse whitespace and case so synonym comparison matches the server.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[async_trait]
impl CardApi for InMemoryCardApi {
    async fn list_categories(&self) -> Result<Vec<CategoryName>, ApiError> {
        Ok(self.sorted_categories())
    }

    async fn next_card(&self, category: Option<&CategoryName>) -> Result<Card, ApiError> {
        let category = match category {
            Some(category) => category.clone(),
            None => self
                .sorted_categories()
                .into_iter()
                .next()
                .ok_or_else(|| Self::not_found("no cards found in the deck".into()))?,
        };

        let seen = self.seen_guard()?;
        let candidates: Vec<&StoredCard> = self
            .cards
            .iter()
            .filter(|c| c.category == category)
            .collect();
        if candidates.is_empty() {
            return Err(Self::not_found(format!(
                "no cards found for category: {category}"
            )));
        }

        let seen_count = |card: &StoredCard| seen.get(&card.id).copied().unwrap_or(0);
        let lowest = candidates
            .iter()
            .map(|c| seen_count(c))
            .min()
            .unwrap_or(0);
        let mut tied: Vec<&StoredCard> = candidates
            .into_iter()
            .filter(|c| seen_count(c) == lowest)
            .collect();
        tied.shuffle(&mut rng());
        let chosen = tied
            .first()
            .ok_or_else(|| Self::not_found(format!("no cards found for category: {category}")))?;

        Ok(Card::new(
            chosen.id,
            chosen.prompt.clone(),
            chosen.answer.clone(),
            chosen.pronunciation.clone(),
            seen_count(chosen),
        ))
    }

    async fn mark_seen(&self, card_id: CardId) -> Result<(), ApiError> {
        let mut seen = self.seen_guard()?;
        *seen.entry(card_id).or_insert(0) += 1;
        Ok(())
    }

    async fn check_answer(&self, card_id: CardId, answer: &str) -> Result<AnswerCheck, ApiError> {
        let card = self
            .cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| Self::not_found("card not found".into()))?;

        let given = normalize(answer);
        let is_correct = card.answer.split('|').any(|accepted| normalize(accepted) == given);
        Ok(AnswerCheck {
            is_correct,
            correct_answer: card.answer.clone(),
        })
    }

    async fn category_stats(
        &self,
        category: Option<&CategoryName>,
    ) -> Result<CategoryStats, ApiError> {
        let Some(category) = category else {
            return Ok(CategoryStats::default());
        };

        let seen = self.seen_guard()?;
        let in_category = self.cards.iter().filter(|c| &c.category == category);
        let mut total = 0;
        let mut unique_seen = 0;
        for card in in_category {
            total += 1;
            if seen.get(&card.id).copied().unwrap_or(0) > 0 {
                unique_seen += 1;
            }
        }
        Ok(CategoryStats {
            unique_seen_in_category: unique_seen,
            total_in_category: total,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn two_category_deck() -> InMemoryCardApi {
        InMemoryCardApi::new(vec![
            SeedCard::new("labas", "hello (informal)", Some("LAH-bahs"), "01_greetings"),
            SeedCard::new("ačiū", "thank you|thanks", Some("AH-choo"), "01_greetings"),
            SeedCard::new("taip", "yes", None, "03_basics"),
        ])
    }

    #[tokio::test]
    async fn categories_are_distinct_and_sorted() {
        let api = two_category_deck();
        let categories = api.list_categories().await.unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryName::from("01_greetings"),
                CategoryName::from("03_basics")
            ]
        );
    }

    #[tokio::test]
    async fn next_card_prefers_lowest_seen_count() {
        let api = two_category_deck();
        let greetings = CategoryName::from("01_greetings");

        let first = api.next_card(Some(&greetings)).await.unwrap();
        api.mark_seen(first.id()).await.unwrap();

        let second = api.next_card(Some(&greetings)).await.unwrap();
        assert_ne!(second.id(), first.id(), "unseen card is served first");
        assert_eq!(second.seen_count(), 0);
    }

    #[tokio::test]
    async fn absent_category_falls_back_to_first() {
        let api = two_category_deck();
        let card = api.next_card(None).await.unwrap();
        assert!(["labas", "ačiū"].contains(&card.prompt()));
    }

    #[tokio::test]
    async fn unknown_category_is_an_error() {
        let api = two_category_deck();
        let err = api
            .next_card(Some(&CategoryName::from("99_missing")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("99_missing"));
    }

    #[tokio::test]
    async fn empty_deck_is_an_error() {
        let api = InMemoryCardApi::new(Vec::new());
        let err = api.next_card(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status, .. }
            if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn check_accepts_synonyms_after_normalization() {
        let api = two_category_deck();
        let check = api.check_answer(CardId::new(2), "  THANKS ").await.unwrap();
        assert!(check.is_correct);
        assert_eq!(check.correct_answer, "thank you|thanks");

        let check = api
            .check_answer(CardId::new(2), "thank   you")
            .await
            .unwrap();
        assert!(check.is_correct, "inner whitespace is collapsed");
    }

    #[tokio::test]
    async fn check_rejects_wrong_answer_with_correct_one() {
        let api = two_category_deck();
        let check = api.check_answer(CardId::new(3), "no").await.unwrap();
        assert!(!check.is_correct);
        assert_eq!(check.correct_answer, "yes");
    }

    #[tokio::test]
    async fn stats_count_unique_seen_cards() {
        let api = two_category_deck();
        let greetings = CategoryName::from("01_greetings");

        api.mark_seen(CardId::new(1)).await.unwrap();
        api.mark_seen(CardId::new(1)).await.unwrap();

        let stats = api.category_stats(Some(&greetings)).await.unwrap();
        assert_eq!(stats.total_in_category, 2);
        assert_eq!(
            stats.unique_seen_in_category, 1,
            "repeat views of one card count once"
        );
    }

    #[tokio::test]
    async fn stats_without_category_are_zero() {
        let api = two_category_deck();
        assert_eq!(
            api.category_stats(None).await.unwrap(),
            CategoryStats::default()
        );
    }
}
