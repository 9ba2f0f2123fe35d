use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vocab_core::{Card, CardId, CategoryName};

use crate::error::ApiError;

//
// ─── CONTRACT ──────────────────────────────────────────────────────────────────
//

/// Result of checking a typed answer against a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct_answer: String,
}

/// Aggregate progress for one category, as reported by the card source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryStats {
    pub unique_seen_in_category: u32,
    pub total_in_category: u32,
}

/// Contract for a card source.
///
/// The session controller consumes this behind `Arc<dyn CardApi>` so the
/// backend (HTTP server, in-memory deck) can be swapped at composition time.
#[async_trait]
pub trait CardApi: Send + Sync {
    /// List the available categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the source cannot be reached or reports a fault.
    async fn list_categories(&self) -> Result<Vec<CategoryName>, ApiError>;

    /// Fetch the next card to study.
    ///
    /// `None` lets the source fall back to its first category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport faults or when the category holds no
    /// cards.
    async fn next_card(&self, category: Option<&CategoryName>) -> Result<Card, ApiError>;

    /// Record a seen event for a card. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the event could not be recorded.
    async fn mark_seen(&self, card_id: CardId) -> Result<(), ApiError>;

    /// Check a typed answer against a card.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport faults or when the card is unknown.
    async fn check_answer(&self, card_id: CardId, answer: &str) -> Result<AnswerCheck, ApiError>;

    /// Fetch aggregate stats for a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the source cannot be reached or reports a fault.
    async fn category_stats(
        &self,
        category: Option<&CategoryName>,
    ) -> Result<CategoryStats, ApiError>;
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the card server location from `VOCAB_API_URL`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("VOCAB_API_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }
}

/// Card source backed by the remote card server's JSON API.
#[derive(Clone)]
pub struct HttpCardApi {
    client: Client,
    config: ApiConfig,
}

impl HttpCardApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Map a non-success response to `ApiError`, pulling the message from the
    /// body's `error` field when one is present.
    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(ApiError::from_status(status, body.error))
    }
}

#[async_trait]
impl CardApi for HttpCardApi {
    async fn list_categories(&self) -> Result<Vec<CategoryName>, ApiError> {
        let response = self.client.get(self.url("/api/categories")).send().await?;
        let body: CategoriesResponse = Self::ensure_success(response).await?.json().await?;
        Ok(body.categories)
    }

    async fn next_card(&self, category: Option<&CategoryName>) -> Result<Card, ApiError> {
        debug!(category = ?category.map(CategoryName::as_str), "fetching next card");
        let mut request = self.client.get(self.url("/api/next"));
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }
        let response = request.send().await?;
        let body: CardResponse = Self::ensure_success(response).await?.json().await?;
        Ok(body.into_card())
    }

    async fn mark_seen(&self, card_id: CardId) -> Result<(), ApiError> {
        debug!(%card_id, "marking card seen");
        let response = self
            .client
            .post(self.url("/api/seen"))
            .json(&SeenRequest { card_id })
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn check_answer(&self, card_id: CardId, answer: &str) -> Result<AnswerCheck, ApiError> {
        debug!(%card_id, "checking answer");
        let response = self
            .client
            .post(self.url("/api/check"))
            .json(&CheckRequest { card_id, answer })
            .send()
            .await?;
        let body: CheckResponse = Self::ensure_success(response).await?.json().await?;
        Ok(AnswerCheck {
            is_correct: body.is_correct,
            correct_answer: body.correct_answer,
        })
    }

    async fn category_stats(
        &self,
        category: Option<&CategoryName>,
    ) -> Result<CategoryStats, ApiError> {
        let mut request = self.client.get(self.url("/api/stats"));
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }
        let response = request.send().await?;
        let body: StatsResponse = Self::ensure_success(response).await?.json().await?;
        Ok(CategoryStats {
            unique_seen_in_category: body.unique_seen_in_category,
            total_in_category: body.total_in_category,
        })
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<CategoryName>,
}

/// Card payload as served by the card server; `lt` is the prompt side and
/// `en` the answer side.
#[derive(Debug, Deserialize)]
struct CardResponse {
    id: CardId,
    lt: String,
    en: String,
    #[serde(default)]
    pronunciation: Option<String>,
    seen_count: u32,
}

impl CardResponse {
    fn into_card(self) -> Card {
        Card::new(self.id, self.lt, self.en, self.pronunciation, self.seen_count)
    }
}

#[derive(Debug, Serialize)]
struct SeenRequest {
    card_id: CardId,
}

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    card_id: CardId,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    is_correct: bool,
    correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    unique_seen_in_category: u32,
    total_in_category: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
