#![forbid(unsafe_code)]

pub mod card_api;
pub mod controller;
pub mod error;
pub mod memory_api;
pub mod view;

pub use card_api::{AnswerCheck, ApiConfig, CardApi, CategoryStats, HttpCardApi};
pub use controller::SessionController;
pub use error::ApiError;
pub use memory_api::{InMemoryCardApi, SeedCard};
pub use view::{CardView, Feedback, StatsView, StudyView};
