#![forbid(unsafe_code)]

pub mod model;

pub use model::{Card, CardId, CategoryName, ModeError, StudyMode, StudySession};
