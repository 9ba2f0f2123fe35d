use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeError {
    #[error("unknown study mode: {0}")]
    Unknown(String),
}

//
// ─── STUDY MODE ───────────────────────────────────────────────────────────────
//

/// The two mutually exclusive study modes.
///
/// - `Learn`: self-paced reveal of the answer.
/// - `Test`: typed-answer check against the card source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudyMode {
    #[default]
    Learn,
    Test,
}

impl StudyMode {
    #[must_use]
    pub fn is_test(self) -> bool {
        matches!(self, Self::Test)
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Learn => write!(f, "learn"),
            Self::Test => write!(f, "test"),
        }
    }
}

impl FromStr for StudyMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learn" => Ok(Self::Learn),
            "test" => Ok(Self::Test),
            other => Err(ModeError::Unknown(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
