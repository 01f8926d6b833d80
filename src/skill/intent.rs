//! Keyword intent classification over platform tokens.

use serde::Serialize;

pub const HELP_KEYWORD: &str = "помощь";
pub const APPROVAL_KEYWORD: &str = "да";
pub const REJECTION_KEYWORD: &str = "нет";

/// What the user meant, as far as keyword membership can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Help,
    Approval,
    Rejection,
    Unrecognized,
}

impl Intent {
    /// Classify a token list. First match wins: help, then approval, then
    /// rejection, even when several keywords are present.
    pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Self {
        if contains(tokens, HELP_KEYWORD) {
            Self::Help
        } else if contains(tokens, APPROVAL_KEYWORD) {
            Self::Approval
        } else if contains(tokens, REJECTION_KEYWORD) {
            Self::Rejection
        } else {
            Self::Unrecognized
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Help => "help",
            Self::Approval => "approval",
            Self::Rejection => "rejection",
            Self::Unrecognized => "unrecognized",
        };
        write!(f, "{s}")
    }
}

/// Whether the user said "да" anywhere in the utterance.
pub fn is_approval<S: AsRef<str>>(tokens: &[S]) -> bool {
    contains(tokens, APPROVAL_KEYWORD)
}

fn contains<S: AsRef<str>>(tokens: &[S], keyword: &str) -> bool {
    tokens.iter().any(|t| t.as_ref() == keyword)
}
