//! Error types for the Diabotik skill.

use std::path::PathBuf;

/// Top-level error type for the skill.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A non-new turn arrived for a user the store has never seen.
    #[error("No session for user {user_id}")]
    NotFound { user_id: String },
}

/// Prediction oracle errors.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Failed to load model snapshot from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Invalid model snapshot: {reason}")]
    InvalidModel { reason: String },

    #[error("Invalid feature {name}: {value}")]
    InvalidFeature { name: &'static str, value: f64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the skill.
pub type Result<T> = std::result::Result<T, Error>;
