//! Diabotik — voice-assistant skill webhook.

pub mod config;
pub mod error;
pub mod skill;
