//! Errors surfaced to users of the planner
//!
//! Provider failures are normally absorbed where they happen, so these are
//! only raised for rejected requests, unknown sessions, missing keys and the
//! few calls whose failure the user has to see.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// A required key or setting is missing or invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A provider call the user asked for directly failed
    #[error("API error: {message}")]
    Api { message: String },

    /// The trip form was rejected
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Unknown or expired session, or a day outside the itinerary
    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl PlannerError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Text shown in the page; form problems carry the ❌ marker
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Validation { message } => format!("❌ {message}"),
            PlannerError::Config { message }
            | PlannerError::Api { message }
            | PlannerError::NotFound { message } => message.clone(),
        }
    }
}
