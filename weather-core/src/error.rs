//! Error types surfaced by the provider client and device integrations.
//!
//! Storage failures never show up here: the recency list and preferences
//! swallow them and fall back to defaults.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Location not found")]
    NotFound,

    #[error("Provider rejected the API key (status {status})")]
    Unauthorized { status: u16 },

    #[error("Rate limited by the weather provider")]
    RateLimited,

    #[error("Weather service unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            404 => ProviderError::NotFound,
            401 | 403 => ProviderError::Unauthorized { status: status.as_u16() },
            429 => ProviderError::RateLimited,
            s if status.is_server_error() => ProviderError::Unavailable { status: s },
            s => ProviderError::Http { status: s, body: truncate_body(body) },
        }
    }

    /// Message suitable for showing to the user once, as-is.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::NotFound => "City not found. Please check the spelling and try again.",
            ProviderError::Unauthorized { .. } => {
                "The weather provider rejected the request. Check your API key or subscription plan."
            }
            ProviderError::RateLimited => "Too many requests. Please wait a moment and try again.",
            ProviderError::Unavailable { .. } => {
                "The weather service is temporarily unavailable. Please try again later."
            }
            ProviderError::Http { .. } => "The weather service returned an unexpected error.",
            ProviderError::Network(_) => {
                "Could not reach the weather service. Check your internet connection."
            }
            ProviderError::Parse(_) => "The weather service sent data we could not understand.",
            ProviderError::InvalidQuery(_) => "Please enter a city name.",
        }
    }
}

/// Device geolocation failures.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
