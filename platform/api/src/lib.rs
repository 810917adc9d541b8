//! Client for the department/employee REST API.
//!
//! The API is an external collaborator: no auth, no pagination, JSON bodies.
//! Panels talk to it through the [`RecordSource`] and [`RecordStore`] traits so
//! they can be exercised without a network.

mod client;
mod resource;

use std::sync::Arc;

use thiserror::Error;

pub use client::{ApiClient, ClientConfig};
pub use resource::{RecordSource, RecordStore, Resource};

/// Shared client result type.
pub type ApiResult<T> = Result<T, ApiError>;

const MAX_BODY_CHARS: usize = 200;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(Arc<reqwest::Error>),
    #[error("request failed with status code {status}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "TRANSPORT",
            ApiError::Status { .. } => "STATUS",
            ApiError::Decode(_) => "DECODE",
            ApiError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }

    pub fn status(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > MAX_BODY_CHARS {
            let mut cut: String = body.chars().take(MAX_BODY_CHARS).collect();
            cut.push('…');
            cut
        } else {
            body.to_string()
        };
        Self::Status { status, body }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::transport(value)
    }
}
