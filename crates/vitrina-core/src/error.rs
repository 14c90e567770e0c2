use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Job;

/// Failure taxonomy surfaced to the batch orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport or HTTP-level failure.
    Network,
    /// Hard 404/410 or a soft error page that succeeded at the transport layer.
    NotFound,
    /// The merged record failed schema/business-rule checks.
    Validation,
    /// A sub-extractor error. Tolerated per field, never fails a job by itself.
    Extraction,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::NotFound => write!(f, "not_found"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Extraction => write!(f, "extraction"),
        }
    }
}

/// Engine-wide error type.
#[derive(Error, Debug, Clone)]
pub enum ScrapeError {
    /// Non-success HTTP status while fetching a page.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request deadline elapsed.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Transport-level connection failure.
    #[error("network error: {0}")]
    Network(String),

    /// Transport succeeded but the rendered page signals the resource is unusable.
    #[error("soft not-found: {0}")]
    SoftNotFound(String),

    /// Merged record failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A field extractor failed.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Out-of-range or malformed configuration, detected at construction.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Map this error to the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::HttpStatus { status, .. } if matches!(status, 404 | 410) => {
                FailureKind::NotFound
            }
            ScrapeError::SoftNotFound(_) => FailureKind::NotFound,
            ScrapeError::HttpStatus { .. } | ScrapeError::Timeout(_) | ScrapeError::Network(_) => {
                FailureKind::Network
            }
            ScrapeError::Validation(_) | ScrapeError::Config(_) => FailureKind::Validation,
            ScrapeError::Extraction(_) => FailureKind::Extraction,
        }
    }

    /// Returns true if this error is transient and worth retrying.
    ///
    /// Network failures retry unless the status says the resource cannot
    /// exist; not-found, validation, and extraction failures are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Timeout(_) | ScrapeError::Network(_) => true,
            ScrapeError::HttpStatus { status, .. } => !matches!(status, 404 | 410),
            _ => false,
        }
    }
}

/// A classified failure for one job attempt, surfaced on terminal failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub kind: FailureKind,
    pub retryable: bool,
    pub message: String,
    pub job: Job,
    /// 1-indexed attempt on which the failure became terminal.
    pub attempt: u32,
}

impl FailureRecord {
    pub fn from_error(err: &ScrapeError, job: &Job, attempt: u32) -> Self {
        Self {
            kind: err.kind(),
            retryable: err.is_retryable(),
            message: err.to_string(),
            job: job.clone(),
            attempt,
        }
    }
}
