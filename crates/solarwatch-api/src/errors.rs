// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolarWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Error types for the data access layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("unexpected media type: expected {expected}, got {actual}")]
    UnexpectedMediaType { expected: String, actual: String },

    #[error("installation not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("catalog error: {0}")]
    CatalogError(String),

    #[error("invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Transport-class failures that the provider replaces with locally generated data.
    ///
    /// `NotFound` is a statement about the identifier, not about the backend, so it
    /// is never recovered. Configuration and catalog errors are programming errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_)
                | Self::ApiStatus { .. }
                | Self::MalformedResponse { .. }
                | Self::UnexpectedMediaType { .. }
                | Self::Io(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Reports are addressed by calendar month `1..=12`
pub fn validate_month(month: u32) -> ApiResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ApiError::InvalidMonth(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(
            ApiError::ApiStatus {
                status: 503,
                message: String::new()
            }
            .is_recoverable()
        );
        assert!(
            ApiError::MalformedResponse {
                endpoint: "/api/clients".to_string(),
                reason: "expected array".to_string()
            }
            .is_recoverable()
        );
        assert!(!ApiError::NotFound("inst-404".to_string()).is_recoverable());
        assert!(!ApiError::ConfigError("bad".to_string()).is_recoverable());
        assert!(ApiError::NotFound("x".to_string()).is_not_found());
        assert!(!ApiError::InvalidMonth(13).is_recoverable());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(matches!(validate_month(0), Err(ApiError::InvalidMonth(0))));
        assert!(matches!(validate_month(13), Err(ApiError::InvalidMonth(13))));
    }
}
