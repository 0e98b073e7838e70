//! API handlers module

pub mod ai;
pub mod graph;
pub mod health;
pub mod search;

use axum::http::{HeaderName, StatusCode};
use scholarnexus_common::errors::{AppError, Result};
use std::str::FromStr;

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
pub const X_SEARCH_TIME: HeaderName = HeaderName::from_static("x-search-time");
pub const X_BUILD_TIME: HeaderName = HeaderName::from_static("x-build-time");
pub const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Answer a bare `OPTIONS` with an empty 200
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Required, non-blank query parameter
pub(crate) fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing(field))
}

/// Parse an optional numeric query parameter; blank counts as absent
pub(crate) fn parse_param<T: FromStr>(value: Option<&str>, field: &str) -> Result<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| AppError::Validation {
            message: format!("{} must be a number", field),
            field: Some(field.to_string()),
        }),
    }
}

/// Millisecond header value
pub(crate) fn millis(ms: u64) -> String {
    format!("{}ms", ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(Some(" attention "), "Query").unwrap(), "attention");
        assert!(required(Some("  "), "Query").is_err());
        assert!(required(None, "Query").is_err());
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param::<u32>(Some("3"), "page").unwrap(), Some(3));
        assert_eq!(parse_param::<u32>(Some(""), "page").unwrap(), None);
        assert_eq!(parse_param::<i32>(None, "yearFrom").unwrap(), None);
        assert!(parse_param::<u32>(Some("three"), "page").is_err());
    }
}
