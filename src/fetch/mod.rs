//! Retrieval of public status pages from the status API.

mod http;

pub use http::*;

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Fetch error types.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Status page not found")]
    NotFound,
    #[error("Failed to fetch status page: {0}")]
    RequestFailed(String),
    #[error("malformed status page payload: {0}")]
    MalformedPayload(String),
    #[error("invalid status page key: {0:?}")]
    InvalidKey(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Text safe to show on the public page.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NotFound | FetchError::RequestFailed(_) => self.to_string(),
            FetchError::InvalidKey(_) => "Status page not found".to_string(),
            FetchError::MalformedPayload(_) => {
                "The status service returned data that could not be read".to_string()
            }
            FetchError::Network(_) | FetchError::Timeout(_) => {
                "The status service could not be reached".to_string()
            }
        }
    }
}

/// Check that `key` is safe to place in a request path.
pub fn validate_key(key: &str) -> Result<(), FetchError> {
    static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = KEY_PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,62}$").unwrap());

    if pattern.is_match(key) {
        Ok(())
    } else {
        Err(FetchError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("status").is_ok());
        assert!(validate_key("acme-prod_2").is_ok());
        assert!(validate_key("A1").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("-acme").is_err());
        assert!(validate_key("../admin").is_err());
        assert!(validate_key("acme/secret").is_err());
        assert!(validate_key("acme?x=1").is_err());
        assert!(validate_key(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(FetchError::NotFound.user_message(), "Status page not found");
        assert_eq!(
            FetchError::RequestFailed("Bad Gateway".to_string()).user_message(),
            "Failed to fetch status page: Bad Gateway"
        );
        assert_eq!(
            FetchError::InvalidKey("../x".to_string()).user_message(),
            "Status page not found"
        );
        assert!(!FetchError::Network("connection refused 10.0.0.1".to_string())
            .user_message()
            .contains("10.0.0.1"));
    }
}
