//! Where the client sends its requests.
//!
//! The server is usually reached through a reverse proxy that mounts it under
//! `/api`; the endpoint paths themselves are always unprefixed. The prefix is
//! therefore part of the base URL and nowhere else.

use crate::error::ClientError;

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const API_URL_ENV: &str = "PANTRY_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Build a config from an explicit base URL. Trailing slashes are dropped.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read the base URL from `PANTRY_API_URL`, falling back to
    /// [`DEFAULT_API_URL`] when unset or empty.
    pub fn from_env() -> Result<Self, ClientError> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/inventory`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_normalized() {
        let a = ClientConfig::new("http://localhost:8080/api/").unwrap();
        let b = ClientConfig::new("http://localhost:8080/api").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.url("/inventory"), "http://localhost:8080/api/inventory");
    }

    #[test]
    fn test_unprefixed_base() {
        let c = ClientConfig::new("https://pantry.example.org").unwrap();
        assert_eq!(c.url("/settings"), "https://pantry.example.org/settings");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.org"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_default_is_valid() {
        let d = ClientConfig::default();
        assert_eq!(ClientConfig::new(DEFAULT_API_URL).unwrap(), d);
    }
}
