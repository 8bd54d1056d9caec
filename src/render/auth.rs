//! Render API key handling
//!
//! The key is held in memory for the lifetime of the client and is only ever
//! written into the `Authorization` header. Its formatted forms are redacted.

use std::fmt;

/// Bearer token used to authenticate against the Render API
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw token, for the request header only
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("rnd_supersecret");
        assert_eq!(format!("{:?}", key), "ApiKey(****)");
        assert_eq!(key.to_string(), "****");
        assert!(!format!("{:?}", Some(key.clone())).contains("supersecret"));
        assert_eq!(key.expose(), "rnd_supersecret");
    }

    #[test]
    fn test_blank_key_is_empty() {
        assert!(ApiKey::new("").is_empty());
        assert!(ApiKey::new("   ").is_empty());
        assert!(!ApiKey::new("rnd_x").is_empty());
    }
}
