//! OAuth2 token storage
//!
//! Tokens are read from JSON files in the token store directory, in the
//! format written by garth / garminconnect. This crate never mints or
//! refreshes tokens; an expired or missing token is an authentication
//! failure surfaced before any fetch.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

const OAUTH2_FILENAME: &str = "oauth2_token.json";

/// OAuth2 bearer token for Connect API requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Token {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub jti: Option<String>,
    pub token_type: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token_expires_at: Option<i64>,
}

impl OAuth2Token {
    /// Format the Authorization header value
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// Check whether the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }

    /// Load the token from the store directory.
    /// Missing file or expired token yields `NotAuthenticated`.
    pub fn load(store_dir: &Path) -> Result<Self> {
        let path = store_dir.join(OAUTH2_FILENAME);
        if !path.exists() {
            return Err(SyncError::NotAuthenticated);
        }

        let json = std::fs::read_to_string(&path)?;
        let token: OAuth2Token = serde_json::from_str(&json)?;

        if token.is_expired() {
            return Err(SyncError::NotAuthenticated);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token(expires_at: i64) -> OAuth2Token {
        OAuth2Token {
            scope: Some("CONNECT_READ".to_string()),
            jti: None,
            token_type: "Bearer".to_string(),
            access_token: "test-access-token".to_string(),
            refresh_token: Some("test-refresh-token".to_string()),
            expires_in: 3600,
            expires_at,
            refresh_token_expires_in: None,
            refresh_token_expires_at: None,
        }
    }

    #[test]
    fn test_authorization_header() {
        let token = sample_token(Utc::now().timestamp() + 3600);
        assert_eq!(token.authorization_header(), "Bearer test-access-token");
    }

    #[test]
    fn test_expiry_detection() {
        assert!(!sample_token(Utc::now().timestamp() + 3600).is_expired());
        assert!(sample_token(Utc::now().timestamp() - 10).is_expired());
    }

    #[test]
    fn test_load_missing_file_is_not_authenticated() {
        let dir = tempfile::tempdir().unwrap();
        let err = OAuth2Token::load(dir.path()).unwrap_err();
        assert!(matches!(err, SyncError::NotAuthenticated));
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let token = sample_token(Utc::now().timestamp() + 3600);
        let json = serde_json::to_string(&token).unwrap();
        std::fs::write(dir.path().join(OAUTH2_FILENAME), json).unwrap();

        let loaded = OAuth2Token::load(dir.path()).unwrap();
        assert_eq!(loaded.access_token, "test-access-token");
    }

    #[test]
    fn test_load_expired_token_is_not_authenticated() {
        let dir = tempfile::tempdir().unwrap();
        let token = sample_token(Utc::now().timestamp() - 10);
        let json = serde_json::to_string(&token).unwrap();
        std::fs::write(dir.path().join(OAUTH2_FILENAME), json).unwrap();

        let err = OAuth2Token::load(dir.path()).unwrap_err();
        assert!(matches!(err, SyncError::NotAuthenticated));
    }
}
