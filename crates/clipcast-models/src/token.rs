//! OAuth token set for the publishing platform.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// OAuth access/refresh token pair scoped to one user.
///
/// `expires_at` is stored as an RFC 3339 string, matching the persistence
/// row. An absent or unparseable expiry is treated as not expired so a
/// malformed row never triggers spurious refreshes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TokenSet {
    /// Bearer token for API calls
    #[serde(default)]
    pub access_token: String,

    /// Long-lived token used to mint new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// RFC 3339 expiry of the access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl TokenSet {
    /// Parse the expiry timestamp, if present and well-formed.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Whether the access token expires within `margin` of now.
    pub fn is_expiring_within(&self, margin: Duration) -> bool {
        match self.expiry() {
            Some(expiry) => expiry <= Utc::now() + margin,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_expiring_at(expires_at: DateTime<Utc>) -> TokenSet {
        TokenSet {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(expires_at.to_rfc3339()),
        }
    }

    #[test]
    fn test_expired_token_is_expiring() {
        let tokens = tokens_expiring_at(Utc::now() - Duration::minutes(5));
        assert!(tokens.is_expiring_within(Duration::seconds(30)));
    }

    #[test]
    fn test_token_inside_margin_is_expiring() {
        let tokens = tokens_expiring_at(Utc::now() + Duration::seconds(10));
        assert!(tokens.is_expiring_within(Duration::seconds(30)));
    }

    #[test]
    fn test_fresh_token_is_not_expiring() {
        let tokens = tokens_expiring_at(Utc::now() + Duration::hours(1));
        assert!(!tokens.is_expiring_within(Duration::seconds(30)));
    }

    #[test]
    fn test_missing_expiry_is_not_expiring() {
        let tokens = TokenSet {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
        };
        assert!(!tokens.is_expiring_within(Duration::seconds(30)));
    }

    #[test]
    fn test_unparseable_expiry_is_not_expiring() {
        let tokens = TokenSet {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: Some("not-a-timestamp".to_string()),
        };
        assert!(!tokens.is_expiring_within(Duration::seconds(30)));
    }
}
