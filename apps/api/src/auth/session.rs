//! Bearer-token parsing, issuing and expiry checks.

use chrono::{DateTime, Duration, Utc};

use crate::models::user::AuthToken;

/// Outcome of looking a presented token up in a user's token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    /// Matched, but past its expiry. The caller must drop it from the list.
    Expired,
    Unknown,
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// The user id a token claims to belong to: everything before the first dot.
pub fn token_user_id(token: &str) -> Option<i64> {
    let (id, suffix) = token.split_once('.')?;
    if suffix.is_empty() {
        return None;
    }
    id.parse().ok()
}

pub fn issue_token(user_id: i64, suffix: &str, ttl_hours: i64, now: DateTime<Utc>) -> AuthToken {
    AuthToken {
        token: format!("{user_id}.{suffix}"),
        expiry: now + Duration::hours(ttl_hours),
    }
}

/// Linear scan for an exact match; the first match decides.
pub fn check_token(tokens: &[AuthToken], presented: &str, now: DateTime<Utc>) -> TokenStatus {
    match tokens.iter().find(|t| t.token == presented) {
        Some(t) if now <= t.expiry => TokenStatus::Valid,
        Some(_) => TokenStatus::Expired,
        None => TokenStatus::Unknown,
    }
}

/// The token list with every entry equal to `token` removed.
pub fn without_token(tokens: &[AuthToken], token: &str) -> Vec<AuthToken> {
    tokens.iter().filter(|t| t.token != token).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer 4.abc"), Some("4.abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic 4.abc"), None);
        assert_eq!(bearer_token("4.abc"), None);
    }

    #[test]
    fn test_token_user_id() {
        assert_eq!(token_user_id("12.f3a9-uuid"), Some(12));
        assert_eq!(token_user_id("12.ya29.oauth.token"), Some(12));
        assert_eq!(token_user_id("abc.def"), None);
        assert_eq!(token_user_id("12"), None);
        assert_eq!(token_user_id("12."), None);
    }

    #[test]
    fn test_issue_token_embeds_user_id() {
        let token = issue_token(9, "suffix", 24, now());
        assert_eq!(token.token, "9.suffix");
        assert_eq!(token.expiry, now() + Duration::hours(24));
    }

    #[test]
    fn test_check_token_states() {
        let tokens = vec![
            issue_token(1, "live", 1, now()),
            issue_token(1, "stale", -1, now()),
        ];
        assert_eq!(check_token(&tokens, "1.live", now()), TokenStatus::Valid);
        assert_eq!(check_token(&tokens, "1.stale", now()), TokenStatus::Expired);
        assert_eq!(check_token(&tokens, "1.other", now()), TokenStatus::Unknown);
    }

    #[test]
    fn test_token_valid_at_exact_expiry() {
        let tokens = vec![issue_token(1, "edge", 0, now())];
        assert_eq!(check_token(&tokens, "1.edge", now()), TokenStatus::Valid);
    }

    #[test]
    fn test_without_token_keeps_others() {
        let tokens = vec![issue_token(1, "a", 1, now()), issue_token(1, "b", 1, now())];
        let left = without_token(&tokens, "1.a");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].token, "1.b");
    }
}
