use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A session as held by the session store.
///
/// `user_id` is `None` for anonymous sessions created before login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: String, user_id: Option<Uuid>, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + ttl,
            ended_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    #[cfg(test)]
    pub fn end(&mut self, now: DateTime<Utc>) {
        self.ended_at.get_or_insert(now);
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_ended() && !self.is_expired(now)
    }

    pub fn is_bound_to(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// 32 random bytes, URL-safe base64 without padding (43 characters).
pub fn generate_token() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_is_active_until_expiry() {
        let now = Utc::now();
        let session = Session::new("t".into(), None, Duration::seconds(10), now);

        assert!(session.is_active(now));
        assert!(session.is_active(now + Duration::seconds(9)));
        assert!(!session.is_active(now + Duration::seconds(10)));
    }

    #[test]
    fn ending_is_sticky() {
        let now = Utc::now();
        let mut session = Session::new("t".into(), None, Duration::hours(1), now);

        session.end(now);
        session.end(now + Duration::seconds(5));

        assert_eq!(session.ended_at, Some(now));
        assert!(!session.is_active(now));
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();

        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }

    #[test]
    fn ended_at_is_optional_on_the_wire() {
        let now = Utc::now();
        let session = Session::new("t".into(), Some(Uuid::new_v4()), Duration::hours(1), now);

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("ended_at"));

        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
