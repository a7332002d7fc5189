use chrono::{DateTime, Duration, Utc};

/// Access token held by the authority. `expires_at` is `issued_at + ttl`,
/// saturated at the latest representable instant.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// minted next to the access token when enabled; never stored or redeemable
    pub refresh_token: Option<String>,
}

impl IssuedToken {
    pub fn new(value: String, username: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            username: username.to_owned(),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            refresh_token: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.expires_at - self.issued_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

// token values are bearer credentials: keep them out of logs
impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("username", &self.username)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Outcome of a token lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid {
        username: String,
        expires_at: DateTime<Utc>,
        remaining: Duration,
    },
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Unknown,
    Expired,
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid { .. })
    }

    /// Remaining lifetime rounded down to whole seconds.
    pub fn seconds_remaining(&self) -> Option<u64> {
        match self {
            TokenStatus::Valid { remaining, .. } => Some(remaining.num_seconds().max(0) as u64),
            TokenStatus::Invalid(_) => None,
        }
    }
}
