use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use rand::RngCore;
use tracing::{debug, info};

use crate::authority::clock::{Clock, SystemClock};
use crate::authority::token::{InvalidReason, IssuedToken, TokenStatus};
use crate::config::settings::TokenConfig;
use crate::observability::metrics::Metrics;
use crate::utils::constants::{MAX_TOKEN_TTL_SECONDS, TOKEN_BYTES};

/// Issues opaque bearer tokens and answers validation lookups.
///
/// The authority is the only owner of the token store. Clones share the same
/// store, so one instance is built at start-up and handed to every request
/// task. Issue and validate are in-memory and never suspend.
#[derive(Clone)]
pub struct TokenAuthority {
    ttl: Duration,
    issue_refresh_token: bool,
    clock: Arc<dyn Clock>,
    store: Arc<DashMap<String, IssuedToken>>,
    metrics: Option<Arc<Metrics>>,
}

impl TokenAuthority {
    /// `ttl_seconds` is clamped to `1..=MAX_TOKEN_TTL_SECONDS`; the config
    /// validator rejects values outside that range.
    pub fn new(ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        let ttl_seconds = ttl_seconds.clamp(1, MAX_TOKEN_TTL_SECONDS) as i64;
        Self {
            ttl: Duration::seconds(ttl_seconds),
            issue_refresh_token: false,
            clock,
            store: Arc::new(DashMap::new()),
            metrics: None,
        }
    }

    pub fn from_config(token_config: &TokenConfig) -> Self {
        Self::new(token_config.ttl_seconds, Arc::new(SystemClock))
            .with_refresh_tokens(token_config.issue_refresh_token)
    }

    pub fn with_refresh_tokens(mut self, enabled: bool) -> Self {
        self.issue_refresh_token = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.num_seconds() as u64
    }

    /// Mints a new token for `username` and stores it.
    ///
    /// Randomness comes from the thread-local CSPRNG, which aborts the process
    /// if the OS entropy source is unusable.
    pub fn issue(&self, username: &str) -> IssuedToken {
        let mut token = IssuedToken::new(generate_token_value(), username, self.clock.now(), self.ttl);
        if self.issue_refresh_token {
            token.refresh_token = Some(generate_token_value());
        }

        self.store.insert(token.value.to_owned(), token.clone());
        info!(username, expires_at = %token.expires_at, "access token issued");

        if let Some(metrics) = &self.metrics {
            metrics.tokens_issued.inc();
            metrics.active_tokens.set(self.store.len() as i64);
        }
        token
    }

    /// Looks the token up without touching the store.
    pub fn validate(&self, value: &str) -> TokenStatus {
        let now = self.clock.now();
        let status = match self.store.get(value) {
            None => TokenStatus::Invalid(InvalidReason::Unknown),
            Some(entry) if entry.is_expired_at(now) => TokenStatus::Invalid(InvalidReason::Expired),
            Some(entry) => TokenStatus::Valid {
                username: entry.username.to_owned(),
                expires_at: entry.expires_at,
                remaining: entry.remaining_at(now),
            },
        };
        debug!(?status, "token validated");
        status
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.store.len();
        self.store.retain(|_, token| !token.is_expired_at(now));
        let removed = before.saturating_sub(self.store.len());

        if removed > 0 {
            info!("purged {} expired token(s)", removed);
        }
        if let Some(metrics) = &self.metrics {
            metrics.expired_tokens_purged.inc_by(removed as u64);
            metrics.active_tokens.set(self.store.len() as i64);
        }
        removed
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::clock::ManualClock;
    use std::collections::HashSet;

    fn authority_with_clock(ttl_seconds: u64) -> (TokenAuthority, ManualClock) {
        let clock = ManualClock::default();
        let authority = TokenAuthority::new(ttl_seconds, Arc::new(clock.clone()));
        (authority, clock)
    }

    #[test]
    fn issued_token_is_valid_for_its_user() {
        let (authority, _clock) = authority_with_clock(3600);
        let token = authority.issue("alice");

        assert_eq!(token.value.len(), TOKEN_BYTES * 2);
        assert!(token.value.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.ttl(), Duration::seconds(3600));
        assert!(token.refresh_token.is_none());

        match authority.validate(&token.value) {
            TokenStatus::Valid { username, expires_at, .. } => {
                assert_eq!(username, "alice");
                assert_eq!(expires_at, token.expires_at);
            }
            other => panic!("expected valid token, got {:?}", other),
        }
    }

    #[test]
    fn remaining_time_never_exceeds_ttl_and_decreases() {
        let (authority, clock) = authority_with_clock(3600);
        let token = authority.issue("alice");

        let first = authority.validate(&token.value);
        assert!(first.seconds_remaining().unwrap() <= 3600);

        clock.advance(Duration::milliseconds(1));
        let second = authority.validate(&token.value);

        let remaining = |status: &TokenStatus| match status {
            TokenStatus::Valid { remaining, .. } => *remaining,
            TokenStatus::Invalid(_) => panic!("token should still be valid"),
        };
        assert!(remaining(&second) < remaining(&first));
        assert_eq!(second.seconds_remaining(), Some(3599));
    }

    #[test]
    fn token_expires_exactly_at_ttl() {
        let (authority, clock) = authority_with_clock(60);
        let token = authority.issue("bob");

        clock.advance(Duration::seconds(59));
        assert_eq!(authority.validate(&token.value).seconds_remaining(), Some(1));

        clock.advance(Duration::seconds(1));
        assert_eq!(
            authority.validate(&token.value),
            TokenStatus::Invalid(InvalidReason::Expired)
        );
    }

    #[test]
    fn token_is_invalid_one_second_past_expiry() {
        let (authority, clock) = authority_with_clock(3600);
        let token = authority.issue("alice");

        clock.advance(Duration::seconds(3600 + 1));
        assert!(!authority.validate(&token.value).is_valid());
        // lookup alone keeps the entry
        assert_eq!(authority.len(), 1);
    }

    #[test]
    fn unknown_token_is_invalid() {
        let (authority, _clock) = authority_with_clock(3600);
        assert_eq!(
            authority.validate("never-issued"),
            TokenStatus::Invalid(InvalidReason::Unknown)
        );
        assert!(authority.is_empty());
    }

    #[test]
    fn successive_tokens_never_collide() {
        let (authority, _clock) = authority_with_clock(3600);
        let values = (0..1000)
            .map(|_| authority.issue("alice").value)
            .collect::<HashSet<_>>();
        assert_eq!(values.len(), 1000);
        assert_eq!(authority.len(), 1000);
    }

    #[test]
    fn refresh_token_is_minted_but_not_stored() {
        let (authority, _clock) = authority_with_clock(3600);
        let authority = authority.with_refresh_tokens(true);
        let token = authority.issue("bob");

        let refresh = token.refresh_token.clone().unwrap();
        assert_ne!(refresh, token.value);
        assert!(!authority.validate(&refresh).is_valid());
        assert_eq!(authority.len(), 1);
    }

    #[test]
    fn purge_removes_only_expired_tokens() {
        let (authority, clock) = authority_with_clock(10);
        let old = authority.issue("alice");
        clock.advance(Duration::seconds(5));
        let fresh = authority.issue("bob");

        clock.advance(Duration::seconds(5));
        assert_eq!(authority.purge_expired(), 1);
        assert_eq!(authority.len(), 1);
        assert_eq!(
            authority.validate(&old.value),
            TokenStatus::Invalid(InvalidReason::Unknown)
        );
        assert!(authority.validate(&fresh.value).is_valid());
    }

    #[test]
    fn zero_ttl_is_clamped_to_one_second() {
        let (authority, _clock) = authority_with_clock(0);
        assert_eq!(authority.ttl_seconds(), 1);
        let token = authority.issue("alice");
        assert!(authority.validate(&token.value).is_valid());
    }

    #[test]
    fn oversized_ttl_is_capped() {
        let (authority, _clock) = authority_with_clock(10_000_000_000_000);
        assert_eq!(authority.ttl_seconds(), MAX_TOKEN_TTL_SECONDS);

        let token = authority.issue("alice");
        assert_eq!(token.ttl(), Duration::seconds(MAX_TOKEN_TTL_SECONDS as i64));
        assert!(authority.validate(&token.value).is_valid());
    }

    #[test]
    fn concurrent_issue_and_validate_share_one_store() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;
        let (authority, _clock) = authority_with_clock(3600);

        let values = std::thread::scope(|scope| {
            let workers = (0..THREADS)
                .map(|i| {
                    let authority = authority.clone();
                    scope.spawn(move || {
                        let username = format!("user-{}", i);
                        (0..PER_THREAD)
                            .map(|_| {
                                let token = authority.issue(&username);
                                match authority.validate(&token.value) {
                                    TokenStatus::Valid { username: owner, .. } => {
                                        assert_eq!(owner, username)
                                    }
                                    other => panic!("token not visible after issue: {:?}", other),
                                }
                                token.value
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect::<Vec<_>>()
        });

        let distinct = values.iter().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), THREADS * PER_THREAD);
        assert_eq!(authority.len(), THREADS * PER_THREAD);
        assert!(values.iter().all(|value| authority.validate(value).is_valid()));
    }

    #[test]
    fn clones_share_the_store() {
        let (authority, _clock) = authority_with_clock(3600);
        let handle = authority.clone();
        let token = handle.issue("alice");
        assert!(authority.validate(&token.value).is_valid());
    }

    #[test]
    fn debug_output_hides_token_value() {
        let (authority, _clock) = authority_with_clock(3600);
        let token = authority.issue("alice");
        assert!(!format!("{:?}", token).contains(&token.value));
    }
}
