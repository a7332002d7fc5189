use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::authority::token_authority::TokenAuthority;

/// Periodically drops expired tokens. Validation never depends on it; it only
/// bounds memory. An interval of 0 disables the loop.
pub async fn run_cleanup_loop(authority: TokenAuthority, interval_seconds: u64) -> Result<()> {
    if interval_seconds == 0 {
        info!("expired token cleanup disabled");
        return Ok(());
    }

    info!("expired token cleanup every {} seconds", interval_seconds);
    let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let removed = authority.purge_expired();
        debug!(removed, remaining = authority.len(), "cleanup cycle done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::clock::ManualClock;
    use std::sync::Arc;

    #[tokio::test]
    async fn disabled_loop_returns_immediately() -> Result<()> {
        let authority = TokenAuthority::new(60, Arc::new(ManualClock::default()));
        run_cleanup_loop(authority, 0).await
    }

    #[tokio::test(start_paused = true)]
    async fn loop_purges_expired_tokens() {
        let clock = ManualClock::default();
        let authority = TokenAuthority::new(10, Arc::new(clock.clone()));
        authority.issue("alice");
        clock.advance(chrono::Duration::seconds(11));

        let handle = tokio::spawn(run_cleanup_loop(authority.clone(), 5));
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert!(authority.is_empty());
        handle.abort();
    }
}
