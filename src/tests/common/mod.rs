// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::{json, Value};
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;

use crate::authority::clock::ManualClock;
use crate::authority::token_authority::TokenAuthority;
use crate::config::settings::SettingsConfig;
use crate::config::users::default_users;
use crate::grant::processor::GrantProcessor;
use crate::observability::metrics::get_metrics;
use crate::registry::user_registry::UserRegistry;
use crate::server::server::{router, AppState};

pub const TEST_REALM: &str = "OAuth Token Server";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Full token server on an ephemeral port, default users, simulated clock.
pub struct TestServer {
    pub handle: JoinHandle<()>,
    pub addr: SocketAddr,
    pub clock: ManualClock,
    pub authority: TokenAuthority,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(SettingsConfig::default()).await
    }

    pub async fn start_with(settings: SettingsConfig) -> Self {
        let clock = ManualClock::default();
        let authority = TokenAuthority::new(settings.token.ttl_seconds, Arc::new(clock.clone()))
            .with_refresh_tokens(settings.token.issue_refresh_token);
        let registry = UserRegistry::from_config(&default_users());
        let processor = GrantProcessor::new(registry, authority.clone(), &settings.token.realm);

        let state = AppState::new(get_metrics().await, processor);
        let (handle, addr) = spawn_axum(router(state, &settings)).await;
        Self {
            handle,
            addr,
            clock,
            authority,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
