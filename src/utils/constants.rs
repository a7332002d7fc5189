//! Shared constants and invariants

pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
/// ten years
pub const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_REALM: &str = "OAuth Token Server";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// 32 random bytes, 64 hex chars on the wire
pub const TOKEN_BYTES: usize = 32;

// Routes
pub const TOKEN_PATH: &str = "/oauth/token";
pub const VALIDATE_PATH: &str = "/validate";

// Grant types
pub const GRANT_TYPE_PASSWORD: &str = "password";
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// Authorization schemes
pub const SCHEME_BASIC: &str = "Basic";
pub const SCHEME_BEARER: &str = "Bearer";
