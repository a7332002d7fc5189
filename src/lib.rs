//! # OAuth Token Server Library
//!
//! Issues and validates short-lived opaque bearer tokens for a password
//! grant. Credentials come from URL userinfo or an `Authorization: Basic`
//! header and are checked against a fixed user registry.
//!
//! Modules:
//! - `config`: YAML service configuration, defaults and validation
//! - `credentials`: credential extraction from URL userinfo and headers
//! - `registry`: static user registry and authentication
//! - `authority`: token issuing, storage, validation and cleanup
//! - `grant`: token request processing, body parsing, response shapes
//! - `server`: axum routes for the token and validation endpoints

pub mod authority;
pub mod config;
pub mod credentials;
pub mod grant;
pub mod observability;
pub mod registry;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::service::ServiceConfig;
pub use crate::grant::processor::GrantProcessor;
