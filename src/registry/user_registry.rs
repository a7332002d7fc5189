use std::collections::HashMap;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::users::UserConfig;

/// A registered user. Immutable for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    password: String,
    /// ordered, duplicates removed
    pub scopes: Vec<String>,
}

impl UserRecord {
    pub fn new(username: &str, password: &str, scopes: &[String]) -> Self {
        let mut ordered: Vec<String> = Vec::with_capacity(scopes.len());
        for scope in scopes {
            if !ordered.contains(scope) {
                ordered.push(scope.to_owned());
            }
        }
        Self {
            username: username.to_owned(),
            password: password.to_owned(),
            scopes: ordered,
        }
    }

    /// Space-joined scope list, as returned in the `scope` response field.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("unknown user")]
    UnknownUser,
    #[error("password mismatch")]
    PasswordMismatch,
}

/// Static username -> record mapping. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    users: Arc<HashMap<String, UserRecord>>,
}

impl UserRegistry {
    pub fn new(records: Vec<UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.username.to_owned(), record))
            .collect::<HashMap<_, _>>();
        Self {
            users: Arc::new(users),
        }
    }

    pub fn from_config(users: &HashMap<String, UserConfig>) -> Self {
        let records = users
            .iter()
            .map(|(username, user)| UserRecord::new(username, &user.password, &user.scopes))
            .collect::<Vec<_>>();
        info!("user registry loaded: {} user(s)", records.len());
        Self::new(records)
    }

    pub fn lookup(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Succeeds iff the user exists and the password matches exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&UserRecord, AuthFailure> {
        let record = self.lookup(username).ok_or_else(|| {
            debug!(username, "authentication failed: unknown user");
            AuthFailure::UnknownUser
        })?;

        if record.password_matches(password) {
            Ok(record)
        } else {
            debug!(username, "authentication failed: password mismatch");
            Err(AuthFailure::PasswordMismatch)
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
