/// Username/password pair resolved from a request. Either half may be empty.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CredentialCandidate {
    pub username: String,
    pub password: String,
}

impl CredentialCandidate {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// True when neither half carries anything.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

// never print the password
impl std::fmt::Debug for CredentialCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCandidate")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Userinfo component of a request URL (`user:password@host`), taken verbatim.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Userinfo {
    pub username: String,
    pub password: String,
}

impl Userinfo {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl std::fmt::Debug for Userinfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Userinfo")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
