use std::fmt;

/// Username/password pair read from the login form for a single submit.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields present. No other validation happens client-side.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("username", &self.username), ("password", &self.password)]
    }
}

// Keeps the password out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        assert!(Credential::new("alice", "secret").is_complete());
        assert!(!Credential::new("", "secret").is_complete());
        assert!(!Credential::new("alice", "").is_complete());
    }

    #[test]
    fn test_debug_hides_password() {
        let shown = format!("{:?}", Credential::new("alice", "secret"));
        assert!(shown.contains("alice"));
        assert!(!shown.contains("secret"));
    }
}
