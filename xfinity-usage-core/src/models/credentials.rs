//! Login credentials.
//!
//! The password lives in a [`Secret`], which has no `Serialize` impl and
//! redacts itself in `Debug` and `Display`. The only way to read it is
//! [`Secret::expose`].

use std::fmt;

/// Placeholder printed instead of a secret value.
const REDACTED: &str = "********";

// ============================================================================
// Secret
// ============================================================================

/// A string value that must not end up in logs or on disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// Call sites should hand the value straight to the request that needs it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Account credentials for the provider's login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: Secret,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the account username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password holder.
    pub fn password(&self) -> &Secret {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let creds = Credentials::new("alice@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_display_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(secret.to_string(), REDACTED);
        assert_eq!(secret.expose(), "hunter2");
    }
}
