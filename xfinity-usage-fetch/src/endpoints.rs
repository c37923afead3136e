//! Provider endpoints and fixed login parameters.

use url::Url;

use crate::error::HttpError;

// ============================================================================
// Constants
// ============================================================================

/// Force-connect page that carries the hidden `reqId` login token.
pub const TOKEN_URL: &str = "https://customer.xfinity.com/oauth/force_connect/?continue=%23%2Fdevices";

/// Login form target.
pub const LOGIN_URL: &str = "https://login.xfinity.com/login";

/// Internet usage API.
pub const USAGE_URL: &str = "https://customer.xfinity.com/apis/services/internet/usage";

/// OAuth continuation the login form redirects to after success.
pub const OAUTH_CONTINUE_URL: &str = "https://oauth.xfinity.com/oauth/authorize?client_id=my-account-web&prompt=login&redirect_uri=https%3A%2F%2Fcustomer.xfinity.com%2Foauth%2Fcallback&response_type=code&state=%23%2Fdevices&response=1";

/// OAuth client id of the account web app.
pub const CLIENT_ID: &str = "my-account-web";

// ============================================================================
// Endpoints
// ============================================================================

/// The three URLs a usage fetch talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XfinityEndpoints {
    /// Step 1: login token page.
    pub token_url: String,
    /// Step 2: login form target.
    pub login_url: String,
    /// Step 3: usage JSON.
    pub usage_url: String,
}

impl XfinityEndpoints {
    /// Creates a custom endpoint set.
    pub fn new(
        token_url: impl Into<String>,
        login_url: impl Into<String>,
        usage_url: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            login_url: login_url.into(),
            usage_url: usage_url.into(),
        }
    }

    /// Returns the distinct hosts of all three URLs.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidUrl` if any URL does not parse or has no host.
    pub fn domains(&self) -> Result<Vec<String>, HttpError> {
        let mut domains = Vec::new();
        for url in [&self.token_url, &self.login_url, &self.usage_url] {
            let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))?;
            let host = parsed
                .host_str()
                .ok_or_else(|| HttpError::InvalidUrl(format!("{url}: no host")))?
                .to_string();
            if !domains.contains(&host) {
                domains.push(host);
            }
        }
        Ok(domains)
    }
}

impl Default for XfinityEndpoints {
    fn default() -> Self {
        Self::new(TOKEN_URL, LOGIN_URL, USAGE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_domains() {
        let domains = XfinityEndpoints::default().domains().unwrap();
        assert_eq!(domains, vec!["customer.xfinity.com", "login.xfinity.com"]);
    }

    #[test]
    fn test_invalid_endpoint() {
        let endpoints = XfinityEndpoints::new("not a url", LOGIN_URL, USAGE_URL);
        assert!(matches!(endpoints.domains(), Err(HttpError::InvalidUrl(_))));
    }
}
