//! Login token scraping and the login form.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use xfinity_usage_core::Credentials;

use crate::endpoints::{CLIENT_ID, OAUTH_CONTINUE_URL};

/// Hidden input on the force-connect page holding the login token.
static REQ_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input type="hidden" name="reqId" value="(.*?)">"#)
        .expect("reqId pattern is a valid regex")
});

/// Password input that only appears on the login form itself.
const PASSWORD_INPUT_MARKER: &str = r#"name="passwd""#;

/// Extracts the `reqId` login token from the force-connect page.
pub fn extract_req_id(html: &str) -> Option<&str> {
    REQ_ID_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns true if `html` is the login form rather than a post-login page.
///
/// A 200 answer to the login POST that still renders the password field
/// means the credentials were bounced.
///
/// Detection keys only on the `name="passwd"` input. A post-login page that
/// happens to carry that input would fail every refresh with
/// `AuthenticationFailed`, so revisit the marker if the portal markup changes.
pub fn is_login_form(html: &str) -> bool {
    html.contains(PASSWORD_INPUT_MARKER)
}

// ============================================================================
// Login Form
// ============================================================================

/// Form body for the login POST.
///
/// Fields serialize in declaration order. Everything except the credentials
/// and token is a fixed protocol constant.
#[derive(Serialize)]
pub struct LoginForm<'a> {
    user: &'a str,
    passwd: &'a str,
    #[serde(rename = "reqId")]
    req_id: &'a str,
    #[serde(rename = "deviceAuthn")]
    device_authn: &'static str,
    s: &'static str,
    #[serde(rename = "forceAuthn")]
    force_authn: &'static str,
    r: &'static str,
    #[serde(rename = "ipAddrAuthn")]
    ip_addr_authn: &'static str,
    #[serde(rename = "continue")]
    continue_url: &'static str,
    passive: &'static str,
    client_id: &'static str,
    lang: &'static str,
}

impl<'a> LoginForm<'a> {
    /// Builds the form for `credentials` and the scraped token.
    pub fn new(credentials: &'a Credentials, req_id: &'a str) -> Self {
        Self {
            user: credentials.username(),
            passwd: credentials.password().expose(),
            req_id,
            device_authn: "false",
            s: "oauth",
            force_authn: "1",
            r: "comcast.net",
            ip_addr_authn: "false",
            continue_url: OAUTH_CONTINUE_URL,
            passive: "false",
            client_id: CLIENT_ID,
            lang: "en",
        }
    }
}

impl fmt::Debug for LoginForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("user", &self.user)
            .field("passwd", &"********")
            .field("req_id", &self.req_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_req_id() {
        let html = r#"<form><input type="hidden" name="reqId" value="abc123"><input name="user"></form>"#;
        assert_eq!(extract_req_id(html), Some("abc123"));
    }

    #[test]
    fn test_extract_req_id_takes_first_match() {
        let html = concat!(
            r#"<input type="hidden" name="reqId" value="first">"#,
            r#"<input type="hidden" name="reqId" value="second">"#
        );
        assert_eq!(extract_req_id(html), Some("first"));
    }

    #[test]
    fn test_extract_req_id_empty_value() {
        let html = r#"<input type="hidden" name="reqId" value="">"#;
        assert_eq!(extract_req_id(html), Some(""));
    }

    #[test]
    fn test_extract_req_id_missing() {
        assert_eq!(extract_req_id("<html><body>maintenance</body></html>"), None);
        // Attribute order matters, same as the page markup
        assert_eq!(extract_req_id(r#"<input name="reqId" type="hidden" value="x">"#), None);
    }

    #[test]
    fn test_is_login_form() {
        assert!(is_login_form(r#"<input type="password" name="passwd" id="passwd">"#));
        assert!(!is_login_form("<html>Welcome back</html>"));
    }

    #[test]
    fn test_is_login_form_needs_exact_input_name() {
        assert!(!is_login_form(r#"<a href="/reset">Forgot your password?</a>"#));
        assert!(!is_login_form(r#"<input type="hidden" name="passwd_hint" value="">"#));
        assert!(is_login_form(r#"<form><input name="user"><input name="passwd"></form>"#));
    }

    #[test]
    fn test_form_encoding() {
        let creds = Credentials::new("alice", "p@ss word");
        let form = LoginForm::new(&creds, "abc123");
        let encoded = serde_json::to_value(&form).unwrap();

        assert_eq!(encoded["user"], "alice");
        assert_eq!(encoded["passwd"], "p@ss word");
        assert_eq!(encoded["reqId"], "abc123");
        assert_eq!(encoded["deviceAuthn"], "false");
        assert_eq!(encoded["s"], "oauth");
        assert_eq!(encoded["forceAuthn"], "1");
        assert_eq!(encoded["r"], "comcast.net");
        assert_eq!(encoded["ipAddrAuthn"], "false");
        assert_eq!(encoded["continue"], OAUTH_CONTINUE_URL);
        assert_eq!(encoded["passive"], "false");
        assert_eq!(encoded["client_id"], "my-account-web");
        assert_eq!(encoded["lang"], "en");
    }

    #[test]
    fn test_form_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let form = LoginForm::new(&creds, "abc123");
        let debug = format!("{form:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
