//! Fetch stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three HTTP calls that make up a usage fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    /// GET the force-connect page and scrape the login token.
    Token,
    /// POST the credentials to the login form.
    Login,
    /// GET the usage JSON.
    Usage,
}

impl FetchStage {
    /// Returns all stages in the order they run.
    pub fn all() -> &'static [FetchStage] {
        &[Self::Token, Self::Login, Self::Usage]
    }

    /// Returns the lowercase stage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Login => "login",
            Self::Usage => "usage",
        }
    }
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
