//! Session authentication
//!
//! Logging in is out of scope: a session is an opaque cookie obtained
//! elsewhere and handed in through configuration.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use reqwest::header::COOKIE;
use reqwest::RequestBuilder;

/// Marker Goodreads embeds in review-list pages rendered for a signed-in user
const SIGNED_IN_MARKER: &str = ":signed_in'";

/// Session credentials for Goodreads requests
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    cookie: Option<String>,
}

impl AuthState {
    /// No session; requests are made signed out
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Use the given session cookie; an empty cookie means anonymous
    pub fn with_cookie(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into().none_if_empty(),
        }
    }

    /// Build from an optional cookie value
    pub fn from_cookie(cookie: Option<String>) -> Self {
        Self {
            cookie: cookie.none_if_empty(),
        }
    }

    /// Check if requests carry a session
    pub fn is_authenticated(&self) -> bool {
        self.cookie.is_some()
    }

    /// Apply the session to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => req.header(COOKIE, cookie.as_str()),
            None => req,
        }
    }

    /// Fail if an authenticated request came back as the signed-out page
    pub fn verify_signed_in(&self, html: &str) -> Result<()> {
        if self.is_authenticated() && !html.contains(SIGNED_IN_MARKER) {
            return Err(Error::auth(
                "session cookie was rejected, page rendered signed out",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_by_default() {
        assert!(!AuthState::default().is_authenticated());
        assert!(!AuthState::with_cookie("").is_authenticated());
        assert!(!AuthState::from_cookie(None).is_authenticated());
        assert!(AuthState::with_cookie("session=abc").is_authenticated());
    }

    #[test]
    fn test_debug_hides_cookie() {
        let auth = AuthState::with_cookie("session=very-secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_verify_signed_in() {
        let signed_in = "<script>window.ue.tag('review:list:signed_in', ue.main_scope);</script>";
        let signed_out = "<script>window.ue.tag('review:list:signed_out', ue.main_scope);</script>";

        let auth = AuthState::with_cookie("session=abc");
        assert!(auth.verify_signed_in(signed_in).is_ok());
        assert!(matches!(
            auth.verify_signed_in(signed_out),
            Err(Error::Auth { .. })
        ));

        // Anonymous sessions never need the marker
        assert!(AuthState::anonymous().verify_signed_in(signed_out).is_ok());
    }
}
