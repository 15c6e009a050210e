//! # Navigation Guard
//!
//! Decides, before a page renders, whether a navigation proceeds or is
//! redirected. Pure: the caller supplies the cookies and session facts.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RouteRequest { path, locale_cookie, has_access_token, setup_complete } │
//! │                                  │                                      │
//! │          ┌───────────────────────┼───────────────────────────┐          │
//! │          ▼                       ▼                           ▼          │
//! │   no token and path        token and path             token, setup      │
//! │   is protected             is the login page          known incomplete  │
//! │          │                       │                    and protected     │
//! │          ▼                       ▼                           ▼          │
//! │   /{locale}/login         /{locale}/dashboard        /{locale}/setup    │
//! │                                                                         │
//! │   anything else ──► Proceed                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locale resolution: the `NEXT_LOCALE` cookie if supported, else the first
//! path segment if supported, else the default locale.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Substrings that mark a path as requiring an access token.
pub const PROTECTED_SEGMENTS: &[&str] = &["dashboard", "pharmacy", "patients"];

/// Locales the dashboard is translated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePolicy {
    pub supported: Vec<String>,
    pub default: String,
}

impl Default for LocalePolicy {
    fn default() -> Self {
        LocalePolicy {
            supported: vec!["en".to_string(), "ar".to_string()],
            default: "en".to_string(),
        }
    }
}

impl LocalePolicy {
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.iter().any(|l| l == locale)
    }

    /// Cookie first, then path prefix, then the default.
    pub fn resolve(&self, cookie: Option<&str>, path: &str) -> String {
        if let Some(locale) = cookie.map(str::trim).filter(|l| self.is_supported(l)) {
            return locale.to_string();
        }
        if let Some(prefix) = first_segment(path).filter(|s| self.is_supported(s)) {
            return prefix.to_string();
        }
        self.default.clone()
    }
}

/// Facts about one navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub path: String,
    #[serde(default)]
    pub locale_cookie: Option<String>,
    pub has_access_token: bool,
    /// `None` until the session has been checked.
    #[serde(default)]
    pub setup_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "action", content = "location", rename_all = "camelCase")]
pub enum RouteDecision {
    Proceed,
    Redirect(String),
}

fn first_segment(path: &str) -> Option<&str> {
    path.split('/').find(|s| !s.is_empty())
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    strip_query(path).split('/').filter(|s| !s.is_empty())
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Plain substring match on the path without its query, so
/// `/en/pharmacy-orders` is protected too.
pub fn is_protected(path: &str) -> bool {
    let path = strip_query(path);
    PROTECTED_SEGMENTS.iter().any(|s| path.contains(s))
}

pub fn is_login(path: &str) -> bool {
    segments(path).any(|s| s == "login")
}

fn is_setup(path: &str) -> bool {
    segments(path).any(|s| s == "setup")
}

/// Runs the guard for one navigation.
pub fn guard(request: &RouteRequest, locales: &LocalePolicy) -> RouteDecision {
    let locale = locales.resolve(request.locale_cookie.as_deref(), &request.path);
    let path = request.path.as_str();

    if !request.has_access_token {
        if is_protected(path) {
            return RouteDecision::Redirect(format!("/{locale}/login"));
        }
        return RouteDecision::Proceed;
    }

    if is_login(path) {
        return RouteDecision::Redirect(format!("/{locale}/dashboard"));
    }

    if request.setup_complete == Some(false) && is_protected(path) && !is_setup(path) {
        return RouteDecision::Redirect(format!("/{locale}/setup"));
    }

    RouteDecision::Proceed
}
