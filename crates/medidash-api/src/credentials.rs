//! # Credential Store
//!
//! The dashboard's cookie jar: access token, refresh token and the locale
//! preference, each with its own expiry.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  name           expiry    set by           cleared by                  │
//! │  ─────────────  ────────  ───────────────  ─────────────────────────── │
//! │  accessToken    7 days    login            logout, any 401 response    │
//! │  refreshToken   30 days   login            logout, any 401 response    │
//! │  NEXT_LOCALE    1 year    locale switcher  never                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cloning shares the same jar. An expired cookie reads as absent.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";
pub const LOCALE: &str = "NEXT_LOCALE";

const ACCESS_TOKEN_DAYS: i64 = 7;
const REFRESH_TOKEN_DAYS: i64 = 30;
const LOCALE_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Persistable copy of the jar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSnapshot(pub HashMap<String, Cookie>);

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    cookies: Arc<RwLock<HashMap<String, Cookie>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CredentialSnapshot) -> Self {
        CredentialStore {
            cookies: Arc::new(RwLock::new(snapshot.0)),
        }
    }

    /// Live cookies only.
    pub fn snapshot(&self) -> CredentialSnapshot {
        let now = Utc::now();
        let cookies = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        CredentialSnapshot(
            cookies
                .iter()
                .filter(|(_, c)| c.is_live(now))
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
        )
    }

    fn set(&self, name: &str, value: String, lifetime: Duration, now: DateTime<Utc>) {
        let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        cookies.insert(
            name.to_string(),
            Cookie {
                value,
                expires_at: now + lifetime,
            },
        );
    }

    fn get(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        let cookies = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        cookies
            .get(name)
            .filter(|c| c.is_live(now))
            .map(|c| c.value.clone())
    }

    /// Stores both tokens as issued at login.
    pub fn set_tokens(&self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        self.set_tokens_at(access_token, refresh_token, Utc::now());
    }

    pub fn set_tokens_at(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.set(ACCESS_TOKEN, access_token.into(), Duration::days(ACCESS_TOKEN_DAYS), now);
        self.set(REFRESH_TOKEN, refresh_token.into(), Duration::days(REFRESH_TOKEN_DAYS), now);
        debug!("Stored access and refresh tokens");
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token_at(Utc::now())
    }

    pub fn access_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.get(ACCESS_TOKEN, now)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN, Utc::now())
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// Drops both tokens. The locale preference survives.
    pub fn clear(&self) {
        let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        cookies.remove(ACCESS_TOKEN);
        cookies.remove(REFRESH_TOKEN);
        debug!("Cleared stored credentials");
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        self.set(LOCALE, locale.into(), Duration::days(LOCALE_DAYS), Utc::now());
    }

    pub fn locale(&self) -> Option<String> {
        self.get(LOCALE, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiries() {
        let store = CredentialStore::new();
        let issued = Utc::now();
        store.set_tokens_at("acc", "ref", issued);

        assert_eq!(store.access_token_at(issued + Duration::days(6)), Some("acc".into()));
        assert_eq!(store.access_token_at(issued + Duration::days(7)), None);
        assert_eq!(store.get(REFRESH_TOKEN, issued + Duration::days(29)), Some("ref".into()));
        assert_eq!(store.get(REFRESH_TOKEN, issued + Duration::days(30)), None);
    }

    #[test]
    fn test_clear_keeps_locale_and_clones_share_jar() {
        let store = CredentialStore::new();
        let shared = store.clone();
        store.set_tokens("acc", "ref");
        store.set_locale("ar");
        assert!(shared.has_access_token());

        shared.clear();
        assert!(!store.has_access_token());
        assert!(store.refresh_token().is_none());
        assert_eq!(store.locale(), Some("ar".into()));
    }

    #[test]
    fn test_snapshot_skips_expired_cookies() {
        let store = CredentialStore::new();
        store.set_tokens_at("old", "ref", Utc::now() - Duration::days(8));
        store.set_locale("en");

        let snapshot = store.snapshot();
        assert!(!snapshot.0.contains_key(ACCESS_TOKEN));
        assert!(snapshot.0.contains_key(REFRESH_TOKEN));

        let restored = CredentialStore::from_snapshot(snapshot);
        assert_eq!(restored.locale(), Some("en".into()));
        assert!(restored.access_token().is_none());
    }
}
