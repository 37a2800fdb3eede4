//! Access-token cell shared between the HTTP client and the session store.

use std::{
    fmt,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Bearer credential returned by `/auth/login` and `/auth/refresh`.
///
/// The raw string is redacted from `Debug` output and wiped on drop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(**redacted**)")?;
        Ok(())
    }
}

impl Drop for AccessToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Shared holder for the current access token.
///
/// This is the runtime analog of the browser's stored `accessToken`: the
/// client reads it before every request, and a refresh replaces it. The
/// generation counter increments on every replacement or clear, so a caller
/// that saw a request fail with 401 can tell whether some other task already
/// renewed the token while it was waiting its turn to refresh.
#[derive(Debug, Default)]
pub struct TokenCell {
    token: RwLock<Option<AccessToken>>,
    generation: AtomicU64,
}

impl TokenCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns a clone of the current token, if one is held.
    #[must_use]
    pub fn current(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the held token and bumps the generation.
    pub fn set(&self, token: AccessToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Drops the held token and bumps the generation.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_cell_holds_nothing() {
        let cell = TokenCell::new();

        assert!(cell.current().is_none());
        assert!(!cell.is_present());
    }

    #[test]
    fn set_replaces_the_token_and_bumps_the_generation() -> TestResult {
        let cell = TokenCell::with_token(AccessToken::new("first"));
        let before = cell.generation();

        cell.set(AccessToken::new("second"));

        let current = cell.current().ok_or("token should be present")?;
        assert_eq!(current.reveal(), "second");
        assert_eq!(cell.generation(), before + 1);

        Ok(())
    }

    #[test]
    fn clear_drops_the_token_and_bumps_the_generation() {
        let cell = TokenCell::with_token(AccessToken::new("stale"));
        let before = cell.generation();

        cell.clear();

        assert!(cell.current().is_none());
        assert_eq!(cell.generation(), before + 1);
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let token = AccessToken::new("very-secret");

        assert_eq!(format!("{token:?}"), "AccessToken(**redacted**)");
    }
}
