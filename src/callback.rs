//! One-shot processing of the login callback.
//!
//! Mirrors the original callback page: read the query parameters, stash the
//! access token, tell the user how it went, move the browser on. Storage,
//! notification, and navigation are injected so the branch logic runs without
//! a browser.

use thiserror::Error;
use tracing::debug;

use crate::params::{self, DecodeError};
use crate::store::StoreError;

/// Query parameter carrying the token issued by the server.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";
/// Storage key the token is persisted under.
pub const STORAGE_KEY: &str = "accessToken";
/// Where the browser goes after a successful login.
pub const HOME_PATH: &str = "/";
/// Where the browser goes when no token arrived.
pub const LOGIN_PATH: &str = "/member/login";

pub const SUCCESS_MESSAGE: &str = "네이버 로그인이 성공했습니다.";
pub const FAILURE_MESSAGE: &str = "토큰 정보를 받아오지 못했습니다. 다시 로그인해주세요.";

/// Persistent key/value storage for the access token.
pub trait TokenStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Moves the browser to a new path. Called exactly once per completed run.
pub trait Navigator {
    fn go_to(&mut self, path: &str);
}

/// Presents an acknowledgment message to the user. Called exactly once per
/// completed run.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("malformed query encoding: {0}")]
    Decode(#[from] DecodeError),

    #[error("token storage failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Token stored, user sent to the application root.
    LoggedIn,
    /// No usable token in the query, user sent back to the login page.
    MissingToken,
}

/// Runs the callback branch once over an incoming query string.
pub struct CallbackProcessor<'a> {
    store: &'a dyn TokenStore,
    notifier: &'a mut dyn Notifier,
    navigator: &'a mut dyn Navigator,
}

impl<'a> CallbackProcessor<'a> {
    pub fn new(
        store: &'a dyn TokenStore,
        notifier: &'a mut dyn Notifier,
        navigator: &'a mut dyn Navigator,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
        }
    }

    /// Process the raw query substring of the callback URL.
    ///
    /// A decode failure or a rejected store write aborts the run before any
    /// acknowledgment or navigation happens. An absent or empty
    /// `access_token` is not an error: it takes the failure acknowledgment
    /// and the login redirect.
    pub fn process(self, query: &str) -> Result<CallbackOutcome, CallbackError> {
        let params = params::parse_query(query)?;
        debug!(
            params = %serde_json::to_string(&params).unwrap_or_default(),
            "callback parameters"
        );

        match params.get(ACCESS_TOKEN_PARAM).filter(|t| !t.is_empty()) {
            Some(token) => {
                self.store.set(STORAGE_KEY, token)?;
                self.notifier.notify(SUCCESS_MESSAGE);
                self.navigator.go_to(HOME_PATH);
                Ok(CallbackOutcome::LoggedIn)
            }
            None => {
                self.notifier.notify(FAILURE_MESSAGE);
                self.navigator.go_to(LOGIN_PATH);
                Ok(CallbackOutcome::MissingToken)
            }
        }
    }
}
