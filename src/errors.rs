use std::string::FromUtf8Error;

/// Errors raised while turning a cookie value back into a visit count store.
///
/// These never reach the page: [`decode`](crate::visits::decode) maps every one
/// of them to an empty store.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cookie value is not valid percent-encoded UTF-8: {0}")]
    PercentDecode(#[from] FromUtf8Error),

    #[error("cookie payload is not a visit count map: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("cookies are disabled for this client")]
    Blocked,

    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("cookie store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cookie name {0:?} is empty or contains separator characters")]
    InvalidCookieName(String),

    #[error("cookie time-to-live must be positive")]
    NonPositiveTtl,

    #[error("cookie path must start with '/': {0:?}")]
    InvalidPath(String),

    #[error("block class must not be empty")]
    EmptyBlockClass,

    #[error("page key {0:?} must be non-empty ASCII alphanumerics or underscores")]
    InvalidPageKey(String),
}

/// Failure of a visit-recording operation.
///
/// Codec and config errors are handled where they arise (an empty store, a
/// builder `Result`), so only cookie failures reach this level.
#[derive(Debug, thiserror::Error)]
pub enum VisitLogicError {
    #[error(transparent)]
    Cookie(#[from] CookieError),
}
