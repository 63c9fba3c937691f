//! Error type for the social client core.
//!
//! # Design
//! A non-200 status is not an error: it comes back as a normal response and
//! callers branch on it. `ApiError` covers only what prevents a usable
//! response from being produced, plus input rejected before any request.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained (DNS failure, refused connection, reset).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response declared a JSON content type but the body did not parse.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The session store could not be read or written.
    #[error("session store: {0}")]
    Session(String),

    /// A form field was empty; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The flow needs a session token and none is stored.
    #[error("not logged in: no session token stored")]
    NotLoggedIn,

    /// Login succeeded but the response carried no `session_token`.
    #[error("login response did not include a session token")]
    MissingToken,
}
