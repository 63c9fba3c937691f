use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};

/// Every rejection the backend can produce. Rendered as a `text/plain` body
/// with the matching status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Invalid arguments for creating a new user")]
    InvalidUser,

    #[error("Username too short. Min {} characters", MIN_USERNAME_LENGTH)]
    UsernameTooShort,

    #[error("Username too long. Max {} characters", MAX_USERNAME_LENGTH)]
    UsernameTooLong,

    #[error("Password too short. Min {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("Users need to indicate its date of birth.")]
    MissingDateOfBirth,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("The request must include an username and a password.")]
    MissingCredentials,

    #[error("Username not found")]
    UsernameNotFound,

    #[error("Incorrect password for given username")]
    WrongPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Token not valid or not present")]
    InvalidToken,

    #[error("Missing attribute: requested")]
    MissingRequested,

    #[error("Usernames not found")]
    UsernamesNotFound,

    #[error("This user has already sent a friend request")]
    DuplicateFriendRequest,

    #[error("This user hasn't an existing friend request")]
    NoFriendRequest,
}

impl BackendError {
    pub fn status(&self) -> StatusCode {
        match self {
            BackendError::MalformedPayload
            | BackendError::InvalidUser
            | BackendError::UsernameTooShort
            | BackendError::UsernameTooLong
            | BackendError::PasswordTooShort
            | BackendError::MissingDateOfBirth
            | BackendError::MissingCredentials
            | BackendError::MissingRequested => StatusCode::BAD_REQUEST,
            BackendError::WrongPassword | BackendError::InvalidToken => StatusCode::UNAUTHORIZED,
            BackendError::UsernameNotFound
            | BackendError::UserNotFound
            | BackendError::UsernamesNotFound => StatusCode::NOT_FOUND,
            BackendError::UsernameTaken
            | BackendError::DuplicateFriendRequest
            | BackendError::NoFriendRequest => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
