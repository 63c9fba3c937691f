//! Wire DTOs for the social backend API.
//!
//! # Design
//! Field names match the backend's JSON exactly (`dateOfBirth` is camelCase,
//! `session_token` is snake_case). The mock-server crate defines its own
//! copies; the integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};

/// Registration payload for `POST /user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,
}

/// Login payload for `POST /user/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub session_token: String,
}

/// Payload for `POST /user/friend` and `DELETE /user/friend`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRequest {
    pub session_token: String,
    pub requested: String,
}

/// Public view of a user as returned by `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,
}
