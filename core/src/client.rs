//! Request builders for the social backend endpoints.
//!
//! # Design
//! `SocialClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint has a `build_*` method producing an
//! `HttpRequest`; executing it and interpreting the response is left to the
//! caller (see `flows`), which keeps this layer deterministic and free of
//! I/O.

use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{build_request, HttpMethod, HttpRequest};
use crate::types::{Credentials, FriendRequest, NewUser};

/// Backend address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct SocialClient {
    base_url: String,
}

impl Default for SocialClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SocialClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /user`
    pub fn build_register(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/user", input)
    }

    /// `POST /user/login`
    pub fn build_login(&self, input: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/user/login", input)
    }

    /// `GET /user?username=<u>`
    pub fn build_find_user(&self, username: &str) -> HttpRequest {
        let encoded: String = form_urlencoded::byte_serialize(username.as_bytes()).collect();
        build_request(
            &format!("{}/user?username={encoded}", self.base_url),
            HttpMethod::Get,
            None,
        )
    }

    /// `GET /user`
    pub fn build_list_users(&self) -> HttpRequest {
        build_request(&format!("{}/user", self.base_url), HttpMethod::Get, None)
    }

    /// `POST /user/friend`
    pub fn build_send_friend_request(&self, input: &FriendRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/user/friend", input)
    }

    /// `DELETE /user/friend`
    pub fn build_cancel_friend_request(
        &self,
        input: &FriendRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Delete, "/user/friend", input)
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(build_request(
            &format!("{}{path}", self.base_url),
            method,
            Some(body),
        ))
    }
}
