//! Client core for the social backend API.
//!
//! # Overview
//! Builds requests for the user, login, lookup and friend-request endpoints,
//! normalizes responses into a `{status, body}` shape (parsed JSON or raw
//! text, chosen by content type), and runs the user-facing flows on top of
//! that. Network I/O is delegated to a host-supplied `Transport`.
//!
//! # Design
//! - `SocialClient` is stateless; it holds only `base_url`.
//! - The session token lives in a `SessionStore` that the host passes into
//!   every flow that needs it.
//! - Flows return an `Outcome` describing what the host should show or where
//!   it should go; non-200 statuses are outcomes, not errors.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod flows;
pub mod http;
pub mod session;
pub mod types;

pub use client::{SocialClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use flows::{LoginForm, Outcome, Page, RegisterForm};
pub use http::{
    build_request, normalize, normalize_response, send, HttpMethod, HttpRequest, HttpResponse,
    NormalizedResponse, ResponseBody, Transport,
};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_TOKEN_KEY};
pub use types::{Credentials, FriendRequest, LoginResponse, NewUser, UserProfile};
