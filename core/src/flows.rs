//! User-facing actions, one backend request each.
//!
//! # Design
//! Every flow validates its input, builds a request with `SocialClient`,
//! sends it through the host's `Transport`, and maps the normalized response
//! to an `Outcome`. Presentation (dialogs, printing, page changes) belongs to
//! the host; a flow only says what should happen. Each flow is split into
//! the I/O-performing function and a `complete_*` function that interprets
//! an already-received response, so hosts that execute requests themselves
//! can reuse the interpretation.
//!
//! A status other than 200 is never an error: it becomes
//! `Outcome::Rejected` carrying the status and body verbatim.

use tracing::{debug, info};

use crate::client::SocialClient;
use crate::error::ApiError;
use crate::http::{send, NormalizedResponse, ResponseBody, Transport};
use crate::session::SessionStore;
use crate::types::{Credentials, FriendRequest, LoginResponse, NewUser};

pub const EMPTY_FIELD_MESSAGE: &str = "Fill every input before submitting";
pub const ACCOUNT_CREATED_MESSAGE: &str = "Account successfully created.";
pub const FRIEND_REQUEST_SENT_MESSAGE: &str = "Friend request sent!";
pub const FRIEND_REQUEST_REMOVED_MESSAGE: &str = "Friend request removed.";

/// Pages a flow can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Dashboard,
}

/// What the host should do after a flow finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Navigate(Page),
    /// Show `message`, then move to `then` if set.
    Notify { message: String, then: Option<Page> },
    /// The looked-up user exists; show the confirmation element for them.
    Reveal { username: String },
    /// The backend answered with a non-200 status.
    Rejected { status: u16, body: ResponseBody },
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn require_filled(fields: &[&str]) -> Result<(), ApiError> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ApiError::Validation(EMPTY_FIELD_MESSAGE.to_string()));
    }
    Ok(())
}

fn rejected(response: NormalizedResponse) -> Outcome {
    debug!(status = response.status, "request rejected by backend");
    Outcome::Rejected {
        status: response.status,
        body: response.body,
    }
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

pub fn register<T: Transport + ?Sized>(
    client: &SocialClient,
    transport: &T,
    form: &RegisterForm,
) -> Result<Outcome, ApiError> {
    let input = NewUser {
        username: form.username.trim().to_string(),
        password: form.password.trim().to_string(),
        date_of_birth: form.date_of_birth.trim().to_string(),
    };
    require_filled(&[input.username.as_str(), input.password.as_str(), input.date_of_birth.as_str()])?;

    let request = client.build_register(&input)?;
    let response = send(transport, &request)?;
    Ok(complete_register(response))
}

pub fn complete_register(response: NormalizedResponse) -> Outcome {
    if !response.is_ok() {
        return rejected(response);
    }
    info!("account created");
    Outcome::Notify {
        message: ACCOUNT_CREATED_MESSAGE.to_string(),
        then: Some(Page::Login),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// On success the token is written to `store` before the outcome is
/// returned. On any failure `store` is left untouched.
pub fn login<T: Transport + ?Sized>(
    client: &SocialClient,
    transport: &T,
    store: &mut dyn SessionStore,
    form: &LoginForm,
) -> Result<Outcome, ApiError> {
    let input = Credentials {
        username: form.username.trim().to_string(),
        password: form.password.trim().to_string(),
    };
    require_filled(&[input.username.as_str(), input.password.as_str()])?;

    let request = client.build_login(&input)?;
    let response = send(transport, &request)?;
    complete_login(store, response)
}

pub fn complete_login(
    store: &mut dyn SessionStore,
    response: NormalizedResponse,
) -> Result<Outcome, ApiError> {
    if !response.is_ok() {
        return Ok(rejected(response));
    }

    let token = response
        .body
        .as_json()
        .and_then(|body| serde_json::from_value::<LoginResponse>(body.clone()).ok())
        .map(|login| login.session_token)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingToken)?;

    store.store_token(&token)?;
    info!("session token stored");
    Ok(Outcome::Navigate(Page::Dashboard))
}

// ---------------------------------------------------------------------------
// Search user
// ---------------------------------------------------------------------------

pub fn search_user<T: Transport + ?Sized>(
    client: &SocialClient,
    transport: &T,
    username: &str,
) -> Result<Outcome, ApiError> {
    let username = username.trim();
    require_filled(&[username])?;

    let request = client.build_find_user(username);
    let response = send(transport, &request)?;
    Ok(complete_search_user(username, response))
}

pub fn complete_search_user(username: &str, response: NormalizedResponse) -> Outcome {
    if !response.is_ok() {
        return rejected(response);
    }
    Outcome::Reveal {
        username: username.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Friend requests
// ---------------------------------------------------------------------------

fn friend_request(store: &dyn SessionStore, requested: &str) -> Result<FriendRequest, ApiError> {
    let requested = requested.trim();
    require_filled(&[requested])?;
    let session_token = store.token()?.ok_or(ApiError::NotLoggedIn)?;
    Ok(FriendRequest {
        session_token,
        requested: requested.to_string(),
    })
}

pub fn add_friend<T: Transport + ?Sized>(
    client: &SocialClient,
    transport: &T,
    store: &dyn SessionStore,
    requested: &str,
) -> Result<Outcome, ApiError> {
    let input = friend_request(store, requested)?;
    let request = client.build_send_friend_request(&input)?;
    let response = send(transport, &request)?;
    Ok(complete_add_friend(response))
}

pub fn complete_add_friend(response: NormalizedResponse) -> Outcome {
    if !response.is_ok() {
        return rejected(response);
    }
    Outcome::Notify {
        message: FRIEND_REQUEST_SENT_MESSAGE.to_string(),
        then: Some(Page::Dashboard),
    }
}

pub fn cancel_friend_request<T: Transport + ?Sized>(
    client: &SocialClient,
    transport: &T,
    store: &dyn SessionStore,
    requested: &str,
) -> Result<Outcome, ApiError> {
    let input = friend_request(store, requested)?;
    let request = client.build_cancel_friend_request(&input)?;
    let response = send(transport, &request)?;
    Ok(complete_cancel_friend_request(response))
}

pub fn complete_cancel_friend_request(response: NormalizedResponse) -> Outcome {
    if !response.is_ok() {
        return rejected(response);
    }
    Outcome::Notify {
        message: FRIEND_REQUEST_REMOVED_MESSAGE.to_string(),
        then: Some(Page::Dashboard),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use crate::session::MemorySessionStore;

    /// Replays one canned response and keeps every request it saw.
    struct Scripted {
        status: u16,
        content_type: &'static str,
        body: &'static str,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn json(status: u16, body: &'static str) -> Self {
            Self::with(status, "application/json", body)
        }

        fn text(status: u16, body: &'static str) -> Self {
            Self::with(status, "text/plain; charset=utf-8", body)
        }

        fn with(status: u16, content_type: &'static str, body: &'static str) -> Self {
            Self {
                status,
                content_type,
                body,
                sent: RefCell::new(Vec::new()),
            }
        }

        fn only_request(&self) -> HttpRequest {
            let sent = self.sent.borrow();
            assert_eq!(sent.len(), 1, "expected exactly one request");
            sent[0].clone()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: vec![("Content-Type".to_string(), self.content_type.to_string())],
                body: self.body.to_string(),
            })
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn client() -> SocialClient {
        SocialClient::default()
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_success_stores_token_and_goes_to_dashboard() {
        let transport = Scripted::json(200, r#"{"session_token":"abc123"}"#);
        let mut store = MemorySessionStore::new();

        let outcome = login(&client(), &transport, &mut store, &login_form("alice", "secret")).unwrap();

        assert_eq!(outcome, Outcome::Navigate(Page::Dashboard));
        assert_eq!(store.token().unwrap().as_deref(), Some("abc123"));
        let req = transport.only_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/user/login");
    }

    #[test]
    fn login_failure_surfaces_status_and_body_and_keeps_store() {
        let transport = Scripted::json(401, r#"{"error":"bad credentials"}"#);
        let mut store = MemorySessionStore::new();
        store.store_token("previous").unwrap();

        let outcome = login(&client(), &transport, &mut store, &login_form("alice", "wrong")).unwrap();

        match outcome {
            Outcome::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, ResponseBody::Json(json!({"error": "bad credentials"})));
                assert!(format!("Error {status}\n{body}").contains("bad credentials"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(store.token().unwrap().as_deref(), Some("previous"));
    }

    #[test]
    fn login_trims_fields_before_sending() {
        let transport = Scripted::json(200, r#"{"session_token":"t"}"#);
        let mut store = MemorySessionStore::new();
        login(&client(), &transport, &mut store, &login_form("  alice ", " secret\n")).unwrap();
        assert_eq!(
            transport.only_request().body.as_deref(),
            Some(r#"{"username":"alice","password":"secret"}"#)
        );
    }

    #[test]
    fn login_blank_field_sends_nothing() {
        let transport = Scripted::json(200, "{}");
        let mut store = MemorySessionStore::new();
        let err = login(&client(), &transport, &mut store, &login_form("alice", "   ")).unwrap_err();
        assert_eq!(err, ApiError::Validation(EMPTY_FIELD_MESSAGE.to_string()));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn login_without_token_is_an_error() {
        for transport in [
            Scripted::json(200, r#"{"session-token":"abc"}"#),
            Scripted::json(200, r#"{"session_token":""}"#),
            Scripted::text(200, "abc"),
        ] {
            let mut store = MemorySessionStore::new();
            let err = login(&client(), &transport, &mut store, &login_form("a", "b")).unwrap_err();
            assert_eq!(err, ApiError::MissingToken);
            assert_eq!(store.token().unwrap(), None);
        }
    }

    #[test]
    fn login_transport_failure_propagates() {
        let mut store = MemorySessionStore::new();
        let err = login(&client(), &Unreachable, &mut store, &login_form("a", "b")).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn login_malformed_json_is_parse_error() {
        let transport = Scripted::json(200, "{oops");
        let mut store = MemorySessionStore::new();
        let err = login(&client(), &transport, &mut store, &login_form("a", "b")).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn register_success_notifies_then_goes_to_login() {
        let transport = Scripted::text(200, "Successfully created a new user");
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "password1".to_string(),
            date_of_birth: "1990-05-01".to_string(),
        };

        let outcome = register(&client(), &transport, &form).unwrap();

        assert_eq!(
            outcome,
            Outcome::Notify {
                message: ACCOUNT_CREATED_MESSAGE.to_string(),
                then: Some(Page::Login),
            }
        );
        let body: serde_json::Value =
            serde_json::from_str(transport.only_request().body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"username": "alice", "password": "password1", "dateOfBirth": "1990-05-01"}));
    }

    #[test]
    fn register_conflict_is_rejected_with_text() {
        let transport = Scripted::text(409, "Username is already taken");
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "password1".to_string(),
            date_of_birth: "1990-05-01".to_string(),
        };
        assert_eq!(
            register(&client(), &transport, &form).unwrap(),
            Outcome::Rejected {
                status: 409,
                body: ResponseBody::Text("Username is already taken".to_string()),
            }
        );
    }

    #[test]
    fn register_requires_date_of_birth() {
        let transport = Scripted::text(200, "");
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "password1".to_string(),
            date_of_birth: String::new(),
        };
        assert!(matches!(register(&client(), &transport, &form), Err(ApiError::Validation(_))));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn search_user_reveals_on_success() {
        let transport = Scripted::json(200, r#"{"username":"bob","dateOfBirth":"2000-01-01"}"#);
        let outcome = search_user(&client(), &transport, " bob ").unwrap();
        assert_eq!(outcome, Outcome::Reveal { username: "bob".to_string() });

        let req = transport.only_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/user?username=bob");
        assert!(req.body.is_none());
    }

    #[test]
    fn search_user_not_found_is_rejected() {
        let transport = Scripted::text(404, "User not found");
        let outcome = search_user(&client(), &transport, "ghost").unwrap();
        assert!(matches!(outcome, Outcome::Rejected { status: 404, .. }));
    }

    #[test]
    fn add_friend_sends_exact_body() {
        let transport = Scripted::text(200, "Friend request sent");
        let mut store = MemorySessionStore::new();
        store.store_token("abc123").unwrap();

        let outcome = add_friend(&client(), &transport, &store, "bob").unwrap();

        assert_eq!(
            outcome,
            Outcome::Notify {
                message: FRIEND_REQUEST_SENT_MESSAGE.to_string(),
                then: Some(Page::Dashboard),
            }
        );
        let req = transport.only_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/user/friend");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"session_token":"abc123","requested":"bob"}"#)
        );
    }

    #[test]
    fn add_friend_without_session_sends_nothing() {
        let transport = Scripted::text(200, "");
        let store = MemorySessionStore::new();
        let err = add_friend(&client(), &transport, &store, "bob").unwrap_err();
        assert_eq!(err, ApiError::NotLoggedIn);
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn cancel_friend_request_uses_delete() {
        let transport = Scripted::text(200, "Friend request removed");
        let mut store = MemorySessionStore::new();
        store.store_token("abc123").unwrap();

        let outcome = cancel_friend_request(&client(), &transport, &store, "bob").unwrap();

        assert!(matches!(outcome, Outcome::Notify { then: Some(Page::Dashboard), .. }));
        assert_eq!(transport.only_request().method, HttpMethod::Delete);
    }

    #[test]
    fn cancel_missing_request_is_rejected() {
        let transport = Scripted::text(409, "This user hasn't an existing friend request");
        let mut store = MemorySessionStore::new();
        store.store_token("abc123").unwrap();
        let outcome = cancel_friend_request(&client(), &transport, &store, "bob").unwrap();
        assert!(matches!(outcome, Outcome::Rejected { status: 409, .. }));
    }
}
