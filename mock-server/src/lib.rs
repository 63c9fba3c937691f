use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub mod config;
pub mod error;

pub use error::BackendError;

pub const MIN_USERNAME_LENGTH: usize = 5;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub session_token: String,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(rename = "dateOfBirth", default)]
    pub date_of_birth: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct FriendPayload {
    pub session_token: Option<String>,
    pub requested: Option<String>,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

struct StoredUser {
    password: String,
    date_of_birth: NaiveDate,
}

#[derive(Default)]
pub struct Backend {
    users: BTreeMap<String, StoredUser>,
    sessions: HashMap<String, String>,
    friend_requests: HashSet<(String, String)>,
}

impl Backend {
    fn profile(&self, username: &str) -> Option<UserProfile> {
        self.users.get(username).map(|user| UserProfile {
            username: username.to_string(),
            date_of_birth: user.date_of_birth,
        })
    }

    /// Resolve a token to its user, then check both parties exist.
    fn friend_pair(&self, payload: FriendPayload) -> Result<(String, String), BackendError> {
        let requester = payload
            .session_token
            .and_then(|token| self.sessions.get(&token).cloned())
            .ok_or(BackendError::InvalidToken)?;
        let requested = payload.requested.ok_or(BackendError::MissingRequested)?;
        if !self.users.contains_key(&requester) || !self.users.contains_key(&requested) {
            return Err(BackendError::UsernamesNotFound);
        }
        Ok((requester, requested))
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/user", get(find_users).post(create_user))
        .route("/user/login", post(login))
        .route(
            "/user/friend",
            post(send_friend_request).delete(remove_friend_request),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_user(
    State(db): State<Db>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, &'static str), BackendError> {
    let Json(input) = payload.map_err(|e| {
        warn!("rejected registration payload: {e}");
        BackendError::InvalidUser
    })?;

    let length = input.username.chars().count();
    if length < MIN_USERNAME_LENGTH {
        return Err(BackendError::UsernameTooShort);
    }
    if length > MAX_USERNAME_LENGTH {
        return Err(BackendError::UsernameTooLong);
    }
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BackendError::PasswordTooShort);
    }
    let raw_date = input
        .date_of_birth
        .filter(|d| !d.trim().is_empty())
        .ok_or(BackendError::MissingDateOfBirth)?;
    let date_of_birth = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
        .map_err(|_| BackendError::InvalidUser)?;

    let mut backend = db.write().await;
    if backend.users.contains_key(&input.username) {
        return Err(BackendError::UsernameTaken);
    }
    backend.users.insert(
        input.username.clone(),
        StoredUser {
            password: input.password,
            date_of_birth,
        },
    );
    info!(username = %input.username, "user created");
    Ok((StatusCode::OK, "Successfully created a new user"))
}

async fn login(
    State(db): State<Db>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, BackendError> {
    let Json(input) = payload.map_err(|_| BackendError::MalformedPayload)?;
    let (Some(username), Some(password)) = (input.username, input.password) else {
        return Err(BackendError::MissingCredentials);
    };

    let mut backend = db.write().await;
    let user = backend
        .users
        .get(&username)
        .ok_or(BackendError::UsernameNotFound)?;
    if user.password != password {
        warn!(%username, "wrong password");
        return Err(BackendError::WrongPassword);
    }

    let token = Uuid::new_v4().to_string();
    backend.sessions.insert(token.clone(), username.clone());
    info!(%username, "session issued");
    Ok(Json(LoginResponse {
        session_token: token,
    }))
}

async fn find_users(
    State(db): State<Db>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, BackendError> {
    let backend = db.read().await;
    match query.username {
        Some(username) => {
            let profile = backend.profile(&username).ok_or(BackendError::UserNotFound)?;
            Ok(Json(profile).into_response())
        }
        None => {
            let all: Vec<UserProfile> = backend
                .users
                .keys()
                .filter_map(|name| backend.profile(name))
                .collect();
            Ok(Json(all).into_response())
        }
    }
}

async fn send_friend_request(
    State(db): State<Db>,
    payload: Result<Json<FriendPayload>, JsonRejection>,
) -> Result<(StatusCode, &'static str), BackendError> {
    let Json(input) = payload.map_err(|_| BackendError::MalformedPayload)?;
    let mut backend = db.write().await;
    let (requester, requested) = backend.friend_pair(input)?;
    if !backend
        .friend_requests
        .insert((requester.clone(), requested.clone()))
    {
        return Err(BackendError::DuplicateFriendRequest);
    }
    info!(%requester, %requested, "friend request sent");
    Ok((StatusCode::OK, "Friend request sent"))
}

async fn remove_friend_request(
    State(db): State<Db>,
    payload: Result<Json<FriendPayload>, JsonRejection>,
) -> Result<(StatusCode, &'static str), BackendError> {
    let Json(input) = payload.map_err(|_| BackendError::MalformedPayload)?;
    let mut backend = db.write().await;
    let pair = backend.friend_pair(input)?;
    if !backend.friend_requests.remove(&pair) {
        return Err(BackendError::NoFriendRequest);
    }
    info!(requester = %pair.0, requested = %pair.1, "friend request removed");
    Ok((StatusCode::OK, "Friend request removed"))
}
