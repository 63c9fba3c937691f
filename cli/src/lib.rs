//! Command-line host for the social client core.
//!
//! # Design
//! The binary parses arguments into a `Command`, runs the matching flow with
//! a ureq transport and a file-backed session store, and prints the rendered
//! outcome. Everything except argument parsing and printing lives here so the
//! integration tests can drive it against the mock server.

pub mod render;
pub mod transport;

use clap::Subcommand;
use social_core::{
    flows, ApiError, LoginForm, Outcome, Page, RegisterForm, SessionStore, SocialClient, Transport,
};
use tracing::info;

pub use render::{render, render_error, Rendered};
pub use transport::UreqTransport;

pub const DEFAULT_SESSION_FILE: &str = ".social-session.json";
pub const LOGGED_OUT_MESSAGE: &str = "Session cleared.";

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        username: String,
        password: String,
        /// Date of birth as YYYY-MM-DD
        date_of_birth: String,
    },
    /// Log in and store the session token
    Login { username: String, password: String },
    /// Look up a user by name
    Search { username: String },
    /// Send a friend request
    AddFriend { username: String },
    /// Withdraw a pending friend request
    CancelFriend { username: String },
    /// Forget the stored session token
    Logout,
}

pub fn run<T: Transport + ?Sized>(
    command: &Command,
    client: &SocialClient,
    transport: &T,
    store: &mut dyn SessionStore,
) -> Result<Outcome, ApiError> {
    match command {
        Command::Register {
            username,
            password,
            date_of_birth,
        } => {
            let form = RegisterForm {
                username: username.clone(),
                password: password.clone(),
                date_of_birth: date_of_birth.clone(),
            };
            flows::register(client, transport, &form)
        }
        Command::Login { username, password } => {
            let form = LoginForm {
                username: username.clone(),
                password: password.clone(),
            };
            flows::login(client, transport, store, &form)
        }
        Command::Search { username } => flows::search_user(client, transport, username),
        Command::AddFriend { username } => flows::add_friend(client, transport, store, username),
        Command::CancelFriend { username } => {
            flows::cancel_friend_request(client, transport, store, username)
        }
        Command::Logout => {
            store.clear_token()?;
            info!("session token removed");
            Ok(Outcome::Notify {
                message: LOGGED_OUT_MESSAGE.to_string(),
                then: Some(Page::Login),
            })
        }
    }
}
