//! Turns flow outcomes into terminal output.

use social_core::{ApiError, Outcome, Page};

/// Lines to print and whether the command counts as a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub success: bool,
}

fn page_name(page: Page) -> &'static str {
    match page {
        Page::Login => "login",
        Page::Dashboard => "dashboard",
    }
}

pub fn render(outcome: &Outcome) -> Rendered {
    match outcome {
        Outcome::Navigate(page) => Rendered {
            lines: vec![format!("-> {}", page_name(*page))],
            success: true,
        },
        Outcome::Notify { message, then } => {
            let mut lines = vec![message.clone()];
            if let Some(page) = then {
                lines.push(format!("-> {}", page_name(*page)));
            }
            Rendered {
                lines,
                success: true,
            }
        }
        Outcome::Reveal { username } => Rendered {
            lines: vec![format!("Found user: {username}")],
            success: true,
        },
        Outcome::Rejected { status, body } => Rendered {
            lines: vec![format!("Error {status}"), body.to_string()],
            success: false,
        },
    }
}

/// Message for errors raised before or instead of a backend answer.
pub fn render_error(err: &ApiError) -> String {
    match err {
        ApiError::Transport(_) => format!("Could not reach the server: {err}"),
        ApiError::NotLoggedIn => "You are not logged in. Run `social login` first.".to_string(),
        other => other.to_string(),
    }
}
