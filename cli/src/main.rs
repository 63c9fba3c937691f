use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use social_cli::{render, render_error, run, Command, UreqTransport, DEFAULT_SESSION_FILE};
use social_core::{FileSessionStore, SocialClient, DEFAULT_BASE_URL};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "social", version, about = "Client for the social backend API")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "SOCIAL_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// File the session token is kept in
    #[arg(long, env = "SOCIAL_SESSION_FILE", default_value = DEFAULT_SESSION_FILE, global = true)]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<ExitCode> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(base_url = %cli.base_url, session_file = %cli.session_file.display(), "starting");

    let client = SocialClient::new(&cli.base_url);
    let transport = UreqTransport::new();
    let mut store = FileSessionStore::new(&cli.session_file);

    match run(&cli.command, &client, &transport, &mut store) {
        Ok(outcome) => {
            let rendered = render(&outcome);
            for line in &rendered.lines {
                println!("{line}");
            }
            Ok(if rendered.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err @ social_core::ApiError::Session(_)) => {
            Err(err).with_context(|| format!("session file {}", cli.session_file.display()))
        }
        Err(err) => {
            eprintln!("{}", render_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}
