mod backend;
mod chart;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod notices;
mod panel;
mod session;
mod ui;

use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::DEFAULT_MAX_COMMENTS;
use crate::environment::Environment;
use crate::notices::Notice;
use crate::session::headless_mode::HeadlessCommand;
use crate::session::{SessionData, run_headless_mode, run_tui_mode, setup_session};
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the comments dashboard
    Start {
        /// Number of comments to show initially
        #[arg(long, value_name = "N")]
        max_comments: Option<u32>,

        /// Refresh once and print the panel and charts instead of opening the dashboard
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,

        /// Disable the dashboard background color
        #[arg(long = "no-background", action = ArgAction::SetTrue)]
        no_background: bool,
    },
    /// Post a comment as the logged-in user
    Post {
        /// Comment text
        text: String,
    },
    /// Delete one comment
    Delete {
        /// ID of the comment to delete
        #[arg(long, value_name = "ID")]
        id: i64,
    },
    /// Delete every comment, then print the refreshed panel
    DeleteAll,
    /// Print the transient response and residual tables
    Chart,
    /// Save client settings
    Configure {
        /// Backend base URL, e.g. https://folio.example.com
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Number of comments to show initially
        #[arg(long, value_name = "N")]
        max_comments: Option<u32>,

        /// Cookie header of a signed-in browser session, e.g. "SACSID=..."
        #[arg(long, value_name = "COOKIE")]
        session_cookie: Option<String>,
    },
    /// Remove the configuration file
    ClearConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let portfolio_environment_str = std::env::var("PORTFOLIO_ENVIRONMENT").unwrap_or_default();
    let environment = portfolio_environment_str
        .parse::<Environment>()
        .unwrap_or_default();

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            max_comments,
            headless,
            no_background,
        } => {
            let config = load_config(&config_path)?;
            let max_comments = resolve_max_comments(max_comments, &config);
            let session = session_from_config(&config, environment, max_comments)?;
            if headless {
                run_headless_mode(session, HeadlessCommand::Show).await?;
                Ok(())
            } else {
                run_tui_mode(session, !no_background).await
            }
        }
        Command::Post { text } => {
            run_one_shot(HeadlessCommand::Post(text), environment, &config_path).await
        }
        Command::Delete { id } => {
            run_one_shot(HeadlessCommand::Delete(id), environment, &config_path).await
        }
        Command::DeleteAll => {
            run_one_shot(HeadlessCommand::DeleteAll, environment, &config_path).await
        }
        Command::Chart => run_one_shot(HeadlessCommand::Chart, environment, &config_path).await,
        Command::Configure {
            base_url,
            max_comments,
            session_cookie,
        } => {
            if let Some(base_url) = &base_url {
                if base_url.parse::<Environment>().is_err() {
                    Notice::InvalidBaseUrl(base_url.clone()).print();
                    return Err(Box::from(format!("Invalid base URL: {}", base_url)));
                }
            }
            if max_comments == Some(0) {
                return Err(Box::from("--max-comments must be at least 1"));
            }
            // Settings not given on the command line keep their saved value.
            let saved = load_config(&config_path)?;
            let config = Config::new(
                base_url.or(saved.base_url),
                max_comments.or(saved.max_comments),
            )
            .with_session_cookie(session_cookie.or(saved.session_cookie));
            config
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            Notice::ConfigSaved(config_path).print();
            Ok(())
        }
        Command::ClearConfig => {
            Notice::ClearingConfig(config_path.clone()).print();
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Runs a single headless command against the configured backend.
async fn run_one_shot(
    command: HeadlessCommand,
    environment: Environment,
    config_path: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(config_path)?;
    let max_comments = resolve_max_comments(None, &config);
    let session = session_from_config(&config, environment, max_comments)?;
    run_headless_mode(session, command).await?;
    Ok(())
}

/// `PORTFOLIO_SESSION_COOKIE` wins over the saved cookie.
fn session_from_config(
    config: &Config,
    environment: Environment,
    max_comments: u32,
) -> Result<SessionData, Box<dyn Error>> {
    let from_env = std::env::var("PORTFOLIO_SESSION_COOKIE").ok();
    let session_cookie = config.resolve_session_cookie(from_env);
    let session = setup_session(
        config.resolve_environment(environment),
        max_comments,
        session_cookie.as_deref(),
    )?;
    Ok(session)
}

fn load_config(config_path: &std::path::Path) -> Result<Config, Box<dyn Error>> {
    Config::load_or_default(config_path).map_err(|e| {
        Notice::ConfigUnreadable(e.to_string()).print();
        Box::from(format!("Failed to load config: {}", e))
    })
}

/// Command line first, then the config file, then the default.
fn resolve_max_comments(flag: Option<u32>, config: &Config) -> u32 {
    flag.or(config.max_comments)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_COMMENTS)
}
