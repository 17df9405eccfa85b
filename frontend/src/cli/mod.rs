//! Command-line front end driving the booking, link and admin flows.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::{
    api::ApiClient,
    config::RuntimeConfig,
    state::{
        notifications::{NotificationLevel, Notifications},
        session::SessionStore,
    },
};

pub mod admin;
pub mod auth;
pub mod public;

pub const LOGIN_HINT: &str =
    "Admin session missing or expired. Run `barbershop login --username <name>` first.";

#[derive(Debug, Parser)]
#[command(name = "barbershop", version, about = "Barbershop booking client", long_about = None)]
pub struct Cli {
    /// JSON config file (defaults to ./config.json when present)
    #[arg(short, long, env = "BARBERSHOP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List barbers and their services
    Barbers,
    /// Show available times for a barber on a day
    Slots(public::SlotsArgs),
    /// Book an appointment
    Book(public::BookArgs),
    /// Confirm an appointment from its email link token
    Confirm { token: String },
    /// Show a cancellation link's appointment; cancels it with --yes
    Cancel {
        token: String,
        #[arg(long)]
        yes: bool,
    },
    /// Start an admin session
    Login(auth::LoginArgs),
    /// Forget the stored admin session
    Logout,
    /// Admin dashboard and management
    #[command(subcommand)]
    Admin(admin::AdminCommand),
}

/// Everything a command needs, built once from the runtime config.
#[derive(Debug, Clone)]
pub struct Context {
    pub api: ApiClient,
    pub config: RuntimeConfig,
}

impl Context {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let session = SessionStore::file_backed(config.session_path.clone());
        let api = ApiClient::new(&config, session)?;
        Ok(Self { api, config })
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = RuntimeConfig::load(cli.config.as_deref())?;
    log::debug!("Using API at {}", config.api_base_url);
    let ctx = Context::new(config)?;

    match cli.command {
        Command::Barbers => public::barbers(&ctx).await,
        Command::Slots(args) => public::slots(&ctx, args).await,
        Command::Book(args) => public::book(&ctx, args).await,
        Command::Confirm { token } => public::confirm(&ctx, &token).await,
        Command::Cancel { token, yes } => public::cancel(&ctx, &token, yes).await,
        Command::Login(args) => auth::login(&ctx, args).await,
        Command::Logout => auth::logout(&ctx),
        Command::Admin(command) => admin::run(&ctx, command).await,
    }
}

/// Prints queued success and info messages. Errors travel back to `main`
/// as the command's result and are reported there.
pub(crate) fn flush(notifications: &mut Notifications) {
    for note in notifications.drain() {
        match note.level {
            NotificationLevel::Error => log::debug!("{}", note.message),
            _ => println!("{}", note.message),
        }
    }
}
