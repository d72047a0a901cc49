//! Cruscotto - terminal dashboard for the school portal agenda.
//!
//! Talks to the portal backend with an existing session cookie, shows the
//! agenda one week at a time and lets the user browse day by day or week by
//! week, prefetching neighbouring weeks in the background.

mod config;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use serde_json::Value;
use settimana::{
    decode_grades, group_by_subject, AgendaCache, AgendaError, AgendaFetcher, AuthFailureHandler,
    Dashboard, EdgePolicy, Endpoint, HttpTransport, SessionFlag, TransportError, WeekController,
};

#[derive(Parser)]
#[command(name = "cruscotto")]
#[command(about = "Terminal dashboard for the school portal agenda")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Maximum number of weeks kept in memory (0 = unlimited)
    #[arg(long, default_value_t = 12, global = true)]
    cache_capacity: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the agenda for one week
    Agenda {
        /// Weeks away from the current one (negative = past)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },

    /// Browse the agenda interactively (n = next, p = previous, w <px> = resize, q = quit)
    Browse {
        /// Simulated viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Only change week when every day fits on screen
        #[arg(long)]
        confined: bool,
    },

    /// Print the grades, grouped by subject
    Voti,

    /// Print today's lessons
    Lezioni,

    /// Print the student card
    Card,

    /// Manage the local login flag
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Verify the session cookie against the backend and mark the session as logged in
    Login,
    /// Clear the login flag
    Logout,
    /// Show whether the session is marked as logged in
    Status,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = Config::from_env().context("Failed to load configuration")?;
    let session = Arc::new(
        SessionFlag::load(&config.state_dir).context("Failed to load session flag")?,
    );
    let transport = Arc::new(HttpTransport::new(&config.backend_url, &config.session_id));
    info!(backend = %config.backend_url, "Using backend");

    match cli.command {
        Commands::Session { action } => session_command(action, &transport, &session).await,
        Commands::Agenda { offset } => {
            require_login(&session)?;
            let controller = week_controller(&transport, &session, cli.cache_capacity);
            agenda_command(&controller, offset).await
        }
        Commands::Browse { width, confined } => {
            require_login(&session)?;
            let controller = week_controller(&transport, &session, cli.cache_capacity);
            let policy = if confined {
                EdgePolicy::Confined
            } else {
                EdgePolicy::CrossAtEdge
            };
            browse_command(controller, width, policy).await
        }
        Commands::Voti => voti_command(&transport, &session).await,
        Commands::Lezioni => {
            endpoint_command(&transport, &session, Endpoint::LezioniOggi, "lezioni_oggi").await
        }
        Commands::Card => endpoint_command(&transport, &session, Endpoint::Card, "card").await,
    }
}

fn require_login(session: &SessionFlag) -> Result<()> {
    if !session.is_logged_in() {
        bail!("Not logged in: sign in on the portal, then run `cruscotto session login`");
    }
    Ok(())
}

fn week_controller(
    transport: &Arc<HttpTransport>,
    session: &Arc<SessionFlag>,
    cache_capacity: usize,
) -> Arc<WeekController> {
    let fetcher = AgendaFetcher::new(
        transport.clone(),
        AgendaCache::bounded(cache_capacity).shared(),
        session.clone(),
    );
    Arc::new(WeekController::new(fetcher))
}

/// Turn an agenda failure into a user-facing error.
fn agenda_failure(e: AgendaError) -> anyhow::Error {
    if e.is_auth() {
        anyhow::anyhow!("Session expired, log in again: {}", e)
    } else {
        anyhow::Error::new(e).context("Failed to load agenda")
    }
}

async fn agenda_command(controller: &WeekController, offset: i64) -> Result<()> {
    let view = controller.load_week(offset).await.map_err(agenda_failure)?;

    println!("{}", render::week_header(&view.interval, view.offset));
    print!("{}", render::day_columns(&view.slots()));

    controller.wait_for_prefetches().await;
    Ok(())
}

/// A line typed at the browse prompt.
#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    Resize(u32),
    Quit,
}

fn parse_browse_command(line: &str) -> Option<BrowseCommand> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "n" | "next" | ">" => Some(BrowseCommand::Next),
        "p" | "prev" | "<" => Some(BrowseCommand::Prev),
        "w" | "width" => parts.next()?.parse().ok().map(BrowseCommand::Resize),
        "q" | "quit" => Some(BrowseCommand::Quit),
        _ => None,
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    if let Some(week) = dashboard.week() {
        println!("{}", render::week_header(&week.interval, week.offset));
        println!(
            "{}",
            render::carousel_position(&dashboard.state(), dashboard.slots().len())
        );
    }
    print!("{}", render::day_columns(dashboard.visible_slots()));
}

async fn browse_command(
    controller: Arc<WeekController>,
    width: u32,
    policy: EdgePolicy,
) -> Result<()> {
    let mut dashboard = Dashboard::new(controller.clone(), width, policy);
    dashboard.open().await.map_err(agenda_failure)?;
    print_dashboard(&dashboard);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match parse_browse_command(&line) {
            Some(BrowseCommand::Next) => dashboard.next().await.map(|_| ()),
            Some(BrowseCommand::Prev) => dashboard.prev().await.map(|_| ()),
            Some(BrowseCommand::Resize(width)) => {
                dashboard.resize(width);
                Ok(())
            }
            Some(BrowseCommand::Quit) => break,
            None => {
                println!("n = avanti, p = indietro, w <px> = larghezza, q = esci");
                continue;
            }
        };

        match outcome {
            Ok(()) => print_dashboard(&dashboard),
            Err(AgendaError::Superseded { .. }) => {}
            Err(e) if e.is_auth() => return Err(agenda_failure(e)),
            Err(e) => error!(error = %e, "Navigation failed"),
        }
    }

    controller.wait_for_prefetches().await;
    Ok(())
}

/// POST to a backend endpoint, clearing the login flag when the session is rejected.
async fn fetch_endpoint(
    transport: &HttpTransport,
    session: &SessionFlag,
    endpoint: Endpoint,
) -> Result<Value> {
    require_login(session)?;
    match transport.post_endpoint::<()>(endpoint, None).await {
        Ok(body) => Ok(body),
        Err(TransportError::Status(status)) => {
            session.on_auth_failure(status);
            bail!("Session expired, log in again (HTTP {})", status)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to fetch {}", endpoint.path())),
    }
}

async fn endpoint_command(
    transport: &HttpTransport,
    session: &SessionFlag,
    endpoint: Endpoint,
    field: &str,
) -> Result<()> {
    let body = fetch_endpoint(transport, session, endpoint).await?;
    println!("{}", render::envelope_field(&body, field));
    Ok(())
}

async fn voti_command(transport: &HttpTransport, session: &SessionFlag) -> Result<()> {
    let body = fetch_endpoint(transport, session, Endpoint::Voti).await?;
    let grades = decode_grades(&body).context("Unexpected grades payload")?;
    info!(count = grades.len(), "Fetched grades");
    print!("{}", render::grade_list(&group_by_subject(grades)));
    Ok(())
}

async fn session_command(
    action: SessionAction,
    transport: &HttpTransport,
    session: &SessionFlag,
) -> Result<()> {
    match action {
        SessionAction::Login => match transport.post_endpoint::<()>(Endpoint::Card, None).await {
            Ok(_) => {
                session.mark_logged_in()?;
                println!("Session OK");
                Ok(())
            }
            Err(TransportError::Status(status)) => {
                session.on_auth_failure(status);
                bail!("Backend rejected the session cookie (HTTP {})", status)
            }
            Err(e) => Err(e).context("Backend unreachable"),
        },
        SessionAction::Logout => {
            session.clear()?;
            println!("Logged out");
            Ok(())
        }
        SessionAction::Status => {
            let status = if session.is_logged_in() {
                "logged in"
            } else {
                "logged out"
            };
            println!("{} ({})", status, session.path().display());
            Ok(())
        }
    }
}
