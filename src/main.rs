use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scoreboard_client::view::render_board;
use scoreboard_client::{watch, ClientConfig, LiveMirror, ScoreboardClient};
use scoreboard_core::{MatchId, MatchPatch, NewMatch, Role};
use scoreboard_server::{LiveScoreboard, ServerConfig};
use scoreboard_settings::{load_settings_from_path, settings_path, ScoreboardSettings};
use scoreboard_telemetry::{init_telemetry, parse_level, TelemetryConfig};
use tracing::Level;

#[derive(Parser)]
#[command(name = "scoreboard", version, about = "Football live score board over SSE")]
struct Cli {
    /// Settings file (default: ~/.scoreboard/settings.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Listen port for `serve`.
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Server base URL for client commands.
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Client role: `admin` or `user`.
    #[arg(long, global = true)]
    role: Option<Role>,

    /// Shared admin secret, for both `serve` and mutating client commands.
    #[arg(long, global = true)]
    admin_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the score board server.
    Serve,
    /// Follow the live board in the terminal.
    Watch {
        /// Show this match in the detail panel.
        #[arg(long)]
        select: Option<MatchId>,
    },
    /// Print the current matches once.
    List,
    /// Add a match at 0 : 0.
    Create { team1: String, team2: String },
    /// Rename teams or set the score, e.g. `--score "3:1"`.
    Update {
        id: MatchId,
        #[arg(long)]
        team1: Option<String>,
        #[arg(long)]
        team2: Option<String>,
        #[arg(long)]
        score: Option<String>,
    },
    /// Remove a match.
    Delete { id: MatchId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    let serving = matches!(cli.command, Command::Serve);
    let _telemetry = init_telemetry(&telemetry_config(&settings, serving));

    match cli.command {
        Command::Serve => serve(&settings).await,
        Command::Watch { select } => watch_board(&connect(&settings)?, select).await,
        Command::List => {
            let client = connect(&settings)?;
            let matches = client.list().await?;
            let mut mirror = LiveMirror::new();
            mirror.apply_snapshot(matches);
            mirror.set_live(true);
            print!("{}", render_board(&mirror, Role::Admin, client.base_url()));
            Ok(())
        }
        Command::Create { team1, team2 } => {
            let client = connect(&settings)?;
            require_admin(&client)?;
            let created = client.create(&NewMatch::new(team1, team2)).await?;
            println!(
                "Match added. #{} {} {} {}",
                created.id, created.team1, created.score, created.team2
            );
            Ok(())
        }
        Command::Update {
            id,
            team1,
            team2,
            score,
        } => {
            let client = connect(&settings)?;
            require_admin(&client)?;
            let patch = MatchPatch {
                team1,
                team2,
                score,
            };
            let updated = client.update(id, &patch).await?;
            println!("#{} {} {} {}", updated.id, updated.team1, updated.score, updated.team2);
            Ok(())
        }
        Command::Delete { id } => {
            let client = connect(&settings)?;
            require_admin(&client)?;
            client.delete(id).await?;
            println!("Deleted #{id}");
            Ok(())
        }
    }
}

/// Settings file, then environment, then command-line flags.
fn resolve_settings(cli: &Cli) -> anyhow::Result<ScoreboardSettings> {
    let path = cli.config.clone().unwrap_or_else(settings_path);
    let mut settings = load_settings_from_path(&path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;

    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(url) = &cli.server_url {
        settings.client.server_url = url.clone();
    }
    if let Some(role) = cli.role {
        settings.client.role = role;
    }
    if let Some(token) = &cli.admin_token {
        settings.server.admin_token = Some(token.clone());
        settings.client.admin_token = Some(token.clone());
    }
    Ok(settings)
}

/// Client commands stay quiet below warn unless RUST_LOG says otherwise.
fn telemetry_config(settings: &ScoreboardSettings, serving: bool) -> TelemetryConfig {
    let configured = parse_level(&settings.logging.level).unwrap_or(Level::INFO);
    TelemetryConfig {
        log_level: if serving { configured } else { configured.min(Level::WARN) },
        module_levels: Vec::new(),
        json: settings.logging.json,
    }
}

fn connect(settings: &ScoreboardSettings) -> anyhow::Result<ScoreboardClient> {
    ScoreboardClient::new(ClientConfig::from(&settings.client)).context("failed to build HTTP client")
}

fn require_admin(client: &ScoreboardClient) -> anyhow::Result<()> {
    if !client.config().role.is_admin() {
        bail!("this command needs the admin role (--role admin or SCOREBOARD_ROLE=admin)");
    }
    Ok(())
}

async fn serve(settings: &ScoreboardSettings) -> anyhow::Result<()> {
    let config = ServerConfig::from(&settings.server);
    let scoreboard = Arc::new(LiveScoreboard::in_memory(config.subscriber_queue));
    let handle = scoreboard_server::start_with_scoreboard(config, scoreboard)
        .await
        .context("failed to start server")?;

    tracing::info!(port = handle.port, "Score board server ready");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl+c")?;
        }
        () = handle.join() => {
            bail!("server stopped unexpectedly");
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

async fn watch_board(client: &ScoreboardClient, select: Option<MatchId>) -> anyhow::Result<()> {
    let role = client.config().role;
    let url = client.base_url().to_string();
    let redraw = std::io::stdout().is_terminal();

    let mut mirror = LiveMirror::new();
    if let Some(id) = select {
        mirror.select(id);
    }

    let follow = watch(client, &mut mirror, |m| {
        if redraw {
            print!("\x1b[2J\x1b[H");
        }
        println!("{}", render_board(m, role, &url));
    });

    tokio::select! {
        () = follow => Ok(()),
        result = tokio::signal::ctrl_c() => result.context("failed to listen for ctrl+c"),
    }
}
