use anyhow::Result;
use clap::Parser;
use scenario_player::input::load_scenario;
use scenario_player::playback::{PlaybackConfig, PlaybackController, PlaybackStatus};
use scenario_player::sender::HttpSender;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scenario-player")]
#[command(about = "Replay a message scenario against a publish endpoint")]
#[command(version)]
struct Cli {
    /// Scenario JSON file to play
    scenario: PathBuf,

    /// Publish endpoint URL
    #[arg(short, long)]
    url: String,

    /// Delay between columns in milliseconds
    #[arg(long, default_value_t = 750)]
    delay_ms: u64,

    /// Highest column to attempt
    #[arg(long, default_value_t = 20)]
    max_column: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let scenario = load_scenario(&cli.scenario)?;
    info!(
        name = %scenario.name,
        messages = scenario.messages.len(),
        columns = scenario.occupied_columns(),
        "scenario loaded"
    );

    let sender = Arc::new(HttpSender::new(&cli.url)?);
    let controller = PlaybackController::with_config(
        sender,
        PlaybackConfig {
            max_column: cli.max_column,
            inter_column_delay: Duration::from_millis(cli.delay_ms),
        },
    );

    let mut rx = controller.subscribe();
    controller.play(scenario.messages);

    // Follow the run to its terminal state, reporting column progress
    let mut last_completed = 0;
    loop {
        rx.changed().await?;
        let state = rx.borrow_and_update().clone();
        if state.completed_columns > last_completed {
            last_completed = state.completed_columns;
            info!(column = state.completed_columns, "column completed");
        }
        match state.status {
            PlaybackStatus::Idle => {
                info!(
                    sent = state.message_results.len(),
                    "scenario played to completion"
                );
                return Ok(());
            }
            PlaybackStatus::Error => {
                for line in &state.errors {
                    error!("{line}");
                }
                anyhow::bail!("playback halted at column {}", state.current_column);
            }
            _ => {}
        }
    }
}
