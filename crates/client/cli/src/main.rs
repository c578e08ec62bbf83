//! Terminal driver: plays a scripted encounter and prints the battle log.
mod app;
mod config;
mod presenter;

use anyhow::Result;
use app::{CliApp, Turn};
use config::CliConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config)?;

    let app = CliApp::load(&config).await?;
    println!("=== {} ===", app.scenario().name);
    for line in app.standings() {
        println!("  {line}");
    }
    println!();

    let turns = app.run().await?;

    println!();
    println!("=== result ===");
    for line in app.standings() {
        println!("  {line}");
    }
    for (index, turn) in turns.iter().enumerate() {
        if let Turn::Rejected(err) = turn {
            println!("  action {} was not taken: {}", index + 1, err);
        }
    }

    Ok(())
}

/// Setup logging to stderr and, when a log directory is configured, to a file.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(
    config: &CliConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "combat.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/combat.log", dir.display());
    }

    Ok(guard)
}
