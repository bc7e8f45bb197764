//! Interactive todo board.
//!
//! Reads commands from stdin and prints the rendered list to stdout whenever
//! it changes. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use todoboard::command::{self, Command, HELP};
use todoboard::directory::mocks::StaticDirectory;
use todoboard::{AppConfig, HttpUserDirectory, TodoApp, UserDirectory};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "todoboard")]
#[command(about = "Todo list with per-item user assignment")]
#[command(version)]
struct Cli {
    /// User directory endpoint (overrides TODOBOARD_DIRECTORY_URL)
    #[arg(long, value_name = "URL")]
    directory_url: Option<String>,

    /// Use a built-in user directory instead of fetching one
    #[arg(long)]
    offline: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(url) = cli.directory_url.as_deref() {
        config = config
            .with_directory_url(url)
            .context("invalid --directory-url")?;
    }

    // Initialize tracing; RUST_LOG wins over TODOBOARD_LOG
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let directory: Arc<dyn UserDirectory> = if cli.offline {
        tracing::info!("Using built-in user directory");
        Arc::new(StaticDirectory::sample())
    } else {
        tracing::info!(endpoint = %config.directory_url, "Using remote user directory");
        Arc::new(HttpUserDirectory::new(config.directory_url.clone()))
    };

    let mut app = TodoApp::new(directory);
    app.mount().await?;

    let mut directory_revisions = app.list_view().directory_revisions();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut shown = app.render().await;
    println!("{HELP}\n\n{shown}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };

                match command::parse_line(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Events(events)) => {
                        for event in events {
                            if let Err(error) = app.handle(event).await {
                                eprintln!("error: {error}");
                            }
                        }
                    },
                    Err(error) => eprintln!("{error}"),
                }
            },
            Ok(()) = directory_revisions.changed() => {},
        }

        let frame = app.render().await;
        if frame != shown {
            println!("{frame}");
            shown = frame;
        }
    }

    app.store()
        .shutdown(Some(Duration::from_secs(1)))
        .await
        .context("todo store did not shut down cleanly")?;

    Ok(())
}
