/// Lite Player - minimal local music player
use anyhow::Context;
use clap::{Parser, Subcommand};
use lite_audio_desktop::DesktopEngine;
use lite_core::{CatalogSource, CoreError};
use lite_library::{FileScanner, MediaIndex};
use lite_player::{console, run_session, PlayerConfig, SessionExit};
use lite_playback::{engine_channel, PlaybackService, ServiceHost};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PERMISSION_MESSAGE: &str =
    "Please grant read access to the music directory and come back again soon!";
const PERMISSION_EXIT_DELAY: Duration = Duration::from_millis(1500);
const RELEASE_WAIT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "lite-player")]
#[command(about = "Play the music in your local directories", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LITE_CONFIG")]
    config: Option<PathBuf>,

    /// Music directory to scan (repeatable, replaces configured directories)
    #[arg(short, long = "dir", global = true)]
    dirs: Vec<PathBuf>,

    /// Start with shuffle enabled
    #[arg(long, global = true)]
    shuffle: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Interactive player (default)
    Play,
    /// Print the song list and exit
    List,
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PlayerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_overrides(cli.dirs, cli.shuffle);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = cli.command.unwrap_or(Commands::Play);
    if let Commands::Config = command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let scanner = FileScanner::new().follow_links(config.library.follow_links);
    let index = Arc::new(MediaIndex::build(&config.library.directories, &scanner));
    let catalog = match index.load_catalog() {
        Ok(catalog) => catalog,
        Err(CoreError::PermissionDenied(dir)) => {
            tracing::error!("No read access to {}", dir);
            eprintln!("{PERMISSION_MESSAGE}");
            tokio::time::sleep(PERMISSION_EXIT_DELAY).await;
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("loading the song list"),
    };
    tracing::info!("Indexed {} tracks", catalog.len());

    if let Commands::List = command {
        print!("{}", console::render_catalog(&catalog));
        return Ok(());
    }

    let (engine_tx, engine_rx) = engine_channel();
    let engine = DesktopEngine::new(engine_tx).context("opening audio output")?;
    let service = PlaybackService::new(engine, index);
    let handle = ServiceHost::spawn(service, engine_rx);

    let events = handle.subscribe();
    let binding = handle.bind().await.context("binding to playback service")?;
    binding.set_catalog(catalog.clone());
    if config.playback.shuffle {
        binding.toggle_shuffle();
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let exit = run_session(&handle, &binding, &catalog, events, input, &mut stdout).await?;

    match exit {
        // Hard exit: the service gets the shutdown but nothing waits for it
        SessionExit::End => std::process::exit(0),
        SessionExit::InputClosed => {
            binding.unbind();
            let deadline = tokio::time::Instant::now() + RELEASE_WAIT;
            while handle.is_running() && tokio::time::Instant::now() < deadline {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        }
        SessionExit::ServiceStopped => {}
    }

    Ok(())
}
