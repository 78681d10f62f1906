//! reelstream - pick a title, pick a stream, watch it in VLC
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! reelstream
//!
//! # Prefer 1080 streams and Arabic captions
//! reelstream -Q 1080 -l ar
//!
//! # Show resume history
//! reelstream history
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reelstream::api::{LookupClient, TmdbClient};
use reelstream::captions::CaptionFetcher;
use reelstream::cli::{Cli, Command, ExitCode};
use reelstream::config::Config;
use reelstream::models::ProgressEntry;
use reelstream::player::VlcLauncher;
use reelstream::progress::ProgressStore;
use reelstream::prompt::TermPrompter;
use reelstream::session::{Session, SessionOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let exit_code = run(cli, config).await;
    std::process::exit(exit_code.into());
}

async fn run(cli: Cli, config: Config) -> ExitCode {
    let progress = match &cli.progress_file {
        Some(path) => ProgressStore::with_path(path),
        None => ProgressStore::new(),
    };
    let history = progress.load_all();

    if let Some(Command::History) = cli.command {
        print_history(&history);
        return ExitCode::Success;
    }

    if !cli.quiet {
        print_history(&history);
    }

    let metadata = TmdbClient::new(config.tmdb_api_key());
    let lookup = match cli.endpoint.clone().or_else(|| config.lookup_url.clone()) {
        Some(url) => LookupClient::with_base_url(url),
        None => LookupClient::new(),
    };
    let captions = CaptionFetcher::new();
    let launcher = match cli.player_path.clone().or_else(|| config.player_path.clone()) {
        Some(path) => VlcLauncher::with_command(path),
        None => VlcLauncher::new(),
    };
    let prompter = TermPrompter::new();

    let options = SessionOptions {
        preferred_quality: cli.quality.clone().unwrap_or_else(|| config.preferred_quality()),
        languages: if cli.language.is_empty() {
            config.subtitle_languages()
        } else {
            cli.language.clone()
        },
    };

    let session = Session {
        metadata: &metadata,
        lookup: &lookup,
        captions: &captions,
        progress: &progress,
        prompter: &prompter,
        launcher: &launcher,
        options,
    };

    match session.run().await {
        Ok(played) => {
            println!("Now playing: {}", played.title);
            ExitCode::Success
        }
        Err(err) => {
            if err.is_benign() {
                println!("{}", err);
            } else {
                eprintln!("Error: {}", err);
            }
            ExitCode::from_error(&err)
        }
    }
}

fn print_history(history: &[ProgressEntry]) {
    if history.is_empty() {
        return;
    }

    println!("Latest progress:");
    for entry in history {
        println!(
            "  {}  {}",
            entry.played_at.format("%Y-%m-%d %H:%M:%S"),
            entry
        );
    }
    println!();
}
