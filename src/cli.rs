//! CLI - command line interface for reelstream
//!
//! The default run is the interactive pipeline; flags override config
//! for one invocation. Exit codes are semantic for scripting.
//!
//! # Examples
//!
//! ```bash
//! # Interactive session with defaults
//! reelstream
//!
//! # Prefer 1080 streams and Arabic captions
//! reelstream -Q 1080 -l ar
//!
//! # Show the resume history and exit
//! reelstream history
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::SessionError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for session outcomes (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success, including benign early ends (no results, no seasons)
    Success = 0,
    /// General error
    Error = 1,
    /// Network error talking to an upstream service
    NetworkError = 3,
    /// Title has no external id, playback impossible
    MissingExternalId = 4,
    /// No streams available
    NoStreams = 5,
    /// No known player for this operating system
    UnsupportedPlatform = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a session error to its exit code. Benign early ends report a
    /// plain message and exit clean.
    pub fn from_error(err: &SessionError) -> Self {
        match err {
            SessionError::UpstreamUnavailable { .. } => ExitCode::NetworkError,
            SessionError::MissingExternalId(_) => ExitCode::MissingExternalId,
            SessionError::NoStreamsAvailable => ExitCode::NoStreams,
            SessionError::UnsupportedPlatform(_) => ExitCode::UnsupportedPlatform,
            SessionError::NoResults(_)
            | SessionError::NoSeasonsFound
            | SessionError::NoEpisodesFound(_)
            | SessionError::Cancelled => ExitCode::Success,
            SessionError::DownloadFailed(_)
            | SessionError::Prompt(_)
            | SessionError::Store(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// reelstream - pick a title, pick a stream, watch it in VLC
#[derive(Parser, Debug)]
#[command(
    name = "reelstream",
    version,
    about = "Terminal picker that resolves movies and shows to playable streams",
    long_about = "Searches for a title, resolves it to stream sources via a local \
                  lookup service, and hands the chosen stream to VLC, optionally \
                  with a downloaded subtitle file.\n\n\
                  Run without arguments for the interactive session.",
    after_help = "EXAMPLES:\n\
                  reelstream                 Interactive session\n\
                  reelstream -Q 1080 -l ar   Prefer 1080 streams, Arabic captions\n\
                  reelstream history         Show resume history"
)]
pub struct Cli {
    /// Quality label listed first in the stream picker
    #[arg(long, short = 'Q')]
    pub quality: Option<String>,

    /// Accepted caption language code (repeatable)
    #[arg(long, short = 'l')]
    pub language: Vec<String>,

    /// Base URL of the stream-lookup service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Media player executable, bypassing OS detection
    #[arg(long)]
    pub player_path: Option<String>,

    /// Progress file location
    #[arg(long)]
    pub progress_file: Option<PathBuf>,

    /// Suppress the startup history listing
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Subcommand to run (omit for the interactive session)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the resume history and exit
    #[command(visible_alias = "h")]
    History,
}

// =============================================================================
// Tests
// =============================================================================
