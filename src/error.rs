//! Session error taxonomy
//!
//! One enum for every way a playback session can stop short. The
//! orchestrator reports each variant with a plain message and the CLI
//! maps it to a semantic exit code.

use thiserror::Error;

/// Everything that can abort or degrade a playback session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network or provider failure while talking to an upstream service.
    /// Propagated to the caller, never retried.
    #[error("{step} request failed: {source}")]
    UpstreamUnavailable {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The metadata provider has no cross-provider id for this title,
    /// so no stream lookup is possible.
    #[error("no external id available for \"{0}\"")]
    MissingExternalId(String),

    /// Series title with an empty season list.
    #[error("no seasons found for this show")]
    NoSeasonsFound,

    /// Season with an empty episode list.
    #[error("no episodes found for season {0}")]
    NoEpisodesFound(u32),

    /// Lookup succeeded but returned nothing playable.
    #[error("no streams available for this title")]
    NoStreamsAvailable,

    /// Search returned zero candidates.
    #[error("no results found for \"{0}\"")]
    NoResults(String),

    /// Caption transfer or write failure. Recoverable: playback
    /// continues without subtitles.
    #[error("caption download failed: {0}")]
    DownloadFailed(String),

    /// No known player path for the current operating system.
    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    /// The user backed out of a prompt.
    #[error("selection cancelled")]
    Cancelled,

    /// The prompt itself failed (terminal I/O).
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// The progress file could not be written.
    #[error("could not persist progress: {0}")]
    Store(String),
}

impl SessionError {
    /// Expected end-of-the-road conditions that deserve a plain message
    /// rather than an error trace.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            SessionError::NoResults(_)
                | SessionError::NoSeasonsFound
                | SessionError::NoEpisodesFound(_)
                | SessionError::NoStreamsAvailable
                | SessionError::Cancelled
        )
    }
}
