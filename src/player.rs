//! Playback launcher
//!
//! Resolves the VLC executable for the current operating system and
//! hands a stream URL (plus optional subtitle file) to it. The spawn is
//! fire-and-forget: the session counts as handed off once the process
//! starts, and child diagnostics are logged, never escalated.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::SessionError;

/// Operating system families with a known player path. Anything else
/// is `UnsupportedPlatform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn detect() -> Result<Self, SessionError> {
        Self::from_os_name(std::env::consts::OS)
    }

    fn from_os_name(os: &str) -> Result<Self, SessionError> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            other => Err(SessionError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// VLC path or executable name for this platform.
    pub fn player_command(&self) -> &'static str {
        match self {
            Platform::Linux => "vlc",
            Platform::MacOs => "/Applications/VLC.app/Contents/MacOS/VLC",
            Platform::Windows => r"C:\Program Files\VideoLAN\VLC\vlc.exe",
        }
    }
}

/// Seam for handing a chosen stream to a media player. The session is
/// generic over this so tests can record launches instead of spawning.
pub trait Launcher {
    fn launch(&self, url: &str, caption: Option<&Path>) -> Result<(), SessionError>;
}

/// Launches VLC, resolved per platform unless an explicit command
/// override is configured.
pub struct VlcLauncher {
    command_override: Option<String>,
}

impl VlcLauncher {
    pub fn new() -> Self {
        Self {
            command_override: None,
        }
    }

    /// Use an explicit executable path instead of the platform table.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command_override: Some(command.into()),
        }
    }

    fn resolve_command(&self) -> Result<String, SessionError> {
        match &self.command_override {
            Some(command) => Ok(command.clone()),
            None => Platform::detect().map(|p| p.player_command().to_string()),
        }
    }
}

impl Launcher for VlcLauncher {
    fn launch(&self, url: &str, caption: Option<&Path>) -> Result<(), SessionError> {
        let command = self.resolve_command()?;

        let mut cmd = Command::new(&command);
        cmd.arg(url);
        if let Some(path) = caption {
            cmd.arg("--sub-file").arg(path);
        }
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        // Fire-and-forget: the child outlives this process and is never
        // awaited. Spawn diagnostics are logged, not escalated.
        match cmd.spawn() {
            Ok(_child) => {
                info!(player = %command, "playback handed off");
            }
            Err(err) => {
                error!(player = %command, %err, "failed to start player");
            }
        }
        Ok(())
    }
}

impl Default for VlcLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_table() {
        assert_eq!(Platform::Linux.player_command(), "vlc");
        assert_eq!(
            Platform::MacOs.player_command(),
            "/Applications/VLC.app/Contents/MacOS/VLC"
        );
        assert_eq!(
            Platform::Windows.player_command(),
            r"C:\Program Files\VideoLAN\VLC\vlc.exe"
        );
    }

    #[test]
    fn test_unknown_os_is_unsupported() {
        let err = Platform::from_os_name("plan9").unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedPlatform(os) if os == "plan9"));
    }

    #[test]
    fn test_known_os_names_resolve() {
        assert_eq!(Platform::from_os_name("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os_name("macos").unwrap(), Platform::MacOs);
        assert_eq!(
            Platform::from_os_name("windows").unwrap(),
            Platform::Windows
        );
    }

    #[test]
    fn test_command_override_wins() {
        let launcher = VlcLauncher::with_command("/opt/custom/vlc");
        assert_eq!(launcher.resolve_command().unwrap(), "/opt/custom/vlc");
    }
}
