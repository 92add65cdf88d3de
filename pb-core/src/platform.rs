//! Platform detection and per-user paths.

use std::path::PathBuf;

use crate::constants;
use crate::error::{PbError, PbResult};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform at compile time.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Short lowercase name, used in the User-Agent.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }

    /// The user's home directory.
    pub fn home_dir() -> PbResult<PathBuf> {
        dirs::home_dir()
            .ok_or_else(|| PbError::Config("could not determine home directory".into()))
    }

    /// Default location of the global settings file (`~/.pushbulletrc`).
    pub fn default_settings_path() -> PbResult<PathBuf> {
        Ok(Self::home_dir()?.join(constants::SETTINGS_FILE_NAME))
    }

    /// Get the platform-specific application data directory.
    ///
    /// - Windows: `%APPDATA%/pushbullet`
    /// - macOS: `~/Library/Application Support/pushbullet`
    /// - Linux: `~/.local/share/pushbullet`
    pub fn data_dir() -> PbResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| PbError::Config("could not determine data directory".into()))?;
        Ok(base.join(constants::APP_NAME))
    }

    /// Default directory for rotated log files.
    pub fn log_dir() -> PbResult<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

/// Default User-Agent sent with every request.
pub fn default_user_agent() -> String {
    format!(
        "{}-rs/{} ({})",
        constants::APP_NAME,
        constants::APP_VERSION,
        Platform::current().name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let p = Platform::current();
        if cfg!(target_os = "linux") {
            assert_eq!(p, Platform::Linux);
        }
        assert!(!p.name().is_empty());
    }

    #[test]
    fn test_default_settings_path_ends_with_rc() {
        if let Ok(path) = Platform::default_settings_path() {
            assert!(path.ends_with(".pushbulletrc"));
        }
    }

    #[test]
    fn test_user_agent_format() {
        let ua = default_user_agent();
        assert!(ua.starts_with("pushbullet-rs/"));
        assert!(ua.ends_with(')'));
    }
}
