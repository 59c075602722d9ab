/// Platform-specific path computation for configuration files
use std::path::PathBuf;

/// Directory name used under the platform config directory
const APP_DIR: &str = "document-rag";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Get the config directory for this crate
    ///
    /// - Windows: %APPDATA%\document-rag
    /// - macOS: ~/Library/Application Support/document-rag
    /// - Linux/Unix: $XDG_CONFIG_HOME/document-rag or ~/.config/document-rag
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Default location of the TOML configuration file
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
