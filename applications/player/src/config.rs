/// Player configuration
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "lite-player.toml";

/// Environment variable prefix (`LITE_LIBRARY__FOLLOW_LINKS=true`)
pub const ENV_PREFIX: &str = "LITE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Directories scanned for audio files
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Start with shuffle enabled
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `lite-player.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Nested keys use a double underscore so names like follow_links survive;
        // LITE_LIBRARY__DIRECTORIES takes a comma-separated list
        settings = settings.add_source(
            config::Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("library.directories"),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, directories: Vec<PathBuf>, shuffle: bool) {
        if !directories.is_empty() {
            self.library.directories = directories;
        }
        if shuffle {
            self.playback.shuffle = true;
        }
    }

    /// Render as TOML, e.g. to seed a config file
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PlayerError::Config(e.to_string()))
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            playback: PlaybackSettings::default(),
            logging: default_logging(),
        }
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        directories: default_directories(),
        follow_links: false,
    }
}

fn default_directories() -> Vec<PathBuf> {
    let base = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    vec![base.join("Music")]
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_log_filter(),
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
