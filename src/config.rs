//! Configuration file handling for elf-booth.
//!
//! Loads configuration from `~/.config/elf-booth/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::camera::{FacingMode, Resolution};
use crate::export::DEFAULT_SUBJECT;
use crate::generation::{DEFAULT_MODEL, DEFAULT_TIMEOUT, GEMINI_API_BASE_URL};
use crate::i18n::Language;

/// Configuration file structure for elf-booth.
/// Loaded from ~/.config/elf-booth/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CameraConfig {
    /// "user" (front, mirrored) or "environment"
    #[serde(default = "default_facing")]
    pub facing: String,
    #[serde(default = "default_width")]
    pub ideal_width: u32,
    #[serde(default = "default_height")]
    pub ideal_height: u32,
    /// Photo file used as the camera source instead of a camera
    #[serde(default)]
    pub photo: Option<PathBuf>,
    /// Camera index; picked by facing mode when unset
    #[serde(default)]
    pub device: Option<u32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing: default_facing(),
            ideal_width: default_width(),
            ideal_height: default_height(),
            photo: None,
            device: None,
        }
    }
}

impl CameraConfig {
    /// Parsed facing mode; unknown values fall back to the front camera.
    pub fn facing_mode(&self) -> FacingMode {
        self.facing.parse().unwrap_or_else(|_| {
            log::warn!("Unknown camera facing '{}', using user", self.facing);
            FacingMode::User
        })
    }

    pub fn ideal(&self) -> Resolution {
        Resolution {
            width: self.ideal_width,
            height: self.ideal_height,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// TrueType font for names on the certificate; a system font when unset
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            subject: default_subject(),
            font: None,
        }
    }
}

impl ExportConfig {
    /// Configured directory, else the user's Downloads folder, else the current directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UiConfig {
    /// "fi" or "en"
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub music: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            music: true,
        }
    }
}

impl UiConfig {
    pub fn language(&self) -> Language {
        self.language.parse().unwrap_or_else(|_| {
            log::warn!("Unknown language '{}', using fi", self.language);
            Language::Fi
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    GEMINI_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_facing() -> String {
    "user".to_string()
}

fn default_width() -> u32 {
    Resolution::HD.width
}

fn default_height() -> u32 {
    Resolution::HD.height
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_language() -> String {
    Language::Fi.code().to_ascii_lowercase()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Write a default config file to `path` unless one already exists.
    ///
    /// Returns `false` when the file was already there.
    pub fn init(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let io_error = |e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = Config::default().to_toml()?;
        std::fs::write(path, content).map_err(io_error)?;
        Ok(true)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError(source) => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("elf-booth").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/elf-booth/config.toml")
        })
}
