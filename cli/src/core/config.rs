//! # Pressure Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for Pressure, handling
//! loading, merging, validation, and access to configuration data. It supports
//! a multi-level approach that combines defaults, user settings, and
//! project-specific overrides.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from multiple sources in order of precedence
//! - Paths are expanded (e.g., `~` to the home directory)
//! - Configuration is validated for correctness before use
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.pressure.toml` in the current directory or an ancestor
//!    (the search stops at the first directory containing `.git`)
//! 2. The user file named by `PRESSURE_CONFIG`, or else
//!    `<config dir>/pressure/config.toml`
//! 3. Default values defined in the code
//!
//! ## Example
//!
//! ```toml
//! [compress]
//! default_format = "gzip"
//! gzip_level = 9
//!
//! [decompress]
//! output_dir = "~/Downloads/unpacked"
//! unpack_tar = "always"
//!
//! [ui]
//! progress = false
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let orchestrator = Orchestrator::new(cfg.codec_settings());
//! ```
//!
use crate::common::archive::compression::{
    CodecSettings, DEFAULT_BZIP2_LEVEL, DEFAULT_GZIP_LEVEL,
};
use crate::common::archive::format::{CompressionFormat, TarIntent};
use crate::common::fs::io;
use crate::core::error::{PressError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit user configuration file.
pub const CONFIG_ENV_VAR: &str = "PRESSURE_CONFIG";
const PROJECT_CONFIG_FILENAME: &str = ".pressure.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub compress: CompressConfig,
    #[serde(default)]
    pub decompress: DecompressConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Settings for `pressure compress`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CompressConfig {
    /// Format used when `--format` is not given.
    #[serde(default = "default_format")]
    pub default_format: CompressionFormat,
    /// gzip level, 0 (store) to 9 (best).
    #[serde(default = "default_gzip_level")]
    pub gzip_level: u32,
    /// bzip2 block size level, 1 to 9.
    #[serde(default = "default_bzip2_level")]
    pub bzip2_level: u32,
}

/// Settings for `pressure decompress`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DecompressConfig {
    /// Directory used when `--output` is not given (can use ~). Will be expanded.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Whether gzip/bzip2 payloads are unpacked as TAR.
    #[serde(default)]
    pub unpack_tar: TarIntent,
}

/// Terminal output settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Show a progress bar while working.
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            gzip_level: default_gzip_level(),
            bzip2_level: default_bzip2_level(),
        }
    }
}

impl Default for DecompressConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            unpack_tar: TarIntent::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            progress: default_progress(),
        }
    }
}

impl Config {
    /// Codec levels for the orchestrator.
    pub fn codec_settings(&self) -> CodecSettings {
        CodecSettings {
            gzip_level: self.compress.gzip_level,
            bzip2_level: self.compress.bzip2_level,
        }
    }
}

fn default_format() -> CompressionFormat {
    CompressionFormat::Zip
}
fn default_gzip_level() -> u32 {
    DEFAULT_GZIP_LEVEL
}
fn default_bzip2_level() -> u32 {
    DEFAULT_BZIP2_LEVEL
}
fn default_output_dir() -> String {
    ".".to_string()
}
fn default_progress() -> bool {
    true
}

/// Loads, merges, expands and validates the configuration for this process.
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config_with(user_config_path(), &current_dir)
}

/// `load_config` with the user file and the project search start made explicit.
pub fn load_config_with(user_path: Option<PathBuf>, start_dir: &Path) -> Result<Config> {
    let user_config = match user_path {
        Some(path) if path.is_file() => {
            info!("Loading user configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        Some(path) => {
            debug!("User configuration file not found at {}", path.display());
            None
        }
        None => None,
    };
    let project_config = match find_project_config_path(start_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        None => {
            debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
            None
        }
    };
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn user_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(explicit));
    }
    match ProjectDirs::from("com", "Pressure", "pressure") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().join("config.toml")),
        None => {
            warn!("Could not determine user config directory.");
            None
        }
    }
}

fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = io::read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();
    Config {
        compress: CompressConfig {
            default_format: pick(
                project.compress.default_format,
                user.compress.default_format,
                defaults.compress.default_format,
            ),
            gzip_level: pick(
                project.compress.gzip_level,
                user.compress.gzip_level,
                defaults.compress.gzip_level,
            ),
            bzip2_level: pick(
                project.compress.bzip2_level,
                user.compress.bzip2_level,
                defaults.compress.bzip2_level,
            ),
        },
        decompress: DecompressConfig {
            output_dir: pick(
                project.decompress.output_dir,
                user.decompress.output_dir,
                defaults.decompress.output_dir,
            ),
            unpack_tar: pick(
                project.decompress.unpack_tar,
                user.decompress.unpack_tar,
                defaults.decompress.unpack_tar,
            ),
        },
        ui: UiConfig {
            progress: pick(project.ui.progress, user.ui.progress, defaults.ui.progress),
        },
    }
}

fn pick<T: PartialEq>(project: T, user: T, default: T) -> T {
    if project != default {
        project
    } else {
        user
    }
}

fn expand_config_paths(config: &mut Config) {
    config.decompress.output_dir = shellexpand::tilde(&config.decompress.output_dir).into_owned();
    debug!("Expanded output directory: {}", config.decompress.output_dir);
}

fn validate_config(config: &Config) -> Result<()> {
    if config.compress.gzip_level > 9 {
        return Err(anyhow!(PressError::Config(format!(
            "gzip_level must be between 0 and 9, got {}",
            config.compress.gzip_level
        ))));
    }
    if !(1..=9).contains(&config.compress.bzip2_level) {
        return Err(anyhow!(PressError::Config(format!(
            "bzip2_level must be between 1 and 9, got {}",
            config.compress.bzip2_level
        ))));
    }
    if config.decompress.output_dir.trim().is_empty() {
        return Err(anyhow!(PressError::Config(
            "decompress.output_dir cannot be empty".to_string()
        )));
    }
    if config.compress.default_format == CompressionFormat::Rar {
        warn!("Configured default format 'rar' cannot be used for compression.");
    }
    Ok(())
}
