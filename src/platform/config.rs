// Rootline - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::export::ExportFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Rootline configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/rootline/ or %APPDATA%\Rootline\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still loads
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[import]` section.
    pub import: ImportSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Generation window around the home individual.
    pub max_generations: Option<i64>,
    /// Largest GEDCOM file accepted, in bytes.
    pub max_file_size_bytes: Option<u64>,
    /// Base URL for placeholder portraits.
    pub portrait_base_url: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// "json" or "csv".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub max_generations: u32,
    pub max_file_size: u64,
    pub portrait_base_url: String,
    pub export_format: ExportFormat,
    /// Logging level string (read before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_generations: constants::DEFAULT_MAX_GENERATIONS,
            max_file_size: constants::DEFAULT_MAX_FILE_SIZE,
            portrait_base_url: constants::DEFAULT_PORTRAIT_BASE_URL.to_string(),
            export_format: ExportFormat::default(),
            log_level: None,
        }
    }
}

fn read_raw(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus one warning so the
/// import still runs but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match read_raw(config_path) {
        Ok(raw) => validate(raw),
        Err(e) => (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    }
}

/// Like [`load_config`], but for a file the user named explicitly: a
/// missing or malformed file is an error rather than a warning.
pub fn load_config_strict(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw = read_raw(config_path)?;
    Ok(validate(raw))
}

fn out_of_range(
    field: &str,
    value: impl ToString,
    expected: String,
    default: impl ToString,
) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    };
    format!("{err}. Using default ({}).", default.to_string())
}

/// Checks every field against its allowed range, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = AppConfig::default();

    // -- Import: max_generations --
    if let Some(generations) = raw.import.max_generations {
        match u32::try_from(generations) {
            Ok(g) if g <= constants::ABSOLUTE_MAX_GENERATIONS => config.max_generations = g,
            _ => warnings.push(out_of_range(
                "import.max_generations",
                generations,
                format!("0-{}", constants::ABSOLUTE_MAX_GENERATIONS),
                constants::DEFAULT_MAX_GENERATIONS,
            )),
        }
    }

    // -- Import: max_file_size_bytes --
    if let Some(size) = raw.import.max_file_size_bytes {
        if (1..=constants::ABSOLUTE_MAX_FILE_SIZE).contains(&size) {
            config.max_file_size = size;
        } else {
            warnings.push(out_of_range(
                "import.max_file_size_bytes",
                size,
                format!("1-{}", constants::ABSOLUTE_MAX_FILE_SIZE),
                constants::DEFAULT_MAX_FILE_SIZE,
            ));
        }
    }

    // -- Import: portrait_base_url --
    if let Some(url) = raw.import.portrait_base_url {
        if url.trim().is_empty() {
            warnings.push(format!(
                "[import] portrait_base_url is empty. Using default ({}).",
                constants::DEFAULT_PORTRAIT_BASE_URL,
            ));
        } else {
            config.portrait_base_url = url;
        }
    }

    // -- Export: format --
    if let Some(format) = raw.export.format {
        match format.parse::<ExportFormat>() {
            Ok(f) => config.export_format = f,
            Err(_) => warnings.push(format!(
                "[export] format = \"{format}\" is not recognised. \
                 Expected \"json\" or \"csv\". Using default (json).",
            )),
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}
