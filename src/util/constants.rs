// Rootline - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Rootline";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Rootline";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Import limits and defaults
// =============================================================================

/// Default generation window (absolute distance from the home individual).
pub const DEFAULT_MAX_GENERATIONS: u32 = 4;

/// Hard upper bound on the configurable generation window.
/// Wider windows are accepted by the core but rejected from config files,
/// where a typo such as `400` is far more likely than intent.
pub const ABSOLUTE_MAX_GENERATIONS: u32 = 64;

/// Default maximum size of a GEDCOM file read from disk.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MiB

/// Hard upper bound on the configurable file size limit.
pub const ABSOLUTE_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024; // 1 GiB

/// Default base URL for generated placeholder portraits.
pub const DEFAULT_PORTRAIT_BASE_URL: &str = "placeholder://portrait";

/// Display name given to every staged import tree.
pub const IMPORT_TREE_NAME: &str = "Staged Import Tree";

/// Name used when a record carries no NAME line, or a spouse is missing.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Birth year shown when no dated BIRT event was found.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Placeholder shown by the date formatter for an empty date string.
pub const UNDATED_LABEL: &str = "Undated";

/// Placeholder shown on a timeline line for an event without a date.
pub const DATE_UNKNOWN_LABEL: &str = "Date unknown";

/// Sort key returned for dates without a recognisable four-digit year.
/// Sorts after every real date.
pub const UNKNOWN_DATE_SORT_KEY: f64 = 9999.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Valid `[logging] level` values.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
