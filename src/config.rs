//! Configuration system using TOML files.
//!
//! An optional config file lives in the OS-standard config directory:
//! - Windows: %APPDATA%\shelf-import\config.toml
//! - macOS: ~/Library/Application Support/shelf-import/config.toml
//! - Linux: ~/.config/shelf-import/config.toml
//!
//! Values from the file are overridden by command-line arguments and the
//! resolved [`ImportConfig`] is handed to the pipeline at construction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default Open Library endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://openlibrary.org";

/// Default pause between records that hit the network
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// On-disk configuration. Every field is optional so partial files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// BookBuddy CSV export to import
    pub input_path: Option<PathBuf>,

    /// Where the keyed output document is written
    pub output_path: Option<PathBuf>,

    /// Where resumable progress is kept
    pub progress_path: Option<PathBuf>,

    /// Delay between records that issued lookups, in milliseconds
    pub request_delay_ms: u64,

    /// Cache lookups that failed transiently (they are never retried)
    pub cache_transient_failures: bool,

    /// Bibliographic API base URL
    pub api_base_url: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            progress_path: None,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            cache_transient_failures: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Command-line overrides. `None` keeps the file (or default) value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub progress_path: Option<PathBuf>,
    pub request_delay_ms: Option<u64>,
    pub cache_transient_failures: bool,
}

/// Fully resolved configuration for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub progress_path: PathBuf,
    pub request_delay: Duration,
    pub cache_transient_failures: bool,
    pub api_base_url: String,
}

impl ImportConfig {
    /// Merge the config file with CLI overrides.
    ///
    /// The input path has no default and must come from one of the two.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let input_path = overrides
            .input_path
            .or(file.input_path)
            .ok_or_else(|| Error::config("no input CSV given (use --input or input_path)"))?;

        Ok(Self {
            input_path,
            output_path: overrides
                .output_path
                .or(file.output_path)
                .unwrap_or_else(default_output_path),
            progress_path: overrides
                .progress_path
                .or(file.progress_path)
                .unwrap_or_else(default_progress_path),
            request_delay: Duration::from_millis(
                overrides.request_delay_ms.unwrap_or(file.request_delay_ms),
            ),
            cache_transient_failures: overrides.cache_transient_failures
                || file.cache_transient_failures,
            api_base_url: file.api_base_url,
        })
    }
}

/// Resolve only the progress file location (for the maintenance commands).
pub fn resolve_progress_path(file: &ConfigFile, override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .or_else(|| file.progress_path.clone())
        .unwrap_or_else(default_progress_path)
}

// ============================================================================
// Default locations
// ============================================================================

fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("FamilyBooks")
}

pub fn default_output_path() -> PathBuf {
    data_dir().join("books_for_import.json")
}

pub fn default_progress_path() -> PathBuf {
    data_dir().join("import_progress.json")
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shelf-import"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Load the config file.
///
/// With an explicit path the file must exist and parse. Without one, the
/// OS-standard location is tried and any problem falls back to defaults.
pub fn load(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::not_found(path));
        }
        return read_file(path);
    }

    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Ok(ConfigFile::default());
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Ok(ConfigFile::default());
    }

    match read_file(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Ok(ConfigFile::default())
        }
    }
}

fn read_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
    let config = toml::from_str(&contents)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
input_path = "/exports/BookBuddy.csv"
"#;
        let config: ConfigFile = toml::from_str(toml).unwrap();

        assert_eq!(config.input_path, Some(PathBuf::from("/exports/BookBuddy.csv")));
        assert_eq!(config.request_delay_ms, DEFAULT_REQUEST_DELAY_MS);
        assert!(!config.cache_transient_failures);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = ConfigFile {
            input_path: Some(PathBuf::from("/file/in.csv")),
            output_path: Some(PathBuf::from("/file/out.json")),
            request_delay_ms: 900,
            ..Default::default()
        };
        let overrides = Overrides {
            input_path: Some(PathBuf::from("/cli/in.csv")),
            request_delay_ms: Some(0),
            ..Default::default()
        };

        let config = ImportConfig::resolve(file, overrides).unwrap();

        assert_eq!(config.input_path, PathBuf::from("/cli/in.csv"));
        assert_eq!(config.output_path, PathBuf::from("/file/out.json"));
        assert_eq!(config.progress_path, default_progress_path());
        assert_eq!(config.request_delay, Duration::ZERO);
    }

    #[test]
    fn test_missing_input_is_config_error() {
        let err = ImportConfig::resolve(ConfigFile::default(), Overrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_delay_is_half_a_second() {
        let overrides = Overrides {
            input_path: Some(PathBuf::from("in.csv")),
            ..Default::default()
        };
        let config = ImportConfig::resolve(ConfigFile::default(), overrides).unwrap();
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert!(config.output_path.ends_with("FamilyBooks/books_for_import.json"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_explicit_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_delay_ms = 250\ncache_transient_failures = true\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.request_delay_ms, 250);
        assert!(config.cache_transient_failures);
    }

    #[test]
    fn test_explicit_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_delay_ms = \"soon\"").unwrap();
        assert!(matches!(load(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_progress_path_resolution() {
        let file = ConfigFile {
            progress_path: Some(PathBuf::from("/file/progress.json")),
            ..Default::default()
        };
        assert_eq!(
            resolve_progress_path(&file, None),
            PathBuf::from("/file/progress.json")
        );
        assert_eq!(
            resolve_progress_path(&file, Some(PathBuf::from("/cli/p.json"))),
            PathBuf::from("/cli/p.json")
        );
    }
}
