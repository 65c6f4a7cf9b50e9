//! Configuration Vault – reads/writes `~/.sabor/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use sabor_catalog::{DEFAULT_COUNTRY_API_URL, DEFAULT_MEAL_API_URL, DEFAULT_RECIPES_PATH};
use sabor_runtime::{LogFormat, LogSettings, SessionTiming};

/// Where recipes come from.  Exactly one source is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Static,
    MealDb,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Static => write!(f, "static"),
            DataSource::MealDb => write!(f, "mealdb"),
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(DataSource::Static),
            "mealdb" => Ok(DataSource::MealDb),
            other => Err(format!("unknown data source '{other}' (static / mealdb)")),
        }
    }
}

/// Persistence medium for shared memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::File => write!(f, "file"),
            StorageKind::Sqlite => write!(f, "sqlite"),
            StorageKind::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage '{other}' (file / sqlite / memory)")),
        }
    }
}

/// Persisted user configuration stored in `~/.sabor/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_source: DataSource,

    /// Static catalog file, used when `data_source = "static"`.
    #[serde(default = "default_recipes_path")]
    pub recipes_path: String,

    /// Meal catalog API base URL, used when `data_source = "mealdb"`.
    #[serde(default = "default_meal_api_url")]
    pub meal_api_url: String,

    #[serde(default = "default_country_api_url")]
    pub country_api_url: String,

    #[serde(default)]
    pub storage: StorageKind,

    /// Directory (file storage) or database file (sqlite storage).  Empty
    /// means a location under `~/.sabor/`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_path: String,

    /// Pause before the "recipe completed" dialog.
    #[serde(default = "default_completion_delay_ms")]
    pub completion_delay_ms: u64,

    /// Pause before moving to the next step after one is checked.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,

    /// Simulated "saving" pause when sharing a memory.
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_recipes_path() -> String {
    DEFAULT_RECIPES_PATH.to_string()
}
fn default_meal_api_url() -> String {
    DEFAULT_MEAL_API_URL.to_string()
}
fn default_country_api_url() -> String {
    DEFAULT_COUNTRY_API_URL.to_string()
}
fn default_completion_delay_ms() -> u64 {
    500
}
fn default_advance_delay_ms() -> u64 {
    500
}
fn default_save_delay_ms() -> u64 {
    1500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            recipes_path: default_recipes_path(),
            meal_api_url: default_meal_api_url(),
            country_api_url: default_country_api_url(),
            storage: StorageKind::default(),
            storage_path: String::new(),
            completion_delay_ms: default_completion_delay_ms(),
            advance_delay_ms: default_advance_delay_ms(),
            save_delay_ms: default_save_delay_ms(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming {
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            completion_delay: Duration::from_millis(self.completion_delay_ms),
        }
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            format: self.log_format,
            ..LogSettings::from_env()
        }
    }

    /// Where memories are stored, resolving an empty `storage_path` under
    /// `home`.
    pub fn storage_location_for_home(&self, home: &str) -> PathBuf {
        if !self.storage_path.is_empty() {
            return PathBuf::from(&self.storage_path);
        }
        let dir = sabor_dir_for_home(home);
        match self.storage {
            StorageKind::Sqlite => dir.join("memories.db"),
            StorageKind::File | StorageKind::Memory => dir.join("memories"),
        }
    }

    pub fn storage_location(&self) -> PathBuf {
        self.storage_location_for_home(&home_dir())
    }
}

fn home_dir() -> String {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string())
}

fn sabor_dir_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".sabor")
}

/// Return the path to `~/.sabor/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(&home_dir())
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    sabor_dir_for_home(home).join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `SABOR_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SABOR_DATA_SOURCE` | `data_source` (`static` / `mealdb`) |
/// | `SABOR_RECIPES_PATH` | `recipes_path` |
/// | `SABOR_MEAL_API_URL` | `meal_api_url` |
/// | `SABOR_COUNTRY_API_URL` | `country_api_url` |
/// | `SABOR_STORAGE` | `storage` (`file` / `sqlite` / `memory`) |
/// | `SABOR_STORAGE_PATH` | `storage_path` |
/// | `SABOR_LOG_FORMAT` | `log_format` (`compact` / `json`) |
///
/// Unparsable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SABOR_DATA_SOURCE")
        && let Ok(source) = v.parse::<DataSource>()
    {
        cfg.data_source = source;
    }
    if let Ok(v) = std::env::var("SABOR_RECIPES_PATH") {
        cfg.recipes_path = v;
    }
    if let Ok(v) = std::env::var("SABOR_MEAL_API_URL") {
        cfg.meal_api_url = v;
    }
    if let Ok(v) = std::env::var("SABOR_COUNTRY_API_URL") {
        cfg.country_api_url = v;
    }
    if let Ok(v) = std::env::var("SABOR_STORAGE")
        && let Ok(kind) = v.parse::<StorageKind>()
    {
        cfg.storage = kind;
    }
    if let Ok(v) = std::env::var("SABOR_STORAGE_PATH") {
        cfg.storage_path = v;
    }
    if let Ok(v) = std::env::var("SABOR_LOG_FORMAT") {
        cfg.log_format = LogFormat::parse(&v);
    }
}

/// Save the config to disk, creating `~/.sabor/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Owner only (rwx------); the directory also holds the memories.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).expect("file metadata").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600, "config file must have 0o600 permissions");

        let dir_meta = std::fs::metadata(path.parent().unwrap()).expect("dir metadata");
        assert_eq!(dir_meta.permissions().mode() & 0o777, 0o700);
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.recipes_path, "data/recipes.json");
        assert_eq!(loaded.completion_delay_ms, 500);
        assert_eq!(loaded.advance_delay_ms, 500);
        assert_eq!(loaded.save_delay_ms, 1500);
        assert_eq!(loaded.storage, StorageKind::File);
    }

    #[test]
    fn sparse_file_gets_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_source = \"mealdb\"\nstorage = \"sqlite\"\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.data_source, DataSource::MealDb);
        assert_eq!(loaded.storage, StorageKind::Sqlite);
        assert_eq!(loaded.meal_api_url, DEFAULT_MEAL_API_URL);
        assert_eq!(loaded.log_format, LogFormat::Compact);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_source = \"carrier-pigeon\"").unwrap();
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn config_path_points_to_sabor_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".sabor"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn storage_location_defaults_under_home() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.storage_location_for_home("/home/ana"),
            PathBuf::from("/home/ana/.sabor/memories")
        );
        cfg.storage = StorageKind::Sqlite;
        assert_eq!(
            cfg.storage_location_for_home("/home/ana"),
            PathBuf::from("/home/ana/.sabor/memories.db")
        );
        cfg.storage_path = "/srv/sabor.db".into();
        assert_eq!(cfg.storage_location_for_home("/home/ana"), PathBuf::from("/srv/sabor.db"));
    }

    #[test]
    fn timing_comes_from_millis() {
        let cfg = Config {
            advance_delay_ms: 10,
            completion_delay_ms: 20,
            save_delay_ms: 30,
            ..Config::default()
        };
        assert_eq!(cfg.session_timing().advance_delay, Duration::from_millis(10));
        assert_eq!(cfg.session_timing().completion_delay, Duration::from_millis(20));
        assert_eq!(cfg.save_delay(), Duration::from_millis(30));
    }

    #[test]
    fn apply_env_overrides_changes_data_source() {
        // SAFETY: no other test reads this env-var.
        unsafe { std::env::set_var("SABOR_DATA_SOURCE", "mealdb") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.data_source, DataSource::MealDb);
        unsafe { std::env::remove_var("SABOR_DATA_SOURCE") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_storage() {
        // SAFETY: no other test reads this env-var.
        unsafe { std::env::set_var("SABOR_STORAGE", "floppy") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.storage, StorageKind::File);
        unsafe { std::env::remove_var("SABOR_STORAGE") };
    }

    #[test]
    fn apply_env_overrides_changes_country_api_url() {
        // SAFETY: no other test reads this env-var.
        unsafe { std::env::set_var("SABOR_COUNTRY_API_URL", "http://countries.local") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.country_api_url, "http://countries.local");
        unsafe { std::env::remove_var("SABOR_COUNTRY_API_URL") };
    }
}
