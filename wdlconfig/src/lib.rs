//! # WebDLNA Configuration Module
//!
//! This module provides configuration management for WebDLNA, including:
//! - Loading configuration from YAML files
//! - Merging with the embedded default configuration
//! - Environment variable overrides
//! - Typed getters with defaults for every setting
//!
//! ## Usage
//!
//! ```no_run
//! use wdlconfig::Config;
//!
//! let config = Config::load_config("")?;
//!
//! let upstream = config.upstream_base_url();
//! let interval = config.refresh_interval();
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Result, anyhow};
use dirs::home_dir;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("webdlna.yaml");

const ENV_CONFIG_DIR: &str = "WEBDLNA_CONFIG";
const ENV_PREFIX: &str = "WEBDLNA_CONFIG__";
const CONFIG_DIR_NAME: &str = ".webdlna";

// Default values for configuration
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://127.0.0.1:8200";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
const DEFAULT_REFRESH_DEADLINE_SECS: u64 = 120;
const DEFAULT_SERVE_STALE_ON_ERROR: bool = false;
const DEFAULT_SKIP_PREFIX: &str = "All ";
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Macro to generate a getter for a duration expressed in seconds
macro_rules! impl_secs_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Duration {
            Duration::from_secs(self.get_u64($path, $default))
        }
    };
}

/// Macro to generate a getter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> bool {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => b,
                Ok(other) => {
                    warn!(
                        path = %$path.join("."),
                        "Expected a boolean, got {:?}; using default {}", other, $default
                    );
                    $default
                }
                Err(_) => $default,
            }
        }
    };
}

/// Macro to generate a getter for non-empty string values with default
macro_rules! impl_string_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Ok(_) => {
                    warn!(
                        path = %$path.join("."),
                        "Empty or non-string value, using default {}", $default
                    );
                    $default.to_string()
                }
                Err(_) => $default.to_string(),
            }
        }
    };
}

/// Configuration manager for WebDLNA
///
/// The loaded configuration is passed explicitly to whoever needs it; there
/// is no process-wide instance.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        CONFIG_DIR_NAME.to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Read permission; write permission is checked by the first save
        fs::read_dir(path)?;

        Ok(())
    }

    /// Loads the configuration from the specified directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `WEBDLNA_CONFIG` environment variable
    /// 3. `.webdlna` in the current directory
    /// 4. `.webdlna` in the user's home directory
    ///
    /// The embedded defaults are merged with `config.yaml` from that
    /// directory, `WEBDLNA_CONFIG__SECTION__KEY` variables are applied on
    /// top, and the merged document is written back to `config.yaml`.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&config_dir))?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let external = match fs::read_to_string(&path) {
            Ok(data) => {
                info!(config_file=%path, "Loaded config file");
                Some(data)
            }
            Err(_) => {
                info!(config_file=%path, "Config file not found, using default embedded config");
                None
            }
        };

        let mut config_value = Self::build_value(external.as_deref())?;
        Self::apply_env_overrides(&mut config_value, env::vars());

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Builds an in-memory configuration from a YAML document merged over the
    /// defaults, without touching the filesystem or the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Config {
            config_dir: String::new(),
            path: String::new(),
            data: Mutex::new(Self::build_value(Some(yaml))?),
        })
    }

    fn build_value(external: Option<&str>) -> Result<Value> {
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        if let Some(yaml) = external {
            let external_value: Value = serde_yaml::from_str(yaml)?;
            // Un document vide se lit comme Null : on garde les défauts
            if !external_value.is_null() {
                merge_yaml(&mut default_value, &Self::lower_keys_value(external_value));
            }
        }
        Ok(Self::lower_keys_value(default_value))
    }

    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        if self.path.is_empty() {
            return Ok(());
        }
        let yaml = serde_yaml::to_string(&*self.data())?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    fn data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["cache", "refresh_interval_secs"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        Self::get_value_internal(&self.data(), path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    fn apply_env_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            if let Some(key_path) = key.strip_prefix(ENV_PREFIX) {
                let key_path = key_path.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                if let Err(err) = Self::set_value_internal(config, &key_path, yaml_value) {
                    warn!(env_var = key.as_str(), "Ignoring override: {}", err);
                }
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        new_map.insert(Value::String(s.to_lowercase()), Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    fn get_u64(&self, path: &[&str], default: u64) -> u64 {
        match self.get_value(path) {
            Ok(Value::Number(n)) => match n.as_u64() {
                Some(v) => v,
                None => {
                    warn!("{} is not a positive integer, using default {}", path.join("."), default);
                    default
                }
            },
            Ok(Value::String(s)) => match s.trim().parse::<u64>() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Invalid value '{}' for {}, using default {}", s, path.join("."), default);
                    default
                }
            },
            Ok(_) => {
                warn!("{} is not a positive integer, using default {}", path.join("."), default);
                default
            }
            Err(_) => default,
        }
    }

    impl_string_config!(
        upstream_base_url,
        &["upstream", "base_url"],
        DEFAULT_UPSTREAM_BASE_URL
    );

    impl_secs_config!(
        upstream_timeout,
        &["upstream", "timeout_secs"],
        DEFAULT_UPSTREAM_TIMEOUT_SECS
    );

    impl_string_config!(listen_addr, &["server", "listen_addr"], DEFAULT_LISTEN_ADDR);

    impl_secs_config!(
        refresh_interval,
        &["cache", "refresh_interval_secs"],
        DEFAULT_REFRESH_INTERVAL_SECS
    );

    impl_secs_config!(
        refresh_deadline,
        &["cache", "refresh_deadline_secs"],
        DEFAULT_REFRESH_DEADLINE_SECS
    );

    impl_bool_config!(
        serve_stale_on_error,
        &["cache", "serve_stale_on_error"],
        DEFAULT_SERVE_STALE_ON_ERROR
    );

    impl_string_config!(log_min_level, &["logger", "min_level"], DEFAULT_LOG_MIN_LEVEL);

    impl_bool_config!(
        log_enable_console,
        &["logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Préfixes de titres des dossiers ignorés lors du parcours.
    ///
    /// Une liste vide désactive le filtre ; une valeur absente ou mal formée
    /// retombe sur `["All "]`.
    pub fn skip_prefixes(&self) -> Vec<String> {
        match self.get_value(&["walker", "skip_prefixes"]) {
            Ok(Value::Sequence(seq)) => seq
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Ok(Value::Null) => Vec::new(),
            Ok(Value::String(s)) => vec![s],
            Ok(_) | Err(_) => vec![DEFAULT_SKIP_PREFIX.to_string()],
        }
    }
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings (objects), it merges keys from external into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}
