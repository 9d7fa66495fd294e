//! Configuration loading for the salon booking service.
//!
//! Sources are layered: `config/default.toml`, then `config/{RUN_ENV}.toml`,
//! then `SALON_*` environment variables (`SALON_SERVER__PORT=9000`).

use config::{Config, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod models;
pub use config::ConfigError;
pub use models::*;

/// Marker value that is replaced from the environment after loading.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the application configuration from files and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "SALON".to_string());
    let config_dir =
        PathBuf::from(env::var("SALON_CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (env prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let raw_config: AppConfig = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    apply_env_overrides_from_marker(raw_config)
}

/// Parses a TOML document into an [`AppConfig`] without consulting files or
/// the environment. Secret markers are left untouched.
pub fn load_config_from_str(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}

/// Replaces every `"secret_from_env"` string with the value of the environment
/// variable named after its key path (`database.url` -> `DATABASE_URL`).
fn inject_env_secrets(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
    fn walk(path: &mut Vec<String>, obj: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, lookup);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                match lookup(&env_key) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => warn!("env var {} not found for {}", env_key, SECRET_FROM_ENV),
                }
            }
            _ => {}
        }
    }

    walk(&mut Vec::new(), value, lookup);
}

fn apply_overrides_with(
    config: AppConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json, lookup);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

/// Applies environment overrides based on `"secret_from_env"` markers.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_overrides_with(config, &|key| env::var(key).ok())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path comes from `DOTENV_OVERRIDE`, else from a first command line
/// argument starting with `.env`, else `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
