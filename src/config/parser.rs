use crate::config::types::{CheckMode, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables that override file settings
const ENV_PREFIX: &str = "UNLINKED_";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use unlinked::config::load_config;
///
/// let config = load_config(Path::new("unlinked.toml")).unwrap();
/// println!("Concurrency: {}", config.concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Finds a configuration file in the usual locations
///
/// Looks for `./unlinked.toml` first, then `$HOME/.config/unlinked/config.toml`.
pub fn discover_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("unlinked.toml");
    if local.is_file() {
        return Some(local);
    }

    let home = std::env::var_os("HOME")?;
    let user = PathBuf::from(home)
        .join(".config")
        .join("unlinked")
        .join("config.toml");
    user.is_file().then_some(user)
}

/// Loads the effective configuration
///
/// Uses `path` when given, otherwise a discovered file, otherwise the
/// defaults. `UNLINKED_*` environment variables are applied on top and the
/// result is validated again.
pub fn load_effective_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path.map(Path::to_path_buf).or_else(discover_config_path) {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            load_config(&path)?
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Applies `UNLINKED_*` overrides read through `lookup`
///
/// Supported keys: `MODE`, `CONCURRENCY`, `TIMEOUT`, `MAX_DEPTH`,
/// `USER_AGENT`, `FOLLOW_REDIRECTS`.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

    if let Some(mode) = get("MODE") {
        config.mode = CheckMode::parse(&mode).ok_or_else(|| {
            ConfigError::Validation(format!("{}MODE has unknown mode '{}'", ENV_PREFIX, mode))
        })?;
    }
    if let Some(value) = get("CONCURRENCY") {
        config.concurrency = parse_number("CONCURRENCY", &value)?;
    }
    if let Some(value) = get("TIMEOUT") {
        config.timeout = parse_number("TIMEOUT", &value)?;
    }
    if let Some(value) = get("MAX_DEPTH") {
        config.max_depth = parse_number("MAX_DEPTH", &value)?;
    }
    if let Some(value) = get("USER_AGENT") {
        config.user_agent = value;
    }
    if let Some(value) = get("FOLLOW_REDIRECTS") {
        config.follow_redirects = match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(ConfigError::Validation(format!(
                    "{}FOLLOW_REDIRECTS must be a boolean, got '{}'",
                    ENV_PREFIX, other
                )))
            }
        };
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!(
            "{}{} must be a non-negative integer, got '{}'",
            ENV_PREFIX, name, value
        ))
    })
}
