/// Configuration system for saathi.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::SaathiConfig::default()`]
/// 2. **User global config** — `~/.saathi/config.toml`
/// 3. **Project local config** — `.saathi.toml` in the current working directory
/// 4. **Environment variables** — `SAATHI_*` overrides (highest precedence)
///
/// Later layers replace earlier ones. Malformed files are ignored so a bad
/// config never takes the service down.
///
/// # Usage
///
/// ```rust,ignore
/// use saathi::config;
///
/// let cfg = config::load();
/// println!("listening on {}", cfg.server.addr);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assist::LanguageHint;

pub use schema::SaathiConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved saathi configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> SaathiConfig {
    let mut config = SaathiConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed.
fn load_toml_file(path: Option<PathBuf>) -> Option<SaathiConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding saathi's config, store and logs: `~/.saathi`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".saathi"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".saathi.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project-local config file.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
///
/// Returns `None` only when the path starts with `~` and no home directory
/// can be determined.
pub fn expand_home(raw: &str) -> Option<PathBuf> {
    if raw == "~" {
        return dirs::home_dir();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(Path::new(raw).to_path_buf()),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SAATHI_ADDR` — server bind address
/// - `SAATHI_SERVER_URL` — base URL used by the chat client
/// - `SAATHI_DEFAULT_LANG` — `auto`, `en-IN` or `hi-IN`
/// - `SAATHI_VOICE` — speak replies (`1`/`true`/`yes`/`on`)
/// - `SAATHI_STORAGE_PATH` — mood store file
/// - `SAATHI_LOGGING` — assist event log enabled
fn apply_env_overrides(config: &mut SaathiConfig) {
    if let Ok(val) = std::env::var("SAATHI_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("SAATHI_SERVER_URL")
        && !val.is_empty()
    {
        config.client.server_url = val;
    }
    if let Ok(val) = std::env::var("SAATHI_DEFAULT_LANG") {
        config.assist.default_lang = LanguageHint::parse(&val);
    }
    if let Ok(val) = std::env::var("SAATHI_VOICE") {
        config.voice.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("SAATHI_STORAGE_PATH")
        && !val.is_empty()
    {
        config.storage.path = val;
    }
    if let Ok(val) = std::env::var("SAATHI_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.saathi/config.toml`.
///
/// Returns an error if the file already exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.saathi/ directory")?;
    }

    fs::write(&path, SaathiConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `voice.enabled`. When no file exists yet the
/// defaults are written out first.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SaathiConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unreadable as a SaathiConfig.
    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    toml::from_str::<SaathiConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value is parsed according to the type of the existing value.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((&leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        None => anyhow::bail!("config key not found: '{key}'"),
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn expand_home_handles_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_home("~/.saathi/storage.json"),
            Some(home.join(".saathi/storage.json"))
        );
        assert_eq!(expand_home("~"), Some(home));
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(
            expand_home("/var/lib/saathi.json"),
            Some(PathBuf::from("/var/lib/saathi.json"))
        );
        assert_eq!(expand_home("store.json"), Some(PathBuf::from("store.json")));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[server]\naddr = \"127.0.0.1:8080\"\n").unwrap();
        set_toml_value(&mut root, "server.addr", "0.0.0.0:80").unwrap();
        assert_eq!(root["server"]["addr"].as_str(), Some("0.0.0.0:80"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str("[voice]\nenabled = true\n").unwrap();
        set_toml_value(&mut root, "voice.enabled", "off").unwrap();
        assert_eq!(root["voice"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_float() {
        let mut root: toml::Value = toml::from_str("[voice]\npitch = 1.1\n").unwrap();
        set_toml_value(&mut root, "voice.pitch", "0.9").unwrap();
        let pitch = root["voice"]["pitch"].as_float().unwrap();
        assert!((pitch - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn set_toml_value_rejects_bad_float() {
        let mut root: toml::Value = toml::from_str("[voice]\nrate = 1.0\n").unwrap();
        assert!(set_toml_value(&mut root, "voice.rate", "fast").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[server]\naddr = \"x\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "server.port", "80").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: SaathiConfig = toml::from_str(&toml_str).unwrap();
    }
}
