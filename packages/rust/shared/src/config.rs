//! Application configuration for feedcast.
//!
//! User config lives at `~/.feedcast/feedcast.toml`.
//! CLI flags override config file values, which override defaults.
//! Secrets are never stored in the file, only the names of the
//! environment variables that hold them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FeedcastError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "feedcast.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".feedcast";

// ---------------------------------------------------------------------------
// Config structs (matching feedcast.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Reader service settings.
    #[serde(default)]
    pub reader: ReaderConfig,

    /// OpenRouter settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Script composition settings (tag ordering, personas).
    #[serde(default)]
    pub script: ScriptConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How far back to look for updated articles, in hours.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u64,

    /// Reader location filter to fetch from (and publish back to).
    #[serde(default = "default_location")]
    pub location: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            location: default_location(),
        }
    }
}

fn default_lookback_hours() -> u64 {
    24
}
fn default_location() -> String {
    "feed".into()
}

/// `[reader]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Base URL of the reader service API.
    #[serde(default = "default_reader_base_url")]
    pub base_url: String,

    /// Name of the env var holding the access token (never the token itself).
    #[serde(default = "default_reader_token_env")]
    pub api_token_env: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_reader_base_url(),
            api_token_env: default_reader_token_env(),
        }
    }
}

fn default_reader_base_url() -> String {
    "https://readwise.io/api/v3".into()
}
fn default_reader_token_env() -> String {
    "READWISE_TOKEN".into()
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Base URL of the OpenAI-compatible completions API.
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key (never the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Default model to drive script generation.
    #[serde(default = "default_model")]
    pub default_model: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: default_openrouter_base_url(),
            api_key_env: default_api_key_env(),
            default_model: default_model(),
        }
    }
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "openai/gpt-4o".into()
}

/// `[script]` section: tag ordering and persona casting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Tags whose segments always come first, in this order.
    #[serde(default = "default_priority_tags")]
    pub priority_tags: Vec<String>,

    /// Tags that never get a segment.
    #[serde(default = "default_ignore_tags")]
    pub ignore_tags: Vec<String>,

    /// Persona used when a tag has no entry in the host table.
    #[serde(default = "default_host")]
    pub default_host: String,

    /// `[script.hosts]`: tag name to persona. The sentinel keys
    /// "Introduction" and "Summary" cast the opening and closing segments.
    #[serde(default = "default_hosts")]
    pub hosts: BTreeMap<String, String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            priority_tags: default_priority_tags(),
            ignore_tags: default_ignore_tags(),
            default_host: default_host(),
            hosts: default_hosts(),
        }
    }
}

fn default_priority_tags() -> Vec<String> {
    ["Local", "Tesla", "AI", "Movies", "TV", "Games", "Technology"]
        .map(String::from)
        .to_vec()
}

fn default_ignore_tags() -> Vec<String> {
    ["Humour", "Summary"].map(String::from).to_vec()
}

fn default_host() -> String {
    "Frasier Crane".into()
}

fn default_hosts() -> BTreeMap<String, String> {
    [
        ("Introduction", "Frasier Crane"),
        ("Humour", "Bill Burr and Deadpool"),
        ("Local", "Moominpappa and Snufkin"),
        ("Movies", "Deadpool and Moira Rose"),
        ("TV", "Troy McClure and Miss Piggy"),
        ("Books", "Tyrion Lannister and Wednesday Addams"),
        ("Games", "Felicia Day and Geralt of Rivia"),
        ("Tesla", "KITT from Knight Rider and Tony Stark"),
        ("Technology", "Tony Stark and Q from James Bond"),
        ("AI", "Data from Star Trek and GLaDOS from Portal"),
        ("Health & Wellness", "Oprah Winfrey and Dr. Ian Malcolm"),
        ("Science", "Carl Sagan and The Doctor from Doctor Who"),
        ("Business & Finance", "Rupert Giles and Lucille Bluth"),
        ("Startups", "Erlich Bachman and Richard Hendricks"),
        ("Lifestyle", "Moira Rose and Tahani Al-Jamil"),
        ("Family & Relationships", "Leslie Knope and Ted Lasso"),
        ("Arts & Culture", "Frasier Crane and Oscar Wilde"),
        ("Education", "The Doctor from Doctor Who and Hermione Granger"),
        ("Environment", "Captain Planet and The Lorax"),
        ("Politics & Society", "Jon Stewart and Selina Meyer"),
        ("History", "Frasier Crane and Terry Jones from Monty Python"),
        ("Sports & Recreation", "Ted Lasso and John Oliver"),
        ("Food & Drink", "Gordon Ramsay and Julia Child"),
        ("Entertainment", "Miss Piggy and Jimmy Fallon"),
        (
            "Productivity & Self-Improvement",
            "David Allen and Marie Kondo",
        ),
        ("Research Papers", "Alan Turing and Dr. Ian Malcolm"),
        ("Professional Documents", "Miranda Priestly and Harvey Specter"),
        ("Summary", "Frasier Crane"),
    ]
    .into_iter()
    .map(|(tag, host)| (tag.to_string(), host.to_string()))
    .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.feedcast/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FeedcastError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.feedcast/feedcast.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FeedcastError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        FeedcastError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FeedcastError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FeedcastError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FeedcastError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a required secret from the environment variable named by `var_name`.
pub fn require_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(FeedcastError::config(format!(
            "secret not found. Set the {var_name} environment variable."
        ))),
    }
}
