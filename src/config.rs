use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "vitrina";

/// Environment variable consulted for the catalog base URL when no
/// `--api-url` flag is given.
pub const API_URL_ENV: &str = "VITRINA_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub api_url: Option<String>,
    pub keys: Keys,
    pub ui: UiConfig,
}

// =============================================================================
// Key Bindings - Context-aware with multiple bindings per action
// =============================================================================

/// All key bindings organized by context
#[derive(Debug, Clone, Default)]
pub struct Keys {
    /// Global keys (work in most contexts)
    pub global: GlobalKeys,
    /// Keys for search input mode
    pub search_input: SearchInputKeys,
    /// Keys for search results navigation
    pub search_results: SearchResultsKeys,
    /// Keys for the product detail view
    pub detail: DetailKeys,
}

#[derive(Debug, Clone)]
pub struct GlobalKeys {
    pub quit: Vec<String>,
    pub search: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchInputKeys {
    pub cancel: Vec<String>,
    pub confirm: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchResultsKeys {
    pub cancel: Vec<String>,
    pub confirm: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub page_down: Vec<String>,
    pub page_up: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DetailKeys {
    pub back: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
}

impl Default for GlobalKeys {
    fn default() -> Self {
        Self {
            quit: vec!["q".into()],
            search: vec!["/".into()],
        }
    }
}

impl Default for SearchInputKeys {
    fn default() -> Self {
        Self {
            cancel: vec!["Escape".into()],
            confirm: vec!["Enter".into()],
            next: vec!["Tab".into(), "Down".into()],
            prev: vec!["Backtab".into(), "Up".into()],
        }
    }
}

impl Default for SearchResultsKeys {
    fn default() -> Self {
        Self {
            cancel: vec!["Escape".into()],
            confirm: vec!["Enter".into()],
            next: vec!["j".into(), "Down".into(), "Tab".into()],
            prev: vec!["k".into(), "Up".into(), "Backtab".into()],
            page_down: vec!["PageDown".into()],
            page_up: vec!["PageUp".into()],
        }
    }
}

impl Default for DetailKeys {
    fn default() -> Self {
        Self {
            back: vec!["Escape".into(), "Backspace".into()],
            next: vec!["j".into(), "Down".into()],
            prev: vec!["k".into(), "Up".into()],
        }
    }
}

// =============================================================================
// Serde deserialization types (support both single string and array)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyBinding::Single(s) => vec![s],
            KeyBinding::Multiple(v) => v,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeysFile {
    global: GlobalKeysFile,
    search_input: SearchInputKeysFile,
    search_results: SearchResultsKeysFile,
    detail: DetailKeysFile,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GlobalKeysFile {
    quit: KeyBinding,
    search: KeyBinding,
}

impl Default for GlobalKeysFile {
    fn default() -> Self {
        let defaults = GlobalKeys::default();
        Self {
            quit: KeyBinding::Multiple(defaults.quit),
            search: KeyBinding::Multiple(defaults.search),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchInputKeysFile {
    cancel: KeyBinding,
    confirm: KeyBinding,
    next: KeyBinding,
    prev: KeyBinding,
}

impl Default for SearchInputKeysFile {
    fn default() -> Self {
        let defaults = SearchInputKeys::default();
        Self {
            cancel: KeyBinding::Multiple(defaults.cancel),
            confirm: KeyBinding::Multiple(defaults.confirm),
            next: KeyBinding::Multiple(defaults.next),
            prev: KeyBinding::Multiple(defaults.prev),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchResultsKeysFile {
    cancel: KeyBinding,
    confirm: KeyBinding,
    next: KeyBinding,
    prev: KeyBinding,
    page_down: KeyBinding,
    page_up: KeyBinding,
}

impl Default for SearchResultsKeysFile {
    fn default() -> Self {
        let defaults = SearchResultsKeys::default();
        Self {
            cancel: KeyBinding::Multiple(defaults.cancel),
            confirm: KeyBinding::Multiple(defaults.confirm),
            next: KeyBinding::Multiple(defaults.next),
            prev: KeyBinding::Multiple(defaults.prev),
            page_down: KeyBinding::Multiple(defaults.page_down),
            page_up: KeyBinding::Multiple(defaults.page_up),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetailKeysFile {
    back: KeyBinding,
    next: KeyBinding,
    prev: KeyBinding,
}

impl Default for DetailKeysFile {
    fn default() -> Self {
        let defaults = DetailKeys::default();
        Self {
            back: KeyBinding::Multiple(defaults.back),
            next: KeyBinding::Multiple(defaults.next),
            prev: KeyBinding::Multiple(defaults.prev),
        }
    }
}

impl From<KeysFile> for Keys {
    fn from(file: KeysFile) -> Self {
        Self {
            global: GlobalKeys {
                quit: file.global.quit.into_vec(),
                search: file.global.search.into_vec(),
            },
            search_input: SearchInputKeys {
                cancel: file.search_input.cancel.into_vec(),
                confirm: file.search_input.confirm.into_vec(),
                next: file.search_input.next.into_vec(),
                prev: file.search_input.prev.into_vec(),
            },
            search_results: SearchResultsKeys {
                cancel: file.search_results.cancel.into_vec(),
                confirm: file.search_results.confirm.into_vec(),
                next: file.search_results.next.into_vec(),
                prev: file.search_results.prev.into_vec(),
                page_down: file.search_results.page_down.into_vec(),
                page_up: file.search_results.page_up.into_vec(),
            },
            detail: DetailKeys {
                back: file.detail.back.into_vec(),
                next: file.detail.next.into_vec(),
                prev: file.detail.prev.into_vec(),
            },
        }
    }
}

// =============================================================================
// Key binding validation
// =============================================================================

/// Normalize a key binding string to a canonical form for collision
/// detection. Single characters preserve case (since 'M' means Shift+m,
/// different from 'm'). Multi-character key names are case-insensitive
/// (Enter, ENTER, enter are the same).
fn normalize_binding(binding: &str) -> String {
    let trimmed = binding.trim();
    if trimmed.len() == 1 {
        trimmed.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Check for collisions within a single context
fn check_context_collisions(bindings: &[(&str, &[String])], context_name: &str) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (action_name, keys) in bindings {
        for key in *keys {
            let normalized = normalize_binding(key);
            if normalized.is_empty() {
                continue;
            }
            if let Some(existing_action) = seen.get(&normalized) {
                bail!(
                    "key binding collision in [keys.{}]: '{}' is bound to both '{}' and '{}'",
                    context_name,
                    key,
                    existing_action,
                    action_name
                );
            }
            seen.insert(normalized, action_name);
        }
    }

    Ok(())
}

/// Validate all key bindings for collisions within each context
fn validate_key_bindings(keys: &Keys) -> Result<()> {
    check_context_collisions(
        &[
            ("quit", &keys.global.quit),
            ("search", &keys.global.search),
        ],
        "global",
    )?;

    check_context_collisions(
        &[
            ("cancel", &keys.search_input.cancel),
            ("confirm", &keys.search_input.confirm),
            ("next", &keys.search_input.next),
            ("prev", &keys.search_input.prev),
        ],
        "search_input",
    )?;

    check_context_collisions(
        &[
            ("cancel", &keys.search_results.cancel),
            ("confirm", &keys.search_results.confirm),
            ("next", &keys.search_results.next),
            ("prev", &keys.search_results.prev),
            ("page_down", &keys.search_results.page_down),
            ("page_up", &keys.search_results.page_up),
        ],
        "search_results",
    )?;

    check_context_collisions(
        &[
            ("back", &keys.detail.back),
            ("next", &keys.detail.next),
            ("prev", &keys.detail.prev),
        ],
        "detail",
    )?;

    Ok(())
}

// =============================================================================
// UI config types
// =============================================================================

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
}

#[derive(Debug, Clone, Copy)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiFile {
    colors: UiColorsFile,
}

impl Default for UiFile {
    fn default() -> Self {
        Self {
            colors: UiColorsFile::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiColorsFile {
    border: RgbColor,
    selection_bg: RgbColor,
    selection_fg: RgbColor,
    status_fg: RgbColor,
    status_bg: RgbColor,
}

impl Default for UiColorsFile {
    fn default() -> Self {
        Self {
            border: RgbColor::new(255, 255, 255),
            selection_bg: RgbColor::new(255, 255, 255),
            selection_fg: RgbColor::new(15, 15, 16),
            status_fg: RgbColor::new(255, 255, 255),
            status_bg: RgbColor::new(15, 15, 16),
        }
    }
}

impl From<UiFile> for UiConfig {
    fn from(file: UiFile) -> Self {
        Self {
            colors: UiColors {
                border: file.colors.border,
                selection_bg: file.colors.selection_bg,
                selection_fg: file.colors.selection_fg,
                status_fg: file.colors.status_fg,
                status_bg: file.colors.status_bg,
            },
        }
    }
}

// =============================================================================
// Config file structure
// =============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    keys: KeysFile,
    ui: UiFile,
}

// =============================================================================
// Unknown key warnings
// =============================================================================

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["api_url", "keys", "ui"]);

    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown configuration key `{}`", key);
        }
    }

    if let Some(keys_val) = table.get("keys") {
        warn_unknown_keys_section(keys_val);
    }

    if let Some(ui_val) = table.get("ui") {
        warn_unknown_ui_keys(ui_val);
    }
}

fn warn_unknown_keys_section(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known_contexts =
        HashSet::from(["global", "search_input", "search_results", "detail"]);

    for key in table.keys() {
        if !known_contexts.contains(key.as_str()) {
            eprintln!("warning: unknown keys.* context `{}`", key);
        }
    }

    if let Some(v) = table.get("global") {
        warn_unknown_in_context(v, "global", &["quit", "search"]);
    }
    if let Some(v) = table.get("search_input") {
        warn_unknown_in_context(v, "search_input", &["cancel", "confirm", "next", "prev"]);
    }
    if let Some(v) = table.get("search_results") {
        warn_unknown_in_context(
            v,
            "search_results",
            &["cancel", "confirm", "next", "prev", "page_down", "page_up"],
        );
    }
    if let Some(v) = table.get("detail") {
        warn_unknown_in_context(v, "detail", &["back", "next", "prev"]);
    }
}

fn warn_unknown_in_context(value: &toml::Value, context: &str, known: &[&str]) {
    let Some(table) = value.as_table() else {
        return;
    };
    let known_set: HashSet<&str> = known.iter().copied().collect();
    for key in table.keys() {
        if !known_set.contains(key.as_str()) {
            eprintln!("warning: unknown keys.{}.* entry `{}`", context, key);
        }
    }
}

fn warn_unknown_ui_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["colors"]);

    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown ui.* entry `{}`", key);
        }
    }

    if let Some(colors_val) = table.get("colors") {
        let Some(colors) = colors_val.as_table() else {
            return;
        };
        let known = HashSet::from([
            "border",
            "selection_bg",
            "selection_fg",
            "status_fg",
            "status_bg",
        ]);
        for key in colors.keys() {
            if !known.contains(key.as_str()) {
                eprintln!("warning: unknown ui.colors entry `{}`", key);
            }
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

fn parse(raw: &str, origin: &Path) -> Result<Config> {
    let value: toml::Value = toml::from_str(raw)
        .with_context(|| format!("failed to parse {} as TOML", origin.display()))?;

    warn_unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", origin.display()))?;

    let api_url = cfg_file
        .api_url
        .as_ref()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| value.trim_end_matches('/').to_string());

    let keys: Keys = cfg_file.keys.into();
    validate_key_bindings(&keys)?;

    Ok(Config {
        config_path: origin.to_path_buf(),
        api_url,
        keys,
        ui: cfg_file.ui.into(),
    })
}

/// Load the configuration. A missing file is not an error: every setting
/// has a default except the API URL, which may also arrive via the
/// `--api-url` flag or the environment.
pub fn load(path_override: Option<&Path>) -> Result<Config> {
    let path = match path_override {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    if !path.exists() {
        if path_override.is_some() {
            bail!("configuration file not found at {}", path.display());
        }
        return Ok(Config {
            config_path: path,
            api_url: None,
            keys: Keys::default(),
            ui: UiFile::default().into(),
        });
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

    parse(&raw, &path)
}

/// Resolve the catalog base URL: `--api-url` flag, then the environment,
/// then the config file.
pub fn resolve_api_url(flag: Option<&str>, config: &Config) -> Result<String> {
    if let Some(url) = flag.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(url.trim_end_matches('/').to_string());
    }
    if let Ok(url) = env::var(API_URL_ENV) {
        let url = url.trim().to_string();
        if !url.is_empty() {
            return Ok(url.trim_end_matches('/').to_string());
        }
    }
    if let Some(url) = &config.api_url {
        return Ok(url.clone());
    }
    bail!(
        "no catalog URL configured: pass --api-url, set {}, or add `api_url` to {}",
        API_URL_ENV,
        config.config_path.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(raw: &str) -> Result<Config> {
        parse(raw, Path::new("test-config.toml"))
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_str("").unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.keys.global.quit, vec!["q".to_string()]);
        assert_eq!(config.keys.search_input.confirm, vec!["Enter".to_string()]);
    }

    #[test]
    fn test_api_url_is_trimmed_and_normalized() {
        let config = parse_str("api_url = \" http://localhost:3000/ \"").unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_blank_api_url_counts_as_absent() {
        let config = parse_str("api_url = \"  \"").unwrap();
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_single_string_binding() {
        let config = parse_str("[keys.global]\nquit = \"x\"").unwrap();
        assert_eq!(config.keys.global.quit, vec!["x".to_string()]);
    }

    #[test]
    fn test_array_binding() {
        let config = parse_str("[keys.search_results]\nnext = [\"n\", \"Down\"]").unwrap();
        assert_eq!(
            config.keys.search_results.next,
            vec!["n".to_string(), "Down".to_string()]
        );
    }

    #[test]
    fn test_key_collision_is_rejected() {
        let raw = "[keys.search_results]\nnext = \"j\"\nprev = \"j\"";
        let err = parse_str(raw).unwrap_err();
        assert!(err.to_string().contains("collision"));
    }

    #[test]
    fn test_single_char_bindings_are_case_sensitive() {
        // 'M' is Shift+m, a different key from 'm'.
        let raw = "[keys.search_results]\nnext = \"m\"\nprev = \"M\"";
        assert!(parse_str(raw).is_ok());
    }

    #[test]
    fn test_named_key_collision_is_case_insensitive() {
        let raw = "[keys.search_input]\ncancel = \"ESCAPE\"\nconfirm = \"escape\"";
        assert!(parse_str(raw).is_err());
    }

    #[test]
    fn test_rgb_color_array_form() {
        let config = parse_str("[ui.colors]\nborder = [10, 20, 30]").unwrap();
        let border = config.ui.colors.border;
        assert_eq!((border.r, border.g, border.b), (10, 20, 30));
    }

    #[test]
    fn test_rgb_color_map_form() {
        let config = parse_str("[ui.colors]\nborder = { r = 1, g = 2, b = 3 }").unwrap();
        let border = config.ui.colors.border;
        assert_eq!((border.r, border.g, border.b), (1, 2, 3));
    }

    #[test]
    fn test_resolve_api_url_prefers_flag() {
        let config = parse_str("api_url = \"http://from-config\"").unwrap();
        let url = resolve_api_url(Some("http://from-flag/"), &config).unwrap();
        assert_eq!(url, "http://from-flag");
    }

    #[test]
    fn test_resolve_api_url_falls_back_to_config() {
        let config = parse_str("api_url = \"http://from-config\"").unwrap();
        let url = resolve_api_url(None, &config).unwrap();
        assert_eq!(url, "http://from-config");
    }

    #[test]
    fn test_resolve_api_url_fails_when_unset() {
        let config = parse_str("").unwrap();
        assert!(resolve_api_url(None, &config).is_err());
    }
}
