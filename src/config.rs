use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::activity_log::DEFAULT_LOG_FILE;

pub const DEFAULT_PROMPT: &str = "Select URL: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    #[default]
    Fzf,
    Builtin,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub prompt: Option<String>,
    pub kitty: Option<String>,
    pub listen_on: Option<String>,
    pub extent: Option<String>,
    pub selector: Option<SelectorKind>,
    pub fzf_command: Option<String>,
    #[serde(default)]
    pub fzf_args: Vec<String>,
    pub open_command: Option<String>,
    #[serde(default)]
    pub record: bool,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub prompt: String,
    pub kitty: String,
    pub listen_on: Option<String>,
    pub extent: Option<String>,
    pub selector: SelectorKind,
    pub fzf_command: String,
    pub fzf_args: Vec<String>,
    pub open_command: Option<String>,
    /// Home-directory log file name, when opened URLs should be recorded.
    pub log_file: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        AppConfig::default().into()
    }
}

impl From<AppConfig> for RuntimeConfig {
    fn from(c: AppConfig) -> Self {
        RuntimeConfig {
            prompt: c.prompt.unwrap_or_else(|| DEFAULT_PROMPT.into()),
            kitty: c.kitty.unwrap_or_else(|| "kitty".into()),
            listen_on: c.listen_on,
            extent: c.extent,
            selector: c.selector.unwrap_or_default(),
            fzf_command: c.fzf_command.unwrap_or_else(|| "fzf".into()),
            fzf_args: c.fzf_args,
            open_command: c.open_command.filter(|s| !s.trim().is_empty()),
            log_file: c.record.then(|| {
                c.log_file
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.into())
            }),
        }
    }
}

pub fn parse(txt: &str) -> Result<RuntimeConfig> {
    let parsed: AppConfig = toml::from_str(txt)?;
    Ok(parsed.into())
}

/// Load from `config_override` if given, else the default location; built-in
/// defaults when there is no file.
pub fn load(config_override: Option<String>) -> Result<RuntimeConfig> {
    let path = match config_override {
        Some(p) => Some(PathBuf::from(p)),
        None => default_config_path().filter(|p| p.is_file()),
    };
    let Some(path) = path else {
        return Ok(RuntimeConfig::default());
    };
    let txt = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("url-select");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("url-select");
        p.push("config.toml");
        return Some(p);
    }
    None
}
