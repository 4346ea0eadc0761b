//! kitty remote control (`kitty @`): finding the pane the user is looking at
//! and dumping its visible text.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::config::RuntimeConfig;

/// Opaque pane identifier as reported by `kitty @ ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait WindowLocator {
    fn active_window(&self) -> Option<WindowId>;
}

pub trait TextFetcher {
    /// Visible text of `window`; empty when the pane is gone or kitty can't be reached.
    fn fetch_text(&self, window: WindowId) -> String;
}

#[derive(Debug, Deserialize)]
pub struct OsWindow {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_focused: bool,
    #[serde(default)]
    pub windows: Vec<Window>,
}

#[derive(Debug, Deserialize)]
pub struct Window {
    pub id: WindowId,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub at_prompt: bool,
    #[serde(default)]
    pub in_alternate_screen: bool,
}

/// First window of the active, focused tab that is ours, at a prompt, or
/// running a full-screen program.
pub fn find_active_window(os_windows: &[OsWindow]) -> Option<WindowId> {
    os_windows
        .iter()
        .flat_map(|w| &w.tabs)
        .filter(|t| t.is_active && t.is_focused)
        .flat_map(|t| &t.windows)
        .find(|w| w.is_self || w.at_prompt || w.in_alternate_screen)
        .map(|w| w.id)
}

#[derive(Debug, Clone)]
pub struct KittyRemote {
    program: String,
    listen_on: Option<String>,
    extent: Option<String>,
}

impl KittyRemote {
    pub fn new(cfg: &RuntimeConfig) -> Self {
        Self {
            program: cfg.kitty.clone(),
            listen_on: cfg.listen_on.clone(),
            extent: cfg.extent.clone(),
        }
    }

    fn base_args(&self) -> Vec<String> {
        let mut args = vec!["@".to_string()];
        if let Some(addr) = &self.listen_on {
            args.push("--to".into());
            args.push(addr.clone());
        }
        args
    }

    fn ls_args(&self) -> Vec<String> {
        let mut args = self.base_args();
        args.push("ls".into());
        args
    }

    fn get_text_args(&self, window: WindowId) -> Vec<String> {
        let mut args = self.base_args();
        args.push("get-text".into());
        args.push("--match".into());
        args.push(format!("id:{}", window));
        if let Some(extent) = &self.extent {
            args.push("--extent".into());
            args.push(extent.clone());
        }
        args
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("failed to run {} {}", self.program, args.join(" ")))?;
        if !output.status.success() {
            bail!("{} {} exited with {}", self.program, args.join(" "), output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_windows(&self) -> Result<Vec<OsWindow>> {
        let out = self.run(&self.ls_args())?;
        serde_json::from_str(&out).context("failed to parse kitty window list")
    }
}

impl WindowLocator for KittyRemote {
    fn active_window(&self) -> Option<WindowId> {
        match self.list_windows() {
            Ok(windows) => find_active_window(&windows),
            Err(err) => {
                debug!("window lookup failed: {:#}", err);
                None
            }
        }
    }
}

impl TextFetcher for KittyRemote {
    fn fetch_text(&self, window: WindowId) -> String {
        self.run(&self.get_text_args(window)).unwrap_or_else(|err| {
            debug!("get-text for window {} failed: {:#}", window, err);
            String::new()
        })
    }
}
