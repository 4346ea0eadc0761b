use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Opener {
    /// Hand `url` to a handler. Fire-and-forget: failures are only logged.
    fn open(&self, url: &str);
}

pub fn from_config(open_command: Option<&str>) -> Box<dyn Opener> {
    match open_command.and_then(CommandOpener::parse) {
        Some(cmd) => Box::new(cmd),
        None => Box::new(PlatformOpener::detect()),
    }
}

/// The host's default URL/file handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformOpener {
    MacOs,
    Windows,
    Unix,
}

impl PlatformOpener {
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    fn for_os(os: &str) -> Self {
        match os {
            "macos" => PlatformOpener::MacOs,
            "windows" => PlatformOpener::Windows,
            _ => PlatformOpener::Unix,
        }
    }

    fn try_open(&self, url: &str) -> Result<()> {
        match self {
            PlatformOpener::MacOs => run_quiet("open", &[], url),
            PlatformOpener::Windows => open::that(url).context("shell open failed"),
            PlatformOpener::Unix => match run_quiet("xdg-open", &[], url) {
                Ok(()) => Ok(()),
                Err(err) => {
                    debug!("xdg-open: {:#}, trying system default", err);
                    open::that(url).context("system open failed")
                }
            },
        }
    }
}

impl Opener for PlatformOpener {
    fn open(&self, url: &str) {
        if let Err(err) = self.try_open(url) {
            debug!("failed to open {}: {:#}", url, err);
        }
    }
}

/// A user-configured command; the URL is appended as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    pub fn parse(cmdline: &str) -> Option<Self> {
        let mut parts = cmdline.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Opener for CommandOpener {
    fn open(&self, url: &str) {
        if let Err(err) = run_quiet(&self.program, &self.args, url) {
            debug!("failed to open {}: {:#}", url, err);
        }
    }
}

fn run_quiet(program: &str, args: &[String], url: &str) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .arg(url)
        .stdout(Stdio::null())
        .status()
        .with_context(|| format!("failed to run {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_by_os_name() {
        assert_eq!(PlatformOpener::for_os("macos"), PlatformOpener::MacOs);
        assert_eq!(PlatformOpener::for_os("windows"), PlatformOpener::Windows);
        assert_eq!(PlatformOpener::for_os("linux"), PlatformOpener::Unix);
        assert_eq!(PlatformOpener::for_os("freebsd"), PlatformOpener::Unix);
    }

    #[test]
    fn command_line_split() {
        let cmd = CommandOpener::parse("  firefox --new-tab ").unwrap();
        assert_eq!(cmd.program, "firefox");
        assert_eq!(cmd.args, ["--new-tab"]);
        assert!(CommandOpener::parse("   ").is_none());
    }

    #[test]
    fn missing_command_is_swallowed() {
        let cmd = CommandOpener::parse("url-select-no-such-opener").unwrap();
        cmd.open("https://example.com/a");
        assert!(run_quiet("url-select-no-such-opener", &[], "x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_error() {
        assert!(run_quiet("false", &[], "https://example.com/a").is_err());
        assert!(run_quiet("true", &[], "https://example.com/a").is_ok());
    }
}
