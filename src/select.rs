use anyhow::{Context, Result};
use console::Term;
use dialoguer::FuzzySelect;
use dialoguer::theme::ColorfulTheme;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::config::{RuntimeConfig, SelectorKind};

pub trait Selector {
    /// Let the user pick one of `choices`. `None` on cancel or when there is nothing to pick.
    fn select(&self, prompt: &str, choices: &[String]) -> Option<String>;
}

pub fn from_config(cfg: &RuntimeConfig) -> Box<dyn Selector> {
    match cfg.selector {
        SelectorKind::Fzf => Box::new(FzfSelector {
            program: cfg.fzf_command.clone(),
            args: cfg.fzf_args.clone(),
        }),
        SelectorKind::Builtin => Box::new(BuiltinSelector),
    }
}

/// External fzf-compatible picker fed one choice per line.
#[derive(Debug, Clone)]
pub struct FzfSelector {
    pub program: String,
    pub args: Vec<String>,
}

impl FzfSelector {
    fn command_args(&self, prompt: &str) -> Vec<String> {
        let mut args = vec![format!("--prompt={}", prompt)];
        args.extend(self.args.iter().cloned());
        args
    }

    fn run(&self, prompt: &str, choices: &[String]) -> io::Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(self.command_args(prompt))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        // Dropping stdin closes it so the picker sees EOF; a picker that quits
        // early still has to be reaped below.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(choices.join("\n").as_bytes()) {
                debug!("writing choices to {} failed: {}", self.program, err);
            }
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            debug!("{} exited with {}", self.program, output.status);
            return Ok(None);
        }
        Ok(non_blank(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Selector for FzfSelector {
    fn select(&self, prompt: &str, choices: &[String]) -> Option<String> {
        if choices.is_empty() {
            return None;
        }
        match self.run(prompt, choices) {
            Ok(picked) => picked,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using builtin picker", self.program);
                BuiltinSelector.select(prompt, choices)
            }
            Err(err) => {
                debug!("{} failed: {}", self.program, err);
                None
            }
        }
    }
}

/// In-process fuzzy picker drawn on stderr, for hosts without fzf.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSelector;

impl BuiltinSelector {
    fn run(&self, prompt: &str, choices: &[String]) -> Result<Option<String>> {
        let term = Term::stderr();
        let picked = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(picker_label(prompt))
            .items(choices)
            .default(0)
            .interact_on_opt(&term)
            .context("fuzzy picker failed")?;
        Ok(picked.and_then(|i| choices.get(i)).and_then(|s| non_blank(s)))
    }
}

impl Selector for BuiltinSelector {
    fn select(&self, prompt: &str, choices: &[String]) -> Option<String> {
        if choices.is_empty() {
            return None;
        }
        self.run(prompt, choices).unwrap_or_else(|err| {
            debug!("{:#}", err);
            None
        })
    }
}

// dialoguer draws its own separator after the prompt
fn picker_label(prompt: &str) -> &str {
    prompt.trim_end().trim_end_matches(':').trim_end()
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_choices_never_launch_a_picker() {
        let fzf = FzfSelector {
            program: "url-select-no-such-picker".into(),
            args: vec![],
        };
        assert_eq!(fzf.select("Select URL: ", &[]), None);
        assert_eq!(BuiltinSelector.select("Select URL: ", &[]), None);
    }

    #[test]
    fn fzf_arguments() {
        let fzf = FzfSelector {
            program: "fzf".into(),
            args: vec!["--reverse".into(), "--no-sort".into()],
        };
        assert_eq!(
            fzf.command_args("Select URL: "),
            ["--prompt=Select URL: ", "--reverse", "--no-sort"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_picker_means_cancel() {
        let fzf = FzfSelector {
            program: "false".into(),
            args: vec![],
        };
        assert_eq!(fzf.select("p", &["https://a.example/x".to_string()]), None);
    }

    #[cfg(unix)]
    fn script_picker(dir: &std::path::Path, body: &str) -> FzfSelector {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("picker.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        FzfSelector {
            program: path.display().to_string(),
            args: vec![],
        }
    }

    #[cfg(unix)]
    #[test]
    fn picker_output_becomes_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let picker = script_picker(dir.path(), "printf '  %s  \\n' \"$(sed -n 2p)\"");
        let choices = vec!["https://a/x".to_string(), "https://b/y".to_string()];
        assert_eq!(picker.select("Select URL: ", &choices).as_deref(), Some("https://b/y"));
    }

    #[cfg(unix)]
    #[test]
    fn choices_are_fed_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let picker = script_picker(dir.path(), "cat");
        let choices = vec!["https://a/x".to_string(), "mailto:b@c.de".to_string()];
        assert_eq!(
            picker.select("p", &choices).as_deref(),
            Some("https://a/x\nmailto:b@c.de")
        );
    }

    #[cfg(unix)]
    #[test]
    fn picker_exiting_before_reading_is_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let picker = script_picker(dir.path(), "exit 130");
        let choices: Vec<String> = (0..20_000).map(|i| format!("https://x.example/{i}")).collect();
        assert_eq!(picker.select("p", &choices), None);
    }

    #[test]
    fn label_drops_trailing_colon() {
        assert_eq!(picker_label("Select URL: "), "Select URL");
        assert_eq!(picker_label("url>"), "url>");
    }

    #[test]
    fn blank_output_is_nothing() {
        assert_eq!(non_blank(" \n"), None);
        assert_eq!(non_blank("x\n").as_deref(), Some("x"));
    }
}
