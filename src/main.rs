mod activity_log;
mod config;
mod extract;
mod kitty;
mod logging;
mod open_url;
mod pipeline;
mod select;

use std::env;
use tracing::{debug, warn};

use activity_log::{FileRecorder, Recorder};
use kitty::KittyRemote;
use pipeline::Pipeline;

fn main() {
    logging::init_logging();

    // Minimal CLI: optional --config <path>
    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(p) = args.next() { config_override = Some(p); }
            }
            "-h" | "--help" => {
                print_help();
                return;
            }
            _ => {}
        }
    }

    let cfg = config::load(config_override).unwrap_or_else(|err| {
        warn!("{:#}; using defaults", err);
        config::RuntimeConfig::default()
    });

    let kitty = KittyRemote::new(&cfg);
    let selector = select::from_config(&cfg);
    let opener = open_url::from_config(cfg.open_command.as_deref());
    let recorder = cfg.log_file.as_deref().and_then(FileRecorder::in_home);
    if let Some(r) = &recorder {
        debug!("recording to {}", r.path().display());
    }

    let outcome = Pipeline {
        locator: &kitty,
        fetcher: &kitty,
        selector: selector.as_ref(),
        opener: opener.as_ref(),
        recorder: recorder.as_ref().map(|r| r as &dyn Recorder),
        prompt: &cfg.prompt,
    }
    .run();
    debug!("{:?}", outcome);
}

fn print_help() {
    println!("url-select");
    println!("Pick a URL from the focused kitty window and open it.");
    println!("Usage: url-select [--config <path>]");
    println!("  --config <path>   Path to a config.toml (default: ~/.config/url-select/config.toml)");
    println!("  {}=<filter>  Diagnostics on stderr (e.g. debug)", logging::LOG_ENV);
}
