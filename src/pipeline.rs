use tracing::debug;

use crate::activity_log::Recorder;
use crate::extract::extract_urls;
use crate::kitty::{TextFetcher, WindowLocator};
use crate::open_url::Opener;
use crate::select::Selector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoUrls,
    Cancelled,
    Opened(String),
}

pub struct Pipeline<'a> {
    pub locator: &'a dyn WindowLocator,
    pub fetcher: &'a dyn TextFetcher,
    pub selector: &'a dyn Selector,
    pub opener: &'a dyn Opener,
    pub recorder: Option<&'a dyn Recorder>,
    pub prompt: &'a str,
}

impl Pipeline<'_> {
    pub fn run(&self) -> Outcome {
        let text = match self.locator.active_window() {
            Some(id) => {
                debug!("active window {}", id);
                self.fetcher.fetch_text(id)
            }
            None => {
                debug!("no active window");
                String::new()
            }
        };

        let urls = extract_urls(&text);
        debug!("{} candidate(s) in {} bytes of text", urls.len(), text.len());
        if urls.is_empty() {
            return Outcome::NoUrls;
        }

        let Some(url) = self
            .selector
            .select(self.prompt, &urls)
            .filter(|u| !u.trim().is_empty())
        else {
            return Outcome::Cancelled;
        };

        self.opener.open(&url);
        if let Some(recorder) = self.recorder {
            recorder.record(&format!("opened {}", url));
        }
        Outcome::Opened(url)
    }
}
