use crate::{Error, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use feedlm_core::target::UrlPattern;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Connection to a Chrome started with `--remote-debugging-port`
pub struct CdpSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl CdpSession {
    /// Connect to Chrome, retrying while it finishes starting up
    pub async fn connect(debugging_port: u16) -> Result<Self> {
        tracing::info!("CDP session: connecting to Chrome on port {}", debugging_port);

        let endpoint = format!("http://localhost:{}", debugging_port);
        let (browser, mut handler) = {
            let mut retries = CONNECT_ATTEMPTS;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", endpoint);
                match Browser::connect(&endpoint).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(Error::Cdp(format!(
                                "Failed to connect to Chrome on port {} after {} attempts: {}. \
                                 Is it running? Start it with `feedlm chrome`.",
                                debugging_port, CONNECT_ATTEMPTS, e
                            )));
                        }
                        tracing::info!(
                            "CDP connection attempt failed, retrying... ({} left)",
                            retries
                        );
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        };

        // The handler must be polled for any browser command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Existing tabs are attached asynchronously after connecting.
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// First open tab whose URL matches `pattern`, with that URL
    pub async fn find_tab(&self, pattern: &UrlPattern) -> Result<(Page, String)> {
        let mut seen = Vec::new();
        for page in self.browser.pages().await? {
            let Some(url) = page.url().await? else {
                continue;
            };
            if pattern.matches(&url) {
                tracing::info!("Using tab {}", url);
                return Ok((page, url));
            }
            tracing::debug!("Skipping tab {}", url);
            seen.push(url);
        }
        Err(Error::NoMatchingTab {
            pattern: pattern.as_str().to_string(),
            open: seen,
        })
    }
}

impl Drop for CdpSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
