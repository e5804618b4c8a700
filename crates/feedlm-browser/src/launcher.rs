use crate::cdp_session::DEFAULT_DEBUGGING_PORT;
use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Starts Chrome with remote debugging so `feedlm run` and `feedlm extract`
/// can attach to it later
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    initial_urls: Vec<String>,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf, initial_urls: Vec<String>) -> Self {
        Self {
            chrome_path,
            profile_path,
            initial_urls,
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }

    pub fn with_debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
        ];

        if self.initial_urls.is_empty() {
            args.push("about:blank".to_string());
        }
        for url in &self.initial_urls {
            if url.starts_with("http://") || url.starts_with("https://") {
                args.push(url.clone());
            } else {
                args.push(format!("https://{}", url));
            }
        }

        args
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}
