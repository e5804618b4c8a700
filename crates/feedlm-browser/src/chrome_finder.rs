use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable read by `feedlm chrome --chrome-path`
pub const CHROME_PATH_ENV: &str = "FEEDLM_CHROME";

/// Executable names looked up on `PATH` after the install locations
const PATH_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "linux")]
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[cfg(target_os = "windows")]
const INSTALL_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const INSTALL_LOCATIONS: &[&str] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeSource {
    /// Given with `--chrome-path` or the environment
    Explicit,
    Installed,
    OnPath,
}

impl fmt::Display for ChromeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChromeSource::Explicit => "configured",
            ChromeSource::Installed => "installed",
            ChromeSource::OnPath => "on PATH",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeBinary {
    pub path: PathBuf,
    pub source: ChromeSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    File(PathBuf, ChromeSource),
    Command(&'static str),
}

impl Candidate {
    fn describe(&self) -> String {
        match self {
            Candidate::File(path, _) => path.display().to_string(),
            Candidate::Command(name) => format!("{} (PATH)", name),
        }
    }
}

/// Picks the Chrome binary that `feedlm chrome` launches
///
/// An explicit path is final: if it is unusable the search stops there
/// instead of silently launching some other browser.
pub struct ChromeFinder {
    explicit: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    pub fn find(&self) -> Result<ChromeBinary> {
        if let Some(ref path) = self.explicit {
            check_executable(path)?;
            return Ok(ChromeBinary {
                path: path.clone(),
                source: ChromeSource::Explicit,
            });
        }

        let candidates = self.candidates();
        for candidate in &candidates {
            match candidate {
                Candidate::File(path, source) => {
                    if check_executable(path).is_ok() {
                        return Ok(ChromeBinary {
                            path: path.clone(),
                            source: *source,
                        });
                    }
                }
                Candidate::Command(name) => {
                    if let Ok(path) = which::which(name) {
                        tracing::debug!("Resolved {} to {}", name, path.display());
                        return Ok(ChromeBinary {
                            path,
                            source: ChromeSource::OnPath,
                        });
                    }
                }
            }
        }

        let tried: Vec<String> = candidates.iter().map(Candidate::describe).collect();
        Err(Error::Browser(format!(
            "No Chrome or Chromium found (tried {}). Pass --chrome-path or set {}.",
            tried.join(", "),
            CHROME_PATH_ENV
        )))
    }

    fn candidates(&self) -> Vec<Candidate> {
        INSTALL_LOCATIONS
            .iter()
            .map(|p| Candidate::File(PathBuf::from(p), ChromeSource::Installed))
            .chain(PATH_COMMANDS.iter().copied().map(Candidate::Command))
            .collect()
    }
}

fn check_executable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| Error::Browser(format!("Chrome not found at {}", path.display())))?;
    if !metadata.is_file() {
        return Err(Error::Browser(format!(
            "Chrome path is not a file: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome at {} is not executable",
                path.display()
            )));
        }
    }

    Ok(())
}
