use feedlm_driver::HostError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("No open tab matches {pattern} (open tabs: {})", describe_tabs(.open))]
    NoMatchingTab { pattern: String, open: Vec<String> },

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

fn describe_tabs(open: &[String]) -> String {
    if open.is_empty() {
        "none".to_string()
    } else {
        open.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Page-level failures the driver sees while it is automating a tab
pub(crate) fn host_error(err: chromiumoxide::error::CdpError) -> HostError {
    match err {
        chromiumoxide::error::CdpError::JavascriptException(details) => {
            HostError::Script(details.text.clone())
        }
        other => HostError::Cdp(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_tab_lists_open_tabs() {
        let err = Error::NoMatchingTab {
            pattern: "https://notebooklm.google.com/notebook/*".to_string(),
            open: vec!["https://www.youtube.com/watch?v=abc".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No open tab matches https://notebooklm.google.com/notebook/* \
             (open tabs: https://www.youtube.com/watch?v=abc)"
        );

        let err = Error::NoMatchingTab {
            pattern: "x".to_string(),
            open: Vec::new(),
        };
        assert!(err.to_string().ends_with("(open tabs: none)"));
    }
}
