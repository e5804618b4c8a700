use glob::Pattern;

/// Default tab pattern for an open notebook
pub const DEFAULT_NOTEBOOK_PATTERN: &str = "https://notebooklm.google.com/notebook/*";

/// Default tab pattern for a YouTube page that can be scraped
pub const DEFAULT_YOUTUBE_PATTERN: &str = "https://www.youtube.com/*";

/// Pattern used to pick a browser tab by its URL
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Exact URL match (case-insensitive)
    Exact(String),
    /// Glob pattern match (e.g., https://notebooklm.google.com/notebook/*)
    Glob(Pattern),
}

impl UrlPattern {
    /// Parse a pattern string into a UrlPattern
    ///
    /// If the pattern contains '*' or '?', it's treated as a glob pattern.
    /// Otherwise, it's treated as an exact match (case-insensitive).
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        if pattern.contains('*') || pattern.contains('?') {
            let pattern_lower = pattern.to_lowercase();
            let glob_pattern = Pattern::new(&pattern_lower).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            Ok(UrlPattern::Glob(glob_pattern))
        } else {
            Ok(UrlPattern::Exact(pattern.to_lowercase()))
        }
    }

    /// Check if a tab URL matches this pattern
    pub fn matches(&self, url: &str) -> bool {
        let url_lower = url.to_lowercase();
        match self {
            UrlPattern::Exact(pattern) => &url_lower == pattern,
            UrlPattern::Glob(pattern) => pattern.matches(&url_lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UrlPattern::Exact(pattern) => pattern,
            UrlPattern::Glob(pattern) => pattern.as_str(),
        }
    }
}
