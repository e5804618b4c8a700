//! YouTube page classification and link normalisation.
//!
//! The scraper itself runs inside the browser; this module holds the pieces
//! of it that do not need a page: deciding what kind of page a tab shows and
//! cleaning the links it reports.

use crate::{Error, Result, WorkItem};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

lazy_static! {
    static ref PLAYLIST_PATTERN: Regex = Regex::new(r"/playlist\?(?:.*&)?list=").unwrap();
    static ref WATCH_PATTERN: Regex = Regex::new(r"/watch\?(?:.*&)?v=").unwrap();
}

/// Query parameters that tie a watch link to its playlist context
const PLAYLIST_CONTEXT_PARAMS: &[&str] = &["list", "index"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Playlist,
    Watch,
    Unsupported,
}

impl PageKind {
    pub fn from_url(url: &str) -> Self {
        if !url.contains("youtube.com") {
            return PageKind::Unsupported;
        }
        if PLAYLIST_PATTERN.is_match(url) {
            PageKind::Playlist
        } else if WATCH_PATTERN.is_match(url) {
            PageKind::Watch
        } else {
            PageKind::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Playlist => "playlist",
            PageKind::Watch => "video",
            PageKind::Unsupported => "unsupported",
        }
    }
}

/// Strip playlist context (`list`, `index`) from a watch link
pub fn clean_video_link(link: &str) -> Result<String> {
    let mut url = Url::parse(link)
        .map_err(|e| Error::InvalidItem(format!("invalid link '{}': {}", link, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !PLAYLIST_CONTEXT_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(url.to_string())
}

/// What a scrape of a YouTube tab produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Extraction {
    Playlist { items: Vec<WorkItem> },
    Single { item: WorkItem },
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_kind_detection() {
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/playlist?list=PL123"),
            PageKind::Playlist
        );
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/watch?v=abc&list=PL1"),
            PageKind::Watch
        );
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/watch?t=10&v=abc"),
            PageKind::Watch
        );
        assert_eq!(
            PageKind::from_url("https://www.youtube.com/@channel"),
            PageKind::Unsupported
        );
        assert_eq!(
            PageKind::from_url("https://notebooklm.google.com/notebook/1"),
            PageKind::Unsupported
        );
    }

    #[test]
    fn test_clean_video_link_drops_playlist_context() {
        let cleaned =
            clean_video_link("https://www.youtube.com/watch?v=abc&list=PL1&index=4").unwrap();
        assert_eq!(cleaned, "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_clean_video_link_keeps_other_params() {
        let cleaned = clean_video_link("https://www.youtube.com/watch?v=abc&t=42s").unwrap();
        assert_eq!(cleaned, "https://www.youtube.com/watch?v=abc&t=42s");
    }

    #[test]
    fn test_clean_video_link_rejects_garbage() {
        assert!(clean_video_link("not a url").is_err());
    }
}
