//! Work-item extraction from a YouTube tab.

use crate::error::Error;
use crate::Result;
use chromiumoxide::Page;
use feedlm_core::source::{Extraction, PageKind, clean_video_link};
use feedlm_core::WorkItem;
use serde::Deserialize;

const PLAYLIST_SCRIPT: &str = r#"(() => {
  const items = [];
  for (const row of document.querySelectorAll('ytd-playlist-video-renderer')) {
    const title = row.querySelector('#video-title');
    const link = row.querySelector('a#video-title');
    if (!title || !link) continue;
    items.push({ title: (title.textContent || '').trim(), link: link.href || '' });
  }
  return items;
})()"#;

/// Title sources for a watch page, most stable first
const TITLE_SELECTORS: &[&str] = &[
    "h1.ytd-watch-metadata #video-title",
    "h1.title yt-formatted-string.ytd-video-primary-info-renderer",
    "yt-formatted-string.ytd-watch-metadata[slot=\"title\"]",
    "#title h1 yt-formatted-string",
    "#info-contents .title yt-formatted-string",
];

const WATCH_SCRIPT: &str = r#"((selectors) => {
  const meta = document.querySelector('meta[property="og:title"]');
  let title = meta && meta.content ? meta.content.trim() : '';
  for (const selector of selectors) {
    if (title) break;
    const el = document.querySelector(selector);
    if (el && el.textContent) title = el.textContent.trim();
  }
  return { title, link: window.location.href };
})"#;

#[derive(Debug, Deserialize)]
struct RawVideo {
    title: String,
    link: String,
}

/// Reads work items out of a YouTube playlist or watch tab
pub struct Scraper {
    page: Page,
}

impl Scraper {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Extract from whatever kind of page the tab is showing
    ///
    /// Page-level problems come back as [`Extraction::Failed`]; only
    /// transport failures are errors.
    pub async fn extract(&self) -> Result<Extraction> {
        let url = self.page.url().await?.unwrap_or_default();
        let kind = PageKind::from_url(&url);
        tracing::info!("Extracting from {} page: {}", kind.as_str(), url);

        match kind {
            PageKind::Playlist => self.extract_playlist().await,
            PageKind::Watch => self.extract_single().await,
            PageKind::Unsupported => Ok(Extraction::Failed {
                error: "Page is not a YouTube playlist or video page.".to_string(),
            }),
        }
    }

    async fn extract_playlist(&self) -> Result<Extraction> {
        let raw: Vec<RawVideo> = self
            .page
            .evaluate(PLAYLIST_SCRIPT)
            .await?
            .into_value()
            .map_err(|e| Error::Extraction(e.to_string()))?;
        if raw.is_empty() {
            tracing::warn!("No playlist rows found; the playlist may be empty or its markup changed");
        }
        Ok(Extraction::Playlist {
            items: playlist_items(raw),
        })
    }

    async fn extract_single(&self) -> Result<Extraction> {
        let selectors = serde_json::to_string(TITLE_SELECTORS)
            .map_err(|e| Error::Extraction(e.to_string()))?;
        let script = format!("{}({})", WATCH_SCRIPT, selectors);
        let raw: RawVideo = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| Error::Extraction(e.to_string()))?;
        Ok(single_item(raw))
    }
}

fn playlist_items(raw: Vec<RawVideo>) -> Vec<WorkItem> {
    raw.into_iter()
        .filter_map(|video| match WorkItem::new(video.title, video.link) {
            Ok(item) if !item.title.is_empty() => Some(item),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Skipping playlist row: {}", e);
                None
            }
        })
        .collect()
}

fn single_item(raw: RawVideo) -> Extraction {
    if raw.title.trim().is_empty() {
        return Extraction::Failed {
            error: "Failed to extract title for the current video. Selectors might be outdated."
                .to_string(),
        };
    }
    let item = clean_video_link(&raw.link).and_then(|link| WorkItem::new(raw.title, link));
    match item {
        Ok(item) => Extraction::Single { item },
        Err(e) => Extraction::Failed {
            error: e.to_string(),
        },
    }
}
