use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of title characters shown in progress messages
pub const TITLE_PREVIEW_CHARS: usize = 30;

/// A single video queued for insertion into a notebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub title: String,
    pub link: String,
}

impl WorkItem {
    /// Create a work item, rejecting an empty link
    ///
    /// The title is not validated; only the link matters for insertion.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Result<Self> {
        let item = Self {
            title: title.into().trim().to_string(),
            link: link.into().trim().to_string(),
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<()> {
        if self.link.trim().is_empty() {
            return Err(Error::InvalidItem(format!(
                "missing link for \"{}\"",
                self.title_preview()
            )));
        }
        Ok(())
    }

    /// Shortened title used in status messages, e.g. `Some long title th...`
    pub fn title_preview(&self) -> String {
        let mut chars = self.title.chars();
        let head: String = chars.by_ref().take(TITLE_PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}
