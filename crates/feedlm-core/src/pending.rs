use crate::{Error, Result, WorkItem};
use serde::{Deserialize, Serialize};

/// The controller's durable list of videos waiting to be inserted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingList {
    items: Vec<WorkItem>,
}

impl PendingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.items.iter().any(|item| item.link == link)
    }

    /// Append an item unless its link is already listed. Returns whether it was added.
    pub fn add(&mut self, item: WorkItem) -> Result<bool> {
        item.validate()?;
        if self.contains_link(&item.link) {
            return Ok(false);
        }
        self.items.push(item);
        Ok(true)
    }

    /// Replace the whole list, as a playlist extraction does
    pub fn replace(&mut self, items: Vec<WorkItem>) {
        self.items = items;
    }

    /// Remove the item at a zero-based position
    pub fn remove_at(&mut self, index: usize) -> Result<WorkItem> {
        if index >= self.items.len() {
            return Err(Error::ItemNotFound(index + 1));
        }
        Ok(self.items.remove(index))
    }

    /// Remove every item whose link equals `link`. Returns the number removed.
    ///
    /// Reconciliation is by link, never by index: the list may have been
    /// edited since the batch snapshot was taken.
    pub fn remove_link(&mut self, link: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.link != link);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Copy handed to a batch run
    pub fn snapshot(&self) -> Vec<WorkItem> {
        self.items.clone()
    }
}
