//! Controller-side bookkeeping for automation batches.
//!
//! The controller owns the pending list and the durable session record. It
//! gates `start` so that only one batch is ever in flight, and folds the
//! driver's status events back into its own state.

use crate::source::Extraction;
use crate::{AutomationEvent, Error, PendingList, Result, SessionState, Store, WorkItem};

pub struct Controller {
    store: Store,
    pending: PendingList,
    session: Option<SessionState>,
}

impl Controller {
    /// Restore controller state from the store
    pub fn open(store: Store) -> Result<Self> {
        let pending = store.load_pending()?;
        let session = store.load_session()?;
        if let Some(ref s) = session {
            tracing::debug!(
                "Restored session: running={} processed={}/{}",
                s.running,
                s.processed,
                s.total
            );
        }
        Ok(Self {
            store,
            pending,
            session,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn pending(&self) -> &PendingList {
        &self.pending
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.running)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }
        Ok(())
    }

    /// Add one video unless its link is already listed
    pub fn add(&mut self, item: WorkItem) -> Result<bool> {
        self.ensure_idle()?;
        let added = self.pending.add(item)?;
        if added {
            self.store.save_pending(&self.pending)?;
        }
        Ok(added)
    }

    /// Delete the row at a zero-based position
    pub fn remove(&mut self, index: usize) -> Result<WorkItem> {
        self.ensure_idle()?;
        let removed = self.pending.remove_at(index)?;
        self.store.save_pending(&self.pending)?;
        Ok(removed)
    }

    /// Drop every pending video and any leftover session record
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.pending.clear();
        self.session = None;
        self.store.clear_pending()?;
        self.store.clear_session()?;
        Ok(())
    }

    /// Forget a session record, e.g. one left `running` by a crashed process
    pub fn discard_session(&mut self) -> Result<()> {
        self.session = None;
        self.store.clear_session()
    }

    /// Merge a scrape result into the pending list and describe what happened
    pub fn apply_extraction(&mut self, extraction: Extraction) -> Result<String> {
        self.ensure_idle()?;
        let message = match extraction {
            Extraction::Playlist { items } => {
                for item in &items {
                    item.validate()?;
                }
                let count = items.len();
                self.pending.replace(items);
                self.store.save_pending(&self.pending)?;
                format!("Playlist extracted: {} videos.", count)
            }
            Extraction::Single { item } => {
                let preview = item.title_preview();
                if self.add(item)? {
                    format!(
                        "Video \"{}\" added. Total: {}.",
                        preview,
                        self.pending.len()
                    )
                } else {
                    format!("Video \"{}\" is already in the list.", preview)
                }
            }
            Extraction::Failed { error } => error,
        };
        Ok(message)
    }

    /// Begin a batch against `target`
    ///
    /// Rejected without side effects while another batch is running, when
    /// the list is empty, or when a listed item has no link. On success the returned copy is what the driver
    /// should process.
    pub fn start(&mut self, target: &str) -> Result<Vec<WorkItem>> {
        self.ensure_idle()?;
        if self.pending.is_empty() {
            return Err(Error::EmptyBatch);
        }
        // pending.json may have been edited by hand
        for item in self.pending.items() {
            item.validate()?;
        }

        let session = SessionState::started(target, self.pending.len());
        self.store.save_session(&session)?;
        tracing::info!("{}", session.last_message);
        self.session = Some(session);

        Ok(self.pending.snapshot())
    }

    /// Abandon a batch that never reached the driver
    pub fn abort(&mut self, reason: &str) -> Result<()> {
        tracing::warn!("Batch aborted before start: {}", reason);
        self.discard_session()
    }

    /// Fold one driver event into controller state and persist it
    pub fn apply(&mut self, event: &AutomationEvent) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("Ignoring '{}' event with no batch in flight", event.kind());
            return Ok(());
        };

        match event {
            AutomationEvent::Progress { message, .. } => {
                session.set_message(message.clone());
                self.store.save_session(session)?;
            }
            AutomationEvent::Success { message, link, .. } => {
                session.record_success();
                let removed = self.pending.remove_link(link);
                if removed > 0 {
                    self.store.save_pending(&self.pending)?;
                } else {
                    tracing::warn!("Inserted link not found in pending list: {}", link);
                }
                session.set_message(format!(
                    "{} ({} of {} done).",
                    message, session.processed, session.total
                ));
                self.store.save_session(session)?;
            }
            AutomationEvent::Complete { message } => {
                let summary = format!(
                    "{} (Processed {} of {} in this batch).",
                    message, session.processed, session.total
                );
                tracing::info!("{}", summary);
                self.session = None;
                self.store.clear_session()?;
            }
            AutomationEvent::Stopped { message } => {
                tracing::info!("{}", message);
                self.session = None;
                self.store.clear_session()?;
            }
            AutomationEvent::Error { message } => {
                session.running = false;
                session.set_message(message.clone());
                self.store.save_session(session)?;
            }
        }
        Ok(())
    }
}
