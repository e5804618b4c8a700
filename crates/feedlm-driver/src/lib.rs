//! Drives an asynchronously rendering composer UI to insert work items.
//!
//! The driver is split into small layers, leaves first:
//! - [`poll`]: wait-until-present / wait-until-absent / sleep, all cancellable
//! - [`locator`]: finds interactive elements by attribute, content or marker
//! - [`sequencer`]: the five-step insertion state machine for one item
//! - [`runner`]: feeds a batch through the sequencer and publishes events
//! - [`cancel`]: the per-batch stop flag and its acknowledgement
//!
//! Everything talks to the page through the [`HostPage`] trait, so the same
//! driver runs against a CDP-backed tab or an in-memory fake.

pub mod cancel;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod locator;
pub mod poll;
pub mod runner;
pub mod sequencer;

pub use cancel::{BatchContext, CancellationChannel, StopAck, StopHandle};
pub use config::{DriverConfig, SelectorProfile};
pub use error::{ConfigError, DriverError, HostError, Result, Stage};
pub use events::{ChannelSink, EventSink, SinkError};
pub use host::{ElementHandle, ElementInfo, HostPage, Scope};
pub use locator::{Locator, LocatorStrategy};
pub use poll::Poller;
pub use runner::{BatchOutcome, BatchReport, BatchRunner};
pub use sequencer::{InsertionState, Sequencer};
