//! Chrome integration for feedlm.
//!
//! Finds and launches Chrome with a remote-debugging port, connects to it
//! over CDP, and exposes a tab as a [`feedlm_driver::HostPage`] through
//! [`CdpHost`]. The YouTube [`Scraper`] turns a playlist or watch tab into
//! work items.

mod cdp_session;
mod chrome_finder;
mod error;
mod launcher;
mod page_host;
mod profile;
mod scraper;

pub use cdp_session::{CdpSession, DEFAULT_DEBUGGING_PORT};
pub use chrome_finder::{CHROME_PATH_ENV, ChromeBinary, ChromeFinder, ChromeSource};
pub use error::{Error, Result};
pub use launcher::ChromeLauncher;
pub use page_host::CdpHost;
pub use profile::ProfileManager;
pub use scraper::Scraper;
