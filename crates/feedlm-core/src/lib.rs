pub mod controller;
pub mod error;
pub mod event;
pub mod item;
pub mod pending;
pub mod session;
pub mod source;
pub mod store;
pub mod target;

pub use controller::Controller;
pub use error::{Error, Result};
pub use event::AutomationEvent;
pub use item::WorkItem;
pub use pending::PendingList;
pub use session::SessionState;
pub use store::Store;
