pub mod chrome;
pub mod completion;
pub mod config;
pub mod extract;
pub mod pending;
pub mod run;
pub mod status;
