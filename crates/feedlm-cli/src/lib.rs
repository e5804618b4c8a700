use anyhow::Result;
use clap::ValueEnum;
use feedlm_core::{Controller, Store};
use std::path::PathBuf;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
        }
    }
}

/// Settings shared by every subcommand
pub struct Context {
    pub store: Store,
    pub format: OutputFormat,
}

impl Context {
    /// Use `data_dir`, or `~/.feedlm` when none was given
    pub fn new(data_dir: Option<PathBuf>, format: OutputFormat) -> Result<Self> {
        let root = match data_dir {
            Some(dir) => dir,
            None => Store::default_root()?,
        };
        tracing::debug!("Data directory: {} (output: {})", root.display(), format.as_str());
        Ok(Self {
            store: Store::new(root),
            format,
        })
    }

    pub fn controller(&self) -> Result<Controller> {
        Ok(Controller::open(self.store.clone())?)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
