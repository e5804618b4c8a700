use crate::{Error, PendingList, Result, SessionState};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const PENDING_FILE: &str = "pending.json";
const SESSION_FILE: &str = "session.json";
const CONFIG_FILE: &str = "config.json";
const PROFILES_DIR: &str = "profiles";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FEEDLM_HOME";

/// File-backed storage for the pending list and the session record
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.feedlm`, used when no explicit data directory is given
    pub fn default_root() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".feedlm"))
            .ok_or_else(|| Error::DataDir("home directory not found".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(PROFILES_DIR)
    }

    /// Load the pending list; a missing file is an empty list
    pub fn load_pending(&self) -> Result<PendingList> {
        Ok(self.read_json(PENDING_FILE)?.unwrap_or_default())
    }

    pub fn save_pending(&self, pending: &PendingList) -> Result<()> {
        self.write_json(PENDING_FILE, pending)?;
        tracing::debug!("Saved {} pending videos", pending.len());
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<SessionState>> {
        self.read_json(SESSION_FILE)
    }

    pub fn save_session(&self, session: &SessionState) -> Result<()> {
        self.write_json(SESSION_FILE, session)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.remove(SESSION_FILE)
    }

    pub fn clear_pending(&self) -> Result<()> {
        self.remove(PENDING_FILE)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!("Reading {}", path.display());
        let reader = BufReader::new(File::open(&path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        let tmp = path.with_extension("json.tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, value)?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.root.join(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
