use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Chrome user-data directory, either throwaway or kept under the data dir
///
/// A persistent profile keeps the Google sign-in between runs, which the
/// notebook tab needs.
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let path = tempfile::tempdir()?.keep();
        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            fs::create_dir_all(&path)?;
        }
        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// Persistent profile `name` inside `profiles_dir`
    pub fn named(profiles_dir: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }
        Self::persistent(profiles_dir.join(name))
    }

    /// Names of the profiles under `profiles_dir`, sorted
    pub fn list(profiles_dir: &Path) -> Result<Vec<String>> {
        if !profiles_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(profiles_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_profile_creates_and_cleans_up() {
        let profile = ProfileManager::temporary().unwrap();
        let path = profile.path().to_path_buf();

        assert!(path.is_dir());
        assert!(profile.is_temporary());

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_named_profile_is_kept() {
        let temp_dir = tempfile::tempdir().unwrap();

        let profile = ProfileManager::named(temp_dir.path(), "work").unwrap();
        let path = profile.path().to_path_buf();
        drop(profile);

        assert!(path.is_dir());
        assert_eq!(
            ProfileManager::list(temp_dir.path()).unwrap(),
            vec!["work".to_string()]
        );
    }

    #[test]
    fn test_named_profile_rejects_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(ProfileManager::named(temp_dir.path(), "../escape").is_err());
        assert!(ProfileManager::named(temp_dir.path(), "").is_err());
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let names = ProfileManager::list(&temp_dir.path().join("profiles")).unwrap();
        assert!(names.is_empty());
    }
}
