//! File-backed session storage.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{SessionStorage, StorageError};

/// Session storage keeping one file per key inside a directory.
///
/// Values survive process restarts for as long as the directory does, which
/// is what lets a command-line session keep its cart between invocations.
/// Keys are used as file names, so they are restricted to ASCII letters,
/// digits, `-`, `_` and `.` and may not start with a dot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written value
        let tmp = path.with_extension("json.tmp");
        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&tmp);
            StorageError::Io(e)
        };
        fs::write(&tmp, value).map_err(cleanup_and_err)?;
        fs::rename(&tmp, &path).map_err(cleanup_and_err)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
