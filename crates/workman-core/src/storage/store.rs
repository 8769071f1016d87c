//! JSON file stores with atomic replace.
//!
//! A store is one file under the data directory. Reads are forgiving: a
//! missing, empty or unparseable file yields `T::default()`. Writes go to a
//! temp file in the same directory which is then renamed over the target, so
//! a process killed mid-write (shutdown racing `stop`) leaves either the old
//! or the new content, never a torn file.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// A typed JSON document on disk.
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Open the store named `file` inside `dir`.
    pub fn in_dir(dir: &Path, file: &str) -> Self {
        Self::new(dir.join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to the default when absent or corrupt.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub fn load(&self) -> Result<T, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store absent, using default");
                return Ok(T::default());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store is not valid UTF-8, treating it as empty"
                );
                return Ok(T::default());
            }
        };

        if content.trim().is_empty() {
            return Ok(T::default());
        }

        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store is corrupt, treating it as empty"
                );
                Ok(T::default())
            }
        }
    }

    /// Serialize and atomically replace the file.
    ///
    /// # Errors
    /// Returns an error if serialization, the temp write or the rename fails.
    pub fn save(&self, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(data).map_err(|e| StorageError::Serialize {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}

/// Write `bytes` to `path` through a synced temp file and a rename.
///
/// # Errors
/// Returns [`StorageError::Write`] naming `path` on any failure.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        items: Vec<String>,
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        assert_eq!(store.load().unwrap(), Doc::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        let doc = Doc {
            items: vec!["a".into(), "b".into()],
        };
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn corrupt_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load().unwrap(), Doc::default());
    }

    #[test]
    fn non_utf8_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        std::fs::write(store.path(), [0xff, 0xfe, b'[', b']']).unwrap();
        assert_eq!(store.load().unwrap(), Doc::default());

        store
            .save(&Doc {
                items: vec!["fresh".into()],
            })
            .unwrap();
        assert_eq!(store.load().unwrap().items, vec!["fresh".to_string()]);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("doc.json")).unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        assert!(matches!(store.load(), Err(StorageError::Read { .. })));
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_dir(dir.path(), "doc.json");
        store.save(&Doc::default()).unwrap();
        store
            .save(&Doc {
                items: vec!["x".into()],
            })
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["doc.json".to_string()]);
    }

    #[test]
    fn save_into_missing_parent_creates_it() {
        let dir = TempDir::new().unwrap();
        let store: JsonStore<Doc> = JsonStore::new(dir.path().join("nested").join("doc.json"));
        store.save(&Doc::default()).unwrap();
        assert!(store.path().exists());
    }
}
