use super::StorageBackend;
use crate::errors::StoreError;
use crate::scope::{ProjectId, Scope, SettingKey};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const DOCUMENT_VERSION: u32 = 1;

/// Settings persisted as a JSON document on disk
///
/// Every call reads the document afresh; writes replace it atomically by
/// persisting a uniquely named temp file over it. Read-modify-write cycles
/// hold an advisory lock on a sibling `.lock` file, so backends in other
/// threads or processes sharing the document wait for each other.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    #[serde(default)]
    rows: Vec<Row>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            version: DOCUMENT_VERSION,
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    module: String,
    scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<ProjectId>,
    key: String,
    value: String,
}

impl Row {
    fn matches(&self, key: &SettingKey) -> bool {
        self.module == key.module.as_ref()
            && self.scope == key.scope.scope()
            && self.project == key.scope.project_id()
            && self.key == key.key.as_ref()
    }
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Run a read-modify-write cycle under the document lock
    ///
    /// `apply` returns whether it changed the document; unchanged documents
    /// are not rewritten.
    fn update<F>(&self, apply: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Document) -> bool,
    {
        fs::create_dir_all(self.dir())?;
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write()?;

        let mut document = self.load()?;
        if !apply(&mut document) {
            return Ok(false);
        }
        self.save(&document)?;
        Ok(true)
    }

    fn load(&self) -> Result<Document, StoreError> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let content = fs::read(&self.path)?;
        let document: Document = serde_json::from_slice(&content)?;
        if document.version != DOCUMENT_VERSION {
            return Err(StoreError::Backend(format!(
                "Unsupported settings document version {} in {}",
                document.version,
                self.path.display()
            )));
        }
        Ok(document)
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(document)?;
        let mut temp_file = NamedTempFile::new_in(self.dir())?;
        temp_file.write_all(&content)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &SettingKey) -> Result<Option<Vec<u8>>, StoreError> {
        let document = self.load()?;
        Ok(document
            .rows
            .into_iter()
            .find(|row| row.matches(key))
            .map(|row| row.value.into_bytes()))
    }

    fn write(&self, key: &SettingKey, encoded: Vec<u8>) -> Result<(), StoreError> {
        let value = String::from_utf8(encoded)
            .map_err(|e| StoreError::Backend(format!("Encoded value is not UTF-8: {}", e)))?;

        self.update(|document| {
            match document.rows.iter_mut().find(|row| row.matches(key)) {
                Some(row) => row.value = value,
                None => document.rows.push(Row {
                    module: key.module.to_string(),
                    scope: key.scope.scope(),
                    project: key.scope.project_id(),
                    key: key.key.to_string(),
                    value,
                }),
            }
            true
        })?;
        debug!("Wrote setting {} to {}", key, self.path.display());
        Ok(())
    }

    fn delete(&self, key: &SettingKey) -> Result<(), StoreError> {
        let removed = self.update(|document| {
            let before = document.rows.len();
            document.rows.retain(|row| !row.matches(key));
            document.rows.len() != before
        })?;
        if removed {
            debug!("Deleted setting {} from {}", key, self.path.display());
        }
        Ok(())
    }
}
