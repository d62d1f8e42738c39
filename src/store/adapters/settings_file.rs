//! Configuration store embedded in a JSON settings document.

use crate::store::{
    domain::{StoreId, StoreRevision, StoreSnapshot},
    ports::{ConfigurationStore, ConfigurationStoreError, ConfigurationStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

/// Key path of the server map inside a client settings document.
pub const DEFAULT_SETTINGS_KEY_PATH: [&str; 2] = ["mcp", "servers"];

/// Configuration store living at a key path inside a JSON settings file.
///
/// Other keys of the document are preserved on write. Writes go to a
/// temporary sibling file that is then renamed over the original.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: Utf8PathBuf,
    key_path: Vec<String>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonSettingsStore {
    /// Creates a store over `path` using [`DEFAULT_SETTINGS_KEY_PATH`].
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            key_path: DEFAULT_SETTINGS_KEY_PATH.map(str::to_owned).to_vec(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces the key path of the server map.
    #[must_use]
    pub fn with_key_path(mut self, key_path: impl IntoIterator<Item = String>) -> Self {
        self.key_path = key_path.into_iter().collect();
        self
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl ConfigurationStore for JsonSettingsStore {
    fn describe(&self) -> String {
        format!("{}#{}", self.path, self.key_path.join("."))
    }

    async fn snapshot(&self) -> ConfigurationStoreResult<StoreSnapshot> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let document = SettingsFile::open(&store.path)?.read()?;
            store.servers(&document)
        })
        .await
        .map_err(ConfigurationStoreError::persistence)?
    }

    async fn compare_and_swap(
        &self,
        expected: &StoreRevision,
        entries: Vec<(StoreId, Value)>,
    ) -> ConfigurationStoreResult<StoreRevision> {
        let store = self.clone();
        let expected_revision = expected.clone();
        tokio::task::spawn_blocking(move || {
            store.swap_blocking(&expected_revision, entries)
        })
        .await
        .map_err(ConfigurationStoreError::persistence)?
    }
}

impl JsonSettingsStore {
    fn servers(&self, document: &Value) -> ConfigurationStoreResult<StoreSnapshot> {
        let mut current = document;
        for key in &self.key_path {
            match current.get(key) {
                Some(next) => current = next,
                None => return Ok(StoreSnapshot::new(Vec::new())),
            }
        }
        current
            .as_object()
            .map(|servers| StoreSnapshot::from_map(servers.clone()))
            .ok_or_else(|| self.not_an_object())
    }

    fn swap_blocking(
        &self,
        expected: &StoreRevision,
        entries: Vec<(StoreId, Value)>,
    ) -> ConfigurationStoreResult<StoreRevision> {
        let _guard = self.write_lock.lock().map_err(|err| {
            ConfigurationStoreError::persistence(io::Error::other(err.to_string()))
        })?;

        let file = SettingsFile::open(&self.path)?;
        let mut document = file.read()?;
        let actual = self.servers(&document)?.revision().clone();
        if actual != *expected {
            return Err(ConfigurationStoreError::Conflict {
                expected: expected.clone(),
                actual,
            });
        }

        let revision = StoreRevision::of(&entries);
        *self.servers_mut(&mut document)? = entries
            .into_iter()
            .map(|(id, value)| (String::from(id), value))
            .collect();
        file.write(&document)?;
        debug!(path = %self.path, %revision, "settings document written");
        Ok(revision)
    }

    fn servers_mut<'doc>(
        &self,
        document: &'doc mut Value,
    ) -> ConfigurationStoreResult<&'doc mut Map<String, Value>> {
        let mut current = document;
        for key in &self.key_path {
            let object = current
                .as_object_mut()
                .ok_or_else(|| self.not_an_object())?;
            current = object
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        current.as_object_mut().ok_or_else(|| self.not_an_object())
    }

    fn not_an_object(&self) -> ConfigurationStoreError {
        ConfigurationStoreError::InvalidDocument(format!(
            "'{}' in {} is not an object",
            self.key_path.join("."),
            self.path
        ))
    }
}

/// Directory handle plus file name of a settings document.
struct SettingsFile {
    dir: Dir,
    file_name: String,
}

impl SettingsFile {
    fn open(path: &Utf8Path) -> ConfigurationStoreResult<Self> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                ConfigurationStoreError::InvalidDocument(format!("{path} names no file"))
            })?
            .to_owned();
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(ConfigurationStoreError::persistence)?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(ConfigurationStoreError::persistence)?;
        Ok(Self { dir, file_name })
    }

    fn read(&self) -> ConfigurationStoreResult<Value> {
        let text = match self.dir.read_to_string(&self.file_name) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(ConfigurationStoreError::persistence(err)),
        };
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&text)
            .map_err(|err| ConfigurationStoreError::InvalidDocument(err.to_string()))
    }

    fn write(&self, document: &Value) -> ConfigurationStoreResult<()> {
        let mut text = serde_json::to_string_pretty(document)
            .map_err(ConfigurationStoreError::persistence)?;
        text.push('\n');

        let temp_name = format!(".{}.{}.tmp", self.file_name, Uuid::new_v4());
        self.dir
            .write(&temp_name, text)
            .map_err(ConfigurationStoreError::persistence)?;
        if let Err(err) = self.dir.rename(&temp_name, &self.dir, &self.file_name) {
            if let Err(cleanup) = self.dir.remove_file(&temp_name) {
                warn!(file = %temp_name, error = %cleanup, "failed to remove temporary settings file");
            }
            return Err(ConfigurationStoreError::persistence(err));
        }
        Ok(())
    }
}
