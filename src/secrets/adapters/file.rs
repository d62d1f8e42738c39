//! JSON file secret cache repository.

use crate::secrets::{
    domain::SecretCache,
    ports::{SecretCacheError, SecretCacheRepository, SecretCacheResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use uuid::Uuid;

/// Stores the secret cache as a JSON object in a file.
#[derive(Debug, Clone)]
pub struct JsonSecretCacheFile {
    path: Utf8PathBuf,
}

impl JsonSecretCacheFile {
    /// Creates a repository backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl SecretCacheRepository for JsonSecretCacheFile {
    async fn load(&self) -> SecretCacheResult<SecretCache> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_blocking(&path))
            .await
            .map_err(SecretCacheError::persistence)?
    }

    async fn save(&self, cache: &SecretCache) -> SecretCacheResult<()> {
        let path = self.path.clone();
        let text = serde_json::to_string_pretty(cache).map_err(SecretCacheError::persistence)?;
        tokio::task::spawn_blocking(move || save_blocking(&path, &text))
            .await
            .map_err(SecretCacheError::persistence)?
    }
}

fn open_parent(path: &Utf8Path) -> SecretCacheResult<(Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| SecretCacheError::InvalidDocument(format!("{path} names no file")))?
        .to_owned();
    Dir::create_ambient_dir_all(parent, ambient_authority())
        .map_err(SecretCacheError::persistence)?;
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(SecretCacheError::persistence)?;
    Ok((dir, file_name))
}

fn load_blocking(path: &Utf8Path) -> SecretCacheResult<SecretCache> {
    let (dir, file_name) = open_parent(path)?;
    match dir.read_to_string(&file_name) {
        Ok(text) if text.trim().is_empty() => Ok(SecretCache::new()),
        Ok(text) => serde_json::from_str(&text)
            .map_err(|err| SecretCacheError::InvalidDocument(err.to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(SecretCache::new()),
        Err(err) => Err(SecretCacheError::persistence(err)),
    }
}

fn save_blocking(path: &Utf8Path, text: &str) -> SecretCacheResult<()> {
    let (dir, file_name) = open_parent(path)?;
    let temp_name = format!(".{file_name}.{}.tmp", Uuid::new_v4());
    dir.write(&temp_name, text)
        .map_err(SecretCacheError::persistence)?;
    dir.rename(&temp_name, &dir, &file_name)
        .map_err(SecretCacheError::persistence)
}
