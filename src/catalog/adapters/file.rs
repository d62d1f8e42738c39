//! Local-file catalogue source.

use crate::catalog::{
    domain::CatalogDocument,
    ports::{CatalogSource, CatalogSourceError, CatalogSourceResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// Reads a catalogue document from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: Utf8PathBuf,
}

impl FileCatalogSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the catalogue file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.to_string()
    }

    async fn fetch(&self) -> CatalogSourceResult<CatalogDocument> {
        let path = self.path.clone();
        let text = tokio::task::spawn_blocking(move || read_catalog_text(&path))
            .await
            .map_err(CatalogSourceError::unreadable)??;

        CatalogDocument::parse(&text).map_err(|err| CatalogSourceError::Unparsable(err.to_string()))
    }
}

fn read_catalog_text(path: &Utf8Path) -> CatalogSourceResult<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| CatalogSourceError::NotFound(path.to_string()))?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            CatalogSourceError::NotFound(path.to_string())
        } else {
            CatalogSourceError::unreadable(err)
        }
    })?;

    dir.read_to_string(file_name).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            CatalogSourceError::NotFound(path.to_string())
        } else {
            CatalogSourceError::unreadable(err)
        }
    })
}
