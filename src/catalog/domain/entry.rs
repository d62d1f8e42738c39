//! Catalogue entry record.

use super::{CatalogId, Requirements};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Explicit `{command, args}` launch description carried by an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitLaunch {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

impl ExplicitLaunch {
    /// Creates an explicit launch description.
    #[must_use]
    pub fn new(command: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().collect(),
            env: BTreeMap::new(),
        }
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the command-line arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns environment values fixed by the catalogue.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

/// Advisory homepage and repository links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLinks<'a> {
    /// Project homepage, when declared and non-empty.
    pub homepage: Option<&'a str>,
    /// Source repository, when declared and non-empty.
    pub repository: Option<&'a str>,
}

impl<'a> CatalogLinks<'a> {
    /// Returns the homepage if present, otherwise the repository.
    #[must_use]
    pub fn primary(&self) -> Option<&'a str> {
        self.homepage.or(self.repository)
    }
}

/// A descriptor of an installable server sourced from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    id: CatalogId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repository: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    install_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    docker_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mcp_config: Option<ExplicitLaunch>,
    #[serde(default)]
    requirements: Requirements,
}

impl CatalogEntry {
    /// Creates a minimal entry with only an identifier and a display name.
    #[must_use]
    pub fn new(id: CatalogId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            version: String::new(),
            author: String::new(),
            homepage: None,
            repository: None,
            category: String::new(),
            tags: Vec::new(),
            features: Vec::new(),
            install_command: None,
            docker_command: None,
            command: None,
            args: None,
            mcp_config: None,
            requirements: Requirements::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the homepage link.
    #[must_use]
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    /// Sets the repository link.
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Sets the package-manager install command text.
    #[must_use]
    pub fn with_install_command(mut self, command: impl Into<String>) -> Self {
        self.install_command = Some(command.into());
        self
    }

    /// Sets the container run command text.
    #[must_use]
    pub fn with_docker_command(mut self, command: impl Into<String>) -> Self {
        self.docker_command = Some(command.into());
        self
    }

    /// Sets an explicit launch description.
    #[must_use]
    pub fn with_explicit_launch(mut self, launch: ExplicitLaunch) -> Self {
        self.mcp_config = Some(launch);
        self
    }

    /// Replaces the requirements block.
    #[must_use]
    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Returns the catalogue identifier.
    #[must_use]
    pub const fn id(&self) -> &CatalogId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the advertised feature list.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Returns the package-manager install command, when non-blank.
    #[must_use]
    pub fn install_command(&self) -> Option<&str> {
        non_blank(self.install_command.as_deref())
    }

    /// Returns the container run command, when non-blank.
    #[must_use]
    pub fn docker_command(&self) -> Option<&str> {
        non_blank(self.docker_command.as_deref())
    }

    /// Returns the explicit launch description, if the entry carries one.
    ///
    /// An `mcpConfig` block wins over top-level `command`/`args` fields.
    #[must_use]
    pub fn explicit_launch(&self) -> Option<ExplicitLaunch> {
        if let Some(launch) = &self.mcp_config
            && !launch.command.trim().is_empty()
        {
            return Some(launch.clone());
        }

        let command = non_blank(self.command.as_deref())?;
        Some(ExplicitLaunch::new(
            command,
            self.args.clone().unwrap_or_default(),
        ))
    }

    /// Returns the requirements block.
    #[must_use]
    pub const fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Returns the advisory links.
    #[must_use]
    pub fn links(&self) -> CatalogLinks<'_> {
        CatalogLinks {
            homepage: non_blank(self.homepage.as_deref()),
            repository: non_blank(self.repository.as_deref()),
        }
    }

    /// Returns whether any searchable field contains `lowered_query`.
    ///
    /// The caller must pass an already lowercased query.
    #[must_use]
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(lowered_query);
        contains(&self.name)
            || contains(&self.description)
            || contains(&self.category)
            || contains(&self.author)
            || self.tags.iter().any(|tag| contains(tag))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
