//! The engine API consumed by front ends.

use crate::catalog::{
    adapters::file::FileCatalogSource,
    domain::{CatalogEntry, CatalogId, search_entries},
    ports::CatalogSource,
    services::{CatalogLoad, CatalogStore},
};
use crate::config::{ConfigError, EngineConfig};
use crate::engine::domain::{
    EngineError, EngineResult, InstallOutcome, InstallationStatus, StatusEvent,
};
use crate::launch::services::InstallDescriptorSynthesizer;
use crate::reconciliation::{domain::ReconciliationResult, services::ReconciliationEngine};
use crate::runner::{
    adapters::process::TokioCommandRunner, ports::CommandRunner, services::PackageInstaller,
};
use crate::secrets::{
    adapters::{file::JsonSecretCacheFile, memory::InMemorySecretCache},
    domain::ResolvedEnvironment,
    ports::{PromptCapability, SecretCacheRepository},
    services::SecretCollector,
};
use crate::store::{
    adapters::settings_file::JsonSettingsStore,
    domain::{StoreId, StoreSnapshot, ValidationReport},
    ports::ConfigurationStore,
    services::{ConfigurationMutator, ConfigurationValidator, MutationError, RemovalOutcome},
};
use mockable::Clock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Buffered status events per subscriber before the oldest are dropped.
pub const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Collaborators an [`ExplorerEngine`] is assembled from.
pub struct EngineComponents<C>
where
    C: Clock + Send + Sync,
{
    /// Clock used for catalogue cache ageing.
    pub clock: Arc<C>,
    /// Catalogue sources in consultation order.
    pub catalog_sources: Vec<Arc<dyn CatalogSource>>,
    /// The external configuration store.
    pub store: Arc<dyn ConfigurationStore>,
    /// Side-store for non-sensitive environment values.
    pub secret_cache: Arc<dyn SecretCacheRepository>,
    /// Host-provided user interaction.
    pub prompt: Arc<dyn PromptCapability>,
    /// Executes package-manager and probe commands.
    pub runner: Arc<dyn CommandRunner>,
}

impl<C> EngineComponents<C>
where
    C: Clock + Send + Sync,
{
    /// Builds the filesystem-backed components described by `config`.
    ///
    /// The local catalogue file, if configured, is the first source; hosts
    /// append remote sources with [`Self::with_catalog_source`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no settings path is configured.
    pub fn from_config(
        config: &EngineConfig,
        clock: Arc<C>,
        prompt: Arc<dyn PromptCapability>,
    ) -> Result<Self, ConfigError> {
        let settings_path = config
            .settings_path
            .clone()
            .ok_or_else(|| ConfigError::Invalid("settings_path is not set".to_owned()))?;
        let store = JsonSettingsStore::new(settings_path)
            .with_key_path(config.settings_key_path.iter().cloned());

        let secret_cache: Arc<dyn SecretCacheRepository> = match &config.secret_cache_path {
            Some(path) => Arc::new(JsonSecretCacheFile::new(path.clone())),
            None => Arc::new(InMemorySecretCache::default()),
        };

        let catalog_sources: Vec<Arc<dyn CatalogSource>> = config
            .catalog_path
            .iter()
            .map(|path| Arc::new(FileCatalogSource::new(path.clone())) as Arc<dyn CatalogSource>)
            .collect();

        Ok(Self {
            clock,
            catalog_sources,
            store: Arc::new(store),
            secret_cache,
            prompt,
            runner: Arc::new(TokioCommandRunner::new()),
        })
    }

    /// Appends a catalogue source consulted after the existing ones.
    #[must_use]
    pub fn with_catalog_source(mut self, source: Arc<dyn CatalogSource>) -> Self {
        self.catalog_sources.push(source);
        self
    }
}

/// Catalogue, reconciliation, synthesis and store mutation behind one API.
///
/// All operations take `&self`; share the engine behind an [`Arc`] to run
/// them concurrently. Mutations of the same normalised store identifier are
/// serialised by the underlying [`ConfigurationMutator`].
pub struct ExplorerEngine<C>
where
    C: Clock + Send + Sync,
{
    catalog: CatalogStore<C>,
    synthesizer: InstallDescriptorSynthesizer,
    reconciler: ReconciliationEngine,
    secrets: SecretCollector<dyn SecretCacheRepository>,
    prompt: Arc<dyn PromptCapability>,
    mutator: ConfigurationMutator<dyn ConfigurationStore>,
    validator: ConfigurationValidator<dyn ConfigurationStore>,
    installer: PackageInstaller<dyn CommandRunner>,
    run_package_install: bool,
    run_package_uninstall: bool,
    statuses: RwLock<HashMap<CatalogId, InstallationStatus>>,
    matched_store_ids: RwLock<HashMap<CatalogId, StoreId>>,
    events: broadcast::Sender<StatusEvent>,
}

impl<C> ExplorerEngine<C>
where
    C: Clock + Send + Sync,
{
    /// Assembles an engine from `components` tuned by `config`.
    #[must_use]
    pub fn new(components: EngineComponents<C>, config: &EngineConfig) -> Self {
        let EngineComponents {
            clock,
            catalog_sources,
            store,
            secret_cache,
            prompt,
            runner,
        } = components;
        let (events, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            catalog: CatalogStore::new(catalog_sources, clock).with_ttl(config.catalog_ttl()),
            synthesizer: config.synthesizer(),
            reconciler: ReconciliationEngine::default(),
            secrets: SecretCollector::new(secret_cache),
            prompt,
            mutator: ConfigurationMutator::new(Arc::clone(&store))
                .with_verification_delay(config.verification_delay()),
            validator: ConfigurationValidator::new(store),
            installer: PackageInstaller::new(runner)
                .with_excerpt_chars(config.diagnostic_excerpt_chars),
            run_package_install: config.run_package_install,
            run_package_uninstall: config.run_package_uninstall,
            statuses: RwLock::new(HashMap::new()),
            matched_store_ids: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Replaces the reconciliation predicate table.
    #[must_use]
    pub fn with_reconciler(mut self, reconciler: ReconciliationEngine) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Returns the latest known status of an entry.
    #[must_use]
    pub fn status(&self, catalog_id: &CatalogId) -> InstallationStatus {
        self.statuses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(catalog_id)
            .cloned()
            .unwrap_or(InstallationStatus::NotInstalled)
    }

    /// Loads the catalogue, from cache unless `force` is set.
    pub async fn load_catalog(&self, force: bool) -> CatalogLoad {
        self.catalog.load(force).await
    }

    /// Returns the sorted distinct categories of the catalogue.
    pub async fn categories(&self) -> Vec<String> {
        self.catalog.load(false).await.categories()
    }

    /// Returns catalogue entries in `category`.
    pub async fn entries_by_category(&self, category: &str) -> Vec<CatalogEntry> {
        self.catalog.load(false).await.in_category(category)
    }

    /// Finds a catalogue entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEntryId`] for a blank identifier.
    pub async fn entry_by_id(&self, entry_id: &str) -> EngineResult<Option<CatalogEntry>> {
        let id = CatalogId::new(entry_id)?;
        Ok(self.catalog.load(false).await.find(&id).cloned())
    }

    /// Cross-references the catalogue with the store's current identifiers
    /// and refreshes the tracked statuses.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the store cannot be read.
    pub async fn reconcile(&self) -> EngineResult<ReconciliationResult> {
        let catalog = self.catalog.load(false).await;
        let snapshot = self.mutator.store().snapshot().await?;
        let result = self.reconciler.reconcile(catalog.entries(), &snapshot.ids());
        self.absorb(&result);
        Ok(result)
    }

    /// Returns catalogue entries reconciled as installed, followed by the
    /// shadow entries for unmatched store keys.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the store cannot be read.
    pub async fn installed(&self) -> EngineResult<Vec<CatalogEntry>> {
        let catalog = self.catalog.load(false).await;
        let result = self.reconcile().await?;
        let mut entries: Vec<CatalogEntry> = result
            .installed_ids()
            .filter_map(|id| catalog.find(id).cloned())
            .collect();
        entries.extend(result.shadows().iter().map(|shadow| shadow.to_catalog_entry()));
        Ok(entries)
    }

    /// Case-insensitive substring search over the catalogue and shadow
    /// entries. A blank query yields nothing.
    ///
    /// An unreadable store only hides shadow entries from the result.
    pub async fn search(&self, query: &str) -> Vec<CatalogEntry> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let catalog = self.catalog.load(false).await;
        let shadows = match self.reconcile().await {
            Ok(result) => result
                .shadows()
                .iter()
                .map(|shadow| shadow.to_catalog_entry())
                .collect(),
            Err(err) => {
                warn!(error = %err, "store unreadable; searching the catalog only");
                Vec::new()
            }
        };
        search_entries(catalog.entries().iter().chain(shadows.iter()), query)
    }

    /// Returns whether the entry, or a shadow entry with this identifier,
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEntryId`] for a blank identifier and
    /// [`EngineError::Store`] when the store cannot be read.
    pub async fn is_configured(&self, entry_id: &str) -> EngineResult<bool> {
        let id = CatalogId::new(entry_id)?;
        Ok(self.reconcile().await?.is_installed(&id))
    }

    /// Checks the store's structure.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the store cannot be read.
    pub async fn validate_store(&self) -> EngineResult<ValidationReport> {
        Ok(self.validator.validate().await?)
    }

    /// Returns the raw store entry configured for `entry_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEntryId`] for a blank identifier and
    /// [`EngineError::Store`] or [`EngineError::Mutation`] when the store
    /// cannot be read.
    pub async fn configured_entry(&self, entry_id: &str) -> EngineResult<Option<(StoreId, Value)>> {
        let id = CatalogId::new(entry_id)?;
        self.reconcile().await?;
        let store_id = self.store_id_for(&id)?;
        Ok(self.mutator.find(&store_id).await?)
    }

    /// Returns every configured store entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the store cannot be read.
    pub async fn configured_entries(&self) -> EngineResult<StoreSnapshot> {
        Ok(self.mutator.store().snapshot().await?)
    }

    /// Installs a catalogue entry.
    ///
    /// Resolves its environment through the prompt capability, runs the
    /// package install step when enabled, then writes and verifies the
    /// launch configuration under the entry's normalised identifier.
    /// Cancellation is honoured up to the store write; once the write has
    /// started it runs to completion.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEntry`] for identifiers not in the
    /// catalogue, [`EngineError::MissingEnvironmentVariable`] when the user
    /// aborts collection, [`EngineError::Synthesis`],
    /// [`EngineError::CommandExecution`] and [`EngineError::Mutation`] from
    /// the respective steps. Every error leaves the status at
    /// [`InstallationStatus::Failed`], except an already configured entry
    /// which leaves it at [`InstallationStatus::Installed`]. A malformed
    /// identifier returns [`EngineError::InvalidEntryId`] before any status
    /// exists to update.
    pub async fn install(
        &self,
        entry_id: &str,
        cancel: &CancellationToken,
    ) -> EngineResult<InstallOutcome> {
        let id = CatalogId::new(entry_id)?;
        let catalog = self.catalog.load(false).await;
        let Some(entry) = catalog.find(&id).cloned() else {
            return Err(self.fail(&id, EngineError::UnknownEntry(id.clone())));
        };
        let store_id = StoreId::new(id.as_str())?;

        self.set_status(&id, InstallationStatus::Installing);
        match self.mutator.find(&store_id).await {
            Ok(Some((existing, _))) => {
                self.set_status(&id, InstallationStatus::Installed);
                return Err(MutationError::AlreadyConfigured(existing).into());
            }
            Ok(None) => {}
            Err(err) => return Err(self.fail(&id, err.into())),
        }

        let probes = self.installer.check_runtimes(&entry).await;
        debug!(catalog_id = %id, probes = probes.len(), "runtime requirements probed");

        let resolved = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(self.cancel(&id)),
            collected = self.secrets.resolve(&entry, self.prompt.as_ref()) => collected,
        };
        let Some(environment) = resolved else {
            return Err(self.fail(&id, EngineError::MissingEnvironmentVariable(id.clone())));
        };

        let launch = match self.synthesizer.synthesize(&entry, environment.values()) {
            Ok(launch) => launch,
            Err(err) => return Err(self.fail(&id, err.into())),
        };

        if self.run_package_install {
            let installed = tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(self.cancel(&id)),
                ran = self.installer.install(&entry) => ran,
            };
            if let Err(err) = installed {
                return Err(self.fail(&id, err.into()));
            }
        }

        if cancel.is_cancelled() {
            return Ok(self.cancel(&id));
        }
        let written = match self.mutator.add(&store_id, &launch).await {
            Ok(written) => written,
            Err(MutationError::AlreadyConfigured(existing)) => {
                self.set_status(&id, InstallationStatus::Installed);
                return Err(MutationError::AlreadyConfigured(existing).into());
            }
            Err(err) => return Err(self.fail(&id, err.into())),
        };

        self.commit_secrets(&id, &environment).await;
        self.remember_store_id(&id, &written);
        self.set_status(&id, InstallationStatus::Installed);
        info!(catalog_id = %id, store_id = %written, "install complete");
        Ok(InstallOutcome::Installed {
            store_id: written,
            launch,
        })
    }

    /// Removes the store entry for `entry_id`.
    ///
    /// The store key is one this engine wrote for the entry or one
    /// reconciliation matched by id or hyphenated name, else the identifier
    /// itself, so shadow entries can be removed too. Keys that only contain
    /// or are contained in the entry's name are never removed, since they
    /// may belong to another server. A second
    /// call after a successful removal reports
    /// [`RemovalOutcome::AlreadyRemoved`]. The package removal step runs
    /// afterwards when enabled; its failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Mutation`] with [`MutationError::NotConfigured`]
    /// when nothing matches, and other [`EngineError::Mutation`] or
    /// [`EngineError::Store`] failures when the store cannot be updated.
    pub async fn uninstall(&self, entry_id: &str) -> EngineResult<RemovalOutcome> {
        let id = CatalogId::new(entry_id)?;
        if let Err(err) = self.reconcile().await {
            return Err(self.fail(&id, err));
        }
        let store_id = self.store_id_for(&id)?;

        self.set_status(&id, InstallationStatus::Uninstalling);
        let outcome = match self.mutator.remove(&store_id).await {
            Ok(outcome) => outcome,
            Err(MutationError::NotConfigured(missing)) => {
                self.set_status(&id, InstallationStatus::NotInstalled);
                return Err(MutationError::NotConfigured(missing).into());
            }
            Err(err) => return Err(self.fail(&id, err.into())),
        };

        if matches!(outcome, RemovalOutcome::Removed(_)) && self.run_package_uninstall {
            let catalog = self.catalog.load(false).await;
            if let Some(entry) = catalog.find(&id)
                && let Err(err) = self.installer.uninstall(entry).await
            {
                warn!(catalog_id = %id, error = %err, "package removal failed; configuration already removed");
            }
        }

        self.set_status(&id, InstallationStatus::NotInstalled);
        info!(catalog_id = %id, store_id = %store_id, "uninstall complete");
        Ok(outcome)
    }

    fn store_id_for(&self, id: &CatalogId) -> EngineResult<StoreId> {
        if let Some(known) = self
            .matched_store_ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(known.clone());
        }
        Ok(StoreId::new(id.as_str())?)
    }

    fn remember_store_id(&self, id: &CatalogId, store_id: &StoreId) {
        self.matched_store_ids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), store_id.clone());
    }

    fn absorb(&self, result: &ReconciliationResult) {
        for entry_status in result.statuses() {
            let id = entry_status.catalog_id();
            if let Some(matched) = entry_status.identifying_store_id() {
                self.remember_store_id(id, &StoreId::from_store_key(matched));
            }
            let current = self.status(id);
            if current.is_in_progress() {
                continue;
            }
            let next = match (entry_status.installed(), &current) {
                (true, _) => InstallationStatus::Installed,
                (false, InstallationStatus::Installed) => InstallationStatus::NotInstalled,
                (false, _) => continue,
            };
            if next != current {
                self.set_status(id, next);
            }
        }
    }

    async fn commit_secrets(&self, id: &CatalogId, environment: &ResolvedEnvironment) {
        if let Err(err) = self.secrets.commit(id, environment).await {
            warn!(catalog_id = %id, error = %err, "could not cache environment values");
        }
    }

    fn cancel(&self, id: &CatalogId) -> InstallOutcome {
        info!(catalog_id = %id, "install cancelled before writing");
        self.set_status(id, InstallationStatus::Cancelled);
        InstallOutcome::Cancelled
    }

    fn fail(&self, id: &CatalogId, err: EngineError) -> EngineError {
        warn!(catalog_id = %id, error = %err, "operation failed");
        self.set_status(id, InstallationStatus::Failed(err.to_string()));
        err
    }

    fn set_status(&self, id: &CatalogId, status: InstallationStatus) {
        self.statuses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), status.clone());
        debug!(catalog_id = %id, %status, "status changed");
        let event = StatusEvent {
            catalog_id: id.clone(),
            status,
        };
        if self.events.send(event).is_err() {
            debug!(catalog_id = %id, "no status subscribers");
        }
    }
}
