//! Client-side entity stores.
//!
//! An [`EntityStore`] keeps a local copy of one collection, bound to one
//! repository. Its state is published on a `tokio::sync::watch` channel so any
//! number of consumers can observe changes. Stores are plain values: build a
//! [`Stores`] once and pass it to whatever needs it.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use trialdesk_core::records::{
    AdverseEvent, AuditLog, Document, Entity, Patient, RegulatoryApproval, Site, Trial, User,
};
use trialdesk_core::storage::{ListFilter, Repository, RepositoryError};

use crate::client::TrialdeskClient;

/// A failed store operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{operation} failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    pub source: RepositoryError,
}

impl StoreError {
    fn new(operation: &'static str, source: RepositoryError) -> Self {
        Self { operation, source }
    }
}

/// Snapshot of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    pub error: Option<StoreError>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

/// Stateful local view of one collection.
///
/// Clones share state. Writes are last-write-wins; a failed optimistic
/// mutation is reported through `error` and is not rolled back.
pub struct EntityStore<T: Entity, R: Repository<T> + ?Sized = dyn Repository<T>> {
    name: String,
    repository: Arc<R>,
    state: Arc<watch::Sender<StoreState<T>>>,
}

impl<T: Entity, R: Repository<T> + ?Sized> Clone for EntityStore<T, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            repository: Arc::clone(&self.repository),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Entity, R: Repository<T> + ?Sized> EntityStore<T, R> {
    pub fn new(name: impl Into<String>, repository: Arc<R>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            name: name.into(),
            repository,
            state: Arc::new(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Records a failure and hands it back to the caller.
    fn fail(&self, operation: &'static str, source: RepositoryError) -> StoreError {
        let error = StoreError::new(operation, source);
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(error.clone());
        });
        error
    }

    /// Replaces the local collection with every record matching `filter`.
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<T>, StoreError> {
        self.begin();
        match self.repository.find_all(filter).await {
            Ok(items) => {
                self.state.send_modify(|s| {
                    s.items = items.clone();
                    s.loading = false;
                });
                Ok(items)
            }
            Err(err) => Err(self.fail("list", err)),
        }
    }

    /// Loads one record, merges it into the collection and selects it.
    pub async fn get_by_id(&self, id: Uuid) -> Result<T, StoreError> {
        self.begin();
        match self.repository.find_by_id(id).await {
            Ok(item) => {
                self.state.send_modify(|s| {
                    match s.items.iter_mut().find(|i| i.id() == id) {
                        Some(existing) => *existing = item.clone(),
                        None => s.items.push(item.clone()),
                    }
                    s.selected = Some(item.clone());
                    s.loading = false;
                });
                Ok(item)
            }
            Err(err) => Err(self.fail("get_by_id", err)),
        }
    }

    /// Creates a record and appends it once the repository has assigned its id.
    pub async fn create(&self, input: T::Create) -> Result<T, StoreError> {
        self.begin();
        match self.repository.create(input).await {
            Ok(item) => {
                self.state.send_modify(|s| {
                    s.items.push(item.clone());
                    s.loading = false;
                });
                Ok(item)
            }
            Err(err) => Err(self.fail("create", err)),
        }
    }

    /// Applies `patch` locally, then persists it. On success the local copy is
    /// replaced with what the repository returned.
    pub async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T, StoreError> {
        let now = Utc::now();
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            if let Some(item) = s.items.iter_mut().find(|i| i.id() == id) {
                item.apply_patch(patch.clone(), now);
            }
            if let Some(selected) = s.selected.as_mut().filter(|i| i.id() == id) {
                selected.apply_patch(patch.clone(), now);
            }
        });

        match self.repository.update(id, patch).await {
            Ok(item) => {
                self.state.send_modify(|s| {
                    if let Some(existing) = s.items.iter_mut().find(|i| i.id() == id) {
                        *existing = item.clone();
                    }
                    if s.selected.as_ref().is_some_and(|i| i.id() == id) {
                        s.selected = Some(item.clone());
                    }
                    s.loading = false;
                });
                Ok(item)
            }
            Err(err) => Err(self.fail("update", err)),
        }
    }

    /// Removes the record locally, then deletes it from the repository.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.items.retain(|i| i.id() != id);
            if s.selected.as_ref().is_some_and(|i| i.id() == id) {
                s.selected = None;
            }
        });

        match self.repository.delete(id).await {
            Ok(()) => {
                self.state.send_modify(|s| s.loading = false);
                Ok(())
            }
            Err(err) => Err(self.fail("delete", err)),
        }
    }

    /// Selects a record already in the local collection. Returns it, or `None`
    /// (clearing the selection) if it is not loaded.
    pub fn select(&self, id: Uuid) -> Option<T> {
        let mut selected = None;
        self.state.send_modify(|s| {
            s.selected = s.items.iter().find(|i| i.id() == id).cloned();
            selected = s.selected.clone();
        });
        selected
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }
}

/// Supplies one repository per entity type.
pub trait RepositoryProvider {
    fn repository<T: Entity>(&self) -> Arc<dyn Repository<T>>;
}

impl RepositoryProvider for TrialdeskClient {
    fn repository<T: Entity>(&self) -> Arc<dyn Repository<T>> {
        Arc::new(TrialdeskClient::repository::<T>(self))
    }
}

/// One named store per collection.
#[derive(Clone)]
pub struct Stores {
    pub trials: EntityStore<Trial>,
    pub sites: EntityStore<Site>,
    pub patients: EntityStore<Patient>,
    pub documents: EntityStore<Document>,
    pub adverse_events: EntityStore<AdverseEvent>,
    pub regulatory_approvals: EntityStore<RegulatoryApproval>,
    pub audit_logs: EntityStore<AuditLog>,
    pub users: EntityStore<User>,
}

impl Stores {
    pub fn new(provider: &impl RepositoryProvider) -> Self {
        fn store<T: Entity>(provider: &impl RepositoryProvider) -> EntityStore<T> {
            EntityStore::new(T::COLLECTION, provider.repository::<T>())
        }

        Self {
            trials: store(provider),
            sites: store(provider),
            patients: store(provider),
            documents: store(provider),
            adverse_events: store(provider),
            regulatory_approvals: store(provider),
            audit_logs: store(provider),
            users: store(provider),
        }
    }
}
