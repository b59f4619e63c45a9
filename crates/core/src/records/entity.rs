use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::{Validate, ValidationError};

/// A record type that can be stored in a collection.
///
/// Every entity is identified by a UUID and carries creation and update
/// timestamps. `Create` is the input accepted by `create` (everything except
/// the identifier and timestamps) and `Patch` is the partial input accepted by
/// `update`, where an absent field leaves the stored value unchanged and an
/// explicit `null` clears a nullable one.
pub trait Entity:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Create: Debug + Clone + Serialize + DeserializeOwned + Validate + Send + Sync + 'static;
    type Patch: Debug
        + Clone
        + Default
        + Serialize
        + DeserializeOwned
        + Validate
        + Send
        + Sync
        + 'static;

    /// Human-readable type name used in errors and logs (e.g. `"Trial"`).
    const ENTITY_TYPE: &'static str;

    /// Collection name: the key-value namespace, the SQL table and the cache key prefix.
    const COLLECTION: &'static str;

    /// Path segment under `/api` serving this collection.
    const ROUTE: &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Builds a new record from its create input.
    fn from_create(id: Uuid, input: Self::Create, now: DateTime<Utc>) -> Self;

    /// Applies the present fields of `patch` and bumps `updated_at`.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Rules spanning several fields, checked on the merged record before an
    /// update is persisted. A patch on its own cannot see the stored values.
    fn validate_record(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Short one-line description for listings.
    fn label(&self) -> String;
}
