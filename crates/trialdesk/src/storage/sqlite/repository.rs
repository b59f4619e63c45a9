//! SQLite repository implementation.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use trialdesk_core::records::Entity;
use trialdesk_core::storage::{select_matching, ListFilter, Repository, RepositoryError, Result};

use super::error::{map_tokio_rusqlite_error, wrap_err, wrap_json_err};
use super::schema;

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// An open SQLite database that hands out one repository per collection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a file-based database.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        tracing::info!(path, "Opened SQLite database");
        Ok(Self { conn })
    }

    /// Opens a private in-memory database. Data is lost when the last clone
    /// is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Returns the repository for `T`, creating its table if needed.
    pub async fn repository<T: Entity>(&self) -> Result<SqliteRepository<T>> {
        let ddl = schema::create_table(T::COLLECTION);
        self.conn
            .call(move |conn| {
                conn.execute_batch(&ddl).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(SqliteRepository {
            conn: self.conn.clone(),
            _entity: PhantomData,
        })
    }
}

/// One collection stored as JSON documents in a SQLite table.
pub struct SqliteRepository<T: Entity> {
    conn: Connection,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for SqliteRepository<T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for SqliteRepository<T> {
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let filter_for_query = filter.clone();
        let documents: Vec<serde_json::Value> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(&schema::select_all(T::COLLECTION))
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;

                let mut documents = Vec::new();
                for row in rows {
                    let data = row.map_err(wrap_err)?;
                    let value: serde_json::Value =
                        serde_json::from_str(&data).map_err(wrap_json_err)?;
                    if filter_for_query.matches_value(&value) {
                        documents.push(value);
                    }
                }
                Ok(documents)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE, "*"))?;

        let items = documents
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        // The filter already ran on the documents; this only fixes the order.
        Ok(select_matching(items, &ListFilter::new()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<T> {
        let id_str = id.to_string();

        let data: String = self
            .conn
            .call(move |conn| {
                conn.query_row(&schema::select_by_id(T::COLLECTION), [&id_str], |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE, id.to_string()))?;

        serde_json::from_str(&data).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn create(&self, input: T::Create) -> Result<T> {
        let item = T::from_create(Uuid::new_v4(), input, Utc::now());
        let data = serde_json::to_string(&item)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let id_str = item.id().to_string();
        let created_at = format_datetime(&item.created_at());
        let updated_at = format_datetime(&item.updated_at());

        self.conn
            .call(move |conn| {
                conn.execute(
                    &schema::insert(T::COLLECTION),
                    [&id_str, &data, &created_at, &updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE, item.id().to_string()))?;

        tracing::debug!(collection = T::COLLECTION, id = %item.id(), "Inserted record");
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T> {
        let id_str = id.to_string();

        // Read, patch and write back inside one transaction.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let data: Option<String> = tx
                    .query_row(&schema::select_by_id(T::COLLECTION), [&id_str], |row| {
                        row.get(0)
                    })
                    .optional()
                    .map_err(wrap_err)?;
                let Some(data) = data else {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                };

                let mut item: T = serde_json::from_str(&data).map_err(wrap_json_err)?;
                item.apply_patch(patch, Utc::now());

                let data = serde_json::to_string(&item).map_err(wrap_json_err)?;
                let updated_at = format_datetime(&item.updated_at());
                tx.execute(
                    &schema::update(T::COLLECTION),
                    [&id_str, &data, &updated_at],
                )
                .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;
                Ok(item)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE, id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        let affected = self
            .conn
            .call(move |conn| {
                conn.execute(&schema::delete(T::COLLECTION), [&id_str])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE, id.to_string()))?;

        if affected == 0 {
            return Err(RepositoryError::not_found(T::ENTITY_TYPE, id));
        }
        Ok(())
    }
}
