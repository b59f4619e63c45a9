//! CRUD handlers shared by every resource.
//!
//! Each resource gets its own router whose state is the collection's
//! repository, so one set of generic handlers serves all eight collections.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use chrono::Utc;

use trialdesk_core::records::{Entity, Validate};
use trialdesk_core::response::Listing;
use trialdesk_core::storage::{ListQuery, Repository};

use super::{AppError, Envelope, JsonBody, QueryParams, RecordId};

type Repo<T> = Arc<dyn Repository<T>>;

/// Routes `/{route}` and `/{route}/{id}` for `T` over `repository`.
pub fn resource_routes<T: Entity>(repository: Repo<T>) -> Router {
    Router::new()
        .route(&format!("/{}", T::ROUTE), get(list::<T>).post(create::<T>))
        .route(
            &format!("/{}/{{id}}", T::ROUTE),
            get(show::<T>)
                .put(update::<T>)
                .patch(update::<T>)
                .delete(destroy::<T>),
        )
        .with_state(repository)
}

/// GET /api/{resource}
///
/// Query parameters other than `page` and `limit` are equality filters.
async fn list<T: Entity>(
    State(repo): State<Repo<T>>,
    QueryParams(params): QueryParams,
) -> Result<Envelope<Listing<T>>, AppError> {
    let query = ListQuery::from_params(params)?;

    let listing = match query.page {
        Some(request) => Listing::Page(repo.find_page(&query.filter, request).await?),
        None => Listing::All(repo.find_all(&query.filter).await?),
    };

    let message = format!(
        "Retrieved {} {} record(s)",
        listing.items().len(),
        T::ENTITY_TYPE
    );
    Ok(Envelope::ok(message, listing))
}

/// POST /api/{resource}
async fn create<T: Entity>(
    State(repo): State<Repo<T>>,
    JsonBody(input): JsonBody<T::Create>,
) -> Result<Envelope<T>, AppError> {
    input.validate()?;

    let item = repo.create(input).await?;
    tracing::info!(entity = T::ENTITY_TYPE, id = %item.id(), "Record created");

    Ok(Envelope::created(format!("{} created", T::ENTITY_TYPE), item))
}

/// GET /api/{resource}/{id}
async fn show<T: Entity>(
    State(repo): State<Repo<T>>,
    RecordId(id): RecordId,
) -> Result<Envelope<T>, AppError> {
    let item = repo.find_by_id(id).await?;
    Ok(Envelope::ok(format!("{} retrieved", T::ENTITY_TYPE), item))
}

/// PUT or PATCH /api/{resource}/{id}
///
/// Both verbs take a partial body; absent fields keep their stored value.
/// Rules that span fields are checked on the stored record with the patch
/// applied, before anything is written.
async fn update<T: Entity>(
    State(repo): State<Repo<T>>,
    RecordId(id): RecordId,
    JsonBody(patch): JsonBody<T::Patch>,
) -> Result<Envelope<T>, AppError> {
    patch.validate()?;

    let mut merged = repo.find_by_id(id).await?;
    merged.apply_patch(patch.clone(), Utc::now());
    merged.validate_record()?;

    let item = repo.update(id, patch).await?;
    tracing::info!(entity = T::ENTITY_TYPE, id = %id, "Record updated");

    Ok(Envelope::ok(format!("{} updated", T::ENTITY_TYPE), item))
}

/// DELETE /api/{resource}/{id}
async fn destroy<T: Entity>(
    State(repo): State<Repo<T>>,
    RecordId(id): RecordId,
) -> Result<Envelope<()>, AppError> {
    repo.delete(id).await?;
    tracing::info!(entity = T::ENTITY_TYPE, id = %id, "Record deleted");

    Ok(Envelope::empty(format!("{} deleted", T::ENTITY_TYPE)))
}
