// handlers/resource.rs - CRUD handlers shared by every resource
//
// Each handler runs one validate → query → respond cycle against the
// resource's store. Routes are registered per resource in `app.rs`:
//
//   GET    /questoes      → list        POST   /questoes      → create
//   GET    /questoes/:id  → get         PUT    /questoes/:id  → update
//   DELETE /questoes/:id  → delete
//
// and likewise for /usuarios.

use axum::extract::State;
use tracing::info;

use crate::api::{ApiResponse, ApiResult, JsonBody, Message, RecordId};
use crate::app::StoreRef;
use crate::database::manager::DatabaseError;
use crate::database::models::{Draft, Resource};
use crate::database::store::Store;
use crate::error::ApiError;

/// GET /:resource - every row, possibly none
pub async fn list<R: Resource>(State(store): State<StoreRef<R>>) -> ApiResult<Vec<R>> {
    info!("Rota GET {} solicitada", R::PATH);

    let rows = store
        .list()
        .await
        .map_err(|e| store_failure(e, "buscar", R::LABELS.plural))?;

    Ok(ApiResponse::success(rows))
}

/// GET /:resource/:id - matching rows as an array, 404 when there are none
pub async fn get<R: Resource>(
    State(store): State<StoreRef<R>>,
    id: RecordId,
) -> ApiResult<Vec<R>> {
    info!("Rota GET {}/{} solicitada", R::PATH, id.raw);

    let (_, rows) = find_existing(store.as_ref(), &id, "buscar").await?;
    Ok(ApiResponse::success(rows))
}

/// POST /:resource - every field required; the new id is not returned
pub async fn create<R: Resource>(
    State(store): State<StoreRef<R>>,
    JsonBody(draft): JsonBody<R::Draft>,
) -> ApiResult<Message> {
    info!("Rota POST {} solicitada", R::PATH);

    let fields = draft
        .into_fields()
        .map_err(|missing| ApiError::missing_fields(&missing))?;

    store
        .insert(&fields)
        .await
        .map_err(|e| store_failure(e, "criar", R::LABELS.singular))?;

    Ok(ApiResponse::created(Message {
        mensagem: R::LABELS.created,
    }))
}

/// PUT /:resource/:id - absent fields keep their stored values
pub async fn update<R: Resource>(
    State(store): State<StoreRef<R>>,
    id: RecordId,
    JsonBody(draft): JsonBody<R::Draft>,
) -> ApiResult<Message> {
    info!("Rota PUT {}/{} solicitada", R::PATH, id.raw);

    let (id, rows) = find_existing(store.as_ref(), &id, "atualizar").await?;
    let current = rows
        .first()
        .map(R::fields)
        .ok_or_else(|| ApiError::not_found(R::LABELS.not_found))?;

    let fields = draft.merge(current);
    store
        .update(id, &fields)
        .await
        .map_err(|e| store_failure(e, "atualizar", R::LABELS.singular))?;

    Ok(ApiResponse::message(R::LABELS.updated))
}

/// DELETE /:resource/:id
pub async fn delete<R: Resource>(
    State(store): State<StoreRef<R>>,
    id: RecordId,
) -> ApiResult<Message> {
    info!("Rota DELETE {}/{} solicitada", R::PATH, id.raw);

    let (id, _) = find_existing(store.as_ref(), &id, "excluir").await?;
    store
        .delete(id)
        .await
        .map_err(|e| store_failure(e, "excluir", R::LABELS.singular))?;

    Ok(ApiResponse::message(R::LABELS.deleted))
}

/// Lookup by id shared by get/update/delete: zero rows is a 404.
/// Returns the numeric id alongside the rows.
async fn find_existing<R: Resource>(
    store: &dyn Store<R>,
    id: &RecordId,
    action: &str,
) -> Result<(i32, Vec<R>), ApiError> {
    let id = id
        .value
        .ok_or_else(|| ApiError::not_found(R::LABELS.not_found))?;

    let rows = store
        .find(id)
        .await
        .map_err(|e| store_failure(e, action, R::LABELS.singular))?;

    if rows.is_empty() {
        return Err(ApiError::not_found(R::LABELS.not_found));
    }
    Ok((id, rows))
}

fn store_failure(err: DatabaseError, action: &str, target: &str) -> ApiError {
    ApiError::store(err, format!("Não foi possível {} {}.", action, target))
}
