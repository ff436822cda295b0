//! Contact API endpoints.
//!
//! Each handler is a thin adapter: parse path/query/body, run one store
//! operation on a blocking thread, map the outcome to a response.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::http::request::JsonBody;
use crate::http::response::{ApiError, StoreOp};
use crate::http::server::AppState;
use crate::store::{Contact, ContactFields, ContactId, ContactStore, StoreResult};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

/// `GET /api/contacts?search=`
pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected query string");
        ApiError::InvalidQuery
    })?;
    tracing::debug!(search = %params.search, "Listing contacts");
    let contacts = run_store(&state, StoreOp::List, move |store| {
        store.search(&params.search)
    })
    .await?;
    Ok(Json(contacts))
}

/// `GET /api/contacts/{id}`
pub async fn get_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&raw_id)?;
    let contact = run_store(&state, StoreOp::Get(id), move |store| store.get(id)).await?;
    Ok(Json(contact))
}

/// `POST /api/contacts`
pub async fn create_contact(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<ContactFields>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = run_store(&state, StoreOp::Create, move |store| store.create(fields)).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /api/contacts/{id}`
///
/// A missing contact answers 404 even when the body is unusable.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<JsonBody<ContactFields>, ApiError>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&raw_id)?;
    let fields = match body {
        Ok(JsonBody(fields)) => fields,
        Err(rejection) => {
            run_store(&state, StoreOp::Update(id), move |store| store.get(id)).await?;
            return Err(rejection);
        }
    };
    let contact = run_store(&state, StoreOp::Update(id), move |store| {
        store.update(id, fields)
    })
    .await?;
    Ok(Json(contact))
}

/// `DELETE /api/contacts/{id}`
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&raw_id)?;
    run_store(&state, StoreOp::Delete(id), move |store| store.delete(id)).await?;
    Ok(Json(json!({ "message": format!("Contact {id} deleted successfully") })))
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Only unsigned decimal ids match the route; anything else is an unknown path.
fn parse_id(raw: &str) -> Result<ContactId, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::RouteNotFound);
    }
    raw.parse().map_err(|_| ApiError::RouteNotFound)
}

/// Run a synchronous store call off the async workers.
async fn run_store<T, F>(state: &AppState, op: StoreOp, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ContactStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| {
            tracing::error!(operation = ?op, error = %e, "Store task failed");
            ApiError::internal()
        })?
        .map_err(|e| ApiError::from_store(e, op))
}
