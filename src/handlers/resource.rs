//! Generic CRUD handlers shared by `/alunos/`, `/cursos/` and `/matriculas/`.
//!
//! Each resource only supplies its table metadata (`Model`) and its payload
//! rules (`Writable`); routing picks the monomorphized handler, e.g.
//! `get(resource::list::<Aluno>)`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::{expect_object, Writable, WriteMode};
use crate::database::models::Model;
use crate::database::{ListFilter, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the resource's search column
    pub search: Option<String>,
    /// Pagination (optional)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    fn into_filter(self, max_limit: i64) -> ListFilter {
        let max_limit = max_limit.max(0);
        ListFilter {
            search: self.search,
            limit: self.limit.map(|l| l.clamp(0, max_limit)),
            offset: self.offset.map(|o| o.max(0)),
        }
    }
}

/// GET /{resource}/
pub async fn list<T: Model>(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<T>> {
    let filter = list_query(query)?.into_filter(state.config.api.max_list_limit);
    let records = Repository::<T>::new(&state.pool).select_all(&filter).await?;
    Ok(ApiResponse::success(records))
}

/// POST /{resource}/
pub async fn create<T: Model + Writable>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    let payload = json_body(payload)?;
    let changes = T::changeset(expect_object(&payload)?, WriteMode::Full)?;

    let record = Repository::<T>::new(&state.pool).insert(&changes).await?;
    tracing::info!("Created record in {}", T::TABLE);
    Ok(ApiResponse::created(record))
}

/// GET /{resource}/{id}/
pub async fn retrieve<T: Model>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<T> {
    let id = parse_id(&id)?;
    let record = Repository::<T>::new(&state.pool).select_404(id).await?;
    Ok(ApiResponse::success(record))
}

/// PUT /{resource}/{id}/
pub async fn update<T: Model + Writable>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    write(state, id, payload, WriteMode::Full).await
}

/// PATCH /{resource}/{id}/
pub async fn partial_update<T: Model + Writable>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    write(state, id, payload, WriteMode::Partial).await
}

/// DELETE /{resource}/{id}/
pub async fn destroy<T: Model>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    Repository::<T>::new(&state.pool).delete(id).await?;
    tracing::info!("Deleted record {} from {}", id, T::TABLE);
    Ok(ApiResponse::<()>::no_content())
}

async fn write<T: Model + Writable>(
    state: AppState,
    id: String,
    payload: Result<Json<Value>, JsonRejection>,
    mode: WriteMode,
) -> ApiResult<T> {
    let id = parse_id(&id)?;
    let repository = Repository::<T>::new(&state.pool);

    // Unknown ids are reported before payload problems
    repository.select_404(id).await?;

    let payload = json_body(payload)?;
    let changes = T::changeset(expect_object(&payload)?, mode)?;

    let record = repository.update(id, &changes).await?;
    tracing::info!("Updated record {} in {} ({} fields)", id, T::TABLE, changes.len());
    Ok(ApiResponse::success(record))
}

/// Path ids that are not integers cannot match any row
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found("Not found."))
}

fn list_query(query: Result<Query<ListQuery>, QueryRejection>) -> Result<ListQuery, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Body rejections keep their status: oversized bodies are 413, a missing
/// JSON content type is 415, anything else is a 400 `INVALID_JSON`
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::payload_too_large(message),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiError::unsupported_media_type(message),
            _ => ApiError::invalid_json(message),
        }
    })
}
