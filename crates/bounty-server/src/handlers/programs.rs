//! Program management handlers (list, create, get, delete).

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::handlers::run_service;
use crate::query::{parse_list_query, RawListQuery};
use crate::schema::common::MessageResponse;
use crate::schema::programs::{ProgramListResponse, ProgramResponse};
use crate::state::AppState;

/// Lists programs, sorted and paginated.
///
/// `GET /programs?sortBy=&sortOrder=&page=&limit=`
pub async fn list_programs(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ProgramListResponse>, ApiError> {
    let Query(pairs) = pairs.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected list query string");
        ApiError::MalformedQuery
    })?;
    let query = parse_list_query(&RawListQuery::from_pairs(pairs))?;
    let page = run_service(state.service, "Failed to fetch programs", move |service| {
        service.list_programs(&query)
    })
    .await?;
    Ok(Json(page))
}

/// Creates a new program.
///
/// `POST /programs`
pub async fn create_program(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProgramResponse>), ApiError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::MalformedBody)?;
    let program = run_service(state.service, "Failed to create program", move |service| {
        service.create_program(&payload)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(ProgramResponse { program })))
}

/// Fetches a program by ID.
///
/// `GET /programs/{id}`
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgramResponse>, ApiError> {
    let program = run_service(state.service, "Failed to fetch program", move |service| {
        service.get_program(&id)
    })
    .await?;
    Ok(Json(ProgramResponse { program }))
}

/// Deletes a program by ID.
///
/// `DELETE /programs/{id}`
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    run_service(state.service, "Failed to delete program", move |service| {
        service.delete_program(&id)
    })
    .await?;
    Ok(Json(MessageResponse::new("Program deleted successfully")))
}
