// src/handlers/series.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        filters::SearchQuery,
        series::{CreateSeriesPayload, NumberSeries, UpdateSeriesPayload},
    },
};

// GET /api/series/
#[utoipa::path(
    get,
    path = "/api/series/",
    tag = "Series",
    params(SearchQuery),
    responses(
        (status = 200, description = "Lista de séries", body = Vec<NumberSeries>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_series(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<NumberSeries>>, AppError> {
    let series = app_state.series_service.list(query.search.as_deref()).await?;
    Ok(Json(series))
}

// POST /api/series/
#[utoipa::path(
    post,
    path = "/api/series/",
    tag = "Series",
    request_body = CreateSeriesPayload,
    responses(
        (status = 201, description = "Série criada", body = NumberSeries),
        (status = 400, description = "Dados inválidos ou nome/prefixo repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_series(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSeriesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let series = app_state.series_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(series)))
}

// GET /api/series/{id}/
#[utoipa::path(
    get,
    path = "/api/series/{id}/",
    tag = "Series",
    params(("id" = i64, Path, description = "ID da série")),
    responses(
        (status = 200, description = "Série", body = NumberSeries),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_series(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NumberSeries>, AppError> {
    Ok(Json(app_state.series_service.get(id).await?))
}

// PUT/PATCH /api/series/{id}/
#[utoipa::path(
    put,
    path = "/api/series/{id}/",
    tag = "Series",
    params(("id" = i64, Path, description = "ID da série")),
    request_body = UpdateSeriesPayload,
    responses(
        (status = 200, description = "Série atualizada", body = NumberSeries),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_series(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSeriesPayload>,
) -> Result<Json<NumberSeries>, AppError> {
    Ok(Json(app_state.series_service.update(id, payload).await?))
}

// DELETE /api/series/{id}/
#[utoipa::path(
    delete,
    path = "/api/series/{id}/",
    tag = "Series",
    params(("id" = i64, Path, description = "ID da série")),
    responses(
        (status = 204, description = "Série removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_series(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.series_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
