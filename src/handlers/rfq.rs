// src/handlers/rfq.rs

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
        filters::{RfqItemQuery, RfqQuery},
        rfq::{CreateRfqPayload, RfqDetail, RfqItem, RfqItemPayload, UpdateRfqPayload},
    },
};

// =============================================================================
//  RFQs
// =============================================================================

// GET /api/add-rfqs/
#[utoipa::path(
    get,
    path = "/api/add-rfqs/",
    tag = "RFQ",
    params(RfqQuery),
    responses((status = 200, description = "RFQs com itens e responsável", body = Vec<RfqDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_rfqs(
    State(app_state): State<AppState>,
    Query(query): Query<RfqQuery>,
) -> Result<Json<Vec<RfqDetail>>, AppError> {
    let rfqs = app_state
        .rfq_service
        .list(query.search.as_deref(), query.current_status)
        .await?;
    Ok(Json(rfqs))
}

// POST /api/add-rfqs/
#[utoipa::path(
    post,
    path = "/api/add-rfqs/",
    tag = "RFQ",
    request_body = CreateRfqPayload,
    responses(
        (status = 201, description = "RFQ criada e numerada", body = RfqDetail),
        (status = 400, description = "Dados inválidos, série inexistente ou responsável sem e-mail")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_rfq(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRfqPayload>,
) -> Result<impl IntoResponse, AppError> {
    let rfq = app_state.rfq_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(rfq)))
}

// GET /api/add-rfqs/{id}/
#[utoipa::path(
    get,
    path = "/api/add-rfqs/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID da RFQ")),
    responses(
        (status = 200, description = "RFQ", body = RfqDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_rfq(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RfqDetail>, AppError> {
    Ok(Json(app_state.rfq_service.get(id).await?))
}

// PUT/PATCH /api/add-rfqs/{id}/
#[utoipa::path(
    put,
    path = "/api/add-rfqs/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID da RFQ")),
    request_body = UpdateRfqPayload,
    responses(
        (status = 200, description = "RFQ atualizada (cotação vinculada sincronizada)", body = RfqDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_rfq(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRfqPayload>,
) -> Result<Json<RfqDetail>, AppError> {
    Ok(Json(app_state.rfq_service.update(id, payload).await?))
}

// DELETE /api/add-rfqs/{id}/
#[utoipa::path(
    delete,
    path = "/api/add-rfqs/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID da RFQ")),
    responses(
        (status = 204, description = "RFQ removida e série renumerada"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_rfq(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.rfq_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ITENS DE RFQ
// =============================================================================

// GET /api/add-items/
#[utoipa::path(
    get,
    path = "/api/add-items/",
    tag = "RFQ",
    params(RfqItemQuery),
    responses((status = 200, description = "Itens de RFQ", body = Vec<RfqItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_rfq_items(
    State(app_state): State<AppState>,
    Query(query): Query<RfqItemQuery>,
) -> Result<Json<Vec<RfqItem>>, AppError> {
    Ok(Json(app_state.rfq_service.list_items(query.rfq).await?))
}

// POST /api/add-items/
#[utoipa::path(
    post,
    path = "/api/add-items/",
    tag = "RFQ",
    request_body = RfqItemPayload,
    responses(
        (status = 201, description = "Item criado", body = RfqItem),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_rfq_item(
    State(app_state): State<AppState>,
    Json(payload): Json<RfqItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.rfq_service.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/add-items/{id}/
#[utoipa::path(
    get,
    path = "/api/add-items/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item", body = RfqItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_rfq_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RfqItem>, AppError> {
    Ok(Json(app_state.rfq_service.get_item(id).await?))
}

// PUT/PATCH /api/add-items/{id}/
#[utoipa::path(
    put,
    path = "/api/add-items/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID do item")),
    request_body = RfqItemPayload,
    responses(
        (status = 200, description = "Item atualizado", body = RfqItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_rfq_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RfqItemPayload>,
) -> Result<Json<RfqItem>, AppError> {
    Ok(Json(app_state.rfq_service.update_item(id, payload).await?))
}

// DELETE /api/add-items/{id}/
#[utoipa::path(
    delete,
    path = "/api/add-items/{id}/",
    tag = "RFQ",
    params(("id" = i64, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_rfq_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.rfq_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
