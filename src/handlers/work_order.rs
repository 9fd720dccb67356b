// src/handlers/work_order.rs

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
        filters::WorkOrderQuery,
        work_order::{CreateWorkOrderPayload, UpdateWorkOrderPayload, WorkOrderDetail},
    },
};

// GET /api/work-orders/
#[utoipa::path(
    get,
    path = "/api/work-orders/",
    tag = "Work Order",
    params(WorkOrderQuery),
    responses((status = 200, description = "Ordens de serviço", body = Vec<WorkOrderDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_work_orders(
    State(app_state): State<AppState>,
    Query(query): Query<WorkOrderQuery>,
) -> Result<Json<Vec<WorkOrderDetail>>, AppError> {
    let status = query.current_status.as_deref().map(str::trim).filter(|s| !s.is_empty());
    Ok(Json(app_state.work_order_service.list(status).await?))
}

// POST /api/work-orders/
#[utoipa::path(
    post,
    path = "/api/work-orders/",
    tag = "Work Order",
    request_body = CreateWorkOrderPayload,
    responses(
        (status = 201, description = "OS criada e numerada", body = WorkOrderDetail),
        (status = 400, description = "Cotação, pedido ou responsável inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_work_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateWorkOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let work_order = app_state.work_order_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(work_order)))
}

// GET /api/work-orders/{id}/
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}/",
    tag = "Work Order",
    params(("id" = i64, Path, description = "ID da OS")),
    responses(
        (status = 200, description = "OS", body = WorkOrderDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WorkOrderDetail>, AppError> {
    Ok(Json(app_state.work_order_service.get(id).await?))
}

// PUT/PATCH /api/work-orders/{id}/
#[utoipa::path(
    put,
    path = "/api/work-orders/{id}/",
    tag = "Work Order",
    params(("id" = i64, Path, description = "ID da OS")),
    request_body = UpdateWorkOrderPayload,
    responses(
        (status = 200, description = "OS atualizada", body = WorkOrderDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateWorkOrderPayload>,
) -> Result<Json<WorkOrderDetail>, AppError> {
    Ok(Json(app_state.work_order_service.update(id, payload).await?))
}

// DELETE /api/work-orders/{id}/
#[utoipa::path(
    delete,
    path = "/api/work-orders/{id}/",
    tag = "Work Order",
    params(("id" = i64, Path, description = "ID da OS")),
    responses(
        (status = 204, description = "OS removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.work_order_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
