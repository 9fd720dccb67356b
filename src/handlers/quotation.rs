// src/handlers/quotation.rs

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
        quotation::{
            CreateQuotationPayload, DueReminderResponse, QuotationDetail, SendDueReminderPayload,
            UpdateQuotationPayload,
        },
    },
};

// GET /api/quotations/
#[utoipa::path(
    get,
    path = "/api/quotations/",
    tag = "Quotation",
    params(SearchQuery),
    responses((status = 200, description = "Cotações com itens e pedidos", body = Vec<QuotationDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_quotations(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QuotationDetail>>, AppError> {
    Ok(Json(app_state.quotation_service.list(query.search.as_deref()).await?))
}

// POST /api/quotations/
#[utoipa::path(
    post,
    path = "/api/quotations/",
    tag = "Quotation",
    request_body = CreateQuotationPayload,
    responses(
        (status = 201, description = "Cotação criada", body = QuotationDetail),
        (status = 400, description = "RFQ inexistente, não concluída ou já cotada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quotation(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateQuotationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let quotation = app_state.quotation_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

// GET /api/quotations/{id}/
#[utoipa::path(
    get,
    path = "/api/quotations/{id}/",
    tag = "Quotation",
    params(("id" = i64, Path, description = "ID da cotação")),
    responses(
        (status = 200, description = "Cotação", body = QuotationDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quotation(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuotationDetail>, AppError> {
    Ok(Json(app_state.quotation_service.get(id).await?))
}

// PUT/PATCH /api/quotations/{id}/
#[utoipa::path(
    put,
    path = "/api/quotations/{id}/",
    tag = "Quotation",
    params(("id" = i64, Path, description = "ID da cotação")),
    request_body = UpdateQuotationPayload,
    responses(
        (status = 200, description = "Cotação atualizada", body = QuotationDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quotation(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuotationPayload>,
) -> Result<Json<QuotationDetail>, AppError> {
    Ok(Json(app_state.quotation_service.update(id, payload).await?))
}

// DELETE /api/quotations/{id}/
#[utoipa::path(
    delete,
    path = "/api/quotations/{id}/",
    tag = "Quotation",
    params(("id" = i64, Path, description = "ID da cotação")),
    responses(
        (status = 204, description = "Cotação removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quotation(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.quotation_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/quotations/send-due-reminder/
#[utoipa::path(
    post,
    path = "/api/quotations/send-due-reminder/",
    tag = "Quotation",
    request_body = SendDueReminderPayload,
    responses(
        (status = 200, description = "Lembrete disparado", body = DueReminderResponse),
        (status = 400, description = "Cotação não aprovada, já com pedido ou responsável sem e-mail"),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_due_reminder(
    State(app_state): State<AppState>,
    Json(payload): Json<SendDueReminderPayload>,
) -> Result<Json<DueReminderResponse>, AppError> {
    let response = app_state.quotation_service.send_due_reminder(payload.quotation_id).await?;
    Ok(Json(response))
}
