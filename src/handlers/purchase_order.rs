// src/handlers/purchase_order.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, form::read_multipart},
    config::AppState,
    models::{
        filters::PurchaseOrderQuery,
        purchase_order::{PurchaseOrderDetail, PurchaseOrderForm, UpdatePurchaseOrderPayload},
    },
};

// GET /api/purchase-orders/
#[utoipa::path(
    get,
    path = "/api/purchase-orders/",
    tag = "Purchase Order",
    params(PurchaseOrderQuery),
    responses((status = 200, description = "Pedidos com itens", body = Vec<PurchaseOrderDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_purchase_orders(
    State(app_state): State<AppState>,
    Query(query): Query<PurchaseOrderQuery>,
) -> Result<Json<Vec<PurchaseOrderDetail>>, AppError> {
    Ok(Json(app_state.purchase_order_service.list(query.quotation).await?))
}

// POST /api/purchase-orders/ (multipart)
#[utoipa::path(
    post,
    path = "/api/purchase-orders/",
    tag = "Purchase Order",
    request_body(content = PurchaseOrderForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Pedido criado; cotação passa a PO Created", body = PurchaseOrderDetail),
        (status = 400, description = "Itens inválidos, nada é gravado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_purchase_order(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = read_multipart(multipart, "po_file").await?;

    let new = PurchaseOrderForm {
        quotation: form.take("quotation"),
        client_po_number: form.take("client_po_number"),
        order_type: form.take("order_type"),
        items: form.take("items"),
        po_file: form.file,
    }
    .into_new()?;

    let purchase_order = app_state.purchase_order_service.create(new).await?;
    Ok((StatusCode::CREATED, Json(purchase_order)))
}

// GET /api/purchase-orders/{id}/
#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}/",
    tag = "Purchase Order",
    params(("id" = i64, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido", body = PurchaseOrderDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_purchase_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PurchaseOrderDetail>, AppError> {
    Ok(Json(app_state.purchase_order_service.get(id).await?))
}

// PUT/PATCH /api/purchase-orders/{id}/
#[utoipa::path(
    put,
    path = "/api/purchase-orders/{id}/",
    tag = "Purchase Order",
    params(("id" = i64, Path, description = "ID do pedido")),
    request_body = UpdatePurchaseOrderPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = PurchaseOrderDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_purchase_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePurchaseOrderPayload>,
) -> Result<Json<PurchaseOrderDetail>, AppError> {
    Ok(Json(app_state.purchase_order_service.update(id, payload).await?))
}

// DELETE /api/purchase-orders/{id}/
#[utoipa::path(
    delete,
    path = "/api/purchase-orders/{id}/",
    tag = "Purchase Order",
    params(("id" = i64, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido e arquivo removidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_purchase_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.purchase_order_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
