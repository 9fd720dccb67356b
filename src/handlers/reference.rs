// src/handlers/reference.rs

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
        reference::{
            CatalogEntry, CatalogPayload, CatalogTable, ChannelPayload, Client, CreateClientPayload,
            CreateProductPayload, Product, RfqChannel, UpdateClientPayload, UpdateProductPayload,
        },
    },
};

// =============================================================================
//  CANAIS DE RFQ
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/rfq-channels/",
    tag = "Reference",
    responses((status = 200, description = "Canais de RFQ", body = Vec<RfqChannel>)),
    security(("api_jwt" = []))
)]
pub async fn list_channels(State(app_state): State<AppState>) -> Result<Json<Vec<RfqChannel>>, AppError> {
    Ok(Json(app_state.reference_service.list_channels().await?))
}

#[utoipa::path(
    post,
    path = "/api/rfq-channels/",
    tag = "Reference",
    request_body = ChannelPayload,
    responses(
        (status = 201, description = "Canal criado", body = RfqChannel),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_channel(
    State(app_state): State<AppState>,
    Json(payload): Json<ChannelPayload>,
) -> Result<impl IntoResponse, AppError> {
    let channel = app_state.reference_service.create_channel(payload).await?;
    Ok((StatusCode::CREATED, Json(channel)))
}

#[utoipa::path(
    get,
    path = "/api/rfq-channels/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do canal")),
    responses(
        (status = 200, description = "Canal", body = RfqChannel),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_channel(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RfqChannel>, AppError> {
    Ok(Json(app_state.reference_service.get_channel(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/rfq-channels/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do canal")),
    request_body = ChannelPayload,
    responses(
        (status = 200, description = "Canal atualizado", body = RfqChannel),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_channel(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChannelPayload>,
) -> Result<Json<RfqChannel>, AppError> {
    Ok(Json(app_state.reference_service.update_channel(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/rfq-channels/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do canal")),
    responses(
        (status = 204, description = "Canal removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_channel(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.reference_service.delete_channel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CLIENTES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/clients/",
    tag = "Reference",
    params(SearchQuery),
    responses((status = 200, description = "Clientes", body = Vec<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(app_state.reference_service.list_clients(query.search.as_deref()).await?))
}

#[utoipa::path(
    post,
    path = "/api/clients/",
    tag = "Reference",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.reference_service.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(app_state.reference_service.get_client(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(app_state.reference_service.update_client(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}/",
    tag = "Reference",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.reference_service.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CATÁLOGO: ITENS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/items/",
    tag = "Catalog",
    params(SearchQuery),
    responses((status = 200, description = "Lista de itens do catálogo", body = Vec<CatalogEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_catalog_items(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    let entries = app_state
        .reference_service
        .list_catalog(CatalogTable::Items, query.search.as_deref())
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/items/",
    tag = "Catalog",
    request_body = CatalogPayload,
    responses(
        (status = 201, description = "Criado", body = CatalogEntry),
        (status = 400, description = "Nome vazio ou repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_catalog_item(
    State(app_state): State<AppState>,
    Json(payload): Json<CatalogPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .reference_service
        .create_catalog(CatalogTable::Items, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    responses(
        (status = 200, description = "Registro", body = CatalogEntry),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_catalog_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, AppError> {
    Ok(Json(app_state.reference_service.get_catalog(CatalogTable::Items, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    request_body = CatalogPayload,
    responses(
        (status = 200, description = "Atualizado", body = CatalogEntry),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_catalog_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogPayload>,
) -> Result<Json<CatalogEntry>, AppError> {
    let entry = app_state
        .reference_service
        .update_catalog(CatalogTable::Items, id, payload)
        .await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_catalog_item(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state
        .reference_service
        .delete_catalog(CatalogTable::Items, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CATÁLOGO: UNIDADES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/units/",
    tag = "Catalog",
    params(SearchQuery),
    responses((status = 200, description = "Lista de unidades", body = Vec<CatalogEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    let entries = app_state
        .reference_service
        .list_catalog(CatalogTable::Units, query.search.as_deref())
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/units/",
    tag = "Catalog",
    request_body = CatalogPayload,
    responses(
        (status = 201, description = "Criado", body = CatalogEntry),
        (status = 400, description = "Nome vazio ou repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    Json(payload): Json<CatalogPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .reference_service
        .create_catalog(CatalogTable::Units, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    responses(
        (status = 200, description = "Registro", body = CatalogEntry),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, AppError> {
    Ok(Json(app_state.reference_service.get_catalog(CatalogTable::Units, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    request_body = CatalogPayload,
    responses(
        (status = 200, description = "Atualizado", body = CatalogEntry),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogPayload>,
) -> Result<Json<CatalogEntry>, AppError> {
    let entry = app_state
        .reference_service
        .update_catalog(CatalogTable::Units, id, payload)
        .await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state
        .reference_service
        .delete_catalog(CatalogTable::Units, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PRODUTOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/products/",
    tag = "Catalog",
    params(SearchQuery),
    responses((status = 200, description = "Produtos", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.reference_service.list_products(query.search.as_deref()).await?))
}

#[utoipa::path(
    post,
    path = "/api/products/",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.reference_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.reference_service.get_product(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.reference_service.update_product(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/",
    tag = "Catalog",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.reference_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
