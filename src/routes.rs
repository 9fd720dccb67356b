// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

// Foto de perfil vai até 5MB; o resto do multipart cabe na folga
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Monta o router completo da API.
pub fn app(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/login/", post(handlers::auth::login))
        .route("/token/refresh/", post(handlers::auth::refresh_token))
        .route("/request-otp/", post(handlers::auth::request_otp))
        .route("/reset-password/", post(handlers::auth::reset_password));

    let protected_routes = Router::new()
        // Perfil
        .route(
            "/profile/",
            get(handlers::auth::get_profile)
                .put(handlers::auth::update_profile)
                .patch(handlers::auth::update_profile),
        )
        .route("/change-password/", post(handlers::auth::change_password))
        // Séries
        .route(
            "/series/",
            get(handlers::series::list_series).post(handlers::series::create_series),
        )
        .route(
            "/series/{id}/",
            get(handlers::series::get_series)
                .put(handlers::series::update_series)
                .patch(handlers::series::update_series)
                .delete(handlers::series::delete_series),
        )
        // Equipe
        .route(
            "/teams/",
            get(handlers::team::list_members).post(handlers::team::create_member),
        )
        .route(
            "/teams/{id}/",
            get(handlers::team::get_member)
                .put(handlers::team::update_member)
                .patch(handlers::team::update_member)
                .delete(handlers::team::delete_member),
        )
        // Canais e clientes
        .route(
            "/rfq-channels/",
            get(handlers::reference::list_channels).post(handlers::reference::create_channel),
        )
        .route(
            "/rfq-channels/{id}/",
            get(handlers::reference::get_channel)
                .put(handlers::reference::update_channel)
                .patch(handlers::reference::update_channel)
                .delete(handlers::reference::delete_channel),
        )
        .route(
            "/clients/",
            get(handlers::reference::list_clients).post(handlers::reference::create_client),
        )
        .route(
            "/clients/{id}/",
            get(handlers::reference::get_client)
                .put(handlers::reference::update_client)
                .patch(handlers::reference::update_client)
                .delete(handlers::reference::delete_client),
        )
        // Catálogo
        .route(
            "/items/",
            get(handlers::reference::list_catalog_items).post(handlers::reference::create_catalog_item),
        )
        .route(
            "/items/{id}/",
            get(handlers::reference::get_catalog_item)
                .put(handlers::reference::update_catalog_item)
                .patch(handlers::reference::update_catalog_item)
                .delete(handlers::reference::delete_catalog_item),
        )
        .route(
            "/units/",
            get(handlers::reference::list_units).post(handlers::reference::create_unit),
        )
        .route(
            "/units/{id}/",
            get(handlers::reference::get_unit)
                .put(handlers::reference::update_unit)
                .patch(handlers::reference::update_unit)
                .delete(handlers::reference::delete_unit),
        )
        .route(
            "/products/",
            get(handlers::reference::list_products).post(handlers::reference::create_product),
        )
        .route(
            "/products/{id}/",
            get(handlers::reference::get_product)
                .put(handlers::reference::update_product)
                .patch(handlers::reference::update_product)
                .delete(handlers::reference::delete_product),
        )
        // RFQs
        .route(
            "/add-rfqs/",
            get(handlers::rfq::list_rfqs).post(handlers::rfq::create_rfq),
        )
        .route(
            "/add-rfqs/{id}/",
            get(handlers::rfq::get_rfq)
                .put(handlers::rfq::update_rfq)
                .patch(handlers::rfq::update_rfq)
                .delete(handlers::rfq::delete_rfq),
        )
        .route(
            "/add-items/",
            get(handlers::rfq::list_rfq_items).post(handlers::rfq::create_rfq_item),
        )
        .route(
            "/add-items/{id}/",
            get(handlers::rfq::get_rfq_item)
                .put(handlers::rfq::update_rfq_item)
                .patch(handlers::rfq::update_rfq_item)
                .delete(handlers::rfq::delete_rfq_item),
        )
        // Cotações
        .route(
            "/quotations/",
            get(handlers::quotation::list_quotations).post(handlers::quotation::create_quotation),
        )
        .route(
            "/quotations/send-due-reminder/",
            post(handlers::quotation::send_due_reminder),
        )
        .route(
            "/quotations/{id}/",
            get(handlers::quotation::get_quotation)
                .put(handlers::quotation::update_quotation)
                .patch(handlers::quotation::update_quotation)
                .delete(handlers::quotation::delete_quotation),
        )
        // Pedidos de compra
        .route(
            "/purchase-orders/",
            get(handlers::purchase_order::list_purchase_orders)
                .post(handlers::purchase_order::create_purchase_order),
        )
        .route(
            "/purchase-orders/{id}/",
            get(handlers::purchase_order::get_purchase_order)
                .put(handlers::purchase_order::update_purchase_order)
                .patch(handlers::purchase_order::update_purchase_order)
                .delete(handlers::purchase_order::delete_purchase_order),
        )
        // Ordens de serviço
        .route(
            "/work-orders/",
            get(handlers::work_order::list_work_orders).post(handlers::work_order::create_work_order),
        )
        .route(
            "/work-orders/{id}/",
            get(handlers::work_order::get_work_order)
                .put(handlers::work_order::update_work_order)
                .patch(handlers::work_order::update_work_order)
                .delete(handlers::work_order::delete_work_order),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = Router::new()
        .route("/health/", get(handlers::health::health))
        .merge(auth_routes)
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .merge(
            SwaggerUi::new("/api/documentation")
                .url("/api/documentation/openapi.json", ApiDoc::openapi()),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
