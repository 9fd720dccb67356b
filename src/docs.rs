// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::auth::request_otp,
        handlers::auth::reset_password,

        // --- Profile ---
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::auth::change_password,

        // --- Series ---
        handlers::series::list_series,
        handlers::series::create_series,
        handlers::series::get_series,
        handlers::series::update_series,
        handlers::series::delete_series,

        // --- Team ---
        handlers::team::list_members,
        handlers::team::create_member,
        handlers::team::get_member,
        handlers::team::update_member,
        handlers::team::delete_member,

        // --- Reference ---
        handlers::reference::list_channels,
        handlers::reference::create_channel,
        handlers::reference::get_channel,
        handlers::reference::update_channel,
        handlers::reference::delete_channel,
        handlers::reference::list_clients,
        handlers::reference::create_client,
        handlers::reference::get_client,
        handlers::reference::update_client,
        handlers::reference::delete_client,

        // --- Catalog ---
        handlers::reference::list_catalog_items,
        handlers::reference::create_catalog_item,
        handlers::reference::get_catalog_item,
        handlers::reference::update_catalog_item,
        handlers::reference::delete_catalog_item,
        handlers::reference::list_units,
        handlers::reference::create_unit,
        handlers::reference::get_unit,
        handlers::reference::update_unit,
        handlers::reference::delete_unit,
        handlers::reference::list_products,
        handlers::reference::create_product,
        handlers::reference::get_product,
        handlers::reference::update_product,
        handlers::reference::delete_product,

        // --- RFQ ---
        handlers::rfq::list_rfqs,
        handlers::rfq::create_rfq,
        handlers::rfq::get_rfq,
        handlers::rfq::update_rfq,
        handlers::rfq::delete_rfq,
        handlers::rfq::list_rfq_items,
        handlers::rfq::create_rfq_item,
        handlers::rfq::get_rfq_item,
        handlers::rfq::update_rfq_item,
        handlers::rfq::delete_rfq_item,

        // --- Quotation ---
        handlers::quotation::list_quotations,
        handlers::quotation::create_quotation,
        handlers::quotation::get_quotation,
        handlers::quotation::update_quotation,
        handlers::quotation::delete_quotation,
        handlers::quotation::send_due_reminder,

        // --- Purchase Order ---
        handlers::purchase_order::list_purchase_orders,
        handlers::purchase_order::create_purchase_order,
        handlers::purchase_order::get_purchase_order,
        handlers::purchase_order::update_purchase_order,
        handlers::purchase_order::delete_purchase_order,

        // --- Work Order ---
        handlers::work_order::list_work_orders,
        handlers::work_order::create_work_order,
        handlers::work_order::get_work_order,
        handlers::work_order::update_work_order,
        handlers::work_order::delete_work_order,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,

            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::RefreshTokenPayload,
            models::auth::RequestOtpPayload,
            models::auth::ResetPasswordPayload,
            models::auth::ChangePasswordPayload,
            models::auth::ProfileUpdate,
            models::auth::TokenPair,
            models::auth::AccessToken,
            models::auth::MessageResponse,

            // --- Series / Team ---
            models::series::NumberSeries,
            models::series::CreateSeriesPayload,
            models::series::UpdateSeriesPayload,
            models::team::TeamMember,
            models::team::CreateTeamMemberPayload,
            models::team::UpdateTeamMemberPayload,

            // --- Reference ---
            models::reference::RfqChannel,
            models::reference::Client,
            models::reference::CatalogEntry,
            models::reference::Product,
            models::reference::ChannelPayload,
            models::reference::CreateClientPayload,
            models::reference::UpdateClientPayload,
            models::reference::CatalogPayload,
            models::reference::CreateProductPayload,
            models::reference::UpdateProductPayload,

            // --- RFQ ---
            models::line_item::LineItemPayload,
            models::rfq::RfqStatus,
            models::rfq::Rfq,
            models::rfq::RfqItem,
            models::rfq::RfqDetail,
            models::rfq::CreateRfqPayload,
            models::rfq::UpdateRfqPayload,
            models::rfq::RfqItemPayload,

            // --- Quotation ---
            models::quotation::Quotation,
            models::quotation::QuotationItem,
            models::quotation::RfqSummary,
            models::quotation::QuotationDetail,
            models::quotation::CreateQuotationPayload,
            models::quotation::UpdateQuotationPayload,
            models::quotation::SendDueReminderPayload,
            models::quotation::DueReminderResponse,

            // --- Purchase Order ---
            models::purchase_order::OrderType,
            models::purchase_order::PurchaseOrder,
            models::purchase_order::PurchaseOrderItem,
            models::purchase_order::PurchaseOrderDetail,
            models::purchase_order::PurchaseOrderItemPayload,
            models::purchase_order::PurchaseOrderForm,
            models::purchase_order::UpdatePurchaseOrderPayload,

            // --- Work Order ---
            models::work_order::OnsiteLab,
            models::work_order::WorkOrderType,
            models::work_order::WorkOrder,
            models::work_order::WorkOrderItem,
            models::work_order::WorkOrderDetail,
            models::work_order::CreateWorkOrderPayload,
            models::work_order::UpdateWorkOrderPayload,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do serviço"),
        (name = "Auth", description = "Login, tokens e recuperação de senha"),
        (name = "Profile", description = "Perfil do usuário logado"),
        (name = "Series", description = "Séries de numeração"),
        (name = "Team", description = "Equipe comercial"),
        (name = "Reference", description = "Canais de RFQ e clientes"),
        (name = "Catalog", description = "Itens, unidades e produtos"),
        (name = "RFQ", description = "Solicitações de cotação"),
        (name = "Quotation", description = "Cotações e lembretes"),
        (name = "Purchase Order", description = "Pedidos de compra"),
        (name = "Work Order", description = "Ordens de serviço")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_the_workflow_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/add-rfqs/",
            "/api/add-rfqs/{id}/",
            "/api/quotations/send-due-reminder/",
            "/api/purchase-orders/",
            "/api/work-orders/{id}/",
            "/api/profile/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
