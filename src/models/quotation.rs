// src/models/quotation.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::nullable::deserialize_some,
    models::{line_item::LineItemPayload, purchase_order::PurchaseOrderDetail},
};

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_PO_CREATED: &str = "PO Created";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Quotation {
    pub id: i64,
    #[schema(example = "QT-0000003")]
    pub quotation_no: String,
    #[serde(rename = "rfq")]
    pub rfq_id: i64,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[schema(example = "Pending")]
    pub current_status: String,
    pub when_approved: Option<NaiveDate>,
    pub latest_remarks: Option<String>,
    pub next_followup_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuotationItem {
    pub id: i64,
    #[serde(rename = "quotation")]
    pub quotation_id: i64,
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>, example = 10.0)]
    pub unit_price: Option<Decimal>,
    #[schema(value_type = f64, example = 20.0)]
    pub total_price: Decimal,
}

/// Resumo da RFQ de origem, exibido junto da cotação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RfqSummary {
    pub rfq_no: Option<String>,
    pub assign_to: Option<i64>,
    pub assign_to_name: Option<String>,
    pub assign_to_designation: Option<String>,
    #[serde(skip_serializing)]
    pub assign_to_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<QuotationItem>,
    pub purchase_order: Vec<PurchaseOrderDetail>,
    pub rfq_details: Option<RfqSummary>,
}

impl Quotation {
    pub fn is_approved(&self) -> bool {
        self.current_status == STATUS_APPROVED
    }
}

// =============================================================================
//  PAYLOADS
// =============================================================================

/// Campos de contato ausentes são copiados da RFQ.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateQuotationPayload {
    #[schema(example = 7)]
    pub rfq: i64,
    pub company_name: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 50, message = "Status must have 1 to 50 characters."))]
    pub current_status: Option<String>,
    pub latest_remarks: Option<String>,
    pub next_followup_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItemPayload>,
}

/// PUT e PATCH. Itens com `id` são atualizados, sem `id` criados, ausentes removidos.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuotationPayload {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub company_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub attention_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub attention_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub attention_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: Option<Option<NaiveDate>>,
    #[validate(length(min = 1, max = 50, message = "Status must have 1 to 50 characters."))]
    pub current_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub when_approved: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub latest_remarks: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub next_followup_date: Option<Option<NaiveDate>>,
    pub items: Option<Vec<LineItemPayload>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendDueReminderPayload {
    pub quotation_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DueReminderResponse {
    pub message: String,
    pub email_sent: bool,
}
