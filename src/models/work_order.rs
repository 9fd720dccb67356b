// src/models/work_order.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::nullable::deserialize_some, models::line_item::LineItemPayload};

pub const STATUS_COLLECTED: &str = "Collected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "onsite_lab")]
pub enum OnsiteLab {
    #[default]
    Onsite,
    Lab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "work_order_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderType {
    #[default]
    Single,
    Split,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkOrder {
    pub id: i64,
    #[schema(example = "WO-0000012")]
    pub work_order_no: String,
    #[serde(rename = "quotation")]
    pub quotation_id: i64,
    #[serde(rename = "purchase_order")]
    pub purchase_order_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub date_received: NaiveDate,
    pub exp_date_completion: Option<NaiveDate>,
    pub onsite_lab: OnsiteLab,
    pub range: Option<String>,
    pub serial_number: Option<String>,
    pub site_location: Option<String>,
    pub remarks: Option<String>,
    #[schema(example = "Collected")]
    pub current_status: String,
    pub work_order_type: WorkOrderType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkOrderItem {
    pub id: i64,
    #[serde(rename = "work_order")]
    pub work_order_id: i64,
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkOrderDetail {
    #[serde(flatten)]
    pub work_order: WorkOrder,
    pub items: Vec<WorkOrderItem>,
    pub assigned_to_name: Option<String>,
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkOrderPayload {
    #[schema(example = 3)]
    pub quotation: i64,
    pub purchase_order: Option<i64>,
    /// Ausente: herda o responsável da RFQ
    pub assigned_to: Option<i64>,
    pub date_received: NaiveDate,
    pub exp_date_completion: Option<NaiveDate>,
    #[serde(default)]
    pub onsite_lab: OnsiteLab,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub range: Option<String>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub serial_number: Option<String>,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub site_location: Option<String>,
    pub remarks: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Status must have 1 to 50 characters."))]
    pub current_status: Option<String>,
    #[serde(default)]
    pub work_order_type: WorkOrderType,
    #[serde(default)]
    pub items: Vec<LineItemPayload>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkOrderPayload {
    pub quotation: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub purchase_order: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub assigned_to: Option<Option<i64>>,
    pub date_received: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub exp_date_completion: Option<Option<NaiveDate>>,
    pub onsite_lab: Option<OnsiteLab>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub range: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub site_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub remarks: Option<Option<String>>,
    #[validate(length(min = 1, max = 50, message = "Status must have 1 to 50 characters."))]
    pub current_status: Option<String>,
    pub work_order_type: Option<WorkOrderType>,
    pub items: Option<Vec<LineItemPayload>>,
}
