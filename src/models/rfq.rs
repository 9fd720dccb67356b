// src/models/rfq.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::nullable::deserialize_some, models::line_item::LineItemPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rfq_status")]
pub enum RfqStatus {
    #[default]
    Processing,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rfq {
    pub id: i64,
    #[schema(example = "RFQ-0000007")]
    pub rfq_no: Option<String>,
    #[serde(rename = "series")]
    pub series_id: i64,
    #[schema(example = "Acme Industrial LLC")]
    pub company_name: String,
    pub reference: Option<String>,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[schema(example = "Email")]
    pub rfq_channel: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assign_to: Option<i64>,
    pub current_status: RfqStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RfqItem {
    pub id: i64,
    #[serde(rename = "rfq")]
    pub rfq_id: i64,
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

/// Campos de contato que a RFQ espelha na cotação vinculada.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
}

impl Rfq {
    pub fn contact_fields(&self) -> ContactFields {
        ContactFields {
            company_name: Some(self.company_name.clone()),
            address: Some(self.address.clone()),
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
            attention_name: self.attention_name.clone(),
            attention_phone: self.attention_phone.clone(),
            attention_email: self.attention_email.clone(),
        }
    }

    /// Vencida: não concluída e com prazo antes de `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.current_status != RfqStatus::Completed && self.due_date.is_some_and(|d| d < today)
    }
}

/// Resposta completa da RFQ.
#[derive(Debug, Serialize, ToSchema)]
pub struct RfqDetail {
    #[serde(flatten)]
    pub rfq: Rfq,
    pub items: Vec<RfqItem>,
    pub series_prefix: Option<String>,
    pub assign_to_name: Option<String>,
    pub assign_to_designation: Option<String>,
    pub is_past_due: bool,
    // Só presente nas respostas de criação/atualização
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRfqPayload {
    #[schema(example = 1)]
    pub series: i64,
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub company_name: String,
    pub reference: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub rfq_channel: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assign_to: Option<i64>,
    #[serde(default)]
    pub current_status: RfqStatus,
    #[serde(default)]
    pub items: Vec<LineItemPayload>,
}

/// PUT e PATCH: campos ausentes mantêm o valor atual.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRfqPayload {
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub reference: Option<Option<String>>,
    pub address: Option<String>,
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub rfq_channel: Option<Option<String>>,
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
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub assign_to: Option<Option<i64>>,
    pub current_status: Option<RfqStatus>,
    pub items: Option<Vec<LineItemPayload>>,
}

/// Item avulso em `/api/add-items/`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RfqItemPayload {
    pub rfq: i64,
    #[serde(flatten)]
    pub item: LineItemPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfq(status: RfqStatus, due: Option<NaiveDate>) -> Rfq {
        Rfq {
            id: 1,
            rfq_no: Some("RFQ-0000001".into()),
            series_id: 1,
            company_name: "Acme".into(),
            reference: None,
            address: "1 Main St".into(),
            phone: "555".into(),
            email: "buyer@acme.test".into(),
            rfq_channel: None,
            attention_name: Some("Joe".into()),
            attention_phone: None,
            attention_email: None,
            due_date: due,
            assign_to: None,
            current_status: status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn past_due_only_while_processing() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert!(rfq(RfqStatus::Processing, Some(yesterday)).is_past_due(today));
        assert!(!rfq(RfqStatus::Completed, Some(yesterday)).is_past_due(today));
        assert!(!rfq(RfqStatus::Processing, Some(today)).is_past_due(today));
        assert!(!rfq(RfqStatus::Processing, None).is_past_due(today));
    }

    #[test]
    fn contact_fields_copy_company_and_attention() {
        let fields = rfq(RfqStatus::Completed, None).contact_fields();
        assert_eq!(fields.company_name.as_deref(), Some("Acme"));
        assert_eq!(fields.attention_name.as_deref(), Some("Joe"));
        assert_eq!(fields.attention_email, None);
    }
}
