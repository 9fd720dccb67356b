// src/models/purchase_order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    common::error::{AppError, FieldErrors, NON_FIELD_ERRORS},
    models::line_item::LineItemPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Full,
    Partial,
}

impl std::str::FromStr for OrderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full" => Ok(OrderType::Full),
            "partial" => Ok(OrderType::Partial),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PurchaseOrder {
    pub id: i64,
    #[serde(rename = "quotation")]
    pub quotation_id: i64,
    #[schema(example = "PO/2025/118")]
    pub client_po_number: String,
    pub order_type: OrderType,
    /// Caminho relativo dentro do MEDIA_ROOT
    #[schema(example = "purchase_orders/9b1c...-po.pdf")]
    pub po_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PurchaseOrderItem {
    pub id: i64,
    #[serde(rename = "purchase_order")]
    pub purchase_order_id: i64,
    #[serde(rename = "quotation_item")]
    pub quotation_item_id: Option<i64>,
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub purchase_order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}


// =============================================================================
//  PAYLOADS
// =============================================================================

/// Item do pedido; `quotation_item` liga a linha ao item cotado.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PurchaseOrderItemPayload {
    pub quotation_item: Option<i64>,
    #[serde(flatten)]
    pub item: LineItemPayload,
}

/// Arquivo recebido via multipart.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Pedido já interpretado a partir do formulário multipart.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub quotation: i64,
    pub client_po_number: String,
    pub order_type: OrderType,
    pub items: Vec<PurchaseOrderItemPayload>,
    pub po_file: Option<UploadedFile>,
}

/// Campos crus do multipart (`items` chega como string JSON).
#[derive(Debug, Default, ToSchema)]
pub struct PurchaseOrderForm {
    #[schema(example = "3")]
    pub quotation: Option<String>,
    pub client_po_number: Option<String>,
    #[schema(example = "full")]
    pub order_type: Option<String>,
    #[schema(example = r#"[{"item_name": "Gauge", "quantity": 2, "unit_price": 10.0}]"#)]
    pub items: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub po_file: Option<UploadedFile>,
}

impl PurchaseOrderForm {
    pub fn into_new(self) -> Result<NewPurchaseOrder, AppError> {
        let mut errors = FieldErrors::new();
        let mut error = |field: &str, message: &str| {
            errors.entry(field.to_string()).or_default().push(message.to_string());
        };

        let quotation = match self.quotation.as_deref().map(str::trim) {
            None | Some("") => {
                error("quotation", "This field is required.");
                None
            }
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    error("quotation", "Incorrect type. Expected pk value.");
                    None
                }
            },
        };

        let order_type = match self.order_type.as_deref() {
            None => {
                error("order_type", "This field is required.");
                None
            }
            Some(raw) => match raw.parse::<OrderType>() {
                Ok(order_type) => Some(order_type),
                Err(()) => {
                    error("order_type", "Select a valid choice: full or partial.");
                    None
                }
            },
        };

        let items: Vec<PurchaseOrderItemPayload> = match self.items.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| {
                error("items", "Items must be a JSON array.");
                Vec::new()
            }),
        };

        let client_po_number = self.client_po_number.unwrap_or_default();
        if client_po_number.chars().count() > 50 {
            error("client_po_number", "Ensure this field has no more than 50 characters.");
        }

        check_purchase_order_items(&items, &mut errors);

        match (quotation, order_type) {
            (Some(quotation), Some(order_type)) if errors.is_empty() => Ok(NewPurchaseOrder {
                quotation,
                client_po_number,
                order_type,
                items,
                po_file: self.po_file,
            }),
            _ => {
                if errors.is_empty() {
                    errors.insert(NON_FIELD_ERRORS.to_string(), vec!["Invalid purchase order.".to_string()]);
                }
                Err(AppError::FieldValidation(errors))
            }
        }
    }
}

/// Quantidade obrigatória e >= 1 em cada item do pedido.
pub fn check_purchase_order_items(items: &[PurchaseOrderItemPayload], errors: &mut FieldErrors) {
    let lines: Vec<&LineItemPayload> = items.iter().map(|i| &i.item).collect();
    crate::common::validation::check_min_quantity(&lines, errors);
    crate::common::validation::check_amount_limits(&lines, errors);
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePurchaseOrderPayload {
    pub client_po_number: Option<String>,
    pub order_type: Option<OrderType>,
    pub items: Option<Vec<PurchaseOrderItemPayload>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_parses_form_values() {
        assert_eq!("full".parse::<OrderType>(), Ok(OrderType::Full));
        assert_eq!(" partial ".parse::<OrderType>(), Ok(OrderType::Partial));
        assert!("Full".parse::<OrderType>().is_err());
    }

    fn form(items: &str) -> PurchaseOrderForm {
        PurchaseOrderForm {
            quotation: Some("3".into()),
            client_po_number: Some("PO/118".into()),
            order_type: Some("partial".into()),
            items: Some(items.into()),
            po_file: None,
        }
    }

    #[test]
    fn form_with_valid_items_is_accepted() {
        let new = form(r#"[{"item_name": "Gauge", "quantity": 2, "quotation_item": 9}]"#)
            .into_new()
            .unwrap();
        assert_eq!(new.quotation, 3);
        assert_eq!(new.order_type, OrderType::Partial);
        assert_eq!(new.items[0].quotation_item, Some(9));
        assert_eq!(new.items[0].item.quantity, Some(2));
    }

    #[test]
    fn zero_quantity_is_rejected_before_persistence() {
        match form(r#"[{"item_name": "Gauge", "quantity": 0}]"#).into_new() {
            Err(AppError::FieldValidation(errors)) => {
                assert_eq!(errors["items"], vec!["Quantity for Gauge must be at least 1."]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_quotation_and_bad_items_are_reported_together() {
        let mut bad = form("not json");
        bad.quotation = None;
        match bad.into_new() {
            Err(AppError::FieldValidation(errors)) => {
                assert!(errors.contains_key("quotation"));
                assert!(errors.contains_key("items"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
