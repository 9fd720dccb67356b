// src/models/reference.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{nullable::deserialize_some, validation::validate_not_negative};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RfqChannel {
    pub id: i64,
    #[schema(example = "WhatsApp")]
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: i64,
    #[schema(example = "Acme Industrial LLC")]
    pub company_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Catálogo simples de nomes: usado para `items` e `units`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogEntry {
    pub id: i64,
    #[schema(example = "Pressure gauge")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    #[schema(example = "Digital multimeter")]
    pub name: String,
    #[schema(value_type = Option<f64>, example = 150.0)]
    pub price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Tabelas do catálogo que compartilham o formato `CatalogEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTable {
    Items,
    Units,
}

impl CatalogTable {
    pub fn table(self) -> &'static str {
        match self {
            CatalogTable::Items => "items",
            CatalogTable::Units => "units",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogTable::Items => "Item",
            CatalogTable::Units => "Unit",
        }
    }
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ChannelPayload {
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub channel_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientPayload {
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub company_name: String,
    pub address: Option<String>,
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub company_name: Option<String>,
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
}

/// Itens e unidades do catálogo.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CatalogPayload {
    #[validate(length(min = 1, max = 255, message = "Name must have 1 to 255 characters."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 255, message = "Name must have 1 to 255 characters."))]
    pub name: String,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>, example = 150.0)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 255, message = "Name must have 1 to 255 characters."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<Decimal>>,
}
