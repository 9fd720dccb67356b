// src/models/series.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NumberSeries {
    pub id: i64,
    #[schema(example = "RFQ 2025")]
    pub series_name: String,
    #[schema(example = "RFQ")]
    pub prefix: String,
    #[schema(example = 42)]
    pub current_sequence: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSeriesPayload {
    #[validate(length(min = 1, max = 100, message = "Series name must have 1 to 100 characters."))]
    pub series_name: String,
    #[validate(length(min = 1, max = 50, message = "Prefix must have 1 to 50 characters."))]
    pub prefix: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub current_sequence: i64,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSeriesPayload {
    #[validate(length(min = 1, max = 100, message = "Series name must have 1 to 100 characters."))]
    pub series_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Prefix must have 1 to 50 characters."))]
    pub prefix: Option<String>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub current_sequence: Option<i64>,
}

/// Contadores internos (sem CRUD) para cotações e ordens de serviço.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quotation,
    WorkOrder,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation",
            DocumentKind::WorkOrder => "work_order",
        }
    }
}

/// `{prefix}-{sequência com 7 dígitos}`.
pub fn format_number(prefix: &str, sequence: i64) -> String {
    format!("{}-{:07}", prefix, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_sequence_to_seven_digits() {
        assert_eq!(format_number("RFQ", 1), "RFQ-0000001");
        assert_eq!(format_number("QT", 1234567), "QT-1234567");
    }

    #[test]
    fn longer_sequences_are_not_truncated() {
        assert_eq!(format_number("WO", 12345678), "WO-12345678");
    }
}
