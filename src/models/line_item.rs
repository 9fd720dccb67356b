// src/models/line_item.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

/// Linha de item como chega nos payloads de RFQ, cotação, pedido e OS.
/// O `id` só é usado no diff de itens da cotação.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LineItemPayload {
    #[schema(example = 12)]
    pub id: Option<i64>,
    #[schema(example = "Pressure gauge calibration")]
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    #[schema(example = 2)]
    pub quantity: Option<i32>,
    #[schema(example = "Nos")]
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>, example = 10.0)]
    pub unit_price: Option<Decimal>,
}

impl LineItemPayload {
    /// Nome exibido nas mensagens de erro.
    pub fn label(&self) -> &str {
        self.item_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.product_name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("item")
    }

    pub fn total_price(&self) -> Decimal {
        line_total(self.quantity, self.unit_price)
    }
}

/// quantidade × preço unitário; `None` quando estoura o `Decimal`.
pub fn checked_line_total(quantity: Option<i32>, unit_price: Option<Decimal>) -> Option<Decimal> {
    match (quantity, unit_price) {
        (Some(q), Some(price)) if q != 0 => Decimal::from(q).checked_mul(price).map(|t| t.round_dp(2)),
        _ => Some(Decimal::ZERO),
    }
}

/// quantidade × preço unitário; zero quando algum dos dois falta.
/// Os valores chegam aqui já limitados por `check_amount_limits`.
pub fn line_total(quantity: Option<i32>, unit_price: Option<Decimal>) -> Decimal {
    checked_line_total(quantity, unit_price).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_quantity_times_unit_price() {
        let total = line_total(Some(2), Some(Decimal::new(1000, 2)));
        assert_eq!(total, Decimal::new(2000, 2));
    }

    #[test]
    fn total_defaults_to_zero_when_a_factor_is_missing() {
        assert_eq!(line_total(Some(2), None), Decimal::ZERO);
        assert_eq!(line_total(None, Some(Decimal::new(1000, 2))), Decimal::ZERO);
        assert_eq!(line_total(Some(0), Some(Decimal::new(1000, 2))), Decimal::ZERO);
    }

    #[test]
    fn overflowing_product_does_not_panic() {
        let huge = Decimal::from_i128_with_scale(7_900_000_000_000_000_000_000_000_000, 0);
        assert_eq!(checked_line_total(Some(i32::MAX), Some(huge)), None);
        assert_eq!(line_total(Some(i32::MAX), Some(huge)), Decimal::ZERO);
    }

    #[test]
    fn payload_total_uses_the_same_rule() {
        let item = LineItemPayload {
            quantity: Some(3),
            unit_price: Some(Decimal::new(1250, 2)),
            ..Default::default()
        };
        assert_eq!(item.total_price(), Decimal::new(3750, 2));
    }
}
