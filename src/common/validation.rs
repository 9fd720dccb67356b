use rust_decimal::Decimal;
use validator::ValidationError;

use crate::{
    common::error::FieldErrors,
    models::line_item::{checked_line_total, LineItemPayload},
};

const UNIT_PRICE_MANTISSA: u64 = 9_999_999_999;
const LINE_TOTAL_MANTISSA: u64 = 999_999_999_999;

/// Maior valor de `NUMERIC(10, 2)` (preço unitário).
pub const MAX_UNIT_PRICE: Decimal =
    Decimal::from_parts(UNIT_PRICE_MANTISSA as u32, (UNIT_PRICE_MANTISSA >> 32) as u32, 0, false, 2);
/// Maior valor de `NUMERIC(12, 2)` (total da linha).
pub const MAX_LINE_TOTAL: Decimal =
    Decimal::from_parts(LINE_TOTAL_MANTISSA as u32, (LINE_TOTAL_MANTISSA >> 32) as u32, 0, false, 2);

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

/// Pedidos e ordens de serviço: quantidade obrigatória e >= 1.
pub fn check_min_quantity(items: &[&LineItemPayload], errors: &mut FieldErrors) {
    for item in items {
        if item.quantity.is_none_or(|q| q < 1) {
            push(
                errors,
                "items",
                format!("Quantity for {} must be at least 1.", item.label()),
            );
        }
    }
}

/// Cotações: preço unitário obrigatório e não negativo.
pub fn check_unit_price(items: &[&LineItemPayload], errors: &mut FieldErrors) {
    for item in items {
        if item.unit_price.is_none_or(|p| p.is_sign_negative()) {
            push(
                errors,
                "items",
                format!("Unit price for {} must be non-negative.", item.label()),
            );
        }
    }
}

/// RFQ: a quantidade é opcional, mas não pode ser negativa.
pub fn check_non_negative_quantity(items: &[&LineItemPayload], errors: &mut FieldErrors) {
    for item in items {
        if item.quantity.is_some_and(|q| q < 0) {
            push(
                errors,
                "items",
                format!("Quantity for {} cannot be negative.", item.label()),
            );
        }
    }
}

/// Todos os itens: preço e total precisam caber nas colunas numéricas.
pub fn check_amount_limits(items: &[&LineItemPayload], errors: &mut FieldErrors) {
    for item in items {
        if item.unit_price.is_some_and(|p| p.abs() > MAX_UNIT_PRICE) {
            push(
                errors,
                "items",
                format!("Unit price for {} must not exceed {}.", item.label(), MAX_UNIT_PRICE),
            );
            continue;
        }
        let total = checked_line_total(item.quantity, item.unit_price);
        if total.is_none_or(|t| t.abs() > MAX_LINE_TOTAL) {
            push(
                errors,
                "items",
                format!("Total price for {} must not exceed {}.", item.label(), MAX_LINE_TOTAL),
            );
        }
    }
}

/// Campo de e-mail "preenchido": existe e não é só espaço.
pub fn has_email(email: Option<&str>) -> bool {
    email.is_some_and(|e| !e.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: Option<i32>, unit_price: Option<Decimal>) -> LineItemPayload {
        LineItemPayload {
            item_name: Some(name.to_string()),
            quantity,
            unit_price,
            ..Default::default()
        }
    }

    #[test]
    fn zero_and_missing_quantities_are_rejected() {
        let a = item("Gauge", Some(0), None);
        let b = item("Valve", None, None);
        let c = item("Probe", Some(3), None);
        let mut errors = FieldErrors::new();
        check_min_quantity(&[&a, &b, &c], &mut errors);
        assert_eq!(
            errors["items"],
            vec![
                "Quantity for Gauge must be at least 1.".to_string(),
                "Quantity for Valve must be at least 1.".to_string(),
            ]
        );
    }

    #[test]
    fn unit_price_must_be_present_and_positive() {
        let ok = item("Gauge", Some(1), Some(Decimal::new(1000, 2)));
        let missing = item("Valve", Some(1), None);
        let negative = item("Probe", Some(1), Some(Decimal::new(-1, 0)));
        let mut errors = FieldErrors::new();
        check_unit_price(&[&ok, &missing, &negative], &mut errors);
        assert_eq!(errors["items"].len(), 2);
    }

    #[test]
    fn label_falls_back_to_product_then_generic() {
        let by_product = LineItemPayload {
            product_name: Some("Torque wrench".into()),
            quantity: Some(-1),
            ..Default::default()
        };
        let anonymous = LineItemPayload {
            quantity: Some(-2),
            ..Default::default()
        };
        let mut errors = FieldErrors::new();
        check_non_negative_quantity(&[&by_product, &anonymous], &mut errors);
        assert_eq!(errors["items"][0], "Quantity for Torque wrench cannot be negative.");
        assert_eq!(errors["items"][1], "Quantity for item cannot be negative.");
    }

    #[test]
    fn limits_match_the_numeric_columns() {
        assert_eq!(MAX_UNIT_PRICE.to_string(), "99999999.99");
        assert_eq!(MAX_LINE_TOTAL.to_string(), "9999999999.99");
    }

    #[test]
    fn unit_price_above_the_column_limit_is_rejected() {
        let huge = Decimal::from_i128_with_scale(7_900_000_000_000_000_000_000_000_000, 0);
        let overflow = item("Gauge", Some(i32::MAX), Some(huge));
        let too_expensive = item("Valve", Some(1), Some(Decimal::new(10_000_000_000, 2)));
        let at_limit = item("Probe", Some(1), Some(MAX_UNIT_PRICE));
        let mut errors = FieldErrors::new();
        check_amount_limits(&[&overflow, &too_expensive, &at_limit], &mut errors);
        assert_eq!(errors["items"].len(), 2);
        assert!(errors["items"][0].starts_with("Unit price for Gauge"));
        assert!(errors["items"][1].starts_with("Unit price for Valve"));
    }

    #[test]
    fn line_total_above_the_column_limit_is_rejected() {
        let big_order = item("Gauge", Some(101), Some(MAX_UNIT_PRICE));
        let fine = item("Valve", Some(100), Some(MAX_UNIT_PRICE));
        let mut errors = FieldErrors::new();
        check_amount_limits(&[&big_order, &fine], &mut errors);
        assert_eq!(errors["items"], vec![format!("Total price for Gauge must not exceed {MAX_LINE_TOTAL}.")]);
    }

    #[test]
    fn blank_email_does_not_count() {
        assert!(!has_email(None));
        assert!(!has_email(Some("  ")));
        assert!(has_email(Some("ops@example.com")));
    }
}
