use crate::common::error::AppError;

/// Converte violação de chave única em erro de validação no campo informado.
/// Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn unique_violation_to_field(e: sqlx::Error, field: &str, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::field(field, message);
        }
    }
    e.into()
}

/// Variante que escolhe o campo pelo nome da constraint.
pub(crate) fn unique_violation_by_constraint(
    e: sqlx::Error,
    constraints: &[(&str, &str, &str)],
) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            for (name, field, message) in constraints {
                if *name == constraint {
                    return AppError::field(field, *message);
                }
            }
            return AppError::non_field(format!("Duplicate value ({constraint})."));
        }
    }
    e.into()
}

/// Padrão `%termo%` para buscas com ILIKE.
pub(crate) fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
