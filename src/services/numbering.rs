// src/services/numbering.rs

use sqlx::{Executor, PgConnection, Postgres};

use crate::{
    common::error::AppError,
    db::{RfqRepository, SeriesRepository},
    models::series::{format_number, DocumentKind},
};

/// Emissão de números. Todo caminho que gera um número segura o lock
/// da linha do contador até o commit da transação do chamador.
#[derive(Clone)]
pub struct NumberingService {
    series_repo: SeriesRepository,
    rfq_repo: RfqRepository,
}

impl NumberingService {
    pub fn new(series_repo: SeriesRepository, rfq_repo: RfqRepository) -> Self {
        Self { series_repo, rfq_repo }
    }

    /// Próximo número da série (`SELECT ... FOR UPDATE` + incremento).
    pub async fn next_series_number(&self, conn: &mut PgConnection, series_id: i64) -> Result<String, AppError> {
        self.series_repo
            .lock(&mut *conn, series_id)
            .await?
            .ok_or_else(|| AppError::field("series", format!("Invalid pk \"{series_id}\" - object does not exist.")))?;

        let (prefix, sequence) = self.series_repo.increment(&mut *conn, series_id).await?;
        Ok(format_number(&prefix, sequence))
    }

    pub async fn next_document_number<'e, E>(&self, executor: E, kind: DocumentKind) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (prefix, sequence) = self.series_repo.increment_document_counter(executor, kind).await?;
        Ok(format_number(&prefix, sequence))
    }

    /// Renumera a série inteira após a exclusão de uma RFQ. Devolve o novo contador.
    pub async fn renumber_series(&self, conn: &mut PgConnection, series_id: i64) -> Result<i64, AppError> {
        let Some(series) = self.series_repo.lock(&mut *conn, series_id).await? else {
            return Ok(0);
        };

        let ids = self.rfq_repo.series_member_ids(&mut *conn, series_id).await?;
        self.rfq_repo.clear_series_numbers(&mut *conn, series_id).await?;

        let plan = renumber_plan(&series.prefix, &ids);
        for (id, rfq_no) in &plan {
            self.rfq_repo.set_number(&mut *conn, *id, rfq_no).await?;
        }

        let count = plan.len() as i64;
        self.series_repo.set_sequence(&mut *conn, series_id, count).await?;

        tracing::info!("🔢 Série {} renumerada: {} RFQs", series.prefix, count);
        Ok(count)
    }
}

/// Atribui `{prefix}-0000001..n` na ordem recebida (já ordenada por criação).
pub fn renumber_plan(prefix: &str, ids_in_creation_order: &[i64]) -> Vec<(i64, String)> {
    ids_in_creation_order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, format_number(prefix, i as i64 + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_members_are_renumbered_from_one() {
        let plan = renumber_plan("WO", &[7, 9, 12]);
        assert_eq!(
            plan,
            vec![
                (7, "WO-0000001".to_string()),
                (9, "WO-0000002".to_string()),
                (12, "WO-0000003".to_string()),
            ]
        );
    }

    #[test]
    fn empty_series_has_no_assignments() {
        assert!(renumber_plan("RFQ", &[]).is_empty());
    }
}
