// src/db/series_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation_by_constraint},
        error::AppError,
    },
    models::series::{DocumentKind, NumberSeries},
};

const SERIES_UNIQUE: &[(&str, &str, &str)] = &[
    ("number_series_series_name_key", "series_name", "number series with this series name already exists."),
    ("number_series_prefix_key", "prefix", "number series with this prefix already exists."),
];

#[derive(Clone)]
pub struct SeriesRepository {
    pool: PgPool,
}

impl SeriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<NumberSeries>, AppError> {
        let series = sqlx::query_as::<_, NumberSeries>(
            r#"
            SELECT * FROM number_series
            WHERE $1::text IS NULL OR series_name ILIKE $1 OR prefix ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await?;
        Ok(series)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<NumberSeries>, AppError> {
        let series = sqlx::query_as::<_, NumberSeries>("SELECT * FROM number_series WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(series)
    }

    pub async fn create(
        &self,
        series_name: &str,
        prefix: &str,
        current_sequence: i64,
    ) -> Result<NumberSeries, AppError> {
        sqlx::query_as::<_, NumberSeries>(
            r#"
            INSERT INTO number_series (series_name, prefix, current_sequence)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(series_name)
        .bind(prefix)
        .bind(current_sequence)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_by_constraint(e, SERIES_UNIQUE))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        series_name: &str,
        prefix: &str,
        current_sequence: i64,
    ) -> Result<Option<NumberSeries>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, NumberSeries>(
            r#"
            UPDATE number_series
            SET series_name = $2, prefix = $3, current_sequence = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(series_name)
        .bind(prefix)
        .bind(current_sequence)
        .fetch_optional(executor)
        .await
        .map_err(|e| unique_violation_by_constraint(e, SERIES_UNIQUE))
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM number_series WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::non_field("This series is still used by RFQs.");
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  NUMERAÇÃO (sempre dentro de uma transação)
    // =========================================================================

    /// `SELECT ... FOR UPDATE`: segura a linha da série até o commit.
    pub async fn lock<'e, E>(&self, executor: E, id: i64) -> Result<Option<NumberSeries>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let series = sqlx::query_as::<_, NumberSeries>(
            "SELECT * FROM number_series WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(series)
    }

    /// Incrementa e devolve (prefixo, nova sequência).
    pub async fn increment<'e, E>(&self, executor: E, id: i64) -> Result<(String, i64), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: (String, i64) = sqlx::query_as(
            r#"
            UPDATE number_series
            SET current_sequence = current_sequence + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING prefix, current_sequence
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn set_sequence<'e, E>(&self, executor: E, id: i64, sequence: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE number_series SET current_sequence = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(sequence)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Contador interno de cotação/OS. O UPDATE trava a linha até o commit,
    /// então duas transações nunca leem o mesmo valor.
    pub async fn increment_document_counter<'e, E>(
        &self,
        executor: E,
        kind: DocumentKind,
    ) -> Result<(String, i64), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: (String, i64) = sqlx::query_as(
            r#"
            UPDATE document_counters
            SET last_value = last_value + 1
            WHERE document_kind = $1
            RETURNING prefix, last_value
            "#,
        )
        .bind(kind.as_str())
        .fetch_one(executor)
        .await?;
        Ok(row)
    }
}
