// src/db/rfq_repo.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{Executor, FromRow, PgConnection, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation_by_constraint},
        error::AppError,
    },
    models::{
        line_item::LineItemPayload,
        rfq::{Rfq, RfqItem, RfqStatus},
    },
};

// Número repetido só acontece se a série foi editada para colidir com outra
const RFQ_UNIQUE: &[(&str, &str, &str)] = &[(
    "rfqs_rfq_no_key",
    "series",
    "The next number of this series is already in use; adjust its prefix or current sequence.",
)];

/// FK de `rfq_items.rfq_id` violada: a RFQ informada não existe.
fn missing_rfq(e: sqlx::Error, rfq_id: i64) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::field("rfq", format!("Invalid pk \"{rfq_id}\" - object does not exist."));
        }
    }
    AppError::from(e)
}

/// Colunas graváveis da RFQ (número e série são tratados à parte).
#[derive(Debug, Clone, Default)]
pub struct RfqWrite {
    pub company_name: String,
    pub reference: Option<String>,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub rfq_channel: Option<String>,
    pub attention_name: Option<String>,
    pub attention_phone: Option<String>,
    pub attention_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assign_to: Option<i64>,
    pub current_status: RfqStatus,
}

impl From<&Rfq> for RfqWrite {
    fn from(rfq: &Rfq) -> Self {
        Self {
            company_name: rfq.company_name.clone(),
            reference: rfq.reference.clone(),
            address: rfq.address.clone(),
            phone: rfq.phone.clone(),
            email: rfq.email.clone(),
            rfq_channel: rfq.rfq_channel.clone(),
            attention_name: rfq.attention_name.clone(),
            attention_phone: rfq.attention_phone.clone(),
            attention_email: rfq.attention_email.clone(),
            due_date: rfq.due_date,
            assign_to: rfq.assign_to,
            current_status: rfq.current_status,
        }
    }
}

/// RFQ + nomes auxiliares vindos dos JOINs.
#[derive(Debug, Clone, FromRow)]
pub struct RfqRow {
    #[sqlx(flatten)]
    pub rfq: Rfq,
    pub series_prefix: Option<String>,
    pub assign_to_name: Option<String>,
    pub assign_to_designation: Option<String>,
}

const RFQ_WITH_NAMES: &str = r#"
    SELECT r.*,
           ns.prefix AS series_prefix,
           tm.name AS assign_to_name,
           tm.designation AS assign_to_designation
    FROM rfqs r
    LEFT JOIN number_series ns ON ns.id = r.series_id
    LEFT JOIN team_members tm ON tm.id = r.assign_to
"#;

#[derive(Clone)]
pub struct RfqRepository {
    pool: PgPool,
}

impl RfqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<RfqStatus>,
    ) -> Result<Vec<RfqRow>, AppError> {
        let sql = format!(
            r#"{RFQ_WITH_NAMES}
            WHERE ($1::text IS NULL OR r.rfq_no ILIKE $1 OR r.company_name ILIKE $1)
              AND ($2::rfq_status IS NULL OR r.current_status = $2)
            ORDER BY r.created_at DESC, r.id DESC
            "#
        );
        let rows = sqlx::query_as::<_, RfqRow>(&sql)
            .bind(like_pattern(search))
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_row<'e, E>(&self, executor: E, id: i64) -> Result<Option<RfqRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{RFQ_WITH_NAMES} WHERE r.id = $1");
        let row = sqlx::query_as::<_, RfqRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Trava a RFQ (usada na criação da cotação e na atualização).
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Rfq>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rfq = sqlx::query_as::<_, Rfq>("SELECT * FROM rfqs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(rfq)
    }

    pub async fn list_items<'e, E>(&self, executor: E, rfq_id: i64) -> Result<Vec<RfqItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, RfqItem>(
            "SELECT * FROM rfq_items WHERE rfq_id = $1 ORDER BY id",
        )
        .bind(rfq_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Itens de várias RFQs de uma vez, agrupados por RFQ.
    pub async fn items_by_rfq(&self, rfq_ids: &[i64]) -> Result<HashMap<i64, Vec<RfqItem>>, AppError> {
        let items = sqlx::query_as::<_, RfqItem>(
            "SELECT * FROM rfq_items WHERE rfq_id = ANY($1) ORDER BY id",
        )
        .bind(rfq_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<RfqItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.rfq_id).or_default().push(item);
        }
        Ok(grouped)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        series_id: i64,
        rfq_no: &str,
        data: &RfqWrite,
    ) -> Result<Rfq, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rfq = sqlx::query_as::<_, Rfq>(
            r#"
            INSERT INTO rfqs (
                rfq_no, series_id, company_name, reference, address, phone, email,
                rfq_channel, attention_name, attention_phone, attention_email,
                due_date, assign_to, current_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(rfq_no)
        .bind(series_id)
        .bind(&data.company_name)
        .bind(&data.reference)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.rfq_channel)
        .bind(&data.attention_name)
        .bind(&data.attention_phone)
        .bind(&data.attention_email)
        .bind(data.due_date)
        .bind(data.assign_to)
        .bind(data.current_status)
        .fetch_one(executor)
        .await
        .map_err(|e| unique_violation_by_constraint(e, RFQ_UNIQUE))?;
        Ok(rfq)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, data: &RfqWrite) -> Result<Rfq, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rfq = sqlx::query_as::<_, Rfq>(
            r#"
            UPDATE rfqs
            SET company_name = $2, reference = $3, address = $4, phone = $5, email = $6,
                rfq_channel = $7, attention_name = $8, attention_phone = $9,
                attention_email = $10, due_date = $11, assign_to = $12, current_status = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.company_name)
        .bind(&data.reference)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.rfq_channel)
        .bind(&data.attention_name)
        .bind(&data.attention_phone)
        .bind(&data.attention_email)
        .bind(data.due_date)
        .bind(data.assign_to)
        .bind(data.current_status)
        .fetch_one(executor)
        .await?;
        Ok(rfq)
    }

    /// Apaga e devolve a série da RFQ removida.
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let series_id: Option<i64> =
            sqlx::query_scalar("DELETE FROM rfqs WHERE id = $1 RETURNING series_id")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(series_id)
    }

    /// Substitui a coleção inteira de itens (apaga tudo e recria).
    pub async fn replace_items(
        &self,
        conn: &mut PgConnection,
        rfq_id: i64,
        items: &[LineItemPayload],
    ) -> Result<Vec<RfqItem>, AppError> {
        sqlx::query("DELETE FROM rfq_items WHERE rfq_id = $1")
            .bind(rfq_id)
            .execute(&mut *conn)
            .await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            created.push(self.insert_item(&mut *conn, rfq_id, item).await?);
        }
        Ok(created)
    }

    // =========================================================================
    //  RENUMERAÇÃO DA SÉRIE
    // =========================================================================

    /// IDs da série na ordem de criação.
    pub async fn series_member_ids<'e, E>(&self, executor: E, series_id: i64) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM rfqs WHERE series_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(series_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    /// Libera os números da série antes de reatribuí-los (evita colisão no UNIQUE).
    pub async fn clear_series_numbers<'e, E>(&self, executor: E, series_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE rfqs SET rfq_no = NULL WHERE series_id = $1")
            .bind(series_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_number<'e, E>(&self, executor: E, id: i64, rfq_no: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE rfqs SET rfq_no = $2 WHERE id = $1")
            .bind(id)
            .bind(rfq_no)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  ITENS AVULSOS (/api/add-items/)
    // =========================================================================

    pub async fn list_all_items(&self, rfq_id: Option<i64>) -> Result<Vec<RfqItem>, AppError> {
        let items = sqlx::query_as::<_, RfqItem>(
            "SELECT * FROM rfq_items WHERE $1::bigint IS NULL OR rfq_id = $1 ORDER BY id",
        )
        .bind(rfq_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find_item(&self, id: i64) -> Result<Option<RfqItem>, AppError> {
        let item = sqlx::query_as::<_, RfqItem>("SELECT * FROM rfq_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        rfq_id: i64,
        item: &LineItemPayload,
    ) -> Result<RfqItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, RfqItem>(
            r#"
            INSERT INTO rfq_items (rfq_id, item_name, product_name, quantity, unit, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(rfq_id)
        .bind(&item.item_name)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.unit_price)
        .fetch_one(executor)
        .await
        .map_err(|e| missing_rfq(e, rfq_id))?;
        Ok(created)
    }

    pub async fn update_item(
        &self,
        id: i64,
        rfq_id: i64,
        item: &LineItemPayload,
    ) -> Result<Option<RfqItem>, AppError> {
        let updated = sqlx::query_as::<_, RfqItem>(
            r#"
            UPDATE rfq_items
            SET rfq_id = $2, item_name = $3, product_name = $4, quantity = $5, unit = $6, unit_price = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rfq_id)
        .bind(&item.item_name)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.unit_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| missing_rfq(e, rfq_id))?;
        Ok(updated)
    }

    pub async fn delete_item(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM rfq_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
