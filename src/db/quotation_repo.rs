// src/db/quotation_repo.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation_by_constraint},
        error::AppError,
    },
    models::{
        quotation::{Quotation, QuotationItem, RfqSummary},
        line_item::{line_total, LineItemPayload},
        rfq::{ContactFields, RfqItem},
    },
};

// Garantia final da regra "uma cotação por RFQ"
const QUOTATION_UNIQUE: &[(&str, &str, &str)] = &[
    ("quotations_rfq_id_key", "rfq", "A quotation already exists for this RFQ."),
    ("quotations_quotation_no_key", "quotation_no", "Quotation number already exists."),
];

/// Colunas graváveis da cotação.
#[derive(Debug, Clone, Default)]
pub struct QuotationWrite {
    pub contact: ContactFields,
    pub due_date: Option<NaiveDate>,
    pub current_status: String,
    pub when_approved: Option<NaiveDate>,
    pub latest_remarks: Option<String>,
    pub next_followup_date: Option<NaiveDate>,
}

impl From<&Quotation> for QuotationWrite {
    fn from(q: &Quotation) -> Self {
        Self {
            contact: ContactFields {
                company_name: q.company_name.clone(),
                address: q.address.clone(),
                phone: q.phone.clone(),
                email: q.email.clone(),
                attention_name: q.attention_name.clone(),
                attention_phone: q.attention_phone.clone(),
                attention_email: q.attention_email.clone(),
            },
            due_date: q.due_date,
            current_status: q.current_status.clone(),
            when_approved: q.when_approved,
            latest_remarks: q.latest_remarks.clone(),
            next_followup_date: q.next_followup_date,
        }
    }
}

/// Linha de item já com o total calculado.
#[derive(Debug, Clone)]
pub struct QuotationItemWrite {
    pub item_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub total_price: Decimal,
}

impl From<&LineItemPayload> for QuotationItemWrite {
    fn from(item: &LineItemPayload) -> Self {
        Self {
            item_name: item.item_name.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            total_price: item.total_price(),
        }
    }
}

// Usado na sincronização RFQ -> cotação
impl From<&RfqItem> for QuotationItemWrite {
    fn from(item: &RfqItem) -> Self {
        Self {
            item_name: item.item_name.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            total_price: line_total(item.quantity, item.unit_price),
        }
    }
}

#[derive(FromRow)]
struct RfqSummaryRow {
    rfq_id: i64,
    #[sqlx(flatten)]
    summary: RfqSummary,
}

#[derive(Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  COTAÇÕES
    // =========================================================================

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Quotation>, AppError> {
        let quotations = sqlx::query_as::<_, Quotation>(
            r#"
            SELECT * FROM quotations
            WHERE $1::text IS NULL OR quotation_no ILIKE $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await?;
        Ok(quotations)
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Option<Quotation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>("SELECT * FROM quotations WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(quotation)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Quotation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>(
            "SELECT * FROM quotations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(quotation)
    }

    pub async fn find_by_rfq<'e, E>(&self, executor: E, rfq_id: i64) -> Result<Option<Quotation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>(
            "SELECT * FROM quotations WHERE rfq_id = $1 FOR UPDATE",
        )
        .bind(rfq_id)
        .fetch_optional(executor)
        .await?;
        Ok(quotation)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        quotation_no: &str,
        rfq_id: i64,
        data: &QuotationWrite,
    ) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quotation>(
            r#"
            INSERT INTO quotations (
                quotation_no, rfq_id, company_name, address, phone, email,
                attention_name, attention_phone, attention_email,
                due_date, current_status, when_approved, latest_remarks, next_followup_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(quotation_no)
        .bind(rfq_id)
        .bind(&data.contact.company_name)
        .bind(&data.contact.address)
        .bind(&data.contact.phone)
        .bind(&data.contact.email)
        .bind(&data.contact.attention_name)
        .bind(&data.contact.attention_phone)
        .bind(&data.contact.attention_email)
        .bind(data.due_date)
        .bind(&data.current_status)
        .bind(data.when_approved)
        .bind(&data.latest_remarks)
        .bind(data.next_followup_date)
        .fetch_one(executor)
        .await
        .map_err(|e| unique_violation_by_constraint(e, QUOTATION_UNIQUE))
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, data: &QuotationWrite) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>(
            r#"
            UPDATE quotations
            SET company_name = $2, address = $3, phone = $4, email = $5,
                attention_name = $6, attention_phone = $7, attention_email = $8,
                due_date = $9, current_status = $10, when_approved = $11,
                latest_remarks = $12, next_followup_date = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.contact.company_name)
        .bind(&data.contact.address)
        .bind(&data.contact.phone)
        .bind(&data.contact.email)
        .bind(&data.contact.attention_name)
        .bind(&data.contact.attention_phone)
        .bind(&data.contact.attention_email)
        .bind(data.due_date)
        .bind(&data.current_status)
        .bind(data.when_approved)
        .bind(&data.latest_remarks)
        .bind(data.next_followup_date)
        .fetch_one(executor)
        .await?;
        Ok(quotation)
    }

    /// Espelha os campos de contato vindos da RFQ.
    pub async fn update_contact<'e, E>(&self, executor: E, id: i64, contact: &ContactFields) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE quotations
            SET company_name = $2, address = $3, phone = $4, email = $5,
                attention_name = $6, attention_phone = $7, attention_email = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&contact.company_name)
        .bind(&contact.address)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(&contact.attention_name)
        .bind(&contact.attention_phone)
        .bind(&contact.attention_email)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: i64, status: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE quotations SET current_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Resumo da RFQ de origem com o responsável.
    pub async fn rfq_summary<'e, E>(&self, executor: E, rfq_id: i64) -> Result<Option<RfqSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summary = sqlx::query_as::<_, RfqSummary>(
            r#"
            SELECT r.rfq_no,
                   r.assign_to,
                   tm.name AS assign_to_name,
                   tm.designation AS assign_to_designation,
                   tm.email AS assign_to_email
            FROM rfqs r
            LEFT JOIN team_members tm ON tm.id = r.assign_to
            WHERE r.id = $1
            "#,
        )
        .bind(rfq_id)
        .fetch_optional(executor)
        .await?;
        Ok(summary)
    }

    /// Resumos de várias RFQs de uma vez, indexados pelo id da RFQ.
    pub async fn rfq_summaries(&self, rfq_ids: &[i64]) -> Result<HashMap<i64, RfqSummary>, AppError> {
        let rows = sqlx::query_as::<_, RfqSummaryRow>(
            r#"
            SELECT r.id AS rfq_id,
                   r.rfq_no,
                   r.assign_to,
                   tm.name AS assign_to_name,
                   tm.designation AS assign_to_designation,
                   tm.email AS assign_to_email
            FROM rfqs r
            LEFT JOIN team_members tm ON tm.id = r.assign_to
            WHERE r.id = ANY($1)
            "#,
        )
        .bind(rfq_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| (row.rfq_id, row.summary)).collect())
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(&self, executor: E, quotation_id: i64) -> Result<Vec<QuotationItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, QuotationItem>(
            "SELECT * FROM quotation_items WHERE quotation_id = $1 ORDER BY id",
        )
        .bind(quotation_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn items_by_quotation(
        &self,
        quotation_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<QuotationItem>>, AppError> {
        let items = sqlx::query_as::<_, QuotationItem>(
            "SELECT * FROM quotation_items WHERE quotation_id = ANY($1) ORDER BY id",
        )
        .bind(quotation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<QuotationItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.quotation_id).or_default().push(item);
        }
        Ok(grouped)
    }

    /// IDs dos itens da cotação (base do diff).
    pub async fn item_ids<'e, E>(&self, executor: E, quotation_id: i64) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM quotation_items WHERE quotation_id = $1 ORDER BY id",
        )
        .bind(quotation_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        quotation_id: i64,
        item: &QuotationItemWrite,
    ) -> Result<QuotationItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, QuotationItem>(
            r#"
            INSERT INTO quotation_items (
                quotation_id, item_name, product_name, quantity, unit, unit_price, total_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(quotation_id)
        .bind(&item.item_name)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.unit_price)
        .bind(item.total_price)
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        quotation_id: i64,
        item_id: i64,
        item: &QuotationItemWrite,
    ) -> Result<QuotationItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, QuotationItem>(
            r#"
            UPDATE quotation_items
            SET item_name = $3, product_name = $4, quantity = $5, unit = $6,
                unit_price = $7, total_price = $8
            WHERE id = $1 AND quotation_id = $2
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(quotation_id)
        .bind(&item.item_name)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.unit_price)
        .bind(item.total_price)
        .fetch_one(executor)
        .await?;
        Ok(updated)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, quotation_id: i64, item_ids: &[i64]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM quotation_items WHERE quotation_id = $1 AND id = ANY($2)")
            .bind(quotation_id)
            .bind(item_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all_items<'e, E>(&self, executor: E, quotation_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM quotation_items WHERE quotation_id = $1")
            .bind(quotation_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
