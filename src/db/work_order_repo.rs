// src/db/work_order_repo.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{Executor, FromRow, PgConnection, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        line_item::LineItemPayload,
        work_order::{OnsiteLab, WorkOrder, WorkOrderItem, WorkOrderType},
    },
};

/// Colunas graváveis da OS.
#[derive(Debug, Clone)]
pub struct WorkOrderWrite {
    pub quotation_id: i64,
    pub purchase_order_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub date_received: NaiveDate,
    pub exp_date_completion: Option<NaiveDate>,
    pub onsite_lab: OnsiteLab,
    pub range: Option<String>,
    pub serial_number: Option<String>,
    pub site_location: Option<String>,
    pub remarks: Option<String>,
    pub current_status: String,
    pub work_order_type: WorkOrderType,
}

impl From<&WorkOrder> for WorkOrderWrite {
    fn from(wo: &WorkOrder) -> Self {
        Self {
            quotation_id: wo.quotation_id,
            purchase_order_id: wo.purchase_order_id,
            assigned_to: wo.assigned_to,
            date_received: wo.date_received,
            exp_date_completion: wo.exp_date_completion,
            onsite_lab: wo.onsite_lab,
            range: wo.range.clone(),
            serial_number: wo.serial_number.clone(),
            site_location: wo.site_location.clone(),
            remarks: wo.remarks.clone(),
            current_status: wo.current_status.clone(),
            work_order_type: wo.work_order_type,
        }
    }
}

/// OS com o nome do responsável.
#[derive(Debug, FromRow)]
pub struct WorkOrderRow {
    #[sqlx(flatten)]
    pub work_order: WorkOrder,
    pub assigned_to_name: Option<String>,
}

const WORK_ORDER_WITH_NAMES: &str = r#"
    SELECT wo.*, tm.name AS assigned_to_name
    FROM work_orders wo
    LEFT JOIN team_members tm ON tm.id = wo.assigned_to
"#;

#[derive(Clone)]
pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<WorkOrderRow>, AppError> {
        let sql = format!(
            "{WORK_ORDER_WITH_NAMES} WHERE $1::text IS NULL OR wo.current_status = $1 ORDER BY wo.created_at DESC, wo.id DESC"
        );
        let rows = sqlx::query_as::<_, WorkOrderRow>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_row<'e, E>(&self, executor: E, id: i64) -> Result<Option<WorkOrderRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{WORK_ORDER_WITH_NAMES} WHERE wo.id = $1");
        let row = sqlx::query_as::<_, WorkOrderRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<WorkOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let wo = sqlx::query_as::<_, WorkOrder>("SELECT * FROM work_orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(wo)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        work_order_no: &str,
        data: &WorkOrderWrite,
    ) -> Result<WorkOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let wo = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders (
                work_order_no, quotation_id, purchase_order_id, assigned_to,
                date_received, exp_date_completion, onsite_lab, range, serial_number,
                site_location, remarks, current_status, work_order_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(work_order_no)
        .bind(data.quotation_id)
        .bind(data.purchase_order_id)
        .bind(data.assigned_to)
        .bind(data.date_received)
        .bind(data.exp_date_completion)
        .bind(data.onsite_lab)
        .bind(&data.range)
        .bind(&data.serial_number)
        .bind(&data.site_location)
        .bind(&data.remarks)
        .bind(&data.current_status)
        .bind(data.work_order_type)
        .fetch_one(executor)
        .await?;
        Ok(wo)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, data: &WorkOrderWrite) -> Result<WorkOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let wo = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET quotation_id = $2, purchase_order_id = $3, assigned_to = $4,
                date_received = $5, exp_date_completion = $6, onsite_lab = $7,
                range = $8, serial_number = $9, site_location = $10, remarks = $11,
                current_status = $12, work_order_type = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.quotation_id)
        .bind(data.purchase_order_id)
        .bind(data.assigned_to)
        .bind(data.date_received)
        .bind(data.exp_date_completion)
        .bind(data.onsite_lab)
        .bind(&data.range)
        .bind(&data.serial_number)
        .bind(&data.site_location)
        .bind(&data.remarks)
        .bind(&data.current_status)
        .bind(data.work_order_type)
        .fetch_one(executor)
        .await?;
        Ok(wo)
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  RELAÇÕES
    // =========================================================================

    /// Responsável da RFQ que originou a cotação.
    pub async fn rfq_assignee_for_quotation<'e, E>(
        &self,
        executor: E,
        quotation_id: i64,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignee: Option<Option<i64>> = sqlx::query_scalar(
            r#"
            SELECT r.assign_to
            FROM quotations q
            JOIN rfqs r ON r.id = q.rfq_id
            WHERE q.id = $1
            "#,
        )
        .bind(quotation_id)
        .fetch_optional(executor)
        .await?;
        Ok(assignee.flatten())
    }

    /// Cotação dona do pedido de compra.
    pub async fn purchase_order_quotation<'e, E>(
        &self,
        executor: E,
        purchase_order_id: i64,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation_id: Option<i64> =
            sqlx::query_scalar("SELECT quotation_id FROM purchase_orders WHERE id = $1")
                .bind(purchase_order_id)
                .fetch_optional(executor)
                .await?;
        Ok(quotation_id)
    }

    pub async fn quotation_exists<'e, E>(&self, executor: E, quotation_id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM quotations WHERE id = $1)")
            .bind(quotation_id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(&self, executor: E, work_order_id: i64) -> Result<Vec<WorkOrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, WorkOrderItem>(
            "SELECT * FROM work_order_items WHERE work_order_id = $1 ORDER BY id",
        )
        .bind(work_order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn items_by_work_order(
        &self,
        work_order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<WorkOrderItem>>, AppError> {
        let items = sqlx::query_as::<_, WorkOrderItem>(
            "SELECT * FROM work_order_items WHERE work_order_id = ANY($1) ORDER BY id",
        )
        .bind(work_order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<WorkOrderItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.work_order_id).or_default().push(item);
        }
        Ok(grouped)
    }

    /// Quantidades já validadas (>= 1) pelo serviço.
    pub async fn replace_items(
        &self,
        conn: &mut PgConnection,
        work_order_id: i64,
        items: &[LineItemPayload],
    ) -> Result<Vec<WorkOrderItem>, AppError> {
        sqlx::query("DELETE FROM work_order_items WHERE work_order_id = $1")
            .bind(work_order_id)
            .execute(&mut *conn)
            .await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, WorkOrderItem>(
                r#"
                INSERT INTO work_order_items (
                    work_order_id, item_name, product_name, quantity, unit, unit_price
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(work_order_id)
            .bind(&item.item_name)
            .bind(&item.product_name)
            .bind(item.quantity.unwrap_or(1))
            .bind(&item.unit)
            .bind(item.unit_price)
            .fetch_one(&mut *conn)
            .await?;
            created.push(row);
        }
        Ok(created)
    }
}
