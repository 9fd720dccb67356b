// src/db/purchase_order_repo.rs

use std::collections::HashMap;

use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        line_item::LineItemPayload,
        purchase_order::{OrderType, PurchaseOrder, PurchaseOrderItem},
    },
};

/// Item de pedido já validado (quantidade >= 1).
#[derive(Debug, Clone)]
pub struct PurchaseOrderItemWrite {
    pub quotation_item_id: Option<i64>,
    pub line: LineItemPayload,
    pub quantity: i32,
}

#[derive(Clone)]
pub struct PurchaseOrderRepository {
    pool: PgPool,
}

impl PurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, quotation_id: Option<i64>) -> Result<Vec<PurchaseOrder>, AppError> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT * FROM purchase_orders
            WHERE $1::bigint IS NULL OR quotation_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>("SELECT * FROM purchase_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        quotation_id: i64,
        client_po_number: &str,
        order_type: OrderType,
        po_file: Option<&str>,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (quotation_id, client_po_number, order_type, po_file)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(quotation_id)
        .bind(client_po_number)
        .bind(order_type)
        .bind(po_file)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        client_po_number: &str,
        order_type: OrderType,
        po_file: Option<&str>,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders
            SET client_po_number = $2, order_type = $3, po_file = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_po_number)
        .bind(order_type)
        .bind(po_file)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    /// Remove o pedido e devolve o arquivo anexado, se houver.
    pub async fn delete(&self, id: i64) -> Result<Option<Option<String>>, AppError> {
        let file: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM purchase_orders WHERE id = $1 RETURNING po_file")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(file)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(&self, executor: E, purchase_order_id: i64) -> Result<Vec<PurchaseOrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(
            "SELECT * FROM purchase_order_items WHERE purchase_order_id = $1 ORDER BY id",
        )
        .bind(purchase_order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn items_by_order(
        &self,
        purchase_order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<PurchaseOrderItem>>, AppError> {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(
            "SELECT * FROM purchase_order_items WHERE purchase_order_id = ANY($1) ORDER BY id",
        )
        .bind(purchase_order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<PurchaseOrderItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.purchase_order_id).or_default().push(item);
        }
        Ok(grouped)
    }

    /// Pedidos de uma cotação, já com os itens.
    pub async fn list_for_quotations(
        &self,
        quotation_ids: &[i64],
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(
            "SELECT * FROM purchase_orders WHERE quotation_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(quotation_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn replace_items(
        &self,
        conn: &mut PgConnection,
        purchase_order_id: i64,
        items: &[PurchaseOrderItemWrite],
    ) -> Result<Vec<PurchaseOrderItem>, AppError> {
        sqlx::query("DELETE FROM purchase_order_items WHERE purchase_order_id = $1")
            .bind(purchase_order_id)
            .execute(&mut *conn)
            .await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, PurchaseOrderItem>(
                r#"
                INSERT INTO purchase_order_items (
                    purchase_order_id, quotation_item_id, item_name, product_name,
                    quantity, unit, unit_price
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(purchase_order_id)
            .bind(item.quotation_item_id)
            .bind(&item.line.item_name)
            .bind(&item.line.product_name)
            .bind(item.quantity)
            .bind(&item.line.unit)
            .bind(item.line.unit_price)
            .fetch_one(&mut *conn)
            .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// Mapa item da cotação -> cotação dona, para validar referências.
    pub async fn quotation_item_owners<'e, E>(
        &self,
        executor: E,
        quotation_item_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT id, quotation_id FROM quotation_items WHERE id = ANY($1)",
        )
        .bind(quotation_item_ids)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
