// src/db/reference_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation_to_field},
        error::AppError,
    },
    models::reference::{CatalogEntry, CatalogTable, Client, Product, RfqChannel},
};

/// Dados de contato de um cliente, usados em create/update.
#[derive(Debug, Clone, Default)]
pub struct ClientFields<'a> {
    pub company_name: &'a str,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub attention_name: Option<&'a str>,
    pub attention_phone: Option<&'a str>,
    pub attention_email: Option<&'a str>,
}

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: PgPool,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CANAIS DE RFQ
    // =========================================================================

    pub async fn list_channels(&self) -> Result<Vec<RfqChannel>, AppError> {
        let channels = sqlx::query_as::<_, RfqChannel>("SELECT * FROM rfq_channels ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(channels)
    }

    pub async fn find_channel(&self, id: i64) -> Result<Option<RfqChannel>, AppError> {
        let channel = sqlx::query_as::<_, RfqChannel>("SELECT * FROM rfq_channels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(channel)
    }

    pub async fn create_channel(&self, channel_name: Option<&str>) -> Result<RfqChannel, AppError> {
        sqlx::query_as::<_, RfqChannel>(
            "INSERT INTO rfq_channels (channel_name) VALUES ($1) RETURNING *",
        )
        .bind(channel_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            unique_violation_to_field(e, "channel_name", "RFQ Channel with this channel name already exists.")
        })
    }

    pub async fn update_channel(
        &self,
        id: i64,
        channel_name: Option<&str>,
    ) -> Result<Option<RfqChannel>, AppError> {
        sqlx::query_as::<_, RfqChannel>(
            "UPDATE rfq_channels SET channel_name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(channel_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            unique_violation_to_field(e, "channel_name", "RFQ Channel with this channel name already exists.")
        })
    }

    pub async fn delete_channel(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM rfq_channels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_clients(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE $1::text IS NULL OR company_name ILIKE $1
            ORDER BY company_name ASC
            "#,
        )
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    pub async fn find_client(&self, id: i64) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn create_client(&self, fields: &ClientFields<'_>) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                company_name, address, phone, email,
                attention_name, attention_phone, attention_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(fields.company_name)
        .bind(fields.address)
        .bind(fields.phone)
        .bind(fields.email)
        .bind(fields.attention_name)
        .bind(fields.attention_phone)
        .bind(fields.attention_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn update_client(
        &self,
        id: i64,
        fields: &ClientFields<'_>,
    ) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET company_name = $2, address = $3, phone = $4, email = $5,
                attention_name = $6, attention_phone = $7, attention_email = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.company_name)
        .bind(fields.address)
        .bind(fields.phone)
        .bind(fields.email)
        .bind(fields.attention_name)
        .bind(fields.attention_phone)
        .bind(fields.attention_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn delete_client(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  CATÁLOGO (itens e unidades)
    // =========================================================================
    // O nome da tabela vem de `CatalogTable`, nunca do request.

    pub async fn list_catalog(
        &self,
        table: CatalogTable,
        search: Option<&str>,
    ) -> Result<Vec<CatalogEntry>, AppError> {
        let sql = format!(
            "SELECT * FROM {} WHERE $1::text IS NULL OR name ILIKE $1 ORDER BY name ASC",
            table.table()
        );
        let entries = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(like_pattern(search))
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    pub async fn find_catalog(&self, table: CatalogTable, id: i64) -> Result<Option<CatalogEntry>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", table.table());
        let entry = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    pub async fn create_catalog(&self, table: CatalogTable, name: &str) -> Result<CatalogEntry, AppError> {
        let sql = format!("INSERT INTO {} (name) VALUES ($1) RETURNING *", table.table());
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                unique_violation_to_field(e, "name", &format!("{} with this name already exists.", table.label()))
            })
    }

    pub async fn update_catalog(
        &self,
        table: CatalogTable,
        id: i64,
        name: &str,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let sql = format!("UPDATE {} SET name = $2 WHERE id = $1 RETURNING *", table.table());
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                unique_violation_to_field(e, "name", &format!("{} with this name already exists.", table.label()))
            })
    }

    pub async fn delete_catalog(&self, table: CatalogTable, id: i64) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE $1::text IS NULL OR name ILIKE $1 ORDER BY name ASC",
        )
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn create_product(&self, name: &str, price: Option<Decimal>) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING *")
            .bind(name)
            .bind(price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation_to_field(e, "name", "product with this name already exists."))
    }

    pub async fn update_product(
        &self,
        id: i64,
        name: &str,
        price: Option<Decimal>,
    ) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET name = $2, price = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation_to_field(e, "name", "product with this name already exists."))
    }

    pub async fn delete_product(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
