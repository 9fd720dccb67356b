// src/services/reference_service.rs

use validator::Validate;

use crate::{
    common::{error::AppError, nullable::apply},
    db::{reference_repo::ClientFields, ReferenceRepository},
    models::reference::{
        CatalogEntry, CatalogPayload, CatalogTable, ChannelPayload, Client, CreateClientPayload,
        CreateProductPayload, Product, RfqChannel, UpdateClientPayload, UpdateProductPayload,
    },
};

/// Dados de referência: canais, clientes, itens/unidades e produtos.
#[derive(Clone)]
pub struct ReferenceService {
    repo: ReferenceRepository,
}

fn deleted(rows: u64, what: &'static str) -> Result<(), AppError> {
    if rows == 0 { Err(AppError::NotFound(what)) } else { Ok(()) }
}

impl ReferenceService {
    pub fn new(repo: ReferenceRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  CANAIS
    // =========================================================================

    pub async fn list_channels(&self) -> Result<Vec<RfqChannel>, AppError> {
        self.repo.list_channels().await
    }

    pub async fn get_channel(&self, id: i64) -> Result<RfqChannel, AppError> {
        self.repo.find_channel(id).await?.ok_or(AppError::NotFound("RFQ channel"))
    }

    pub async fn create_channel(&self, payload: ChannelPayload) -> Result<RfqChannel, AppError> {
        payload.validate()?;
        self.repo.create_channel(payload.channel_name.as_deref()).await
    }

    pub async fn update_channel(&self, id: i64, payload: ChannelPayload) -> Result<RfqChannel, AppError> {
        payload.validate()?;
        let current = self.get_channel(id).await?;
        let channel_name = payload.channel_name.or(current.channel_name);
        self.repo
            .update_channel(id, channel_name.as_deref())
            .await?
            .ok_or(AppError::NotFound("RFQ channel"))
    }

    pub async fn delete_channel(&self, id: i64) -> Result<(), AppError> {
        deleted(self.repo.delete_channel(id).await?, "RFQ channel")
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_clients(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        self.repo.list_clients(search).await
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, AppError> {
        self.repo.find_client(id).await?.ok_or(AppError::NotFound("Client"))
    }

    pub async fn create_client(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        self.repo
            .create_client(&ClientFields {
                company_name: &payload.company_name,
                address: payload.address.as_deref(),
                phone: payload.phone.as_deref(),
                email: payload.email.as_deref(),
                attention_name: payload.attention_name.as_deref(),
                attention_phone: payload.attention_phone.as_deref(),
                attention_email: payload.attention_email.as_deref(),
            })
            .await
    }

    pub async fn update_client(&self, id: i64, payload: UpdateClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        let current = self.get_client(id).await?;

        let company_name = payload.company_name.unwrap_or(current.company_name);
        let address = apply(current.address, payload.address);
        let phone = apply(current.phone, payload.phone);
        if phone.as_deref().is_some_and(|p| p.chars().count() > 20) {
            return Err(AppError::field("phone", "Ensure this field has no more than 20 characters."));
        }
        let email = apply(current.email, payload.email);
        let attention_name = apply(current.attention_name, payload.attention_name);
        let attention_phone = apply(current.attention_phone, payload.attention_phone);
        let attention_email = apply(current.attention_email, payload.attention_email);

        self.repo
            .update_client(
                id,
                &ClientFields {
                    company_name: &company_name,
                    address: address.as_deref(),
                    phone: phone.as_deref(),
                    email: email.as_deref(),
                    attention_name: attention_name.as_deref(),
                    attention_phone: attention_phone.as_deref(),
                    attention_email: attention_email.as_deref(),
                },
            )
            .await?
            .ok_or(AppError::NotFound("Client"))
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), AppError> {
        deleted(self.repo.delete_client(id).await?, "Client")
    }

    // =========================================================================
    //  CATÁLOGO (ITENS E UNIDADES)
    // =========================================================================

    pub async fn list_catalog(&self, table: CatalogTable, search: Option<&str>) -> Result<Vec<CatalogEntry>, AppError> {
        self.repo.list_catalog(table, search).await
    }

    pub async fn get_catalog(&self, table: CatalogTable, id: i64) -> Result<CatalogEntry, AppError> {
        self.repo
            .find_catalog(table, id)
            .await?
            .ok_or(AppError::NotFound(table.label()))
    }

    pub async fn create_catalog(&self, table: CatalogTable, payload: CatalogPayload) -> Result<CatalogEntry, AppError> {
        payload.validate()?;
        self.repo.create_catalog(table, payload.name.trim()).await
    }

    pub async fn update_catalog(
        &self,
        table: CatalogTable,
        id: i64,
        payload: CatalogPayload,
    ) -> Result<CatalogEntry, AppError> {
        payload.validate()?;
        self.repo
            .update_catalog(table, id, payload.name.trim())
            .await?
            .ok_or(AppError::NotFound(table.label()))
    }

    pub async fn delete_catalog(&self, table: CatalogTable, id: i64) -> Result<(), AppError> {
        deleted(self.repo.delete_catalog(table, id).await?, table.label())
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>, AppError> {
        self.repo.list_products(search).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.repo.find_product(id).await?.ok_or(AppError::NotFound("Product"))
    }

    pub async fn create_product(&self, payload: CreateProductPayload) -> Result<Product, AppError> {
        payload.validate()?;
        self.repo.create_product(payload.name.trim(), payload.price).await
    }

    pub async fn update_product(&self, id: i64, payload: UpdateProductPayload) -> Result<Product, AppError> {
        payload.validate()?;
        if let Some(Some(price)) = payload.price {
            if price.is_sign_negative() {
                return Err(AppError::field("price", "Value cannot be negative."));
            }
        }

        let current = self.get_product(id).await?;
        let name = payload.name.unwrap_or(current.name);
        let price = apply(current.price, payload.price);

        self.repo
            .update_product(id, name.trim(), price)
            .await?
            .ok_or(AppError::NotFound("Product"))
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        deleted(self.repo.delete_product(id).await?, "Product")
    }
}
