// src/services/purchase_order_service.rs

use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::{AppError, FieldErrors},
    db::{purchase_order_repo::PurchaseOrderItemWrite, PurchaseOrderRepository, QuotationRepository},
    models::{
        purchase_order::{
            check_purchase_order_items, NewPurchaseOrder, PurchaseOrder, PurchaseOrderDetail,
            PurchaseOrderItemPayload, UpdatePurchaseOrderPayload,
        },
        quotation::STATUS_PO_CREATED,
    },
    services::file_store::{FileStore, PURCHASE_ORDER_DIR},
};

#[derive(Clone)]
pub struct PurchaseOrderService {
    pool: PgPool,
    po_repo: PurchaseOrderRepository,
    quotation_repo: QuotationRepository,
    files: FileStore,
}

impl PurchaseOrderService {
    pub fn new(
        pool: PgPool,
        po_repo: PurchaseOrderRepository,
        quotation_repo: QuotationRepository,
        files: FileStore,
    ) -> Self {
        Self { pool, po_repo, quotation_repo, files }
    }

    pub async fn list(&self, quotation_id: Option<i64>) -> Result<Vec<PurchaseOrderDetail>, AppError> {
        let orders = self.po_repo.list(quotation_id).await?;
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut items = self.po_repo.items_by_order(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|o| PurchaseOrderDetail {
                items: items.remove(&o.id).unwrap_or_default(),
                purchase_order: o,
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<PurchaseOrderDetail, AppError> {
        let purchase_order = self
            .po_repo
            .find(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Purchase order"))?;
        let items = self.po_repo.list_items(&self.pool, id).await?;
        Ok(PurchaseOrderDetail { purchase_order, items })
    }

    /// Cria o pedido, os itens e marca a cotação como "PO Created", tudo ou nada.
    pub async fn create(&self, new: NewPurchaseOrder) -> Result<PurchaseOrderDetail, AppError> {
        // Nada toca o banco antes desta checagem
        let mut errors = FieldErrors::new();
        check_purchase_order_items(&new.items, &mut errors);
        AppError::from_field_errors(errors)?;

        let mut tx = self.pool.begin().await?;

        let quotation = self
            .quotation_repo
            .find_for_update(&mut *tx, new.quotation)
            .await?
            .ok_or_else(|| {
                AppError::field("quotation", format!("Invalid pk \"{}\" - object does not exist.", new.quotation))
            })?;

        self.check_item_links(&mut tx, quotation.id, &new.items).await?;

        let stored_file = match &new.po_file {
            Some(file) => Some(self.files.save(PURCHASE_ORDER_DIR, &file.file_name, &file.bytes).await?),
            None => None,
        };

        let persisted = async {
            let po = self
                .po_repo
                .insert(&mut *tx, quotation.id, &new.client_po_number, new.order_type, stored_file.as_deref())
                .await?;
            self.po_repo.replace_items(&mut tx, po.id, &to_writes(&new.items)).await?;
            self.quotation_repo.set_status(&mut *tx, quotation.id, STATUS_PO_CREATED).await?;
            tx.commit().await?;
            Ok::<PurchaseOrder, AppError>(po)
        }
        .await;

        // Rollback deixa o arquivo órfão: remove
        let po = match persisted {
            Ok(po) => po,
            Err(e) => {
                if let Some(path) = &stored_file {
                    self.files.remove(path).await;
                }
                return Err(e);
            }
        };

        tracing::info!("📦 Pedido {} criado para a cotação {}", po.id, quotation.quotation_no);
        self.get(po.id).await
    }

    pub async fn update(&self, id: i64, payload: UpdatePurchaseOrderPayload) -> Result<PurchaseOrderDetail, AppError> {
        if let Some(items) = &payload.items {
            let mut errors = FieldErrors::new();
            check_purchase_order_items(items, &mut errors);
            AppError::from_field_errors(errors)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .po_repo
            .find(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Purchase order"))?;

        let client_po_number = payload.client_po_number.unwrap_or(current.client_po_number);
        if client_po_number.chars().count() > 50 {
            return Err(AppError::field(
                "client_po_number",
                "Ensure this field has no more than 50 characters.",
            ));
        }
        let order_type = payload.order_type.unwrap_or(current.order_type);

        self.po_repo
            .update(&mut *tx, id, &client_po_number, order_type, current.po_file.as_deref())
            .await?;

        if let Some(items) = &payload.items {
            self.check_item_links(&mut tx, current.quotation_id, items).await?;
            self.po_repo.replace_items(&mut tx, id, &to_writes(items)).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.po_repo.delete(id).await? {
            None => Err(AppError::NotFound("Purchase order")),
            Some(file) => {
                if let Some(path) = file {
                    self.files.remove(&path).await;
                }
                Ok(())
            }
        }
    }

    /// Itens ligados a um item de cotação precisam ser da mesma cotação.
    async fn check_item_links(
        &self,
        conn: &mut PgConnection,
        quotation_id: i64,
        items: &[PurchaseOrderItemPayload],
    ) -> Result<(), AppError> {
        let linked: Vec<i64> = items.iter().filter_map(|i| i.quotation_item).collect();
        if linked.is_empty() {
            return Ok(());
        }

        let owners = self.po_repo.quotation_item_owners(&mut *conn, &linked).await?;
        for item_id in linked {
            if owners.get(&item_id) != Some(&quotation_id) {
                return Err(AppError::field(
                    "items",
                    format!("Quotation item {item_id} does not belong to quotation {quotation_id}."),
                ));
            }
        }
        Ok(())
    }
}

fn to_writes(items: &[PurchaseOrderItemPayload]) -> Vec<PurchaseOrderItemWrite> {
    items
        .iter()
        .map(|i| PurchaseOrderItemWrite {
            quotation_item_id: i.quotation_item,
            quantity: i.item.quantity.unwrap_or(1),
            line: i.item.clone(),
        })
        .collect()
}
