// src/services/quotation_service.rs

use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::{
        error::{AppError, FieldErrors},
        nullable::apply,
        validation::{check_amount_limits, check_min_quantity, check_unit_price, has_email},
    },
    db::{
        quotation_repo::{QuotationItemWrite, QuotationWrite},
        PurchaseOrderRepository, QuotationRepository, RfqRepository,
    },
    models::{
        line_item::LineItemPayload,
        purchase_order::PurchaseOrderDetail,
        quotation::{
            CreateQuotationPayload, DueReminderResponse, Quotation, QuotationDetail, UpdateQuotationPayload,
            STATUS_APPROVED, STATUS_PENDING,
        },
        rfq::{ContactFields, RfqStatus},
        series::DocumentKind,
    },
    services::{
        notification::{DueReminderNotice, NotificationService},
        numbering::NumberingService,
    },
};

/// Resultado do diff de itens da cotação.
#[derive(Debug)]
pub struct ItemSyncPlan<'a> {
    pub update: Vec<(i64, &'a LineItemPayload)>,
    pub create: Vec<&'a LineItemPayload>,
    pub delete: Vec<i64>,
}

/// Diff por id: ids conhecidos são atualizados, itens sem id criados,
/// ids que sumiram removidos. Um id de outra cotação é erro de validação.
pub fn plan_item_sync<'a>(existing_ids: &[i64], incoming: &'a [LineItemPayload]) -> Result<ItemSyncPlan<'a>, AppError> {
    let existing: HashSet<i64> = existing_ids.iter().copied().collect();
    let mut plan = ItemSyncPlan { update: Vec::new(), create: Vec::new(), delete: Vec::new() };
    let mut kept = HashSet::new();

    for item in incoming {
        match item.id {
            Some(id) if existing.contains(&id) => {
                kept.insert(id);
                plan.update.push((id, item));
            }
            Some(id) => {
                return Err(AppError::field("items", format!("Item {id} does not belong to this quotation.")));
            }
            None => plan.create.push(item),
        }
    }

    plan.delete = existing_ids.iter().copied().filter(|id| !kept.contains(id)).collect();
    Ok(plan)
}

/// Itens enviados na cotação: preço obrigatório (>= 0) e quantidade >= 1.
pub fn validate_quotation_items(items: &[LineItemPayload]) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    let refs: Vec<&LineItemPayload> = items.iter().collect();
    check_unit_price(&refs, &mut errors);
    check_min_quantity(&refs, &mut errors);
    check_amount_limits(&refs, &mut errors);
    AppError::from_field_errors(errors)
}

/// Carimba a data de aprovação na primeira vez que o status vira "Approved".
fn stamp_approval(write: &mut QuotationWrite) {
    if write.current_status == STATUS_APPROVED && write.when_approved.is_none() {
        write.when_approved = Some(Utc::now().date_naive());
    }
}

#[derive(Clone)]
pub struct QuotationService {
    pool: PgPool,
    quotation_repo: QuotationRepository,
    rfq_repo: RfqRepository,
    po_repo: PurchaseOrderRepository,
    numbering: NumberingService,
    notifications: NotificationService,
}

impl QuotationService {
    pub fn new(
        pool: PgPool,
        quotation_repo: QuotationRepository,
        rfq_repo: RfqRepository,
        po_repo: PurchaseOrderRepository,
        numbering: NumberingService,
        notifications: NotificationService,
    ) -> Self {
        Self { pool, quotation_repo, rfq_repo, po_repo, numbering, notifications }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<QuotationDetail>, AppError> {
        let quotations = self.quotation_repo.list(search).await?;
        let ids: Vec<i64> = quotations.iter().map(|q| q.id).collect();
        let rfq_ids: Vec<i64> = quotations.iter().map(|q| q.rfq_id).collect();

        let mut summaries = self.quotation_repo.rfq_summaries(&rfq_ids).await?;
        let mut items = self.quotation_repo.items_by_quotation(&ids).await?;
        let orders = self.po_repo.list_for_quotations(&ids).await?;
        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut order_items = self.po_repo.items_by_order(&order_ids).await?;

        let mut details = Vec::with_capacity(quotations.len());
        for quotation in quotations {
            let purchase_order: Vec<PurchaseOrderDetail> = orders
                .iter()
                .filter(|o| o.quotation_id == quotation.id)
                .map(|o| PurchaseOrderDetail {
                    purchase_order: o.clone(),
                    items: order_items.remove(&o.id).unwrap_or_default(),
                })
                .collect();
            let rfq_details = summaries.remove(&quotation.rfq_id);
            details.push(QuotationDetail {
                items: items.remove(&quotation.id).unwrap_or_default(),
                quotation,
                purchase_order,
                rfq_details,
            });
        }
        Ok(details)
    }

    pub async fn get(&self, id: i64) -> Result<QuotationDetail, AppError> {
        let quotation = self
            .quotation_repo
            .find(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Quotation"))?;

        let items = self.quotation_repo.list_items(&self.pool, id).await?;
        let orders = self.po_repo.list(Some(id)).await?;
        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut order_items = self.po_repo.items_by_order(&order_ids).await?;
        let purchase_order: Vec<PurchaseOrderDetail> = orders
            .into_iter()
            .map(|o| PurchaseOrderDetail {
                items: order_items.remove(&o.id).unwrap_or_default(),
                purchase_order: o,
            })
            .collect();
        let rfq_details = self.quotation_repo.rfq_summary(&self.pool, quotation.rfq_id).await?;

        Ok(QuotationDetail { quotation, items, purchase_order, rfq_details })
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(&self, payload: CreateQuotationPayload) -> Result<QuotationDetail, AppError> {
        payload.validate()?;
        validate_quotation_items(&payload.items)?;

        let mut tx = self.pool.begin().await?;

        // Trava a RFQ: duas criações simultâneas para a mesma RFQ ficam em fila
        let rfq = self
            .rfq_repo
            .find_for_update(&mut *tx, payload.rfq)
            .await?
            .ok_or_else(|| AppError::field("rfq", format!("Invalid pk \"{}\" - object does not exist.", payload.rfq)))?;

        if rfq.current_status != RfqStatus::Completed {
            return Err(AppError::field(
                "rfq",
                "Quotation can only be created for RFQs with status 'Completed'.",
            ));
        }
        if self.quotation_repo.find_by_rfq(&mut *tx, rfq.id).await?.is_some() {
            return Err(AppError::field("rfq", "A quotation already exists for this RFQ."));
        }

        let defaults = rfq.contact_fields();
        let mut write = QuotationWrite {
            contact: ContactFields {
                company_name: payload.company_name.or(defaults.company_name),
                address: payload.address.or(defaults.address),
                phone: payload.phone.or(defaults.phone),
                email: payload.email.or(defaults.email),
                attention_name: payload.attention_name.or(defaults.attention_name),
                attention_phone: payload.attention_phone.or(defaults.attention_phone),
                attention_email: payload.attention_email.or(defaults.attention_email),
            },
            due_date: payload.due_date,
            current_status: payload.current_status.unwrap_or_else(|| STATUS_PENDING.to_string()),
            when_approved: None,
            latest_remarks: payload.latest_remarks,
            next_followup_date: payload.next_followup_date,
        };
        stamp_approval(&mut write);

        let quotation_no = self.numbering.next_document_number(&mut *tx, DocumentKind::Quotation).await?;
        let quotation = self.quotation_repo.insert(&mut *tx, &quotation_no, rfq.id, &write).await?;

        // Itens copiados da RFQ entram como estão: preço e quantidade são completados depois
        if payload.items.is_empty() {
            let rfq_items = self.rfq_repo.list_items(&mut *tx, rfq.id).await?;
            for item in &rfq_items {
                self.quotation_repo
                    .insert_item(&mut *tx, quotation.id, &QuotationItemWrite::from(item))
                    .await?;
            }
        } else {
            for item in &payload.items {
                self.quotation_repo
                    .insert_item(&mut *tx, quotation.id, &QuotationItemWrite::from(item))
                    .await?;
            }
        }

        tx.commit().await?;
        tracing::info!("💰 Cotação {} criada para a RFQ {}", quotation_no, rfq.id);

        self.get(quotation.id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateQuotationPayload) -> Result<QuotationDetail, AppError> {
        payload.validate()?;
        if let Some(items) = &payload.items {
            validate_quotation_items(items)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .quotation_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Quotation"))?;

        let mut write = QuotationWrite::from(&current);
        let contact = &mut write.contact;
        contact.company_name = apply(contact.company_name.take(), payload.company_name);
        contact.address = apply(contact.address.take(), payload.address);
        contact.phone = apply(contact.phone.take(), payload.phone);
        contact.email = apply(contact.email.take(), payload.email);
        contact.attention_name = apply(contact.attention_name.take(), payload.attention_name);
        contact.attention_phone = apply(contact.attention_phone.take(), payload.attention_phone);
        contact.attention_email = apply(contact.attention_email.take(), payload.attention_email);
        write.due_date = apply(write.due_date, payload.due_date);
        if let Some(status) = payload.current_status {
            write.current_status = status;
        }
        write.when_approved = apply(write.when_approved, payload.when_approved);
        write.latest_remarks = apply(write.latest_remarks, payload.latest_remarks);
        write.next_followup_date = apply(write.next_followup_date, payload.next_followup_date);
        stamp_approval(&mut write);

        self.quotation_repo.update(&mut *tx, id, &write).await?;

        if let Some(items) = &payload.items {
            let existing = self.quotation_repo.item_ids(&mut *tx, id).await?;
            let plan = plan_item_sync(&existing, items)?;

            if !plan.delete.is_empty() {
                self.quotation_repo.delete_items(&mut *tx, id, &plan.delete).await?;
            }
            for (item_id, item) in plan.update {
                self.quotation_repo
                    .update_item(&mut *tx, id, item_id, &QuotationItemWrite::from(item))
                    .await?;
            }
            for item in plan.create {
                self.quotation_repo
                    .insert_item(&mut *tx, id, &QuotationItemWrite::from(item))
                    .await?;
            }
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.quotation_repo.delete(id).await? {
            0 => Err(AppError::NotFound("Quotation")),
            _ => Ok(()),
        }
    }

    // =========================================================================
    //  LEMBRETE DE VENCIMENTO
    // =========================================================================

    pub async fn send_due_reminder(&self, quotation_id: i64) -> Result<DueReminderResponse, AppError> {
        let quotation = self
            .quotation_repo
            .find(&self.pool, quotation_id)
            .await?
            .ok_or(AppError::NotFound("Quotation"))?;

        check_reminder_allowed(&quotation, self.po_repo.list(Some(quotation_id)).await?.len())?;

        let summary = self
            .quotation_repo
            .rfq_summary(&self.pool, quotation.rfq_id)
            .await?
            .ok_or(AppError::NotFound("RFQ"))?;

        let assignee_email = summary
            .assign_to_email
            .as_deref()
            .filter(|e| has_email(Some(e)))
            .ok_or_else(|| AppError::field("assign_to", "The RFQ assignee must have a valid email address."))?;

        let email_sent = self
            .notifications
            .due_reminder(&DueReminderNotice {
                quotation_no: &quotation.quotation_no,
                rfq_no: summary.rfq_no.as_deref().unwrap_or_default(),
                company_name: quotation.company_name.as_deref().unwrap_or_default(),
                due_date: quotation.due_date,
                assignee_name: summary.assign_to_name.as_deref().unwrap_or_default(),
                assignee_email,
            })
            .await;

        let message = if email_sent {
            "Due reminder sent successfully."
        } else {
            "Due reminder could not be delivered."
        };
        Ok(DueReminderResponse { message: message.to_string(), email_sent })
    }
}

/// Lembrete só vale para cotação aprovada e ainda sem pedido de compra.
pub fn check_reminder_allowed(quotation: &Quotation, purchase_orders: usize) -> Result<(), AppError> {
    if !quotation.is_approved() {
        return Err(AppError::non_field("Due reminders can only be sent for approved quotations."));
    }
    if purchase_orders > 0 {
        return Err(AppError::non_field("This quotation already has a purchase order."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: Option<i64>, quantity: i32) -> LineItemPayload {
        LineItemPayload {
            id,
            item_name: Some("Gauge".into()),
            quantity: Some(quantity),
            unit_price: Some(Decimal::new(1000, 2)),
            ..Default::default()
        }
    }

    #[test]
    fn known_id_is_updated_and_new_item_created() {
        let incoming = vec![item(Some(1), 5), item(None, 1)];
        let plan = plan_item_sync(&[1], &incoming).unwrap();

        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].0, 1);
        assert_eq!(plan.update[0].1.quantity, Some(5));
        assert_eq!(plan.create.len(), 1);
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn missing_ids_are_deleted() {
        let incoming = vec![item(Some(2), 1)];
        let plan = plan_item_sync(&[1, 2, 3], &incoming).unwrap();
        assert_eq!(plan.delete, vec![1, 3]);
        assert!(plan.create.is_empty());
    }

    #[test]
    fn overflowing_item_is_a_validation_error() {
        let payload: Vec<LineItemPayload> =
            serde_json::from_str(r#"[{"item_name": "Gauge", "quantity": 2147483647, "unit_price": 7.9e27}]"#).unwrap();
        match validate_quotation_items(&payload) {
            Err(AppError::FieldValidation(errors)) => {
                assert_eq!(errors["items"], vec!["Unit price for Gauge must not exceed 99999999.99.".to_string()]);
            }
            other => panic!("expected items error, got {other:?}"),
        }
    }

    #[test]
    fn foreign_item_id_is_rejected() {
        let incoming = vec![item(Some(99), 1)];
        assert!(matches!(
            plan_item_sync(&[1], &incoming),
            Err(AppError::FieldValidation(ref errors)) if errors.contains_key("items")
        ));
    }

    #[test]
    fn items_need_price_and_positive_quantity() {
        assert!(validate_quotation_items(&[item(None, 1)]).is_ok());
        assert!(validate_quotation_items(&[item(None, 0)]).is_err());

        let unpriced = LineItemPayload { quantity: Some(1), ..Default::default() };
        assert!(validate_quotation_items(&[unpriced]).is_err());
    }

    #[test]
    fn approval_date_is_stamped_once() {
        let mut write = QuotationWrite { current_status: STATUS_APPROVED.into(), ..Default::default() };
        stamp_approval(&mut write);
        assert_eq!(write.when_approved, Some(Utc::now().date_naive()));

        let earlier = chrono::NaiveDate::from_ymd_opt(2024, 1, 2);
        let mut write = QuotationWrite { current_status: STATUS_APPROVED.into(), when_approved: earlier, ..Default::default() };
        stamp_approval(&mut write);
        assert_eq!(write.when_approved, earlier);
    }
}
