// src/services/work_order_service.rs

use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::{
    common::{
        error::{AppError, FieldErrors},
        nullable::apply,
        validation::{check_amount_limits, check_min_quantity},
    },
    db::{
        work_order_repo::{WorkOrderRow, WorkOrderWrite},
        TeamRepository, WorkOrderRepository,
    },
    models::{
        line_item::LineItemPayload,
        series::DocumentKind,
        work_order::{
            CreateWorkOrderPayload, UpdateWorkOrderPayload, WorkOrderDetail, WorkOrderItem, STATUS_COLLECTED,
        },
    },
    services::numbering::NumberingService,
};

#[derive(Clone)]
pub struct WorkOrderService {
    pool: PgPool,
    wo_repo: WorkOrderRepository,
    team_repo: TeamRepository,
    numbering: NumberingService,
}

impl WorkOrderService {
    pub fn new(
        pool: PgPool,
        wo_repo: WorkOrderRepository,
        team_repo: TeamRepository,
        numbering: NumberingService,
    ) -> Self {
        Self { pool, wo_repo, team_repo, numbering }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<WorkOrderDetail>, AppError> {
        let rows = self.wo_repo.list(status).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.work_order.id).collect();
        let mut items = self.wo_repo.items_by_work_order(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let wo_items = items.remove(&row.work_order.id).unwrap_or_default();
                to_detail(row, wo_items)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<WorkOrderDetail, AppError> {
        let row = self
            .wo_repo
            .find_row(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Work order"))?;
        let items = self.wo_repo.list_items(&self.pool, id).await?;
        Ok(to_detail(row, items))
    }

    pub async fn create(&self, payload: CreateWorkOrderPayload) -> Result<WorkOrderDetail, AppError> {
        payload.validate()?;
        validate_items(&payload.items)?;

        let mut write = WorkOrderWrite {
            quotation_id: payload.quotation,
            purchase_order_id: payload.purchase_order,
            assigned_to: payload.assigned_to,
            date_received: payload.date_received,
            exp_date_completion: payload.exp_date_completion,
            onsite_lab: payload.onsite_lab,
            range: payload.range,
            serial_number: payload.serial_number,
            site_location: payload.site_location,
            remarks: payload.remarks,
            current_status: payload.current_status.unwrap_or_else(|| STATUS_COLLECTED.to_string()),
            work_order_type: payload.work_order_type,
        };

        let mut tx = self.pool.begin().await?;

        self.check_relations(&mut tx, &mut write).await?;

        let work_order_no = self.numbering.next_document_number(&mut *tx, DocumentKind::WorkOrder).await?;
        let wo = self.wo_repo.insert(&mut *tx, &work_order_no, &write).await?;
        self.wo_repo.replace_items(&mut tx, wo.id, &payload.items).await?;

        tx.commit().await?;
        tracing::info!("🛠️ OS {} criada", work_order_no);

        self.get(wo.id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateWorkOrderPayload) -> Result<WorkOrderDetail, AppError> {
        payload.validate()?;
        if let Some(items) = &payload.items {
            validate_items(items)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .wo_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Work order"))?;

        let mut write = WorkOrderWrite::from(&current);
        if let Some(quotation) = payload.quotation {
            write.quotation_id = quotation;
        }
        write.purchase_order_id = apply(write.purchase_order_id, payload.purchase_order);
        write.assigned_to = apply(write.assigned_to, payload.assigned_to);
        if let Some(date_received) = payload.date_received {
            write.date_received = date_received;
        }
        write.exp_date_completion = apply(write.exp_date_completion, payload.exp_date_completion);
        if let Some(onsite_lab) = payload.onsite_lab {
            write.onsite_lab = onsite_lab;
        }
        write.range = apply(write.range, payload.range);
        write.serial_number = apply(write.serial_number, payload.serial_number);
        write.site_location = apply(write.site_location, payload.site_location);
        write.remarks = apply(write.remarks, payload.remarks);
        if let Some(status) = payload.current_status {
            write.current_status = status;
        }
        if let Some(work_order_type) = payload.work_order_type {
            write.work_order_type = work_order_type;
        }

        self.check_relations(&mut tx, &mut write).await?;

        self.wo_repo.update(&mut *tx, id, &write).await?;
        if let Some(items) = &payload.items {
            self.wo_repo.replace_items(&mut tx, id, items).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.wo_repo.delete(id).await? {
            0 => Err(AppError::NotFound("Work order")),
            _ => Ok(()),
        }
    }

    /// Confere cotação, pedido e responsável; sem responsável, herda o da RFQ.
    async fn check_relations(&self, conn: &mut PgConnection, write: &mut WorkOrderWrite) -> Result<(), AppError> {
        if !self.wo_repo.quotation_exists(&mut *conn, write.quotation_id).await? {
            return Err(AppError::field(
                "quotation",
                format!("Invalid pk \"{}\" - object does not exist.", write.quotation_id),
            ));
        }

        if let Some(po_id) = write.purchase_order_id {
            let owner = self.wo_repo.purchase_order_quotation(&mut *conn, po_id).await?;
            check_purchase_order_owner(po_id, owner, write.quotation_id)?;
        }

        match write.assigned_to {
            Some(member_id) => {
                if self.team_repo.find_by_id(&mut *conn, member_id).await?.is_none() {
                    return Err(AppError::field(
                        "assigned_to",
                        format!("Invalid pk \"{member_id}\" - object does not exist."),
                    ));
                }
            }
            None => {
                write.assigned_to = self
                    .wo_repo
                    .rfq_assignee_for_quotation(&mut *conn, write.quotation_id)
                    .await?;
            }
        }
        Ok(())
    }
}

/// O pedido informado tem que existir e pertencer à cotação da OS.
pub fn check_purchase_order_owner(po_id: i64, owner: Option<i64>, quotation_id: i64) -> Result<(), AppError> {
    match owner {
        None => Err(AppError::field(
            "purchase_order",
            format!("Invalid pk \"{po_id}\" - object does not exist."),
        )),
        Some(owner) if owner != quotation_id => Err(AppError::field(
            "purchase_order",
            "Purchase order does not belong to the selected quotation.",
        )),
        Some(_) => Ok(()),
    }
}

fn validate_items(items: &[LineItemPayload]) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    let refs: Vec<&LineItemPayload> = items.iter().collect();
    check_min_quantity(&refs, &mut errors);
    check_amount_limits(&refs, &mut errors);
    AppError::from_field_errors(errors)
}

fn to_detail(row: WorkOrderRow, items: Vec<WorkOrderItem>) -> WorkOrderDetail {
    WorkOrderDetail {
        work_order: row.work_order,
        items,
        assigned_to_name: row.assigned_to_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_order_must_belong_to_the_quotation() {
        assert!(check_purchase_order_owner(5, Some(2), 2).is_ok());
        assert!(check_purchase_order_owner(5, Some(3), 2).is_err());
        assert!(check_purchase_order_owner(5, None, 2).is_err());
    }

    #[test]
    fn work_order_items_need_quantity() {
        let missing = LineItemPayload { item_name: Some("Probe".into()), ..Default::default() };
        assert!(validate_items(&[missing]).is_err());

        let ok = LineItemPayload { quantity: Some(1), ..Default::default() };
        assert!(validate_items(&[ok]).is_ok());
    }
}
