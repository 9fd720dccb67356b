// src/services/rfq_service.rs

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::{
    common::{
        error::{AppError, FieldErrors},
        nullable::apply,
        validation::{check_amount_limits, check_non_negative_quantity, has_email},
    },
    db::{
        quotation_repo::QuotationItemWrite,
        rfq_repo::{RfqRow, RfqWrite},
        QuotationRepository, RfqRepository, TeamRepository,
    },
    models::{
        line_item::LineItemPayload,
        rfq::{CreateRfqPayload, Rfq, RfqDetail, RfqItem, RfqItemPayload, RfqStatus, UpdateRfqPayload},
        team::TeamMember,
    },
    services::{
        notification::{AssignmentNotice, NotificationService},
        numbering::NumberingService,
    },
};

#[derive(Clone)]
pub struct RfqService {
    pool: PgPool,
    rfq_repo: RfqRepository,
    team_repo: TeamRepository,
    quotation_repo: QuotationRepository,
    numbering: NumberingService,
    notifications: NotificationService,
}

impl RfqService {
    pub fn new(
        pool: PgPool,
        rfq_repo: RfqRepository,
        team_repo: TeamRepository,
        quotation_repo: QuotationRepository,
        numbering: NumberingService,
        notifications: NotificationService,
    ) -> Self {
        Self { pool, rfq_repo, team_repo, quotation_repo, numbering, notifications }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(&self, search: Option<&str>, status: Option<RfqStatus>) -> Result<Vec<RfqDetail>, AppError> {
        let rows = self.rfq_repo.list(search, status).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.rfq.id).collect();
        let mut items = self.rfq_repo.items_by_rfq(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let rfq_items = items.remove(&row.rfq.id).unwrap_or_default();
                to_detail(row, rfq_items, None)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<RfqDetail, AppError> {
        let row = self.rfq_repo.find_row(&self.pool, id).await?.ok_or(AppError::NotFound("RFQ"))?;
        let items = self.rfq_repo.list_items(&self.pool, id).await?;
        Ok(to_detail(row, items, None))
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(&self, payload: CreateRfqPayload) -> Result<RfqDetail, AppError> {
        payload.validate()?;
        validate_items(&payload.items)?;

        let write = RfqWrite {
            company_name: payload.company_name,
            reference: payload.reference,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            rfq_channel: payload.rfq_channel,
            attention_name: payload.attention_name,
            attention_phone: payload.attention_phone,
            attention_email: payload.attention_email,
            due_date: payload.due_date,
            assign_to: payload.assign_to,
            current_status: payload.current_status,
        };

        let mut tx = self.pool.begin().await?;

        let assignee = match write.assign_to {
            Some(member_id) => Some(self.require_assignee(&mut tx, member_id).await?),
            None => None,
        };

        let rfq_no = self.numbering.next_series_number(&mut tx, payload.series).await?;
        let rfq = self.rfq_repo.insert(&mut *tx, payload.series, &rfq_no, &write).await?;
        self.rfq_repo.replace_items(&mut tx, rfq.id, &payload.items).await?;

        tx.commit().await?;
        tracing::info!("📝 RFQ {} criada", rfq_no);

        // Depois do commit: falha de e-mail não desfaz a RFQ
        let email_sent = match &assignee {
            Some(member) => self.notify_assignment(&rfq, member).await,
            None => false,
        };

        let mut detail = self.get(rfq.id).await?;
        detail.email_sent = Some(email_sent);
        Ok(detail)
    }

    pub async fn update(&self, id: i64, payload: UpdateRfqPayload) -> Result<RfqDetail, AppError> {
        payload.validate()?;
        if let Some(items) = &payload.items {
            validate_items(items)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .rfq_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("RFQ"))?;

        // Só valida o responsável quando ele vem no payload
        let new_assignee = match payload.assign_to {
            Some(Some(member_id)) => Some(self.require_assignee(&mut tx, member_id).await?),
            _ => None,
        };

        let mut write = RfqWrite::from(&current);
        if let Some(company_name) = payload.company_name {
            write.company_name = company_name;
        }
        write.reference = apply(write.reference, payload.reference);
        if let Some(address) = payload.address {
            write.address = address;
        }
        if let Some(phone) = payload.phone {
            write.phone = phone;
        }
        if let Some(email) = payload.email {
            write.email = email;
        }
        write.rfq_channel = apply(write.rfq_channel, payload.rfq_channel);
        write.attention_name = apply(write.attention_name, payload.attention_name);
        write.attention_phone = apply(write.attention_phone, payload.attention_phone);
        write.attention_email = apply(write.attention_email, payload.attention_email);
        write.due_date = apply(write.due_date, payload.due_date);
        write.assign_to = apply(write.assign_to, payload.assign_to);
        if let Some(status) = payload.current_status {
            write.current_status = status;
        }

        let rfq = self.rfq_repo.update(&mut *tx, id, &write).await?;
        if let Some(items) = &payload.items {
            self.rfq_repo.replace_items(&mut tx, id, items).await?;
        }

        self.sync_quotation(&mut tx, &rfq).await?;

        tx.commit().await?;

        let email_sent = match new_assignee {
            Some(member) if current.assign_to != Some(member.id) => self.notify_assignment(&rfq, &member).await,
            _ => false,
        };

        let mut detail = self.get(id).await?;
        detail.email_sent = Some(email_sent);
        Ok(detail)
    }

    /// Apaga a RFQ e renumera a série na mesma transação.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let series_id = self
            .rfq_repo
            .delete(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("RFQ"))?;
        self.numbering.renumber_series(&mut tx, series_id).await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  SINCRONIZAÇÃO RFQ -> COTAÇÃO
    // =========================================================================

    /// Copia contato e itens da RFQ para a cotação vinculada, se existir.
    pub async fn sync_quotation(&self, conn: &mut PgConnection, rfq: &Rfq) -> Result<bool, AppError> {
        let Some(quotation) = self.quotation_repo.find_by_rfq(&mut *conn, rfq.id).await? else {
            return Ok(false);
        };

        self.quotation_repo
            .update_contact(&mut *conn, quotation.id, &rfq.contact_fields())
            .await?;

        let rfq_items = self.rfq_repo.list_items(&mut *conn, rfq.id).await?;
        self.quotation_repo.delete_all_items(&mut *conn, quotation.id).await?;
        for item in &rfq_items {
            self.quotation_repo
                .insert_item(&mut *conn, quotation.id, &QuotationItemWrite::from(item))
                .await?;
        }

        tracing::debug!("Cotação {} sincronizada com a RFQ {}", quotation.quotation_no, rfq.id);
        Ok(true)
    }

    // =========================================================================
    //  ITENS AVULSOS
    // =========================================================================

    pub async fn list_items(&self, rfq_id: Option<i64>) -> Result<Vec<RfqItem>, AppError> {
        self.rfq_repo.list_all_items(rfq_id).await
    }

    pub async fn get_item(&self, id: i64) -> Result<RfqItem, AppError> {
        self.rfq_repo.find_item(id).await?.ok_or(AppError::NotFound("RFQ item"))
    }

    pub async fn create_item(&self, payload: RfqItemPayload) -> Result<RfqItem, AppError> {
        validate_items(std::slice::from_ref(&payload.item))?;
        self.rfq_repo.insert_item(&self.pool, payload.rfq, &payload.item).await
    }

    pub async fn update_item(&self, id: i64, payload: RfqItemPayload) -> Result<RfqItem, AppError> {
        validate_items(std::slice::from_ref(&payload.item))?;
        self.rfq_repo
            .update_item(id, payload.rfq, &payload.item)
            .await?
            .ok_or(AppError::NotFound("RFQ item"))
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), AppError> {
        match self.rfq_repo.delete_item(id).await? {
            0 => Err(AppError::NotFound("RFQ item")),
            _ => Ok(()),
        }
    }

    // =========================================================================
    //  AUXILIARES
    // =========================================================================

    async fn require_assignee(&self, conn: &mut PgConnection, member_id: i64) -> Result<TeamMember, AppError> {
        let member = self
            .team_repo
            .find_by_id(&mut *conn, member_id)
            .await?
            .ok_or_else(|| AppError::field("assign_to", format!("Invalid pk \"{member_id}\" - object does not exist.")))?;
        check_assignee_email(&member)?;
        Ok(member)
    }

    async fn notify_assignment(&self, rfq: &Rfq, member: &TeamMember) -> bool {
        let Some(email) = member.email.as_deref() else {
            return false;
        };
        self.notifications
            .rfq_assigned(&AssignmentNotice {
                rfq_no: rfq.rfq_no.as_deref().unwrap_or_default(),
                company_name: &rfq.company_name,
                due_date: rfq.due_date,
                assignee_name: &member.name,
                assignee_email: email,
            })
            .await
    }
}

/// O responsável precisa de um e-mail para receber a notificação.
pub fn check_assignee_email(member: &TeamMember) -> Result<(), AppError> {
    if has_email(member.email.as_deref()) {
        Ok(())
    } else {
        Err(AppError::field(
            "assign_to",
            "Selected team member must have a valid email address.",
        ))
    }
}

fn validate_items(items: &[LineItemPayload]) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    let refs: Vec<&LineItemPayload> = items.iter().collect();
    check_non_negative_quantity(&refs, &mut errors);
    check_amount_limits(&refs, &mut errors);
    AppError::from_field_errors(errors)
}

fn to_detail(row: RfqRow, items: Vec<RfqItem>, email_sent: Option<bool>) -> RfqDetail {
    let today = Utc::now().date_naive();
    RfqDetail {
        is_past_due: row.rfq.is_past_due(today),
        rfq: row.rfq,
        items,
        series_prefix: row.series_prefix,
        assign_to_name: row.assign_to_name,
        assign_to_designation: row.assign_to_designation,
        email_sent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: Option<&str>) -> TeamMember {
        TeamMember {
            id: 3,
            name: "Anita".into(),
            designation: "Sales".into(),
            email: email.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn assignee_without_email_is_rejected_on_assign_to() {
        for email in [None, Some(""), Some("   ")] {
            match check_assignee_email(&member(email)) {
                Err(AppError::FieldValidation(errors)) => assert!(errors.contains_key("assign_to")),
                other => panic!("expected assign_to error, got {other:?}"),
            }
        }
        assert!(check_assignee_email(&member(Some("anita@example.com"))).is_ok());
    }

    #[test]
    fn negative_item_quantity_is_rejected() {
        let items = vec![LineItemPayload {
            item_name: Some("Gauge".into()),
            quantity: Some(-1),
            ..Default::default()
        }];
        assert!(validate_items(&items).is_err());
        assert!(validate_items(&[LineItemPayload::default()]).is_ok());
    }
}
