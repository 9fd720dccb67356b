// src/services/notification.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};

use crate::config::SmtpConfig;

/// Mensagem de texto puro pronta para envio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Capacidade de envio injetada no estado da aplicação.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<()>;
}

// =============================================================================
//  IMPLEMENTAÇÕES
// =============================================================================

/// Envio via relay SMTP (lettre). O transporte é bloqueante, então roda em `spawn_blocking`.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = match (&config.user, &config.pass) {
            (Some(user), Some(pass)) => SmtpTransport::relay(&config.host)?
                .credentials(Credentials::new(user.clone(), pass.clone()))
                .build(),
            _ => SmtpTransport::builder_dangerous(&config.host).build(),
        };
        let from = config
            .from
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SMTP_FROM address: {e}"))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(message
                .to
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid recipient {}: {e}", message.to))?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| anyhow::anyhow!("Mail task failed: {e}"))??;
        Ok(())
    }
}

/// Usado quando não há SMTP configurado: só registra a mensagem.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<()> {
        tracing::info!(to = %message.to, subject = %message.subject, "📧 E-mail (SMTP desativado)");
        Ok(())
    }
}

// =============================================================================
//  TEMPLATES
// =============================================================================

/// Dados interpolados nas mensagens de atribuição de RFQ.
#[derive(Debug, Clone)]
pub struct AssignmentNotice<'a> {
    pub rfq_no: &'a str,
    pub company_name: &'a str,
    pub due_date: Option<NaiveDate>,
    pub assignee_name: &'a str,
    pub assignee_email: &'a str,
}

#[derive(Debug, Clone)]
pub struct DueReminderNotice<'a> {
    pub quotation_no: &'a str,
    pub rfq_no: &'a str,
    pub company_name: &'a str,
    pub due_date: Option<NaiveDate>,
    pub assignee_name: &'a str,
    pub assignee_email: &'a str,
}

fn format_due(due_date: Option<NaiveDate>) -> String {
    due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Not set".to_string())
}

pub fn assignment_messages(notice: &AssignmentNotice<'_>, admin_email: &str) -> [EmailMessage; 2] {
    let due = format_due(notice.due_date);
    let to_assignee = EmailMessage {
        to: notice.assignee_email.to_string(),
        subject: format!("New RFQ assigned: {}", notice.rfq_no),
        body: format!(
            "Dear {},\n\nYou have been assigned RFQ {} for {}.\nDue date: {}\n\nPlease review it at your earliest convenience.\n",
            notice.assignee_name, notice.rfq_no, notice.company_name, due
        ),
    };
    let to_admin = EmailMessage {
        to: admin_email.to_string(),
        subject: format!("RFQ {} assigned to {}", notice.rfq_no, notice.assignee_name),
        body: format!(
            "RFQ {} for {} has been assigned to {} ({}).\nDue date: {}\n",
            notice.rfq_no, notice.company_name, notice.assignee_name, notice.assignee_email, due
        ),
    };
    [to_assignee, to_admin]
}

pub fn due_reminder_messages(notice: &DueReminderNotice<'_>, admin_email: &str) -> [EmailMessage; 2] {
    let due = format_due(notice.due_date);
    let to_assignee = EmailMessage {
        to: notice.assignee_email.to_string(),
        subject: format!("Reminder: quotation {} awaits a purchase order", notice.quotation_no),
        body: format!(
            "Dear {},\n\nQuotation {} (RFQ {}) for {} was approved but no purchase order has been received yet.\nDue date: {}\n\nPlease follow up with the client.\n",
            notice.assignee_name, notice.quotation_no, notice.rfq_no, notice.company_name, due
        ),
    };
    let to_admin = EmailMessage {
        to: admin_email.to_string(),
        subject: format!("Due reminder sent for quotation {}", notice.quotation_no),
        body: format!(
            "A due reminder for quotation {} (RFQ {}, {}) was sent to {} ({}).\nDue date: {}\n",
            notice.quotation_no, notice.rfq_no, notice.company_name, notice.assignee_name, notice.assignee_email, due
        ),
    };
    [to_assignee, to_admin]
}

pub fn otp_message(email: &str, otp: &str) -> EmailMessage {
    EmailMessage {
        to: email.to_string(),
        subject: "Your OTP for Password Reset".to_string(),
        body: format!("Your OTP is {otp}. Use it to reset your password.\n"),
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    admin_email: String,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, admin_email: String) -> Self {
        Self { notifier, admin_email }
    }

    pub async fn rfq_assigned(&self, notice: &AssignmentNotice<'_>) -> bool {
        self.dispatch(assignment_messages(notice, &self.admin_email)).await
    }

    pub async fn due_reminder(&self, notice: &DueReminderNotice<'_>) -> bool {
        self.dispatch(due_reminder_messages(notice, &self.admin_email)).await
    }

    /// OTP é o único envio cuja falha volta para o cliente.
    pub async fn send_otp(&self, email: &str, otp: &str) -> anyhow::Result<()> {
        self.notifier.send(otp_message(email, otp)).await
    }

    /// Envia todas as mensagens; `true` só se nenhuma falhar. Falhas ficam no log.
    async fn dispatch(&self, messages: [EmailMessage; 2]) -> bool {
        let mut all_sent = true;
        for message in messages {
            let to = message.to.clone();
            if let Err(e) = self.notifier.send(message).await {
                tracing::warn!("Falha ao enviar e-mail para {}: {:#}", to, e);
                all_sent = false;
            }
        }
        all_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Guarda tudo o que recebe e falha para os destinatários listados.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<EmailMessage>>,
        fail_for: Vec<String>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: EmailMessage) -> anyhow::Result<()> {
            let fail = self.fail_for.contains(&message.to);
            self.sent.lock().unwrap().push(message);
            if fail {
                anyhow::bail!("relay refused");
            }
            Ok(())
        }
    }

    fn notice() -> AssignmentNotice<'static> {
        AssignmentNotice {
            rfq_no: "RFQ-0000004",
            company_name: "Acme",
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1),
            assignee_name: "Anita",
            assignee_email: "anita@example.com",
        }
    }

    #[tokio::test]
    async fn assignment_sends_to_assignee_and_admin() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = NotificationService::new(notifier.clone(), "admin@example.com".into());

        assert!(service.rfq_assigned(&notice()).await);

        let sent = notifier.sent.lock().unwrap();
        let recipients: Vec<&str> = sent.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(recipients, ["anita@example.com", "admin@example.com"]);
        assert!(sent[0].body.contains("RFQ-0000004"));
        assert!(sent[0].body.contains("2025-07-01"));
    }

    #[tokio::test]
    async fn one_failed_send_reports_false_but_still_attempts_both() {
        let notifier = Arc::new(RecordingNotifier {
            fail_for: vec!["anita@example.com".into()],
            ..Default::default()
        });
        let service = NotificationService::new(notifier.clone(), "admin@example.com".into());

        assert!(!service.rfq_assigned(&notice()).await);
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn reminder_templates_mention_quotation_and_missing_due_date() {
        let [to_assignee, to_admin] = due_reminder_messages(
            &DueReminderNotice {
                quotation_no: "QT-0000002",
                rfq_no: "RFQ-0000001",
                company_name: "Acme",
                due_date: None,
                assignee_name: "Anita",
                assignee_email: "anita@example.com",
            },
            "admin@example.com",
        );
        assert!(to_assignee.subject.contains("QT-0000002"));
        assert!(to_assignee.body.contains("Not set"));
        assert_eq!(to_admin.to, "admin@example.com");
    }
}
