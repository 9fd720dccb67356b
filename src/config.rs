// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        PurchaseOrderRepository, QuotationRepository, ReferenceRepository, RfqRepository, SeriesRepository,
        TeamRepository, UserRepository, WorkOrderRepository,
    },
    services::{
        auth::AuthService,
        file_store::FileStore,
        notification::{LogNotifier, NotificationService, Notifier, SmtpNotifier},
        numbering::NumberingService,
        purchase_order_service::PurchaseOrderService,
        quotation_service::QuotationService,
        reference_service::ReferenceService,
        rfq_service::RfqService,
        series_service::SeriesService,
        team_service::TeamService,
        work_order_service::WorkOrderService,
    },
};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: String,
}

/// Configuração lida do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_email: String,
    pub media_root: PathBuf,
    pub bind_addr: String,
    pub smtp: Option<SmtpConfig>,
    /// Cria o primeiro usuário se ainda não existir
    pub bootstrap_admin: Option<(String, String)>,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} deve ser definida"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Sem SMTP_HOST as mensagens só vão para o log
        let smtp = optional("SMTP_HOST").map(|host| SmtpConfig {
            host,
            user: optional("SMTP_USER"),
            pass: optional("SMTP_PASS"),
            from: optional("SMTP_FROM").unwrap_or_else(|| "noreply@localhost".to_string()),
        });

        let bootstrap_admin = match (optional("BOOTSTRAP_ADMIN_EMAIL"), optional("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            admin_email: required("ADMIN_EMAIL")?,
            media_root: PathBuf::from(optional("MEDIA_ROOT").unwrap_or_else(|| "media".to_string())),
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            smtp,
            bootstrap_admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub series_service: SeriesService,
    pub team_service: TeamService,
    pub reference_service: ReferenceService,
    pub rfq_service: RfqService,
    pub quotation_service: QuotationService,
    pub purchase_order_service: PurchaseOrderService,
    pub work_order_service: WorkOrderService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let notifier: Arc<dyn Notifier> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpNotifier::new(smtp)?),
            None => {
                tracing::warn!("SMTP_HOST não definido: e-mails serão apenas registrados no log");
                Arc::new(LogNotifier)
            }
        };

        Ok(Self::build(db_pool, config, notifier))
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn build(db_pool: PgPool, config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        let series_repo = SeriesRepository::new(db_pool.clone());
        let rfq_repo = RfqRepository::new(db_pool.clone());
        let team_repo = TeamRepository::new(db_pool.clone());
        let quotation_repo = QuotationRepository::new(db_pool.clone());
        let po_repo = PurchaseOrderRepository::new(db_pool.clone());
        let wo_repo = WorkOrderRepository::new(db_pool.clone());

        let notifications = NotificationService::new(notifier, config.admin_email.clone());
        let files = FileStore::new(config.media_root.clone());
        let numbering = NumberingService::new(series_repo.clone(), rfq_repo.clone());

        Self {
            auth_service: AuthService::new(
                UserRepository::new(db_pool.clone()),
                config.jwt_secret.clone(),
                notifications.clone(),
                files.clone(),
            ),
            series_service: SeriesService::new(series_repo),
            team_service: TeamService::new(db_pool.clone(), team_repo.clone()),
            reference_service: ReferenceService::new(ReferenceRepository::new(db_pool.clone())),
            rfq_service: RfqService::new(
                db_pool.clone(),
                rfq_repo.clone(),
                team_repo.clone(),
                quotation_repo.clone(),
                numbering.clone(),
                notifications.clone(),
            ),
            quotation_service: QuotationService::new(
                db_pool.clone(),
                quotation_repo.clone(),
                rfq_repo,
                po_repo.clone(),
                numbering.clone(),
                notifications,
            ),
            purchase_order_service: PurchaseOrderService::new(db_pool.clone(), po_repo, quotation_repo, files),
            work_order_service: WorkOrderService::new(db_pool.clone(), wo_repo, team_repo, numbering),
            db_pool,
        }
    }
}
