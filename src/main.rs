//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use salesops_backend::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Sem configuração válida a aplicação não deve iniciar
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some((email, password)) = &config.bootstrap_admin {
        bootstrap_admin(&app_state, email, password).await?;
    }

    let app = salesops_backend::app(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Falha ao escutar em {}", config.bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

/// Cria o primeiro usuário quando ainda não existe ninguém com esse e-mail.
async fn bootstrap_admin(app_state: &AppState, email: &str, password: &str) -> anyhow::Result<()> {
    if app_state.auth_service.find_by_email(email).await?.is_some() {
        return Ok(());
    }
    app_state.auth_service.create_user(email, password).await?;
    tracing::info!("👤 Usuário inicial {} criado", email);
    Ok(())
}
