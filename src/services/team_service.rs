// src/services/team_service.rs

use sqlx::PgPool;
use validator::{Validate, ValidateEmail};

use crate::{
    common::error::AppError,
    db::TeamRepository,
    models::team::{CreateTeamMemberPayload, TeamMember, UpdateTeamMemberPayload},
};

#[derive(Clone)]
pub struct TeamService {
    pool: PgPool,
    repo: TeamRepository,
}

/// E-mail vazio vira NULL (a coluna é única); preenchido precisa ser válido.
pub fn normalize_email(email: Option<String>) -> Result<Option<String>, AppError> {
    match email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        Some(e) if !e.validate_email() => Err(AppError::field("email", "Enter a valid email address.")),
        other => Ok(other),
    }
}

impl TeamService {
    pub fn new(pool: PgPool, repo: TeamRepository) -> Self {
        Self { pool, repo }
    }

    pub async fn list(&self) -> Result<Vec<TeamMember>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<TeamMember, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Team member"))
    }

    pub async fn create(&self, payload: CreateTeamMemberPayload) -> Result<TeamMember, AppError> {
        payload.validate()?;
        let email = normalize_email(payload.email)?;
        self.repo.create(&payload.name, &payload.designation, email.as_deref()).await
    }

    pub async fn update(&self, id: i64, payload: UpdateTeamMemberPayload) -> Result<TeamMember, AppError> {
        payload.validate()?;
        let current = self.get(id).await?;

        let name = payload.name.unwrap_or(current.name);
        let designation = payload.designation.unwrap_or(current.designation);
        let email = match payload.email {
            Some(change) => normalize_email(change)?,
            None => current.email,
        };

        self.repo
            .update(id, &name, &designation, email.as_deref())
            .await?
            .ok_or(AppError::NotFound("Team member"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.repo.delete(id).await? {
            0 => Err(AppError::NotFound("Team member")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_stored_as_null() {
        assert_eq!(normalize_email(Some("  ".into())).unwrap(), None);
        assert_eq!(normalize_email(None).unwrap(), None);
    }

    #[test]
    fn email_is_trimmed_and_checked() {
        assert_eq!(
            normalize_email(Some(" anita@example.com ".into())).unwrap().as_deref(),
            Some("anita@example.com")
        );
        assert!(normalize_email(Some("not-an-email".into())).is_err());
    }
}
