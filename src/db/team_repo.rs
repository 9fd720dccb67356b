// src/db/team_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::unique_violation_by_constraint, error::AppError},
    models::team::TeamMember,
};

const TEAM_UNIQUE: &[(&str, &str, &str)] = &[
    ("team_members_name_key", "name", "team member with this name already exists."),
    ("team_members_email_key", "email", "team member with this email already exists."),
];

#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TeamMember>, AppError> {
        let members = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<TeamMember>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    pub async fn create(
        &self,
        name: &str,
        designation: &str,
        email: Option<&str>,
    ) -> Result<TeamMember, AppError> {
        sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (name, designation, email)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(designation)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_by_constraint(e, TEAM_UNIQUE))
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        designation: &str,
        email: Option<&str>,
    ) -> Result<Option<TeamMember>, AppError> {
        sqlx::query_as::<_, TeamMember>(
            r#"
            UPDATE team_members SET name = $2, designation = $3, email = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(designation)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation_by_constraint(e, TEAM_UNIQUE))
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
