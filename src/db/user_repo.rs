// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::unique_violation_by_constraint, error::AppError},
    models::auth::User,
};

const USER_UNIQUE: &[(&str, &str, &str)] = &[
    ("users_email_key", "email", "A user with that email already exists."),
    ("users_username_key", "username", "A user with that username already exists."),
];

// Repositório de usuários: todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // E-mail e username duplicados viram 400 no campo correspondente
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| unique_violation_by_constraint(e, USER_UNIQUE))?;

        Ok(user)
    }

    pub async fn set_otp(&self, id: i64, otp: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET otp = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(otp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Troca a senha e invalida o OTP na mesma instrução.
    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, otp = NULL, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_profile(
        &self,
        id: i64,
        name: &str,
        username: &str,
        address: &str,
        phone_number: &str,
        image: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, username = $3, address = $4, phone_number = $5,
                image = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(username)
        .bind(address)
        .bind(phone_number)
        .bind(image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_by_constraint(e, USER_UNIQUE))?;
        Ok(user)
    }
}
