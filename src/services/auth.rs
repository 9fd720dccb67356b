// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{AccessToken, Claims, ProfileUpdate, TokenKind, TokenPair, User},
        purchase_order::UploadedFile,
    },
    services::{
        file_store::{check_image_size, FileStore, PROFILE_IMAGE_DIR},
        notification::NotificationService,
    },
};

const ACCESS_TOKEN_DAYS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    notifications: NotificationService,
    files: FileStore,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        notifications: NotificationService,
        files: FileStore,
    ) -> Self {
        Self { user_repo, jwt_secret, notifications, files }
    }

    // =========================================================================
    //  LOGIN E TOKENS
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(TokenPair {
            access: issue_token(&self.jwt_secret, user.id, TokenKind::Access)?,
            refresh: issue_token(&self.jwt_secret, user.id, TokenKind::Refresh)?,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AppError> {
        let claims = decode_token(&self.jwt_secret, refresh_token, TokenKind::Refresh)?;
        let user = self.user_for(&claims).await?;
        Ok(AccessToken { access: issue_token(&self.jwt_secret, user.id, TokenKind::Access)? })
    }

    /// Usado pelo middleware: só aceita tokens de acesso.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token, TokenKind::Access)?;
        self.user_for(&claims).await
    }

    async fn user_for(&self, claims: &Claims) -> Result<User, AppError> {
        let user_id: i64 = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    // =========================================================================
    //  RECUPERAÇÃO DE SENHA (OTP)
    // =========================================================================

    pub async fn request_otp(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let otp = generate_otp();
        self.user_repo.set_otp(user.id, &otp).await?;

        // Sem o e-mail o usuário não tem como concluir: aqui a falha sobe
        self.notifications.send_otp(&user.email, &otp).await?;
        tracing::info!("🔑 OTP enviado para {}", user.email);
        Ok(())
    }

    /// Sem expiração: vale o último OTP emitido até ser usado.
    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if user.otp.as_deref() != Some(otp) {
            return Err(AppError::field("otp", "Invalid OTP"));
        }

        let password_hash = hash_password(new_password).await?;
        self.user_repo.set_password(user.id, &password_hash).await
    }

    pub async fn change_password(&self, user: &User, new_password: &str) -> Result<(), AppError> {
        let password_hash = hash_password(new_password).await?;
        self.user_repo.set_password(user.id, &password_hash).await
    }

    // =========================================================================
    //  PERFIL
    // =========================================================================

    pub async fn update_profile(
        &self,
        user: &User,
        update: ProfileUpdate,
        image: Option<UploadedFile>,
    ) -> Result<User, AppError> {
        update.validate()?;
        if let Some(file) = &image {
            check_image_size(file.bytes.len())?;
        }

        let new_image = match &image {
            Some(file) => Some(self.files.save(PROFILE_IMAGE_DIR, &file.file_name, &file.bytes).await?),
            None => None,
        };

        let updated = self
            .user_repo
            .update_profile(
                user.id,
                update.name.as_deref().unwrap_or(&user.name),
                update.username.as_deref().unwrap_or(&user.username),
                update.address.as_deref().unwrap_or(&user.address),
                update.phone_number.as_deref().unwrap_or(&user.phone_number),
                new_image.as_deref().or(user.image.as_deref()),
            )
            .await;

        match (&updated, &new_image, &user.image) {
            (Ok(_), Some(_), Some(old)) => self.files.remove(old).await,
            (Err(_), Some(stored), _) => self.files.remove(stored).await,
            _ => {}
        }
        updated
    }

    /// Cria um usuário (bootstrap do administrador).
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User, AppError> {
        let password_hash = hash_password(password).await?;
        let username = email.split('@').next().unwrap_or(email);
        self.user_repo
            .create_user(self.user_repo.pool(), email, username, &password_hash)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_email(email).await
    }
}

// =============================================================================
//  FUNÇÕES AUXILIARES
// =============================================================================

/// bcrypt é caro: roda fora do runtime assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

pub fn issue_token(secret: &str, user_id: i64, kind: TokenKind) -> Result<String, AppError> {
    let now = Utc::now();
    let ttl = match kind {
        TokenKind::Access => Duration::days(ACCESS_TOKEN_DAYS),
        TokenKind::Refresh => Duration::days(REFRESH_TOKEN_DAYS),
    };

    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
        token_type: kind,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

/// Decodifica e exige o tipo esperado (um refresh não serve como access).
pub fn decode_token(secret: &str, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map_err(|_| AppError::InvalidToken)?;

    if data.claims.token_type != expected {
        return Err(AppError::InvalidToken);
    }
    Ok(data.claims)
}

/// Seis dígitos numéricos.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn access_token_round_trips_user_id() {
        let token = issue_token(SECRET, 42, TokenKind::Access).unwrap();
        let claims = decode_token(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access() {
        let refresh = issue_token(SECRET, 42, TokenKind::Refresh).unwrap();
        assert!(matches!(
            decode_token(SECRET, &refresh, TokenKind::Access),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token("other", 1, TokenKind::Access).unwrap();
        assert!(decode_token(SECRET, &token, TokenKind::Access).is_err());
    }

    #[test]
    fn otp_has_six_digits() {
        for _ in 0..20 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("s3cret").await.unwrap();
        assert!(verify_password("s3cret", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }
}
