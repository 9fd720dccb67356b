// src/handlers/auth.rs

use axum::{extract::{Multipart, State}, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, form::read_multipart},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AccessToken, ChangePasswordPayload, LoginUserPayload, MessageResponse, ProfileUpdate, RefreshTokenPayload,
        RequestOtpPayload, ResetPasswordPayload, TokenPair, User,
    },
};

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse { message: text.to_string() })
}

// POST /api/login/
#[utoipa::path(
    post,
    path = "/api/login/",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Tokens de acesso e refresh", body = TokenPair),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<TokenPair>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tokens = app_state.auth_service.login(&payload.email, &payload.password).await?;
    Ok(Json(tokens))
}

// POST /api/token/refresh/
#[utoipa::path(
    post,
    path = "/api/token/refresh/",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 200, description = "Novo token de acesso", body = AccessToken),
        (status = 401, description = "Refresh token inválido")
    )
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<Json<AccessToken>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state.auth_service.refresh(&payload.refresh).await?;
    Ok(Json(token))
}

// POST /api/request-otp/
#[utoipa::path(
    post,
    path = "/api/request-otp/",
    tag = "Auth",
    request_body = RequestOtpPayload,
    responses(
        (status = 200, description = "OTP enviado por e-mail", body = MessageResponse),
        (status = 404, description = "E-mail não cadastrado")
    )
)]
pub async fn request_otp(
    State(app_state): State<AppState>,
    Json(payload): Json<RequestOtpPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.request_otp(&payload.email).await?;
    Ok(message("OTP sent to your email."))
}

// POST /api/reset-password/
#[utoipa::path(
    post,
    path = "/api/reset-password/",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "OTP inválido"),
        (status = 404, description = "E-mail não cadastrado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .reset_password(&payload.email, &payload.otp, &payload.new_password)
        .await?;
    Ok(message("Password reset successfully."))
}

// GET /api/profile/
#[utoipa::path(
    get,
    path = "/api/profile/",
    tag = "Profile",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// PUT/PATCH /api/profile/ (multipart, `image` opcional)
#[utoipa::path(
    put,
    path = "/api/profile/",
    tag = "Profile",
    request_body(content = ProfileUpdate, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Perfil atualizado", body = User),
        (status = 400, description = "Dados inválidos ou imagem acima de 5MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let mut form = read_multipart(multipart, "image").await?;

    let update = ProfileUpdate {
        name: form.take("name"),
        username: form.take("username"),
        address: form.take("address"),
        phone_number: form.take("phone_number"),
    };

    let updated = app_state.auth_service.update_profile(&user, update, form.file).await?;
    Ok(Json(updated))
}

// POST /api/change-password/
#[utoipa::path(
    post,
    path = "/api/change-password/",
    tag = "Profile",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada", body = MessageResponse),
        (status = 400, description = "Senhas não conferem")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.change_password(&user, &payload.new_password).await?;
    Ok(message("Password changed successfully."))
}
