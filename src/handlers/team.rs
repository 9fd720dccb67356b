// src/handlers/team.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::team::{CreateTeamMemberPayload, TeamMember, UpdateTeamMemberPayload},
};

// GET /api/teams/
#[utoipa::path(
    get,
    path = "/api/teams/",
    tag = "Team",
    responses((status = 200, description = "Membros da equipe", body = Vec<TeamMember>)),
    security(("api_jwt" = []))
)]
pub async fn list_members(State(app_state): State<AppState>) -> Result<Json<Vec<TeamMember>>, AppError> {
    Ok(Json(app_state.team_service.list().await?))
}

// POST /api/teams/
#[utoipa::path(
    post,
    path = "/api/teams/",
    tag = "Team",
    request_body = CreateTeamMemberPayload,
    responses(
        (status = 201, description = "Membro criado", body = TeamMember),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTeamMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    let member = app_state.team_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

// GET /api/teams/{id}/
#[utoipa::path(
    get,
    path = "/api/teams/{id}/",
    tag = "Team",
    params(("id" = i64, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Membro", body = TeamMember),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamMember>, AppError> {
    Ok(Json(app_state.team_service.get(id).await?))
}

// PUT/PATCH /api/teams/{id}/
#[utoipa::path(
    put,
    path = "/api/teams/{id}/",
    tag = "Team",
    params(("id" = i64, Path, description = "ID do membro")),
    request_body = UpdateTeamMemberPayload,
    responses(
        (status = 200, description = "Membro atualizado", body = TeamMember),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTeamMemberPayload>,
) -> Result<Json<TeamMember>, AppError> {
    Ok(Json(app_state.team_service.update(id, payload).await?))
}

// DELETE /api/teams/{id}/
#[utoipa::path(
    delete,
    path = "/api/teams/{id}/",
    tag = "Team",
    params(("id" = i64, Path, description = "ID do membro")),
    responses(
        (status = 204, description = "Membro removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.team_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
