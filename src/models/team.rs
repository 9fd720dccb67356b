// src/models/team.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::nullable::deserialize_some;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamMember {
    pub id: i64,
    #[schema(example = "Anita Rao")]
    pub name: String,
    #[schema(example = "Sales Engineer")]
    pub designation: String,
    #[schema(example = "anita@example.com")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamMemberPayload {
    #[validate(length(min = 1, max = 100, message = "Name must have 1 to 100 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Designation must have 1 to 100 characters."))]
    pub designation: String,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeamMemberPayload {
    #[validate(length(min = 1, max = 100, message = "Name must have 1 to 100 characters."))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Designation must have 1 to 100 characters."))]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
}
