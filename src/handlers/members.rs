use crate::handlers::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    entities::member,
    errors::ApiError,
    services::members::RegisterMemberInput,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn members_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_member))
        .route("/:id", get(get_member))
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = RegisterMemberRequest,
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "Members"
)]
pub async fn register_member(
    State(state): State<AppState>,
    Json(payload): Json<RegisterMemberRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = RegisterMemberInput {
        email: payload.email.trim().to_lowercase(),
        name: payload.name.trim().to_string(),
        address: payload.address,
        password: payload.password,
    };

    let member = state
        .services
        .members
        .register(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(MemberResponse::from(member)))
}

/// Get a member by ID
#[utoipa::path(
    get,
    path = "/api/v1/members/:id",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member retrieved", body = MemberResponse),
        (status = 404, description = "Member not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Members"
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let member = state
        .services
        .members
        .get_member(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(MemberResponse::from(member)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterMemberRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Plain-text password, hashed before storage
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<member::Model> for MemberResponse {
    fn from(model: member::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
        }
    }
}
