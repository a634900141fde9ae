use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use jobboard_domain::entities::UserRole;
use jobboard_domain::repositories::CreateUser;

use crate::auth::{AuthError, JwtService};
use crate::error::{ApiError, ApiResult};
use crate::handlers::users::UserResponse;
use crate::response::{created, ApiResponse};
use crate::routes::AppState;
use crate::validation::user::{login_rules, register_rules, RegisterAccess};
use crate::validation::ValidationGate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let ctx = RegisterAccess {
        body,
        users: state.users.clone(),
    };
    ValidationGate::new(register_rules()).run(&ctx).await?;

    // The very first account gets the admin role.
    let role = if state.users.count().await? == 0 {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let user = state
        .users
        .create(&CreateUser {
            name: ctx.body.name.clone(),
            last_name: ctx.body.last_name.clone(),
            email: ctx.body.email.clone(),
            password: ctx.body.password.clone(),
            location: ctx.body.location.clone(),
            role,
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok(created(UserResponse::from(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    ValidationGate::new(login_rules()).run(&body).await?;

    let user = state
        .users
        .verify_credentials(&body.email, &body.password)
        .await?
        .ok_or(ApiError::Authentication(AuthError::InvalidCredentials))?;

    let jwt_service = JwtService::new(&state.auth);
    let access_token = jwt_service
        .generate_token(user.id, user.role)
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))?;

    info!(user_id = %user.id, "user logged in");

    let response = LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.jwt_expiration_hours * 3600,
        user: UserResponse::from(user),
    };
    Ok(Json(ApiResponse::success(response)))
}

pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success_empty_with_message(
        "user logged out".to_string(),
    ))
}
