use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use jobboard_domain::entities::{JobFilter, User, UserRole};
use jobboard_domain::repositories::UpdateProfile;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::response::success;
use crate::routes::AppState;
use crate::validation::user::{update_user_rules, ProfileUpdateAccess};
use crate::validation::ValidationGate;

/// Public view of a user; never exposes the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            location: user.location,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserInput {
    pub name: String,
    pub email: String,
    pub location: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct AppStatsResponse {
    pub users: i64,
    pub jobs: i64,
}

pub async fn current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    let user = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("authenticated user no longer exists".to_string()))?;

    Ok(success(UserResponse::from(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateUserInput>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let ctx = ProfileUpdateAccess {
        body,
        user_id: user.user_id,
        users: state.users.clone(),
    };
    ValidationGate::new(update_user_rules()).run(&ctx).await?;

    let updated = state
        .users
        .update_profile(
            user.user_id,
            &UpdateProfile {
                name: ctx.body.name.clone(),
                last_name: ctx.body.last_name.clone(),
                email: ctx.body.email.clone(),
                location: ctx.body.location.clone(),
            },
        )
        .await?
        .ok_or_else(|| ApiError::Internal("authenticated user no longer exists".to_string()))?;

    info!(user_id = %updated.id, "user profile updated");
    Ok(success(UserResponse::from(updated)))
}

pub async fn app_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    user.require_admin()?;

    let users = state.users.count().await?;
    let jobs = state.jobs.count(&JobFilter::default()).await?;

    Ok(success(AppStatsResponse { users, jobs }))
}
