use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use jobboard_domain::repositories::{JobRepository, UserRepository};

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers::{
    auth::{login, logout, register},
    health::health_check,
    jobs::{create_job, delete_job, get_job, job_stats, list_jobs, update_job},
    users::{app_stats, current_user, update_user},
};

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<AuthConfig>,
}

pub fn create_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route("/api/jobs/stats", get(job_stats))
        .route(
            "/api/jobs/{id}",
            get(get_job).patch(update_job).delete(delete_job),
        )
        .route("/api/users/current-user", get(current_user))
        .route("/api/users/update-user", patch(update_user))
        .route("/api/users/admin/app-stats", get(app_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", get(logout))
        .merge(protected)
        .with_state(state)
}
