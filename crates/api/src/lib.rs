//! # Job board API
//!
//! REST surface for the job board: job CRUD, registration, login and
//! profile management, built on Axum over repository traits.
//!
//! Request bodies and route parameters pass through a validation gate
//! before any handler logic runs; a failed gate short-circuits the
//! request with a categorized error (not found / unauthorized / bad
//! request). See [`validation`].
//!
//! ## Endpoints
//!
//! - `GET /health`
//! - `POST /api/auth/register`, `POST /api/auth/login`, `GET /api/auth/logout`
//! - `GET|POST /api/jobs`, `GET /api/jobs/stats`,
//!   `GET|PATCH|DELETE /api/jobs/{id}`
//! - `GET /api/users/current-user`, `PATCH /api/users/update-user`,
//!   `GET /api/users/admin/app-stats`
//!
//! Everything under `/api/jobs` and `/api/users` requires a Bearer token
//! issued by the login endpoint.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use jobboard_domain::repositories::{JobRepository, UserRepository};

use auth::AuthConfig;
use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// Assemble the full application router with tracing, CORS and request
/// logging applied.
pub fn create_app(
    jobs: Arc<dyn JobRepository>,
    users: Arc<dyn UserRepository>,
    auth_config: AuthConfig,
) -> Router {
    let state = AppState {
        jobs,
        users,
        auth: Arc::new(auth_config),
    };

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(cors_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
