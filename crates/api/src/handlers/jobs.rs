use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use jobboard_domain::entities::{
    Job, JobFilter, JobSort, JobStatus, JobStatusCounts, JobType, MonthlyCount,
};

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::response::{created, success, PaginatedResponse};
use crate::routes::AppState;
use crate::validation::job::{job_id_rules, job_input_rules, JobAccess};
use crate::validation::ValidationGate;

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Body for creating or replacing a job. Status and type arrive as raw
/// strings so that unknown values surface as validation messages instead
/// of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInput {
    pub company: String,
    pub position: String,
    pub job_location: String,
    pub job_status: String,
    pub job_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobQueryParams {
    pub search: Option<String>,
    pub job_status: Option<String>,
    pub job_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatsResponse {
    pub default_stats: JobStatusCounts,
    pub monthly_applications: Vec<MonthlyCount>,
}

pub async fn create_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<JobInput>,
) -> ApiResult<impl axum::response::IntoResponse> {
    ValidationGate::new(job_input_rules()).run(&body).await?;

    let (job_status, job_type) = parse_status_and_type(&body)?;
    let job = Job::new(
        body.company,
        body.position,
        body.job_location,
        job_status,
        job_type,
        user.user_id,
    );
    let job = state.jobs.create(&job).await?;

    info!(job_id = %job.id, user_id = %user.user_id, "job created");
    Ok(created(job))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<JobQueryParams>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let filter = JobFilter {
        created_by: Some(user.user_id),
        job_status: params
            .job_status
            .as_deref()
            .filter(|value| *value != "all")
            .and_then(JobStatus::parse),
        job_type: params
            .job_type
            .as_deref()
            .filter(|value| *value != "all")
            .and_then(JobType::parse),
        search: params.search,
        sort: params
            .sort
            .as_deref()
            .and_then(JobSort::parse)
            .unwrap_or_default(),
        limit: Some(page_size),
        offset: Some((page - 1) * page_size),
    };

    let total = state.jobs.count(&filter).await?;
    let jobs = state.jobs.list(&filter).await?;

    Ok(success(PaginatedResponse::new(jobs, total, page, page_size)))
}

pub async fn get_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let ctx = JobAccess {
        id,
        user,
        jobs: state.jobs.clone(),
    };
    ValidationGate::new(job_id_rules()).run(&ctx).await?;

    let job = fetch_job(&state, &ctx.id).await?;
    Ok(success(job))
}

pub async fn update_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<JobInput>,
) -> ApiResult<impl axum::response::IntoResponse> {
    ValidationGate::new(job_input_rules()).run(&body).await?;

    let ctx = JobAccess {
        id,
        user,
        jobs: state.jobs.clone(),
    };
    ValidationGate::new(job_id_rules()).run(&ctx).await?;

    let (job_status, job_type) = parse_status_and_type(&body)?;
    let mut job = fetch_job(&state, &ctx.id).await?;
    job.company = body.company;
    job.position = body.position;
    job.job_location = body.job_location;
    job.job_status = job_status;
    job.job_type = job_type;

    let job = state.jobs.update(&job).await?;
    info!(job_id = %job.id, "job updated");
    Ok(success(job))
}

pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let ctx = JobAccess {
        id,
        user,
        jobs: state.jobs.clone(),
    };
    ValidationGate::new(job_id_rules()).run(&ctx).await?;

    let job = fetch_job(&state, &ctx.id).await?;
    state.jobs.delete(job.id).await?;

    info!(job_id = %job.id, "job deleted");
    Ok(success(job))
}

pub async fn job_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    let default_stats = state.jobs.status_counts(user.user_id).await?;
    let monthly_applications = state.jobs.monthly_counts(user.user_id, 6).await?;

    Ok(success(JobStatsResponse {
        default_stats,
        monthly_applications,
    }))
}

fn parse_status_and_type(body: &JobInput) -> ApiResult<(JobStatus, JobType)> {
    let job_status = JobStatus::parse(&body.job_status)
        .ok_or_else(|| ApiError::BadRequest(vec!["Invalid status value".to_string()]))?;
    let job_type = JobType::parse(&body.job_type)
        .ok_or_else(|| ApiError::BadRequest(vec!["Invalid type value".to_string()]))?;
    Ok((job_status, job_type))
}

/// Refetch after the id gate has passed; the record can only be missing
/// if it was deleted in between, which reads as not-found again.
async fn fetch_job(state: &AppState, id: &str) -> ApiResult<Job> {
    let parsed = uuid::Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest(vec!["Invalid Id".to_string()]))?;
    state
        .jobs
        .find_by_id(parsed)
        .await?
        .ok_or_else(|| ApiError::NotFound(vec![format!("No job exists for given id {id}")]))
}
