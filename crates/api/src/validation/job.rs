//! Rule sets for the job endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use jobboard_domain::entities::{JobStatus, JobType};
use jobboard_domain::repositories::JobRepository;
use jobboard_errors::JobBoardResult;

use crate::auth::AuthenticatedUser;
use crate::handlers::jobs::JobInput;

use super::gate::{FieldRule, OneOf, Required, Violation};

pub fn job_input_rules() -> Vec<Box<dyn FieldRule<JobInput>>> {
    vec![
        Box::new(Required::new(
            "company",
            |job: &JobInput| job.company.as_str(),
            "Company is required",
        )),
        Box::new(Required::new(
            "position",
            |job: &JobInput| job.position.as_str(),
            "Position is required",
        )),
        Box::new(Required::new(
            "jobLocation",
            |job: &JobInput| job.job_location.as_str(),
            "Job Location is required",
        )),
        Box::new(OneOf::new(
            "jobStatus",
            |job: &JobInput| job.job_status.as_str(),
            |value| JobStatus::parse(value).is_some(),
            "Invalid status value",
        )),
        Box::new(OneOf::new(
            "jobType",
            |job: &JobInput| job.job_type.as_str(),
            |value| JobType::parse(value).is_some(),
            "Invalid type value",
        )),
    ]
}

/// Context for validating the `{id}` route parameter: the raw parameter,
/// the requester and the job store.
pub struct JobAccess {
    pub id: String,
    pub user: AuthenticatedUser,
    pub jobs: Arc<dyn JobRepository>,
}

/// Composite check on the id parameter. Stages short-circuit: a
/// malformed id is never looked up, a missing record is never subjected
/// to the ownership check.
pub struct JobExistsAndOwned;

#[async_trait]
impl FieldRule<JobAccess> for JobExistsAndOwned {
    async fn check(&self, ctx: &JobAccess) -> JobBoardResult<Option<Violation>> {
        let Ok(id) = Uuid::parse_str(&ctx.id) else {
            return Ok(Some(Violation::bad_request("id", "Invalid Id")));
        };

        let Some(job) = ctx.jobs.find_by_id(id).await? else {
            return Ok(Some(Violation::not_found(
                "id",
                format!("No job exists for given id {}", ctx.id),
            )));
        };

        let is_admin = ctx.user.is_admin();
        let is_owner = job.is_owned_by(ctx.user.user_id);
        if !is_admin && !is_owner {
            return Ok(Some(Violation::unauthorized(
                "id",
                "Not authorized to access this route",
            )));
        }

        Ok(None)
    }
}

pub fn job_id_rules() -> Vec<Box<dyn FieldRule<JobAccess>>> {
    vec![Box::new(JobExistsAndOwned)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::gate::ValidationGate;
    use jobboard_domain::entities::UserRole;

    fn valid_input() -> JobInput {
        JobInput {
            company: "acme".to_string(),
            position: "engineer".to_string(),
            job_location: "berlin".to_string(),
            job_status: "pending".to_string(),
            job_type: "full-time".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_job_input_passes() {
        let gate = ValidationGate::new(job_input_rules());
        assert!(gate.run(&valid_input()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_input_reports_every_field() {
        let gate = ValidationGate::new(job_input_rules());
        let result = gate.run(&JobInput::default()).await;
        match result {
            Err(crate::error::ApiError::BadRequest(messages)) => {
                assert_eq!(
                    messages,
                    vec![
                        "Company is required",
                        "Position is required",
                        "Job Location is required",
                        "Invalid status value",
                        "Invalid type value",
                    ]
                );
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let gate = ValidationGate::new(job_input_rules());
        let mut input = valid_input();
        input.job_status = "ghosted".to_string();
        let result = gate.run(&input).await;
        match result {
            Err(crate::error::ApiError::BadRequest(messages)) => {
                assert_eq!(messages, vec!["Invalid status value"]);
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let jobs = Arc::new(jobboard_infrastructure::memory::InMemoryJobRepository::new());
        let ctx = JobAccess {
            id: "not-a-uuid".to_string(),
            user: AuthenticatedUser {
                user_id: Uuid::new_v4(),
                role: UserRole::User,
            },
            jobs,
        };
        let violation = JobExistsAndOwned.check(&ctx).await.unwrap().unwrap();
        assert_eq!(violation.message, "Invalid Id");
    }
}
