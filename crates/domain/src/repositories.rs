//! Data access abstractions, kept free of any storage specifics.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Job, JobFilter, JobStatusCounts, MonthlyCount, User, UserRole};
use jobboard_errors::JobBoardResult;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> JobBoardResult<Job>;
    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<Job>>;
    async fn list(&self, filter: &JobFilter) -> JobBoardResult<Vec<Job>>;
    async fn count(&self, filter: &JobFilter) -> JobBoardResult<i64>;
    async fn update(&self, job: &Job) -> JobBoardResult<Job>;
    async fn delete(&self, id: Uuid) -> JobBoardResult<bool>;
    async fn status_counts(&self, created_by: Uuid) -> JobBoardResult<JobStatusCounts>;
    /// Applications per calendar month, oldest first, at most `months` entries.
    async fn monthly_counts(&self, created_by: Uuid, months: i64)
        -> JobBoardResult<Vec<MonthlyCount>>;
}

/// Payload for registering a new user; the repository owns password hashing.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    pub role: UserRole,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, request: &CreateUser) -> JobBoardResult<User>;
    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> JobBoardResult<Option<User>>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfile,
    ) -> JobBoardResult<Option<User>>;
    async fn count(&self) -> JobBoardResult<i64>;
    /// Look up by email and check the password against the stored hash.
    async fn verify_credentials(&self, email: &str, password: &str)
        -> JobBoardResult<Option<User>>;
}
