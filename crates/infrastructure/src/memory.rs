//! In-memory repositories backed by a `HashMap`. Used by the API test
//! suite and for running the server without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use jobboard_domain::entities::{Job, JobFilter, JobSort, JobStatusCounts, MonthlyCount, User};
use jobboard_domain::repositories::{
    CreateUser, JobRepository, UpdateProfile, UserRepository,
};
use jobboard_errors::{JobBoardError, JobBoardResult};

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(job: &Job, filter: &JobFilter) -> bool {
        if let Some(created_by) = filter.created_by {
            if job.created_by != created_by {
                return false;
            }
        }
        if let Some(status) = filter.job_status {
            if job.job_status != status {
                return false;
            }
        }
        if let Some(job_type) = filter.job_type {
            if job.job_type != job_type {
                return false;
            }
        }
        if let Some(search) = filter.search.as_deref() {
            if !search.is_empty() {
                let needle = search.to_lowercase();
                if !job.company.to_lowercase().contains(&needle)
                    && !job.position.to_lowercase().contains(&needle)
                {
                    return false;
                }
            }
        }
        true
    }

    fn sort(jobs: &mut [Job], sort: JobSort) {
        match sort {
            JobSort::Newest => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            JobSort::Oldest => jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            JobSort::Alphabetical => jobs.sort_by(|a, b| a.position.cmp(&b.position)),
            JobSort::ReverseAlphabetical => jobs.sort_by(|a, b| b.position.cmp(&a.position)),
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> JobBoardResult<Job> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> JobBoardResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|job| Self::matches(job, filter))
            .cloned()
            .collect();
        Self::sort(&mut matching, filter.sort);

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let matching = matching.into_iter().skip(offset);
        Ok(match filter.limit {
            Some(limit) => matching.take(limit.max(0) as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&self, filter: &JobFilter) -> JobBoardResult<i64> {
        let jobs = self.jobs.read().await;
        Ok(jobs.values().filter(|job| Self::matches(job, filter)).count() as i64)
    }

    async fn update(&self, job: &Job) -> JobBoardResult<Job> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&job.id)
            .ok_or_else(|| JobBoardError::job_not_found(job.id))?;
        *entry = Job {
            updated_at: Utc::now(),
            ..job.clone()
        };
        Ok(entry.clone())
    }

    async fn delete(&self, id: Uuid) -> JobBoardResult<bool> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.remove(&id).is_some())
    }

    async fn status_counts(&self, created_by: Uuid) -> JobBoardResult<JobStatusCounts> {
        let jobs = self.jobs.read().await;
        let mut counts = JobStatusCounts::default();
        for job in jobs.values().filter(|job| job.created_by == created_by) {
            match job.job_status {
                jobboard_domain::entities::JobStatus::Pending => counts.pending += 1,
                jobboard_domain::entities::JobStatus::Interview => counts.interview += 1,
                jobboard_domain::entities::JobStatus::Declined => counts.declined += 1,
            }
        }
        Ok(counts)
    }

    async fn monthly_counts(
        &self,
        created_by: Uuid,
        months: i64,
    ) -> JobBoardResult<Vec<MonthlyCount>> {
        let jobs = self.jobs.read().await;
        let mut by_month: HashMap<(i32, u32), i64> = HashMap::new();
        for job in jobs.values().filter(|job| job.created_by == created_by) {
            *by_month
                .entry((job.created_at.year(), job.created_at.month()))
                .or_default() += 1;
        }

        let mut keyed: Vec<((i32, u32), i64)> = by_month.into_iter().collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed.truncate(months.max(0) as usize);
        keyed.reverse();

        Ok(keyed
            .into_iter()
            .map(|((year, month), count)| MonthlyCount {
                date: format!(
                    "{} {:02}",
                    month_abbreviation(month),
                    year.rem_euclid(100)
                ),
                count,
            })
            .collect())
    }
}

fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, request: &CreateUser) -> JobBoardResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|user| user.email == request.email)
        {
            return Err(JobBoardError::validation_error("Email already exists"));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| JobBoardError::PasswordHash(e.to_string()))?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            password_hash,
            location: request.location.clone(),
            role: request.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> JobBoardResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfile,
    ) -> JobBoardResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.name = changes.name.clone();
        user.last_name = changes.last_name.clone();
        user.email = changes.email.clone();
        user.location = changes.location.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn count(&self) -> JobBoardResult<i64> {
        let users = self.users.read().await;
        Ok(users.len() as i64)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> JobBoardResult<Option<User>> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if bcrypt::verify(password, &user.password_hash).unwrap_or(false) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_domain::entities::{JobStatus, JobType, UserRole};

    fn sample_job(created_by: Uuid, position: &str, status: JobStatus) -> Job {
        Job::new(
            "acme".to_string(),
            position.to_string(),
            "berlin".to_string(),
            status,
            JobType::FullTime,
            created_by,
        )
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_status() {
        let repo = InMemoryJobRepository::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        repo.create(&sample_job(owner, "backend", JobStatus::Pending))
            .await
            .unwrap();
        repo.create(&sample_job(owner, "frontend", JobStatus::Interview))
            .await
            .unwrap();
        repo.create(&sample_job(other, "devops", JobStatus::Pending))
            .await
            .unwrap();

        let filter = JobFilter {
            created_by: Some(owner),
            job_status: Some(JobStatus::Pending),
            ..JobFilter::default()
        };
        let jobs = repo.list(&filter).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].position, "backend");
        assert_eq!(repo.count(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_company_or_position() {
        let repo = InMemoryJobRepository::new();
        let owner = Uuid::new_v4();
        repo.create(&sample_job(owner, "Backend Engineer", JobStatus::Pending))
            .await
            .unwrap();

        let filter = JobFilter {
            search: Some("backend".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(repo.list(&filter).await.unwrap().len(), 1);

        let filter = JobFilter {
            search: Some("warehouse".to_string()),
            ..JobFilter::default()
        };
        assert!(repo.list(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_counts_scoped_to_owner() {
        let repo = InMemoryJobRepository::new();
        let owner = Uuid::new_v4();
        repo.create(&sample_job(owner, "a", JobStatus::Pending))
            .await
            .unwrap();
        repo.create(&sample_job(owner, "b", JobStatus::Declined))
            .await
            .unwrap();
        repo.create(&sample_job(Uuid::new_v4(), "c", JobStatus::Pending))
            .await
            .unwrap();

        let counts = repo.status_counts(owner).await.unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.interview, 0);
        assert_eq!(counts.declined, 1);
    }

    #[tokio::test]
    async fn test_user_create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        let request = CreateUser {
            name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "enginepass".to_string(),
            location: "London".to_string(),
            role: UserRole::User,
        };
        repo.create(&request).await.unwrap();
        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, JobBoardError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let repo = InMemoryUserRepository::new();
        let request = CreateUser {
            name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "enginepass".to_string(),
            location: "London".to_string(),
            role: UserRole::User,
        };
        repo.create(&request).await.unwrap();

        let user = repo
            .verify_credentials("ada@example.com", "enginepass")
            .await
            .unwrap();
        assert!(user.is_some());

        let user = repo
            .verify_credentials("ada@example.com", "wrongpass")
            .await
            .unwrap();
        assert!(user.is_none());

        let user = repo
            .verify_credentials("nobody@example.com", "enginepass")
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
