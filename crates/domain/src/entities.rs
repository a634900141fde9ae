use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub job_status: JobStatus,
    pub job_type: JobType,
    pub job_location: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "interview")]
    Interview,
    #[serde(rename = "declined")]
    Declined,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(JobStatus::Pending),
            "interview" => Some(JobStatus::Interview),
            "declined" => Some(JobStatus::Declined),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JobType {
    #[default]
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
    #[serde(rename = "internship")]
    Internship,
}

impl JobType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "full-time" => Some(JobType::FullTime),
            "part-time" => Some(JobType::PartTime),
            "internship" => Some(JobType::Internship),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Internship => "internship",
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for JobStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for JobStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        JobStatus::parse(s).ok_or_else(|| format!("Invalid job status: {s}").into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for JobStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

impl sqlx::Type<sqlx::Postgres> for JobType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for JobType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        JobType::parse(s).ok_or_else(|| format!("Invalid job type: {s}").into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for JobType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

/// Sort order for job listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
    ReverseAlphabetical,
}

impl JobSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(JobSort::Newest),
            "oldest" => Some(JobSort::Oldest),
            "a-z" => Some(JobSort::Alphabetical),
            "z-a" => Some(JobSort::ReverseAlphabetical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub created_by: Option<Uuid>,
    pub job_status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    /// Free-text match against company or position.
    pub search: Option<String>,
    pub sort: JobSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct JobStatusCounts {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCount {
    pub date: String,
    pub count: i64,
}

impl Job {
    pub fn new(
        company: String,
        position: String,
        job_location: String,
        job_status: JobStatus,
        job_type: JobType,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company,
            position,
            job_status,
            job_type,
            job_location,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub location: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UserRole {
    #[default]
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        UserRole::parse(s).ok_or_else(|| format!("Invalid user role: {s}").into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for UserRole {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_round_trip() {
        for status in [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("open"), None);
        assert_eq!(JobStatus::parse(""), None);
    }

    #[test]
    fn test_job_type_round_trip() {
        for job_type in [JobType::FullTime, JobType::PartTime, JobType::Internship] {
            assert_eq!(JobType::parse(job_type.as_str()), Some(job_type));
        }
        assert_eq!(JobType::parse("contract"), None);
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let job = Job::new(
            "acme".to_string(),
            "engineer".to_string(),
            "berlin".to_string(),
            JobStatus::Pending,
            JobType::FullTime,
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["jobStatus"], "pending");
        assert_eq!(json["jobType"], "full-time");
        assert!(json["jobLocation"].is_string());
        assert!(json["createdBy"].is_string());
    }

    #[test]
    fn test_job_ownership() {
        let owner = Uuid::new_v4();
        let job = Job::new(
            "acme".to_string(),
            "engineer".to_string(),
            "berlin".to_string(),
            JobStatus::Pending,
            JobType::FullTime,
            owner,
        );
        assert!(job.is_owned_by(owner));
        assert!(!job.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(JobSort::parse("newest"), Some(JobSort::Newest));
        assert_eq!(JobSort::parse("a-z"), Some(JobSort::Alphabetical));
        assert_eq!(JobSort::parse("latest"), None);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("user"), Some(UserRole::User));
        assert_eq!(UserRole::parse("root"), None);
    }
}
