use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use jobboard_domain::entities::{
    Job, JobFilter, JobSort, JobStatus, JobStatusCounts, JobType, MonthlyCount,
};
use jobboard_domain::repositories::JobRepository;
use jobboard_errors::JobBoardResult;

const JOB_COLUMNS: &str =
    "id, company, position, job_status, job_type, job_location, created_by, created_at, updated_at";

pub struct PostgresJobRepository {
    pool: PgPool,
}

/// Bind values for a dynamically assembled job query, in placeholder order.
#[derive(Debug, PartialEq)]
enum JobQueryParam {
    Id(Uuid),
    Status(JobStatus),
    JobType(JobType),
    Text(String),
    Int(i64),
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_job(row: &sqlx::postgres::PgRow) -> JobBoardResult<Job> {
        Ok(Job {
            id: row.try_get("id")?,
            company: row.try_get("company")?,
            position: row.try_get("position")?,
            job_status: row.try_get("job_status")?,
            job_type: row.try_get("job_type")?,
            job_location: row.try_get("job_location")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn build_filtered_query(
        select: &str,
        filter: &JobFilter,
        with_ordering: bool,
    ) -> (String, Vec<JobQueryParam>) {
        let mut sql = format!("SELECT {select} FROM jobs");
        let mut params = Vec::new();
        let mut clauses = Vec::new();

        if let Some(created_by) = filter.created_by {
            params.push(JobQueryParam::Id(created_by));
            clauses.push(format!("created_by = ${}", params.len()));
        }
        if let Some(status) = filter.job_status {
            params.push(JobQueryParam::Status(status));
            clauses.push(format!("job_status = ${}", params.len()));
        }
        if let Some(job_type) = filter.job_type {
            params.push(JobQueryParam::JobType(job_type));
            clauses.push(format!("job_type = ${}", params.len()));
        }
        if let Some(search) = filter.search.as_deref() {
            if !search.is_empty() {
                params.push(JobQueryParam::Text(format!("%{search}%")));
                let n = params.len();
                clauses.push(format!("(company ILIKE ${n} OR position ILIKE ${n})"));
            }
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if with_ordering {
            sql.push_str(match filter.sort {
                JobSort::Newest => " ORDER BY created_at DESC",
                JobSort::Oldest => " ORDER BY created_at ASC",
                JobSort::Alphabetical => " ORDER BY position ASC",
                JobSort::ReverseAlphabetical => " ORDER BY position DESC",
            });
            if let Some(limit) = filter.limit {
                params.push(JobQueryParam::Int(limit));
                sql.push_str(&format!(" LIMIT ${}", params.len()));
            }
            if let Some(offset) = filter.offset {
                params.push(JobQueryParam::Int(offset));
                sql.push_str(&format!(" OFFSET ${}", params.len()));
            }
        }

        (sql, params)
    }

    fn bind_params<'q>(
        mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
        params: Vec<JobQueryParam>,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        for param in params {
            query = match param {
                JobQueryParam::Id(id) => query.bind(id),
                JobQueryParam::Status(status) => query.bind(status),
                JobQueryParam::JobType(job_type) => query.bind(job_type),
                JobQueryParam::Text(text) => query.bind(text),
                JobQueryParam::Int(value) => query.bind(value),
            };
        }
        query
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id, company = %job.company))]
    async fn create(&self, job: &Job) -> JobBoardResult<Job> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO jobs (id, company, position, job_status, job_type, job_location, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {JOB_COLUMNS}
            "#,
        ))
        .bind(job.id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.job_status)
        .bind(job.job_type)
        .bind(&job.job_location)
        .bind(job.created_by)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await?;

        let created = Self::row_to_job(&row)?;
        debug!(job_id = %created.id, "job created");
        Ok(created)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_job).transpose()
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &JobFilter) -> JobBoardResult<Vec<Job>> {
        let (sql, params) = Self::build_filtered_query(JOB_COLUMNS, filter, true);
        let rows = Self::bind_params(sqlx::query(&sql), params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_job).collect()
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &JobFilter) -> JobBoardResult<i64> {
        let (sql, params) = Self::build_filtered_query("COUNT(*) AS count", filter, false);
        let row = Self::bind_params(sqlx::query(&sql), params)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }

    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn update(&self, job: &Job) -> JobBoardResult<Job> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE jobs
            SET company = $2, position = $3, job_status = $4, job_type = $5, job_location = $6, updated_at = $7
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#,
        ))
        .bind(job.id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.job_status)
        .bind(job.job_type)
        .bind(&job.job_location)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_job(&row)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn delete(&self, id: Uuid) -> JobBoardResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(user_id = %created_by))]
    async fn status_counts(&self, created_by: Uuid) -> JobBoardResult<JobStatusCounts> {
        let rows = sqlx::query(
            "SELECT job_status, COUNT(*) AS count FROM jobs WHERE created_by = $1 GROUP BY job_status",
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = JobStatusCounts::default();
        for row in &rows {
            let status: JobStatus = row.try_get("job_status")?;
            let count: i64 = row.try_get("count")?;
            match status {
                JobStatus::Pending => counts.pending = count,
                JobStatus::Interview => counts.interview = count,
                JobStatus::Declined => counts.declined = count,
            }
        }
        Ok(counts)
    }

    #[instrument(skip(self), fields(user_id = %created_by))]
    async fn monthly_counts(
        &self,
        created_by: Uuid,
        months: i64,
    ) -> JobBoardResult<Vec<MonthlyCount>> {
        let rows = sqlx::query(
            r#"
            SELECT to_char(date_trunc('month', created_at), 'Mon YY') AS month, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY date_trunc('month', created_at)
            ORDER BY date_trunc('month', created_at) DESC
            LIMIT $2
            "#,
        )
        .bind(created_by)
        .bind(months)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = rows
            .iter()
            .map(|row| {
                Ok(MonthlyCount {
                    date: row.try_get("month")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<JobBoardResult<Vec<_>>>()?;

        // Query returns newest-first so the LIMIT keeps recent months.
        counts.reverse();
        Ok(counts)
    }
}
