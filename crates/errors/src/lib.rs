use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JobBoardError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database operation error: {0}")]
    DatabaseOperation(String),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("job not found: {id}")]
    JobNotFound { id: Uuid },
    #[error("user not found: {id}")]
    UserNotFound { id: Uuid },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing error: {0}")]
    PasswordHash(String),
    #[error("data validation failed: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type JobBoardResult<T> = Result<T, JobBoardError>;

impl JobBoardError {
    pub fn database_error<S: Into<String>>(msg: S) -> Self {
        Self::DatabaseOperation(msg.into())
    }
    pub fn job_not_found(id: Uuid) -> Self {
        Self::JobNotFound { id }
    }
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Errors that indicate a broken deployment rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            JobBoardError::Configuration(_) | JobBoardError::Migration(_)
        )
    }
}
