pub mod postgres_job_repository;
pub mod postgres_user_repository;

pub use postgres_job_repository::PostgresJobRepository;
pub use postgres_user_repository::PostgresUserRepository;
