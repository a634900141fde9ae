//! Domain model for the job board: entities and repository abstractions.

pub mod entities;
pub mod repositories;

pub use entities::{
    Job, JobFilter, JobSort, JobStatus, JobStatusCounts, JobType, MonthlyCount, User, UserRole,
};
pub use repositories::{CreateUser, JobRepository, UpdateProfile, UserRepository};
