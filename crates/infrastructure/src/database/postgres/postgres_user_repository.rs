use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use jobboard_domain::entities::User;
use jobboard_domain::repositories::{CreateUser, UpdateProfile, UserRepository};
use jobboard_errors::{JobBoardError, JobBoardResult};

const USER_COLUMNS: &str =
    "id, name, last_name, email, password_hash, location, role, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn hash_password(password: &str) -> JobBoardResult<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| JobBoardError::PasswordHash(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> JobBoardResult<User> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            location: row.try_get("location")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn map_unique_violation(err: sqlx::Error) -> JobBoardError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.constraint().is_some_and(|c| c.contains("email")) {
                return JobBoardError::validation_error("Email already exists");
            }
        }
        JobBoardError::Database(err)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn create(&self, request: &CreateUser) -> JobBoardResult<User> {
        let password_hash = Self::hash_password(&request.password)?;
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, name, last_name, email, password_hash, location, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.location)
        .bind(request.role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;

        let user = Self::row_to_user(&row)?;
        debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> JobBoardResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> JobBoardResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self, changes), fields(user_id = %id))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfile,
    ) -> JobBoardResult<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = $2, last_name = $3, email = $4, location = $5, updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.location)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> JobBoardResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }

    #[instrument(skip(self, email, password))]
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> JobBoardResult<Option<User>> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if Self::verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = PostgresUserRepository::hash_password("hunter2secret").unwrap();
        assert_ne!(hash, "hunter2secret");
        assert!(PostgresUserRepository::verify_password("hunter2secret", &hash));
        assert!(!PostgresUserRepository::verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!PostgresUserRepository::verify_password("pw", "not-a-hash"));
    }
}
