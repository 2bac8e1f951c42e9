//! User Registration Handler
//!
//! Handles user creation with password hashing.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::domain::RequestContext;
use crate::error::AppError;

use super::commands::{require_field, require_min_length};
use super::{CreateUserCommand, CreateUserResult};

/// Handler for user registration
pub struct CreateUserHandler {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl CreateUserHandler {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Execute the create user command
    pub async fn execute(
        &self,
        command: CreateUserCommand,
        context: &RequestContext,
    ) -> Result<CreateUserResult, AppError> {
        let username = require_field(command.username.as_deref(), "username")?;
        require_min_length(&username, "username", 3)?;

        let password = require_field(command.password.as_deref(), "password")?;
        require_min_length(&password, "password", 3)?;

        let name = command.name.unwrap_or_default().trim().to_string();

        // Check for an existing username before paying for the hash
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(&username)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            return Err(AppError::UsernameTaken(username));
        }

        let password_hash = auth::hash_password(&password, self.bcrypt_cost)?;

        let user_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            "#,
        )
        .bind(user_id)
        .bind(&username)
        .bind(&name)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        // The pre-check races with concurrent registrations; the unique
        // constraint is the authority
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::UsernameTaken(username.clone())
            }
            _ => AppError::Database(e),
        })?;

        tracing::info!(
            username = %username,
            correlation_id = ?context.correlation_id,
            "User registered"
        );

        Ok(CreateUserResult {
            id: user_id,
            username,
            name,
        })
    }
}
