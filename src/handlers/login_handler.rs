//! Login Handler
//!
//! Verifies credentials and issues a bearer token.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::config::Config;
use crate::error::AppError;

use super::commands::require_field;
use super::{LoginCommand, LoginResult};

/// Handler for credential exchange
pub struct LoginHandler {
    pool: PgPool,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl LoginHandler {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Execute the login command
    pub async fn execute(&self, command: LoginCommand) -> Result<LoginResult, AppError> {
        let username = require_field(command.username.as_deref(), "username")?;
        let password = require_field(command.password.as_deref(), "password")?;

        let record: Option<(Uuid, String, String, String)> = sqlx::query_as(
            "SELECT id, username, name, password_hash FROM users WHERE username = $1",
        )
        .bind(&username)
        .fetch_optional(&self.pool)
        .await?;

        // Same error for unknown user and wrong password
        let (user_id, username, name, password_hash) =
            record.ok_or(AppError::InvalidCredentials)?;

        if !auth::verify_password(&password, &password_hash)? {
            tracing::warn!(username = %username, "Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        let token = auth::issue_token(user_id, &username, &self.jwt_secret, self.token_ttl_hours)?;

        tracing::info!(username = %username, "User logged in");

        Ok(LoginResult {
            token,
            username,
            name,
        })
    }
}
