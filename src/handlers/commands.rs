//! Command definitions
//!
//! Commands represent intentions to change the system state. Fields coming
//! from request bodies stay optional here; the handlers decide which are
//! required and answer with a 400 instead of a deserialization failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

// =========================================================================
// CreateUserCommand
// =========================================================================

/// Command to register a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

// =========================================================================
// LoginCommand
// =========================================================================

/// Command to exchange credentials for a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub username: Option<String>,
    pub password: Option<String>,
}

// =========================================================================
// CreateBlogCommand
// =========================================================================

/// Command to create a blog owned by an authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogCommand {
    /// Owner resolved from the bearer token, never from the body
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    /// Defaults to zero when omitted
    pub likes: Option<i32>,
}

// =========================================================================
// UpdateBlogCommand
// =========================================================================

/// Command for a partial blog update; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBlogCommand {
    pub blog_id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i32>,
}

// =========================================================================
// DeleteBlogCommand
// =========================================================================

/// Command to delete a blog on behalf of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBlogCommand {
    pub blog_id: Uuid,
    pub requested_by: Uuid,
}

// =========================================================================
// Results
// =========================================================================

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResult {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub username: String,
    pub name: String,
}

/// Owner info attached to a blog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogOwner {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// A blog row with its owner resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDetail {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i32,
    pub owner: Option<BlogOwner>,
}

// =========================================================================
// Field validation helpers
// =========================================================================

/// Require a non-empty string field, trimming surrounding whitespace.
pub(crate) fn require_field(value: Option<&str>, field: &'static str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::InvalidRequest(format!("{} is required", field))),
    }
}

/// Require a minimum character count for an already-present field.
pub(crate) fn require_min_length(
    value: &str,
    field: &'static str,
    min: usize,
) -> Result<(), AppError> {
    if value.chars().count() < min {
        return Err(AppError::InvalidRequest(format!(
            "{} must be at least {} chars",
            field, min
        )));
    }
    Ok(())
}

/// Reject negative like counts.
pub(crate) fn require_non_negative(likes: i32) -> Result<i32, AppError> {
    if likes < 0 {
        return Err(AppError::InvalidRequest(
            "likes must be non-negative".to_string(),
        ));
    }
    Ok(likes)
}
