//! Blog Update Handler

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::RequestContext;
use crate::error::AppError;

use super::commands::require_non_negative;
use super::{BlogDetail, BlogOwner, UpdateBlogCommand};

/// Handler for partial blog updates
pub struct UpdateBlogHandler {
    pool: PgPool,
}

impl UpdateBlogHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the update blog command
    pub async fn execute(
        &self,
        command: UpdateBlogCommand,
        context: &RequestContext,
    ) -> Result<BlogDetail, AppError> {
        // Provided fields must still be valid; absent ones stay untouched
        if let Some(likes) = command.likes {
            require_non_negative(likes)?;
        }
        for (value, field) in [
            (&command.title, "title"),
            (&command.author, "author"),
            (&command.url, "url"),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    return Err(AppError::InvalidRequest(format!(
                        "{} must not be empty",
                        field
                    )));
                }
            }
        }

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM blogs WHERE id = $1")
            .bind(command.blog_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(AppError::BlogNotFound(command.blog_id.to_string()));
        }

        sqlx::query(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                url = COALESCE($4, url),
                likes = COALESCE($5, likes),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(command.blog_id)
        .bind(command.title.as_deref().map(str::trim))
        .bind(command.author.as_deref().map(str::trim))
        .bind(command.url.as_deref().map(str::trim))
        .bind(command.likes)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            blog_id = %command.blog_id,
            correlation_id = ?context.correlation_id,
            "Blog updated"
        );

        // Return the fresh row with owner info
        let row: Option<(Uuid, String, String, String, i32, Option<Uuid>, Option<String>, Option<String>)> =
            sqlx::query_as(
                r#"
                SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, u.username, u.name
                FROM blogs b
                LEFT JOIN users u ON u.id = b.user_id
                WHERE b.id = $1
                "#,
            )
            .bind(command.blog_id)
            .fetch_optional(&self.pool)
            .await?;

        let (id, title, author, url, likes, user_id, username, name) =
            row.ok_or_else(|| AppError::BlogNotFound(command.blog_id.to_string()))?;

        Ok(BlogDetail {
            id,
            title,
            author,
            url,
            likes,
            owner: match (user_id, username, name) {
                (Some(id), Some(username), Some(name)) => Some(BlogOwner {
                    id,
                    username,
                    name,
                }),
                _ => None,
            },
        })
    }
}
