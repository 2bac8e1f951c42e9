//! Blog Creation Handler

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::RequestContext;
use crate::error::AppError;

use super::commands::{require_field, require_non_negative};
use super::{BlogDetail, BlogOwner, CreateBlogCommand};

/// Handler for blog creation
pub struct CreateBlogHandler {
    pool: PgPool,
}

impl CreateBlogHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the create blog command
    pub async fn execute(
        &self,
        command: CreateBlogCommand,
        context: &RequestContext,
    ) -> Result<BlogDetail, AppError> {
        let title = require_field(command.title.as_deref(), "title")?;
        let author = require_field(command.author.as_deref(), "author")?;
        let url = require_field(command.url.as_deref(), "url")?;
        let likes = require_non_negative(command.likes.unwrap_or(0))?;

        // The middleware resolved this user moments ago; tolerate a
        // concurrent removal
        let owner: Option<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, username, name FROM users WHERE id = $1")
                .bind(command.owner_id)
                .fetch_optional(&self.pool)
                .await?;

        let (owner_id, owner_username, owner_name) =
            owner.ok_or_else(|| AppError::UserNotFound(command.owner_id.to_string()))?;

        let blog_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, author, url, likes, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            "#,
        )
        .bind(blog_id)
        .bind(&title)
        .bind(&author)
        .bind(&url)
        .bind(likes)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            blog_id = %blog_id,
            owner = %owner_username,
            correlation_id = ?context.correlation_id,
            "Blog created"
        );

        Ok(BlogDetail {
            id: blog_id,
            title,
            author,
            url,
            likes,
            owner: Some(BlogOwner {
                id: owner_id,
                username: owner_username,
                name: owner_name,
            }),
        })
    }
}
