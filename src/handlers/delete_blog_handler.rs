//! Blog Deletion Handler

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::RequestContext;
use crate::error::AppError;

use super::DeleteBlogCommand;

/// Handler for ownership-checked blog deletion
pub struct DeleteBlogHandler {
    pool: PgPool,
}

impl DeleteBlogHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the delete blog command
    pub async fn execute(
        &self,
        command: DeleteBlogCommand,
        context: &RequestContext,
    ) -> Result<(), AppError> {
        let blog: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT user_id FROM blogs WHERE id = $1")
                .bind(command.blog_id)
                .fetch_optional(&self.pool)
                .await?;

        let (owner,) = blog.ok_or_else(|| AppError::BlogNotFound(command.blog_id.to_string()))?;

        // Ownerless blogs cannot be deleted through the API
        match owner {
            Some(owner_id) if owner_id == command.requested_by => {}
            _ => {
                return Err(AppError::Forbidden(
                    "only the owner can delete a blog".to_string(),
                ));
            }
        }

        sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(command.blog_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            blog_id = %command.blog_id,
            correlation_id = ?context.correlation_id,
            "Blog deleted"
        );

        Ok(())
    }
}
