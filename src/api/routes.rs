//! API Routes
//!
//! HTTP endpoint definitions.

use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Blog, RequestContext};
use crate::error::AppError;
use crate::handlers::{
    BlogDetail, CreateBlogCommand, CreateBlogHandler, CreateUserCommand, CreateUserHandler,
    DeleteBlogCommand, DeleteBlogHandler, LoginCommand, LoginHandler, UpdateBlogCommand,
    UpdateBlogHandler,
};
use crate::stats::{self, AuthorBlogCount, AuthorLikes, StatsError};

use super::middleware::{auth_middleware, context_middleware, logging_middleware, AuthenticatedUser};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub likes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub likes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BlogOwnerResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<BlogOwnerResponse>,
}

impl From<BlogDetail> for BlogResponse {
    fn from(detail: BlogDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title,
            author: detail.author,
            url: detail.url,
            likes: detail.likes,
            user: detail.owner.map(|owner| BlogOwnerResponse {
                id: owner.id,
                username: owner.username,
                name: owner.name,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserBlogResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub blogs: Vec<UserBlogResponse>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub blogs: usize,
    pub total_likes: i64,
    pub favorite: Option<BlogResponse>,
    pub most_blogs: Option<AuthorBlogCount>,
    pub most_likes: Option<AuthorLikes>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router<AppState> {
    // Creating and deleting blogs requires a bearer token
    let protected = Router::new()
        .route("/blogs", post(create_blog))
        .route("/blogs/:blog_id", delete(delete_blog))
        .route_layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/stats", get(blog_stats))
        .route("/blogs/:blog_id", put(update_blog))
        .route("/users", get(list_users).post(create_user))
        .route("/login", post(login))
        .merge(protected)
        .layer(from_fn(logging_middleware))
        .layer(from_fn(context_middleware))
}

// =========================================================================
// GET /blogs
// =========================================================================

/// List all blogs with owner info
async fn list_blogs(State(pool): State<PgPool>) -> Result<Json<Vec<BlogResponse>>, AppError> {
    let rows: Vec<(Uuid, String, String, String, i32, Option<Uuid>, Option<String>, Option<String>)> =
        sqlx::query_as(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, u.username, u.name
            FROM blogs b
            LEFT JOIN users u ON u.id = b.user_id
            ORDER BY b.created_at, b.id
            "#,
        )
        .fetch_all(&pool)
        .await?;

    let blogs = rows
        .into_iter()
        .map(|(id, title, author, url, likes, user_id, username, name)| BlogResponse {
            id,
            title,
            author,
            url,
            likes,
            user: match (user_id, username, name) {
                (Some(id), Some(username), Some(name)) => Some(BlogOwnerResponse {
                    id,
                    username,
                    name,
                }),
                _ => None,
            },
        })
        .collect();

    Ok(Json(blogs))
}

// =========================================================================
// GET /blogs/stats
// =========================================================================

/// Aggregate statistics over the full blog list
async fn blog_stats(State(pool): State<PgPool>) -> Result<Json<StatsResponse>, AppError> {
    // Creation order is the input order the tie-break rules are defined over
    let rows: Vec<(Uuid, String, String, String, i32, Option<Uuid>)> = sqlx::query_as(
        "SELECT id, title, author, url, likes, user_id FROM blogs ORDER BY created_at, id",
    )
    .fetch_all(&pool)
    .await?;

    let blogs: Vec<Blog> = rows
        .into_iter()
        .map(|(id, title, author, url, likes, owner)| Blog {
            id,
            title,
            author,
            url,
            likes,
            owner,
        })
        .collect();

    // EmptyInput is the only statistics error; an empty list serializes the
    // order statistics as nulls rather than failing the request.
    let favorite = match stats::favorite_blog(&blogs) {
        Ok(blog) => Some(BlogResponse {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user: None,
        }),
        Err(StatsError::EmptyInput) => None,
    };

    Ok(Json(StatsResponse {
        blogs: blogs.len(),
        total_likes: stats::total_likes(&blogs),
        favorite,
        most_blogs: stats::most_blogs(&blogs).ok(),
        most_likes: stats::most_likes(&blogs).ok(),
    }))
}

// =========================================================================
// POST /blogs
// =========================================================================

/// Create a new blog owned by the authenticated user
async fn create_blog(
    State(pool): State<PgPool>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), AppError> {
    let handler = CreateBlogHandler::new(pool);

    let command = CreateBlogCommand {
        owner_id: user.id,
        title: request.title,
        author: request.author,
        url: request.url,
        likes: request.likes,
    };

    let detail = handler.execute(command, &context).await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

// =========================================================================
// PUT /blogs/:blog_id
// =========================================================================

/// Update a blog (typically its like count)
async fn update_blog(
    State(pool): State<PgPool>,
    Path(blog_id): Path<Uuid>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    let handler = UpdateBlogHandler::new(pool);

    let command = UpdateBlogCommand {
        blog_id,
        title: request.title,
        author: request.author,
        url: request.url,
        likes: request.likes,
    };

    let detail = handler.execute(command, &context).await?;

    Ok(Json(detail.into()))
}

// =========================================================================
// DELETE /blogs/:blog_id
// =========================================================================

/// Delete a blog; only its owner may do so
async fn delete_blog(
    State(pool): State<PgPool>,
    Path(blog_id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<RequestContext>,
) -> Result<StatusCode, AppError> {
    let handler = DeleteBlogHandler::new(pool);

    let command = DeleteBlogCommand {
        blog_id,
        requested_by: user.id,
    };

    handler.execute(command, &context).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// GET /users
// =========================================================================

/// List users with the blogs they own
async fn list_users(State(pool): State<PgPool>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users: Vec<(Uuid, String, String)> =
        sqlx::query_as("SELECT id, username, name FROM users ORDER BY created_at, id")
            .fetch_all(&pool)
            .await?;

    let blog_rows: Vec<(Uuid, String, String, String, Option<Uuid>)> = sqlx::query_as(
        "SELECT id, title, author, url, user_id FROM blogs ORDER BY created_at, id",
    )
    .fetch_all(&pool)
    .await?;

    let mut blogs_by_owner: HashMap<Uuid, Vec<UserBlogResponse>> = HashMap::new();
    for (id, title, author, url, owner) in blog_rows {
        if let Some(owner) = owner {
            blogs_by_owner
                .entry(owner)
                .or_default()
                .push(UserBlogResponse {
                    id,
                    title,
                    author,
                    url,
                });
        }
    }

    let users = users
        .into_iter()
        .map(|(id, username, name)| UserResponse {
            id,
            username,
            name,
            blogs: blogs_by_owner.remove(&id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(users))
}

// =========================================================================
// POST /users
// =========================================================================

/// Register a new user
async fn create_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let handler = CreateUserHandler::new(state.pool.clone(), state.config.bcrypt_cost);

    let command = CreateUserCommand {
        username: request.username,
        name: request.name,
        password: request.password,
    };

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id: result.id,
            username: result.username,
            name: result.name,
        }),
    ))
}

// =========================================================================
// POST /login
// =========================================================================

/// Exchange credentials for a bearer token
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let handler = LoginHandler::new(state.pool.clone(), &state.config);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };

    let result = handler.execute(command).await?;

    Ok(Json(LoginResponse {
        token: result.token,
        username: result.username,
        name: result.name,
    }))
}
