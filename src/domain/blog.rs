//! Blog record
//!
//! The snapshot type consumed by the statistics module and produced by the
//! persistence queries. `likes` is kept non-negative by request validation
//! and a database CHECK constraint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single authored post with a like count and optional owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i32,
    /// Owning user, if the blog was created through an authenticated request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
}

impl Blog {
    pub fn new(id: Uuid, title: String, author: String, url: String, likes: i32) -> Self {
        Self {
            id,
            title,
            author,
            url,
            likes,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: Uuid) -> Self {
        self.owner = Some(owner);
        self
    }
}
