//! Blog list statistics
//!
//! Pure aggregation over a caller-supplied snapshot of blog records.
//! Every function is a synchronous single pass with no I/O and no shared
//! state, so calls are safe from any number of request tasks at once.
//!
//! Grouping by author preserves first-seen order, and ranking uses a stable
//! descending sort, so authors tied on count (or like sum) always resolve to
//! the one that appeared first in the input. Running the same operation twice
//! on the same slice yields the identical result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Blog;

/// Errors produced by the statistics operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// The order statistics have no defined answer for an empty list.
    /// Callers decide how to surface the absence; this module never fabricates
    /// a zero-valued record that could be mistaken for real data.
    #[error("cannot compute statistics of an empty blog list")]
    EmptyInput,
}

/// Author ranked by number of blogs written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogCount {
    pub author: String,
    pub count: usize,
}

/// Author ranked by accumulated likes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: i64,
}

/// Sum of likes across all records. Zero for an empty list.
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().map(|blog| i64::from(blog.likes)).sum()
}

/// The record with the maximum like count.
///
/// Ties resolve to the first such record in input order.
pub fn favorite_blog(blogs: &[Blog]) -> Result<&Blog, StatsError> {
    let mut favorite = blogs.first().ok_or(StatsError::EmptyInput)?;

    for blog in &blogs[1..] {
        if blog.likes > favorite.likes {
            favorite = blog;
        }
    }

    Ok(favorite)
}

/// The author with the most records.
pub fn most_blogs(blogs: &[Blog]) -> Result<AuthorBlogCount, StatsError> {
    let tallies = tally_by_author(blogs, |_| 1);
    let (author, count) = top_author(tallies)?;

    Ok(AuthorBlogCount {
        author,
        count: count as usize,
    })
}

/// The author with the highest like sum across their records.
pub fn most_likes(blogs: &[Blog]) -> Result<AuthorLikes, StatsError> {
    let tallies = tally_by_author(blogs, |blog| i64::from(blog.likes));
    let (author, likes) = top_author(tallies)?;

    Ok(AuthorLikes { author, likes })
}

/// Accumulate a per-author total, preserving first-seen author order.
///
/// The returned vector is the ordered map the tie-break rule depends on:
/// entry order is the order authors first appeared in the input.
fn tally_by_author<F>(blogs: &[Blog], weight: F) -> Vec<(String, i64)>
where
    F: Fn(&Blog) -> i64,
{
    let mut tallies: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for blog in blogs {
        match index.get(blog.author.as_str()) {
            Some(&i) => tallies[i].1 += weight(blog),
            None => {
                index.insert(blog.author.as_str(), tallies.len());
                tallies.push((blog.author.clone(), weight(blog)));
            }
        }
    }

    tallies
}

/// Rank tallies by descending total and return the winner.
///
/// `sort_by` is stable, so equal totals keep their first-seen order and the
/// earliest author wins the tie.
fn top_author(mut tallies: Vec<(String, i64)>) -> Result<(String, i64), StatsError> {
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.into_iter().next().ok_or(StatsError::EmptyInput)
}
