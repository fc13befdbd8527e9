//! News articles.
//!
//! DESIGN
//! ======
//! Admins write, publish and retire articles; everyone reads the published
//! ones. `publishedAt` is stamped the first time an article is published and
//! kept across unpublish/republish. Every admin edit refreshes `updatedAt`.

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, ValidationError, id};
use tracing::info;

use super::newest_first;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const NEWS_KEY: &str = "news_articles";

const MAX_TITLE_LEN: usize = 200;
const MAX_SUMMARY_LEN: usize = 500;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsCategory {
    #[serde(rename = "施設情報")]
    Facility,
    #[serde(rename = "大会情報")]
    Tournament,
    #[serde(rename = "ルール")]
    Rules,
    #[serde(rename = "練習会")]
    Practice,
    #[serde(rename = "募集")]
    Recruitment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub content: String,
    pub category: NewsCategory,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<NewsCategory>,
    pub is_published: Option<bool>,
}

/// Input for [`create_article`].
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: NewsCategory,
    pub is_published: bool,
}

impl Entity for NewsArticle {
    type Patch = NewsPatch;

    fn merge(&mut self, patch: NewsPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("title", &self.title)?;
        ValidationError::max_len("title", &self.title, MAX_TITLE_LEN)?;
        ValidationError::max_len("summary", &self.summary, MAX_SUMMARY_LEN)?;
        ValidationError::require("content", &self.content)
    }
}

impl NewsArticle {
    /// Stamp `publishedAt` if the article is published and has none yet.
    fn stamp(&mut self, now: &str) {
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(now.to_owned());
        }
    }
}

fn articles(state: &AppState) -> Collection<NewsArticle> {
    state.store.collection(NEWS_KEY)
}

// =============================================================================
// ADMIN
// =============================================================================

/// Write a new article, published or as a draft.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins or `Invalid` on bad input.
pub fn create_article(state: &AppState, actor: &Actor, input: NewArticle) -> Result<Record<NewsArticle>, ServiceError> {
    actor.require_admin("create news")?;

    let mut article = NewsArticle {
        title: input.title.trim().to_owned(),
        summary: input.summary.trim().to_owned(),
        content: input.content,
        category: input.category,
        is_published: input.is_published,
        published_at: None,
        author: actor.user_name.clone(),
        author_id: actor.user_id.clone(),
        updated_at: None,
    };
    article.stamp(&id::now_timestamp());

    let record = articles(state).create(article)?;
    info!(article_id = record.id(), published = record.is_published, "news article created");
    Ok(record)
}

/// Apply `patch` to an article.
///
/// # Errors
///
/// Returns `Unauthorized`, `NotFound`, or `Invalid`.
pub fn update_article(
    state: &AppState,
    actor: &Actor,
    id: &str,
    patch: NewsPatch,
) -> Result<Record<NewsArticle>, ServiceError> {
    actor.require_admin("update news")?;

    let now = id::now_timestamp();
    let record = articles(state)
        .modify(id, |article| {
            article.merge(patch);
            article.stamp(&now);
            article.updated_at = Some(now.clone());
        })?
        .ok_or_else(|| ServiceError::not_found("news article", id))?;
    info!(article_id = id, published = record.is_published, "news article updated");
    Ok(record)
}

/// # Errors
///
/// See [`update_article`].
pub fn publish(state: &AppState, actor: &Actor, id: &str) -> Result<Record<NewsArticle>, ServiceError> {
    update_article(state, actor, id, NewsPatch { is_published: Some(true), ..NewsPatch::default() })
}

/// # Errors
///
/// See [`update_article`].
pub fn unpublish(state: &AppState, actor: &Actor, id: &str) -> Result<Record<NewsArticle>, ServiceError> {
    update_article(state, actor, id, NewsPatch { is_published: Some(false), ..NewsPatch::default() })
}

/// # Errors
///
/// Returns `Unauthorized` or `NotFound`.
pub fn delete_article(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    actor.require_admin("delete news")?;
    if !articles(state).hard_delete(id) {
        return Err(ServiceError::not_found("news article", id));
    }
    info!(article_id = id, "news article deleted");
    Ok(())
}

/// Every article including drafts, newest first.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub fn list_all(state: &AppState, actor: &Actor) -> Result<Vec<Record<NewsArticle>>, ServiceError> {
    actor.require_admin("list all news")?;
    Ok(newest_first(articles(state).list(), Record::created_at))
}

// =============================================================================
// PUBLIC
// =============================================================================

/// Published articles, optionally in one category, most recently published first.
#[must_use]
pub fn list_published(state: &AppState, category: Option<NewsCategory>) -> Vec<Record<NewsArticle>> {
    let published = articles(state).find(|a| a.is_published && category.is_none_or(|c| a.category == c));
    newest_first(published, |a| a.published_at.as_deref().unwrap_or_else(|| a.created_at()))
}

/// A published article. Drafts are only visible to admins.
///
/// # Errors
///
/// Returns `NotFound` for a missing article, or for a draft when the actor is
/// not an admin.
pub fn get_article(state: &AppState, actor: &Actor, id: &str) -> Result<Record<NewsArticle>, ServiceError> {
    match articles(state).get_by_id(id) {
        Some(article) if article.is_published || actor.role.is_admin() => Ok(article),
        _ => Err(ServiceError::not_found("news article", id)),
    }
}

#[cfg(test)]
#[path = "news_test.rs"]
mod tests;
