use crate::error::BlogError;
use async_trait::async_trait;

use super::types::{Article, ArticleId, NewArticle};

/// Boundary to the remote article store.
///
/// The query cache and the creation form only see this trait, so tests can
/// swap the HTTP client for an in-memory fake.
#[async_trait]
pub trait ArticleGateway: Send + Sync {
  /// `GET /blogs`, in server order
  async fn list_articles(&self) -> Result<Vec<Article>, BlogError>;

  /// `GET /blogs/{id}`
  async fn get_article(&self, id: &ArticleId) -> Result<Article, BlogError>;

  /// `POST /blogs`, returning the stored article with its new id
  async fn create_article(&self, article: &NewArticle) -> Result<Article, BlogError>;
}
