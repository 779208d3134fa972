//! In-memory gateway for tests.

use crate::error::BlogError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

use super::gateway::ArticleGateway;
use super::types::{Article, ArticleId, NewArticle};

/// Build an article with placeholder fields
pub fn article(id: &str, title: &str) -> Article {
  Article {
    id: ArticleId::from(id),
    title: title.to_string(),
    category: vec!["FINANCE".to_string()],
    description: format!("About {}", title),
    date: "2026-01-11T09:12:45.120Z".to_string(),
    cover_image: "https://example.com/cover.jpg".to_string(),
    content: format!("{} body", title),
  }
}

/// Gateway backed by a vector, with call counters and a gate that can hold
/// requests in flight.
pub struct FakeGateway {
  articles: Mutex<Vec<Article>>,
  created: Mutex<Vec<NewArticle>>,
  failing: Mutex<HashMap<&'static str, BlogError>>,
  list_calls: AtomicUsize,
  get_calls: Mutex<HashMap<ArticleId, usize>>,
  gate: Semaphore,
}

impl Default for FakeGateway {
  fn default() -> Self {
    Self::with_articles(Vec::new())
  }
}

const OPEN: usize = 1 << 20;

impl FakeGateway {
  pub fn with_articles(articles: Vec<Article>) -> Self {
    Self {
      articles: Mutex::new(articles),
      created: Mutex::new(Vec::new()),
      failing: Mutex::new(HashMap::new()),
      list_calls: AtomicUsize::new(0),
      get_calls: Mutex::new(HashMap::new()),
      gate: Semaphore::new(OPEN),
    }
  }

  /// Hold every request until `resume`.
  pub fn pause(&self) {
    let _ = self.gate.try_acquire_many(OPEN as u32).map(|p| p.forget());
  }

  pub fn resume(&self) {
    if self.gate.available_permits() == 0 {
      self.gate.add_permits(OPEN);
    }
  }

  /// Make one operation ("list", "get" or "create") fail until cleared.
  pub fn fail(&self, operation: &'static str, error: BlogError) {
    self.failing.lock().unwrap().insert(operation, error);
  }

  pub fn clear_failures(&self) {
    self.failing.lock().unwrap().clear();
  }

  pub fn list_calls(&self) -> usize {
    self.list_calls.load(Ordering::SeqCst)
  }

  pub fn get_calls(&self, id: &ArticleId) -> usize {
    self.get_calls.lock().unwrap().get(id).copied().unwrap_or(0)
  }

  pub fn total_get_calls(&self) -> usize {
    self.get_calls.lock().unwrap().values().sum()
  }

  /// Payloads received by `create_article`
  pub fn created(&self) -> Vec<NewArticle> {
    self.created.lock().unwrap().clone()
  }

  async fn wait_for_gate(&self) {
    let _permit = self.gate.acquire().await.unwrap();
  }

  fn failure(&self, operation: &str) -> Option<BlogError> {
    self.failing.lock().unwrap().get(operation).cloned()
  }
}

#[async_trait]
impl ArticleGateway for FakeGateway {
  async fn list_articles(&self) -> Result<Vec<Article>, BlogError> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    self.wait_for_gate().await;
    if let Some(e) = self.failure("list") {
      return Err(e);
    }
    Ok(self.articles.lock().unwrap().clone())
  }

  async fn get_article(&self, id: &ArticleId) -> Result<Article, BlogError> {
    *self.get_calls.lock().unwrap().entry(id.clone()).or_default() += 1;
    self.wait_for_gate().await;
    if let Some(e) = self.failure("get") {
      return Err(e);
    }
    self
      .articles
      .lock()
      .unwrap()
      .iter()
      .find(|a| &a.id == id)
      .cloned()
      .ok_or_else(|| BlogError::NotFound { id: id.clone() })
  }

  async fn create_article(&self, article: &NewArticle) -> Result<Article, BlogError> {
    self.wait_for_gate().await;
    if let Some(e) = self.failure("create") {
      return Err(e);
    }
    self.created.lock().unwrap().push(article.clone());

    let mut articles = self.articles.lock().unwrap();
    let stored = Article {
      id: ArticleId::from((articles.len() + 1).to_string()),
      title: article.title.clone(),
      category: article.category.clone(),
      description: article.description.clone(),
      date: article.date.clone(),
      cover_image: article.cover_image.clone(),
      content: article.content.clone(),
    };
    articles.push(stored.clone());
    Ok(stored)
  }
}
