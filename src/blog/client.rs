use crate::config::Config;
use crate::error::BlogError;
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::gateway::ArticleGateway;
use super::types::{Article, ArticleId, NewArticle};

/// HTTP client for the blog API
#[derive(Clone)]
pub struct BlogClient {
  http: reqwest::Client,
  base: Url,
}

impl BlogClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base = config.api.base_url()?;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.api.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  /// Base URL the client talks to
  pub fn base_url(&self) -> &Url {
    &self.base
  }

  /// Build `<base>/blogs[/<id>]`, keeping any path prefix in the base URL
  fn endpoint(&self, id: Option<&ArticleId>) -> Result<Url, BlogError> {
    let mut url = self.base.clone();
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| BlogError::network(format!("invalid API base URL: {}", self.base)))?;
      segments.pop_if_empty().push("blogs");
      if let Some(id) = id {
        segments.push(id.as_str());
      }
    }
    Ok(url)
  }
}

/// Map a non-success status to a network failure with the body for context
async fn unexpected_status(response: reqwest::Response) -> BlogError {
  let status = response.status();
  let body = response.text().await.unwrap_or_default();
  if body.is_empty() {
    BlogError::network(format!("unexpected status {}", status))
  } else {
    BlogError::network(format!("unexpected status {}: {}", status, body.trim()))
  }
}

#[async_trait]
impl ArticleGateway for BlogClient {
  async fn list_articles(&self) -> Result<Vec<Article>, BlogError> {
    let url = self.endpoint(None)?;
    debug!(%url, "GET articles");

    let response = self.http.get(url).send().await?;
    if !response.status().is_success() {
      return Err(unexpected_status(response).await);
    }

    Ok(response.json().await?)
  }

  async fn get_article(&self, id: &ArticleId) -> Result<Article, BlogError> {
    let url = self.endpoint(Some(id))?;
    debug!(%url, "GET article");

    let response = self.http.get(url).send().await?;
    match response.status() {
      StatusCode::NOT_FOUND => Err(BlogError::NotFound { id: id.clone() }),
      s if s.is_success() => Ok(response.json().await?),
      _ => Err(unexpected_status(response).await),
    }
  }

  async fn create_article(&self, article: &NewArticle) -> Result<Article, BlogError> {
    let url = self.endpoint(None)?;
    debug!(%url, title = %article.title, "POST article");

    let response = self.http.post(url).json(article).send().await?;
    if !response.status().is_success() {
      return Err(unexpected_status(response).await);
    }

    Ok(response.json().await?)
  }
}
