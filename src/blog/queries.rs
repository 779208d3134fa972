//! Cache key space and data for the blog API.

use crate::query::{Mutation, QueryClient, QueryOptions};
use std::sync::Arc;

use super::gateway::ArticleGateway;
use super::types::{Article, ArticleId, NewArticle};

/// Cache keys for blog queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlogQuery {
  /// All articles, in server order
  List,
  /// A single article by id
  Article(ArticleId),
}

/// Data cached under a [`BlogQuery`]
#[derive(Debug, Clone, PartialEq)]
pub enum BlogData {
  List(Vec<Article>),
  Article(Article),
}

impl BlogData {
  pub fn as_list(&self) -> Option<&[Article]> {
    match self {
      BlogData::List(articles) => Some(articles.as_slice()),
      BlogData::Article(_) => None,
    }
  }

  pub fn as_article(&self) -> Option<&Article> {
    match self {
      BlogData::Article(article) => Some(article),
      BlogData::List(_) => None,
    }
  }
}

pub type BlogQueryClient = QueryClient<BlogQuery, BlogData>;

pub type CreateArticleMutation = Mutation<NewArticle, Article>;

/// Build the query cache on top of a gateway.
pub fn query_client(gateway: Arc<dyn ArticleGateway>, options: QueryOptions) -> BlogQueryClient {
  QueryClient::new(
    move |key: BlogQuery| {
      let gateway = Arc::clone(&gateway);
      async move {
        match key {
          BlogQuery::List => gateway.list_articles().await.map(BlogData::List),
          BlogQuery::Article(id) => gateway.get_article(&id).await.map(BlogData::Article),
        }
      }
    },
    options,
  )
}

/// Write operation used by the creation form.
pub fn create_article_mutation(gateway: Arc<dyn ArticleGateway>) -> CreateArticleMutation {
  Mutation::new(move |article: NewArticle| {
    let gateway = Arc::clone(&gateway);
    async move { gateway.create_article(&article).await }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::blog::fake::{article, FakeGateway};

  fn options() -> QueryOptions {
    QueryOptions {
      retry: 0,
      ..QueryOptions::default()
    }
  }

  #[tokio::test]
  async fn test_list_and_item_keys_route_to_gateway() {
    let gateway = Arc::new(FakeGateway::with_articles(vec![
      article("1", "One"),
      article("2", "Two"),
    ]));
    let mut client = query_client(gateway.clone(), options());

    client.read(&BlogQuery::List);
    client.read(&BlogQuery::Article(ArticleId::from("2")));
    client.recv().await;
    client.recv().await;

    let list = client.peek(&BlogQuery::List);
    assert_eq!(list.data().and_then(BlogData::as_list).map(|l| l.len()), Some(2));

    let item = client.peek(&BlogQuery::Article(ArticleId::from("2")));
    assert_eq!(
      item.data().and_then(BlogData::as_article).map(|a| a.title.as_str()),
      Some("Two")
    );
    assert_eq!(gateway.list_calls(), 1);
    assert_eq!(gateway.get_calls(&ArticleId::from("2")), 1);
  }

  #[tokio::test]
  async fn test_concurrent_item_reads_issue_one_call() {
    let gateway = Arc::new(FakeGateway::with_articles(vec![article("x", "X")]));
    gateway.pause();
    let mut client = query_client(gateway.clone(), options());
    let key = BlogQuery::Article(ArticleId::from("x"));

    // Two components read the same key while the fetch is held in flight
    client.subscribe(&key);
    client.read(&key);
    tokio::task::yield_now().await;
    client.subscribe(&key);
    tokio::task::yield_now().await;
    assert!(client.peek(&key).is_loading());
    assert_eq!(gateway.get_calls(&ArticleId::from("x")), 1);

    gateway.resume();
    client.recv().await;
    assert!(client.peek(&key).is_success());
    assert_eq!(gateway.get_calls(&ArticleId::from("x")), 1);
    assert_eq!(client.observers(&key), 2);
  }

  #[tokio::test]
  async fn test_create_mutation_returns_server_article() {
    let gateway = Arc::new(FakeGateway::default());
    let mut mutation = create_article_mutation(gateway.clone());

    mutation.mutate(NewArticle {
      title: "Fresh".into(),
      category: vec!["GENERAL".into()],
      description: "d".into(),
      cover_image: "c".into(),
      content: "body".into(),
      date: "2026-01-01T00:00:00.000Z".into(),
    });
    mutation.recv().await;

    let created = mutation.state().data().unwrap();
    assert_eq!(created.title, "Fresh");
    assert_eq!(gateway.created().len(), 1);
  }
}
