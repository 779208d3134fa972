use crate::blog::queries::{query_client, BlogData, BlogQuery, BlogQueryClient};
use crate::blog::{ArticleGateway, BlogClient};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::event::{Event, EventHandler};
use crate::query::QueryOptions;
use crate::ui;
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::{ArticleDetailView, ArticleListView, CreateArticleView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  gateway: Arc<dyn ArticleGateway>,
  queries: BlogQueryClient,
  coordinator: Coordinator,

  list: ArticleListView,
  detail: ArticleDetailView,
  /// Mounted only while the coordinator is in create mode
  form: Option<CreateArticleView>,

  title: String,
  api_url: String,
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config) -> Result<Self> {
    let client = BlogClient::new(config)?;
    let api_url = client.base_url().to_string();
    let options = QueryOptions {
      stale_time: config.cache.stale_time(),
      retry: config.cache.retry,
      ..QueryOptions::default()
    };
    Ok(Self::with_gateway(
      Arc::new(client),
      options,
      config.display_title(),
      api_url,
    ))
  }

  pub fn with_gateway(
    gateway: Arc<dyn ArticleGateway>,
    options: QueryOptions,
    title: String,
    api_url: String,
  ) -> Self {
    let mut queries = query_client(Arc::clone(&gateway), options);
    let list = ArticleListView::new(&mut queries);
    Self {
      gateway,
      queries,
      coordinator: Coordinator::new(),
      list,
      detail: ArticleDetailView::new(),
      form: None,
      title,
      api_url,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));
    info!(api = %self.api_url, "started");

    self.sync();
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) | Some(Event::Resize) => self.sync(),
        None => break,
      }
    }
    Ok(())
  }

  /// Apply finished fetches, then let every view react before the next draw.
  pub fn sync(&mut self) {
    self.queries.poll();

    let mut ctx = ViewContext {
      queries: &mut self.queries,
      coordinator: &mut self.coordinator,
    };
    if let Some(form) = &mut self.form {
      form.sync(&mut ctx);
    }

    // The draft lives exactly as long as create mode
    match (ctx.coordinator.is_creating(), self.form.is_some()) {
      (true, false) => self.form = Some(CreateArticleView::new(Arc::clone(&self.gateway))),
      (false, true) => self.form = None,
      _ => {}
    }

    self.list.sync(&mut ctx);
    self.detail.sync(&mut ctx);
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let mut ctx = ViewContext {
      queries: &mut self.queries,
      coordinator: &mut self.coordinator,
    };
    if let Some(form) = &mut self.form {
      form.handle_key(key, &mut ctx);
    } else if self.list.handle_key(key, &mut ctx) == ViewAction::NotHandled
      && self.detail.handle_key(key, &mut ctx) == ViewAction::NotHandled
    {
      match key.code {
        KeyCode::Char('n') => self.coordinator.begin_create(),
        KeyCode::Char('q') => self.should_quit = true,
        _ => {}
      }
    }

    self.sync();
  }

  pub fn render_panes(&mut self, frame: &mut Frame, list_area: Rect, main_area: Rect) {
    self
      .list
      .render(frame, list_area, &self.queries, &self.coordinator);
    match &mut self.form {
      Some(form) => form.render(frame, main_area, &self.queries, &self.coordinator),
      None => self
        .detail
        .render(frame, main_area, &self.queries, &self.coordinator),
    }
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn api_url(&self) -> &str {
    &self.api_url
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if let Some(form) = &self.form {
      return form.shortcuts();
    }
    let mut shortcuts = self.list.shortcuts();
    shortcuts.extend(self.detail.shortcuts());
    shortcuts.push(ShortcutInfo::new("n", "new article").with_priority(20));
    shortcuts.push(ShortcutInfo::new("q", "quit").with_priority(90));
    shortcuts
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    let mut parts = vec!["Articles".to_string()];
    if self.coordinator.is_creating() {
      parts.push("New Article".to_string());
    } else if let Some(title) = self.selected_title() {
      parts.push(title);
    }
    parts
  }

  /// Title of the selected article from whichever cache entry has it
  fn selected_title(&self) -> Option<String> {
    let id = self.coordinator.selected()?;
    let detail = self.queries.peek(&BlogQuery::Article(id.clone()));
    if let Some(article) = detail.data().and_then(BlogData::as_article) {
      return Some(article.title.clone());
    }
    let list = self.queries.peek(&BlogQuery::List);
    list
      .data()
      .and_then(BlogData::as_list)
      .and_then(|articles| articles.iter().find(|a| &a.id == id))
      .map(|a| a.title.clone())
  }

  pub fn status(&self) -> Option<String> {
    if self.form.as_ref().is_some_and(CreateArticleView::is_pending) {
      return Some("Publishing...".to_string());
    }
    let list = self.queries.peek(&BlogQuery::List);
    if list.is_fetching() && list.data().is_some() {
      return Some("Refreshing...".to_string());
    }
    None
  }
}
