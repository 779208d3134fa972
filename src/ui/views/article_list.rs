use crate::blog::queries::{BlogData, BlogQuery, BlogQueryClient};
use crate::blog::types::{Article, ArticleId};
use crate::coordinator::Coordinator;
use crate::query::QueryStatus;
use crate::ui::renderfns::{clamp_lines, short_date, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tracing::debug;

/// Inputs of the auto-select effect; it reruns only when one changes
#[derive(Debug, Clone, PartialEq, Eq)]
struct AutoSelectDeps {
  list_version: u64,
  selected: Option<ArticleId>,
  creating: bool,
}

/// Left pane: one card per article in server order
pub struct ArticleListView {
  list_state: ListState,
  last_deps: Option<AutoSelectDeps>,
}

impl ArticleListView {
  /// Mount the view, subscribing to the article list.
  pub fn new(queries: &mut BlogQueryClient) -> Self {
    queries.subscribe(&BlogQuery::List);
    Self {
      list_state: ListState::default(),
      last_deps: None,
    }
  }

  /// Select the first article once per list load that finds nothing
  /// selected outside create mode.
  fn auto_select(&mut self, ctx: &mut ViewContext) {
    let snapshot = ctx.queries.read(&BlogQuery::List);
    let deps = AutoSelectDeps {
      list_version: snapshot.version(),
      selected: ctx.coordinator.selected().cloned(),
      creating: ctx.coordinator.is_creating(),
    };
    if self.last_deps.as_ref() == Some(&deps) {
      return;
    }
    self.last_deps = Some(deps.clone());

    if deps.creating || deps.selected.is_some() {
      return;
    }
    let first = snapshot
      .data()
      .and_then(BlogData::as_list)
      .and_then(|articles| articles.first());
    if let Some(first) = first {
      debug!(id = %first.id, "auto-selecting first article");
      ctx.coordinator.select_article(first.id.clone());
    }
  }

  /// Move the selection by `delta` cards, clamping at both ends.
  fn move_selection(&self, delta: isize, ctx: &mut ViewContext) {
    let snapshot = ctx.queries.peek(&BlogQuery::List);
    let Some(articles) = snapshot.data().and_then(BlogData::as_list) else {
      return;
    };
    if articles.is_empty() {
      return;
    }

    let target = match position_of(articles, ctx.coordinator.selected()) {
      Some(current) => current
        .saturating_add_signed(delta)
        .min(articles.len() - 1),
      None => 0,
    };
    ctx.coordinator.select_article(articles[target].id.clone());
  }

  fn card(article: &Article, width: usize) -> ListItem<'static> {
    let mut header = Vec::new();
    for (i, category) in article.category.iter().enumerate() {
      if i > 0 {
        header.push(Span::raw(" "));
      }
      header.push(Span::styled(
        format!("[{}]", category.to_uppercase()),
        Style::default().fg(Color::Blue).bold(),
      ));
    }
    if !header.is_empty() {
      header.push(Span::raw("  "));
    }
    header.push(Span::styled(
      short_date(article),
      Style::default().fg(Color::DarkGray),
    ));

    let mut lines = vec![
      Line::from(header),
      Line::from(Span::styled(
        truncate(&article.title, width),
        Style::default().fg(Color::White).bold(),
      )),
    ];
    for line in clamp_lines(&article.description, width, 2) {
      lines.push(Line::from(Span::styled(
        line,
        Style::default().fg(Color::Gray),
      )));
    }
    lines.push(Line::default());

    ListItem::new(lines)
  }
}

fn position_of(articles: &[Article], id: Option<&ArticleId>) -> Option<usize> {
  let id = id?;
  articles.iter().position(|a| &a.id == id)
}

impl View for ArticleListView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1, ctx),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1, ctx),
      KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN, ctx),
      KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX, ctx),
      KeyCode::Char('r') => ctx.queries.refetch(&BlogQuery::List),
      _ => return ViewAction::NotHandled,
    }
    ViewAction::Handled
  }

  fn render(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    queries: &BlogQueryClient,
    coordinator: &Coordinator,
  ) {
    let snapshot = queries.peek(&BlogQuery::List);
    let articles = snapshot
      .data()
      .and_then(BlogData::as_list)
      .unwrap_or(&[]);

    let title = if snapshot.is_fetching() && !articles.is_empty() {
      format!(" Latest Articles ({}) (refreshing...) ", articles.len())
    } else if articles.is_empty() {
      " Latest Articles ".to_string()
    } else {
      format!(" Latest Articles ({}) ", articles.len())
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let message = match snapshot.status() {
      QueryStatus::Loading | QueryStatus::Idle => {
        Some(("Loading articles...", Style::default().fg(Color::DarkGray)))
      }
      QueryStatus::Error => Some(("Error loading articles", Style::default().fg(Color::Red))),
      QueryStatus::Success => None,
    };
    if let Some((text, style)) = message {
      let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block)
        .style(style);
      frame.render_widget(paragraph, area);
      return;
    }

    // Borders and the highlight symbol
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = articles.iter().map(|a| Self::card(a, width)).collect();

    self
      .list_state
      .select(position_of(articles, coordinator.selected()));

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("▌ ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn sync(&mut self, ctx: &mut ViewContext) {
    self.auto_select(ctx);
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("j/k", "navigate").with_priority(10),
      ShortcutInfo::new("r", "refresh").with_priority(40),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::blog::fake::{article, FakeGateway};
  use crate::blog::queries::query_client;
  use crate::query::QueryOptions;
  use crate::ui::tests::render_to_string;
  use crossterm::event::KeyModifiers;
  use std::sync::Arc;

  struct Harness {
    gateway: Arc<FakeGateway>,
    queries: BlogQueryClient,
    coordinator: Coordinator,
    view: ArticleListView,
  }

  impl Harness {
    fn new(articles: Vec<Article>) -> Self {
      let gateway = Arc::new(FakeGateway::with_articles(articles));
      let mut queries = query_client(
        gateway.clone(),
        QueryOptions {
          retry: 0,
          ..QueryOptions::default()
        },
      );
      let view = ArticleListView::new(&mut queries);
      Self {
        gateway,
        queries,
        coordinator: Coordinator::new(),
        view,
      }
    }

    fn sync(&mut self) {
      let mut ctx = ViewContext {
        queries: &mut self.queries,
        coordinator: &mut self.coordinator,
      };
      self.view.sync(&mut ctx);
    }

    fn key(&mut self, code: KeyCode) {
      let mut ctx = ViewContext {
        queries: &mut self.queries,
        coordinator: &mut self.coordinator,
      };
      self.view.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut ctx);
    }

    async fn settle(&mut self) {
      self.queries.recv().await;
      self.sync();
    }

    fn render(&mut self) -> String {
      let Self {
        queries,
        coordinator,
        view,
        ..
      } = self;
      render_to_string(50, 20, |frame| {
        let area = frame.area();
        view.render(frame, area, queries, coordinator)
      })
    }
  }

  fn id(s: &str) -> ArticleId {
    ArticleId::from(s)
  }

  #[tokio::test]
  async fn test_auto_selects_first_article_after_load() {
    let mut h = Harness::new(vec![article("a", "Alpha"), article("b", "Beta")]);
    h.sync();
    assert_eq!(h.coordinator.selected(), None);

    h.settle().await;
    assert_eq!(h.coordinator.selected(), Some(&id("a")));
  }

  #[tokio::test]
  async fn test_auto_select_keeps_existing_selection() {
    let mut h = Harness::new(vec![article("a", "Alpha"), article("b", "Beta")]);
    h.coordinator.select_article(id("b"));
    h.settle().await;
    assert_eq!(h.coordinator.selected(), Some(&id("b")));
  }

  #[tokio::test]
  async fn test_no_auto_select_while_creating() {
    let mut h = Harness::new(vec![article("a", "Alpha")]);
    h.coordinator.begin_create();
    h.settle().await;
    assert!(h.coordinator.is_creating());
    assert_eq!(h.coordinator.selected(), None);
  }

  #[tokio::test]
  async fn test_auto_select_fires_once_per_load() {
    let mut h = Harness::new(vec![article("a", "Alpha"), article("b", "Beta")]);
    h.settle().await;
    h.key(KeyCode::Char('j'));
    assert_eq!(h.coordinator.selected(), Some(&id("b")));

    // Re-running the effect with unchanged inputs never moves the selection
    for _ in 0..3 {
      h.sync();
    }
    assert_eq!(h.coordinator.selected(), Some(&id("b")));
  }

  #[tokio::test]
  async fn test_auto_select_after_create_success() {
    let mut h = Harness::new(vec![article("a", "Alpha")]);
    h.settle().await;
    h.coordinator.begin_create();
    h.sync();
    h.coordinator.on_create_success();
    h.sync();
    assert_eq!(h.coordinator.selected(), Some(&id("a")));
  }

  #[tokio::test]
  async fn test_empty_list_selects_nothing() {
    let mut h = Harness::new(Vec::new());
    h.settle().await;
    assert_eq!(h.coordinator.selected(), None);

    let screen = h.render();
    assert!(screen.contains("Latest Articles"));
    assert!(!screen.contains("Loading"));
  }

  #[tokio::test]
  async fn test_navigation_clamps() {
    let mut h = Harness::new(vec![article("a", "Alpha"), article("b", "Beta")]);
    h.settle().await;

    h.key(KeyCode::Up);
    assert_eq!(h.coordinator.selected(), Some(&id("a")));
    h.key(KeyCode::Char('G'));
    assert_eq!(h.coordinator.selected(), Some(&id("b")));
    h.key(KeyCode::Down);
    assert_eq!(h.coordinator.selected(), Some(&id("b")));
    h.key(KeyCode::Home);
    assert_eq!(h.coordinator.selected(), Some(&id("a")));
  }

  #[tokio::test]
  async fn test_render_states() {
    let mut h = Harness::new(vec![article("a", "Alpha"), article("b", "Beta")]);
    assert!(h.render().contains("Loading articles..."));

    h.settle().await;
    let screen = h.render();
    assert!(screen.contains("Alpha"));
    assert!(screen.contains("Beta"));
    assert!(screen.contains("[FINANCE]"));
    assert!(screen.contains("01/11/2026"));
    // Server order is kept
    assert!(screen.find("Alpha").unwrap() < screen.find("Beta").unwrap());
  }

  #[tokio::test]
  async fn test_render_error() {
    let mut h = Harness::new(vec![article("a", "Alpha")]);
    h.gateway.fail("list", crate::error::BlogError::network("down"));
    // The fetch started at mount already failed; refetch to be sure it saw the failure
    h.queries.refetch(&BlogQuery::List);
    while !h.queries.peek(&BlogQuery::List).is_error() {
      h.queries.recv().await;
    }
    h.sync();

    assert!(h.render().contains("Error loading articles"));
    assert_eq!(h.coordinator.selected(), None);
  }
}
