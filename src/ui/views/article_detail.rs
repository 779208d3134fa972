use crate::blog::queries::{BlogData, BlogQuery, BlogQueryClient};
use crate::blog::types::{Article, ArticleId};
use crate::coordinator::Coordinator;
use crate::query::QueryStatus;
use crate::ui::renderfns::long_date;
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

const PLACEHOLDER: &str = "Select an article to read";

/// Right pane: the full text of the selected article
#[derive(Default)]
pub struct ArticleDetailView {
  current: Option<ArticleId>,
  scroll: u16,
}

impl ArticleDetailView {
  pub fn new() -> Self {
    Self::default()
  }

  fn key(&self) -> Option<BlogQuery> {
    self.current.clone().map(BlogQuery::Article)
  }

  fn render_article(article: &Article) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if !article.cover_image.is_empty() {
      lines.push(Line::from(vec![
        Span::styled("Cover: ", muted),
        Span::styled(
          article.cover_image.clone(),
          Style::default().fg(Color::Cyan).underlined(),
        ),
      ]));
      lines.push(Line::default());
    }

    if !article.category.is_empty() {
      lines.push(Line::from(Span::styled(
        article.category.join(" • "),
        Style::default().fg(Color::Blue).bold(),
      )));
    }
    lines.push(Line::from(Span::styled(
      article.title.clone(),
      Style::default().fg(Color::White).bold(),
    )));

    let mut stats = Vec::new();
    if let Some(category) = article.primary_category() {
      stats.push(Span::styled(category.to_string(), Style::default().fg(Color::Yellow)));
      stats.push(Span::styled("  │  ", muted));
    }
    stats.push(Span::styled(format!("{} min read", article.read_minutes()), muted));
    stats.push(Span::styled("  │  ", muted));
    stats.push(Span::styled(long_date(article), muted));
    lines.push(Line::from(stats));
    lines.push(Line::default());

    if !article.description.is_empty() {
      lines.push(Line::from(Span::styled(
        article.description.clone(),
        Style::default().italic(),
      )));
      lines.push(Line::default());
    }

    // Keep the author's line breaks
    for line in article.content.split('\n') {
      lines.push(Line::from(line.to_string()));
    }
    lines
  }
}

impl View for ArticleDetailView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction {
    match key.code {
      KeyCode::Char('R') => match self.key() {
        Some(key) => ctx.queries.refetch(&key),
        None => return ViewAction::NotHandled,
      },
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
      _ => return ViewAction::NotHandled,
    }
    ViewAction::Handled
  }

  fn render(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    queries: &BlogQueryClient,
    _coordinator: &Coordinator,
  ) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let Some(key) = self.key() else {
      let paragraph = Paragraph::new(PLACEHOLDER)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
      frame.render_widget(paragraph, area);
      return;
    };

    let snapshot = queries.peek(&key);
    let block = if snapshot.is_fetching() && snapshot.data().is_some() {
      block.title(" (refreshing...) ")
    } else {
      block
    };

    let paragraph = match (snapshot.status(), snapshot.data().and_then(BlogData::as_article)) {
      (QueryStatus::Success, Some(article)) => Paragraph::new(Self::render_article(article))
        .wrap(Wrap { trim: false })
        .scroll((self.scroll, 0)),
      (QueryStatus::Error, _) => {
        let detail = snapshot.error().map(|e| e.to_string()).unwrap_or_default();
        Paragraph::new(vec![
          Line::from(Span::styled(
            "Error loading article",
            Style::default().fg(Color::Red).bold(),
          )),
          Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
          Line::default(),
          Line::from(Span::styled(
            "Press R to retry.",
            Style::default().fg(Color::DarkGray),
          )),
        ])
        .wrap(Wrap { trim: true })
      }
      _ => Paragraph::new("Loading article...").style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(paragraph.block(block), area);
  }

  /// Move the subscription to whatever is selected now
  fn sync(&mut self, ctx: &mut ViewContext) {
    let selected = ctx.coordinator.selected().cloned();
    if selected == self.current {
      return;
    }

    if let Some(old) = self.key() {
      ctx.queries.unsubscribe(&old);
    }
    self.current = selected;
    self.scroll = 0;
    if let Some(new) = self.key() {
      ctx.queries.subscribe(&new);
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.current.is_none() {
      return Vec::new();
    }
    vec![
      ShortcutInfo::new("R", "reload article").with_priority(50),
      ShortcutInfo::new("PgUp/PgDn", "scroll").with_priority(60),
    ]
  }
}
