use crate::blog::queries::{create_article_mutation, BlogQuery, BlogQueryClient, CreateArticleMutation};
use crate::blog::types::{format_timestamp, NewArticle, DEFAULT_CATEGORY, DEFAULT_COVER_IMAGE};
use crate::blog::ArticleGateway;
use crate::coordinator::Coordinator;
use crate::error::BlogError;
use crate::query::MutationState;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::sync::Arc;
use tracing::{info, warn};

/// Form fields in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
  #[default]
  Title,
  Categories,
  CoverImage,
  Description,
  Content,
}

impl Field {
  const ALL: [Field; 5] = [
    Field::Title,
    Field::Categories,
    Field::CoverImage,
    Field::Description,
    Field::Content,
  ];

  fn index(self) -> usize {
    Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
  }

  fn next(self) -> Self {
    Self::ALL[(self.index() + 1) % Self::ALL.len()]
  }

  fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }

  fn label(self) -> &'static str {
    match self {
      Field::Title => "Title *",
      Field::Categories => "Categories (comma separated)",
      Field::CoverImage => "Cover image URL",
      Field::Description => "Description *",
      Field::Content => "Content *",
    }
  }
}

/// Unsaved article text. Lives only as long as the form.
#[derive(Debug, Clone, Default)]
pub struct Draft {
  pub title: TextInput,
  pub categories: TextInput,
  pub cover_image: TextInput,
  pub description: TextInput,
  pub content: TextInput,
}

impl Draft {
  fn input(&self, field: Field) -> &TextInput {
    match field {
      Field::Title => &self.title,
      Field::Categories => &self.categories,
      Field::CoverImage => &self.cover_image,
      Field::Description => &self.description,
      Field::Content => &self.content,
    }
  }

  fn input_mut(&mut self, field: Field) -> &mut TextInput {
    match field {
      Field::Title => &mut self.title,
      Field::Categories => &mut self.categories,
      Field::CoverImage => &mut self.cover_image,
      Field::Description => &mut self.description,
      Field::Content => &mut self.content,
    }
  }

  /// Validate the draft and build the create payload stamped with `now`.
  pub fn to_new_article(&self, now: DateTime<Utc>) -> Result<NewArticle, BlogError> {
    let required = [
      ("title", &self.title),
      ("description", &self.description),
      ("content", &self.content),
    ];
    for (field, input) in required {
      if input.value().trim().is_empty() {
        return Err(BlogError::Validation { field });
      }
    }

    let cover_image = match self.cover_image.value().trim() {
      "" => DEFAULT_COVER_IMAGE.to_string(),
      url => url.to_string(),
    };

    Ok(NewArticle {
      title: self.title.value().to_string(),
      category: parse_categories(self.categories.value()),
      description: self.description.value().to_string(),
      cover_image,
      content: self.content.value().to_string(),
      date: format_timestamp(now),
    })
  }
}

/// Split on commas, trimming and dropping empties; `["GENERAL"]` if none remain
pub fn parse_categories(raw: &str) -> Vec<String> {
  let categories: Vec<String> = raw
    .split(',')
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .map(String::from)
    .collect();
  if categories.is_empty() {
    vec![DEFAULT_CATEGORY.to_string()]
  } else {
    categories
  }
}

/// Main pane while writing a new article
pub struct CreateArticleView {
  draft: Draft,
  focus: Field,
  mutation: CreateArticleMutation,
  error: Option<BlogError>,
}

impl CreateArticleView {
  pub fn new(gateway: Arc<dyn ArticleGateway>) -> Self {
    Self {
      draft: Draft::default(),
      focus: Field::default(),
      mutation: create_article_mutation(gateway),
      error: None,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.mutation.is_pending()
  }

  fn submit(&mut self) {
    if self.mutation.is_pending() {
      return;
    }
    match self.draft.to_new_article(Utc::now()) {
      Ok(article) => {
        info!(title = %article.title, "publishing article");
        self.error = None;
        self.mutation.mutate(article);
      }
      Err(e) => {
        self.error = Some(e);
      }
    }
  }

  fn render_field(&self, frame: &mut Frame, area: Rect, field: Field) {
    let focused = self.focus == field;
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
      .title(format!(" {} ", field.label()))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    let text = input_text(self.draft.input(field), focused);
    let mut paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });

    // Keep the cursor line in view for long content
    if focused && field == Field::Content {
      let input = self.draft.input(field);
      let row = input.value()[..input.cursor_position()].matches('\n').count() as u16;
      let visible = area.height.saturating_sub(2);
      paragraph = paragraph.scroll((row.saturating_sub(visible.saturating_sub(1)), 0));
    }
    frame.render_widget(paragraph, area);
  }
}

/// Field text with a `_` cursor marker when focused
fn input_text(input: &TextInput, focused: bool) -> Text<'static> {
  let value = input.value();
  if !focused {
    return Text::from(value.to_string());
  }

  let (before, after) = value.split_at(input.cursor_position());
  let mut lines: Vec<Line<'static>> = before.split('\n').map(|l| Line::from(l.to_string())).collect();
  let mut rest = after.split('\n');
  if let Some(last) = lines.last_mut() {
    last.push_span(Span::styled("_", Style::default().fg(Color::Yellow)));
    if let Some(first) = rest.next() {
      last.push_span(Span::raw(first.to_string()));
    }
  }
  lines.extend(rest.map(|l| Line::from(l.to_string())));
  Text::from(lines)
}

impl View for CreateArticleView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction {
    // The form is locked while a write is in flight
    if self.mutation.is_pending() {
      return ViewAction::Handled;
    }

    match key.code {
      KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
      KeyCode::Esc => {
        info!("draft discarded");
        ctx.coordinator.cancel_create();
      }
      KeyCode::Tab => self.focus = self.focus.next(),
      KeyCode::BackTab => self.focus = self.focus.prev(),
      KeyCode::Enter if self.focus == Field::Content => self.draft.content.insert('\n'),
      KeyCode::Enter => self.focus = self.focus.next(),
      _ => match self.draft.input_mut(self.focus).handle_key(key) {
        InputResult::Consumed => {}
        _ => return ViewAction::NotHandled,
      },
    }
    ViewAction::Handled
  }

  fn render(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    _queries: &BlogQueryClient,
    _coordinator: &Coordinator,
  ) {
    let block = Block::default()
      .title(" New Article ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Title
        Constraint::Length(3), // Categories
        Constraint::Length(3), // Cover image
        Constraint::Length(4), // Description
        Constraint::Min(4),    // Content
        Constraint::Length(1), // Error
        Constraint::Length(1), // Submit
      ])
      .split(inner);

    for (field, chunk) in Field::ALL.into_iter().zip(chunks.iter()) {
      self.render_field(frame, *chunk, field);
    }

    if let Some(error) = &self.error {
      let line = Paragraph::new(format!("Error: {}", error)).style(Style::default().fg(Color::Red));
      frame.render_widget(line, chunks[5]);
    }

    let button = if self.mutation.is_pending() {
      Span::styled("[ Publishing... ]", Style::default().fg(Color::DarkGray))
    } else {
      Span::styled(
        "[ Publish Article ]",
        Style::default().fg(Color::Black).bg(Color::Green).bold(),
      )
    };
    let submit = Paragraph::new(Line::from(vec![
      button,
      Span::styled("  Ctrl-S publish  Esc cancel", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(submit, chunks[6]);
  }

  /// Apply the outcome of a settled write
  fn sync(&mut self, ctx: &mut ViewContext) {
    if !self.mutation.poll() {
      return;
    }
    match self.mutation.state() {
      MutationState::Success(article) => {
        info!(id = %article.id, "article published");
        ctx.queries.invalidate(&BlogQuery::List);
        ctx.coordinator.on_create_success();
      }
      MutationState::Error(e) => {
        warn!(error = %e, "publishing failed");
        self.error = Some(e.clone());
      }
      MutationState::Idle | MutationState::Pending => {}
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("Tab", "next field").with_priority(10),
      ShortcutInfo::new("C-s", "publish").with_priority(20),
      ShortcutInfo::new("Esc", "cancel").with_priority(30),
    ]
  }
}
