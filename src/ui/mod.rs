pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use renderfns::{draw_footer, draw_header};

/// Screen regions
#[derive(Debug, Clone, Copy)]
pub struct Areas {
  pub header: Rect,
  pub list: Rect,
  pub main: Rect,
  pub footer: Rect,
}

/// Header and footer bars around a list pane and a main pane
pub fn layout(area: Rect) -> Areas {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Panes
      Constraint::Length(1), // Footer
    ])
    .split(area);

  let panes = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(rows[1]);

  Areas {
    header: rows[0],
    list: panes[0],
    main: panes[1],
    footer: rows[2],
  }
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let areas = layout(frame.area());

  draw_header(frame, areas.header, app.title(), app.api_url(), &app.shortcuts());
  app.render_panes(frame, areas.list, areas.main);
  draw_footer(frame, areas.footer, &app.breadcrumb(), app.status().as_deref());
}
