use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer: where the user is on the left, background work on the right
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: Option<&str>) {
  let bar = Style::default().bg(Color::Black);
  let status_width = status.map_or(0, |s| s.chars().count() as u16 + 2);
  let [trail_area, status_area] =
    Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

  frame.render_widget(Paragraph::new(trail(breadcrumb)).style(bar), trail_area);

  if let Some(status) = status {
    let paragraph = Paragraph::new(format!("{} ", status))
      .alignment(Alignment::Right)
      .style(bar.fg(Color::Yellow).italic());
    frame.render_widget(paragraph, status_area);
  }
}

/// " Articles > Title", the last part highlighted
fn trail(parts: &[String]) -> Line<'static> {
  let last = parts.len().saturating_sub(1);
  let mut spans = vec![Span::raw(" ")];
  for (i, part) in parts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }
    let style = if i == last {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };
    spans.push(Span::styled(part.clone(), style));
  }
  Line::from(spans)
}
