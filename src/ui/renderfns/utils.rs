use crate::blog::types::Article;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Word-wrap text to `width` columns and keep at most `max_lines` lines.
///
/// The last kept line ends in "..." when text was cut off.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
  if width == 0 || max_lines == 0 {
    return Vec::new();
  }

  let mut lines: Vec<String> = Vec::new();
  let mut current = String::new();
  for word in text.split_whitespace() {
    let needed = if current.is_empty() {
      word.chars().count()
    } else {
      current.chars().count() + 1 + word.chars().count()
    };
    if needed > width && !current.is_empty() {
      lines.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
      current.push(' ');
    }
    current.push_str(word);
  }
  if !current.is_empty() {
    lines.push(current);
  }

  let overflow = lines.len() > max_lines;
  lines.truncate(max_lines);
  for line in lines.iter_mut() {
    if line.chars().count() > width {
      *line = truncate(line, width);
    }
  }
  if overflow {
    if let Some(last) = lines.last_mut() {
      let room = width.saturating_sub(3);
      let mut kept: String = last.chars().take(room).collect();
      if kept.len() < last.len() {
        // Cut back to a word boundary when there is one
        if let Some(i) = kept.rfind(' ') {
          kept.truncate(i);
        }
      }
      *last = format!("{}...", kept.trim_end());
    }
  }
  lines
}

/// Short date for list cards, e.g. "01/11/2026"; raw text if unparseable
pub fn short_date(article: &Article) -> String {
  article
    .published_at()
    .map(|dt| dt.format("%m/%d/%Y").to_string())
    .unwrap_or_else(|| article.date.clone())
}

/// Long date for the detail view, e.g. "Jan 11, 2026"; raw text if unparseable
pub fn long_date(article: &Article) -> String {
  article
    .published_at()
    .map(|dt| dt.format("%b %-d, %Y").to_string())
    .unwrap_or_else(|| article.date.clone())
}
