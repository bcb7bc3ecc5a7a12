//! Message list pane: one card per stored record.
//!
//! The pane keeps the structured records from the last fetch; edit looks
//! the selected record up here instead of scraping it back out of the
//! rendered card.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::models::{format_display_date, ArchivedMessage};

/// Shown in place of the list when a fetch fails. The console overlay is
/// where the details land.
pub const FETCH_ERROR_TEXT: &str = "Error fetching messages. See console for details.";

/// Rendered lines per card: title, seven field rows, action hint, spacer.
const CARD_HEIGHT: usize = 10;

/// State for the message list pane.
pub struct MessageListState {
    /// Records from the last successful fetch, in server order.
    pub records: Vec<ArchivedMessage>,
    /// Index of the selected card.
    pub selected: usize,
    /// Whether the pane shows content. Starts hidden, like the panel it
    /// replaces; showing triggers a fetch.
    pub visible: bool,
    /// Error text replacing the cards after a failed fetch.
    pub error: Option<String>,
    /// A fetch is in flight.
    pub loading: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            selected: 0,
            visible: false,
            error: None,
            loading: false,
        }
    }
}

impl MessageListState {
    /// Replace the contents with a fresh fetch result.
    ///
    /// Clears any error and clamps the selection; no partial list is ever
    /// mixed with an error state.
    pub fn set_records(&mut self, records: Vec<ArchivedMessage>) {
        self.records = records;
        self.error = None;
        self.loading = false;
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
    }

    /// Replace the contents with an error message.
    pub fn set_error(&mut self, text: impl Into<String>) {
        self.records.clear();
        self.selected = 0;
        self.error = Some(text.into());
        self.loading = false;
    }

    /// Flip visibility. Returns the new state so the caller can trigger a
    /// fetch on show; hiding discards nothing.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    /// The record under the cursor, if any.
    pub fn selected_record(&self) -> Option<&ArchivedMessage> {
        self.records.get(self.selected)
    }
}

/// First card shown for a given selection: page-aligned so paging through
/// a long list is stable.
fn page_start(selected: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    (selected / per_page) * per_page
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the message list pane.
pub fn render(area: Rect, buf: &mut Buffer, state: &MessageListState, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let title = format!(" Messages ({}) ", state.records.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if !state.visible {
        let hint = Line::from(Span::styled(
            " (hidden -- press m to show messages)",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(hint).render(inner, buf);
        return;
    }

    if let Some(ref error) = state.error {
        let line = Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ));
        Paragraph::new(line).render(inner, buf);
        return;
    }

    if state.loading && state.records.is_empty() {
        let line = Line::from(Span::styled(
            " Loading...",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(inner, buf);
        return;
    }

    if state.records.is_empty() {
        // Zero cards and no error text.
        let line = Line::from(Span::styled(
            " (no messages)",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(inner, buf);
        return;
    }

    let per_page = ((inner.height as usize) / CARD_HEIGHT).max(1);
    let start = page_start(state.selected, per_page);
    let end = (start + per_page).min(state.records.len());

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, record) in state.records[start..end].iter().enumerate() {
        let selected = start + idx == state.selected;
        lines.extend(card_lines(record, selected, focused, width));
    }

    Paragraph::new(lines).render(inner, buf);
}

/// Build the rendered lines for one card.
fn card_lines(
    record: &ArchivedMessage,
    selected: bool,
    focused: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let title_style = if selected && focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White);

    let field = |name: &'static str, text: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("   {}: ", name), label),
            Span::styled(truncate_to_width(text, width.saturating_sub(20)), value),
        ])
    };

    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(
            &format!(" #{}  {}", record.id, record.channel_title),
            width,
        ),
        title_style,
    ))];
    lines.push(field("Username", &record.channel_username));
    lines.push(field("Message ID", &record.message_id.to_string()));
    lines.push(field("Message", &record.message));
    lines.push(field("Date", &format_display_date(&record.message_date)));
    lines.push(field("Media Path", &record.media_path));
    lines.push(field("Emoji Used", &record.emoji_used));
    lines.push(field("YouTube Links", &record.youtube_links));
    lines.push(Line::from(Span::styled(
        "   [e] edit   [d] delete",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());
    lines
}

/// Truncate to a display width, appending "..." when cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthStr::width(ch.to_string().as_str());
        if used + w + 3 > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: i64) -> ArchivedMessage {
        ArchivedMessage {
            id,
            channel_title: format!("Channel {}", id),
            channel_username: "@c".to_string(),
            message_id: id * 10,
            message: "text".to_string(),
            message_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            media_path: String::new(),
            emoji_used: String::new(),
            youtube_links: String::new(),
        }
    }

    #[test]
    fn test_empty_fetch_clears_error_and_renders_no_cards() {
        let mut state = MessageListState::default();
        state.set_error(FETCH_ERROR_TEXT);
        state.set_records(Vec::new());
        assert!(state.error.is_none());
        assert!(state.records.is_empty());
        assert_eq!(state.selected_record(), None);
    }

    #[test]
    fn test_failed_fetch_replaces_records_with_error() {
        let mut state = MessageListState::default();
        state.set_records(vec![record(1), record(2)]);
        state.set_error(FETCH_ERROR_TEXT);
        assert!(state.records.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Error fetching messages. See console for details.")
        );
    }

    #[test]
    fn test_selection_clamped_after_shrinking_fetch() {
        let mut state = MessageListState::default();
        state.set_records(vec![record(1), record(2), record(3)]);
        state.selected = 2;
        state.set_records(vec![record(1)]);
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_record().unwrap().id, 1);
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = MessageListState::default();
        state.set_records(vec![record(1), record(2)]);
        state.select_previous();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_toggle_reports_new_visibility() {
        let mut state = MessageListState::default();
        assert!(!state.visible);
        assert!(state.toggle());
        assert!(!state.toggle());
    }

    #[test]
    fn test_hide_keeps_records() {
        let mut state = MessageListState::default();
        state.set_records(vec![record(1)]);
        state.toggle();
        state.toggle();
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn test_page_start() {
        assert_eq!(page_start(0, 3), 0);
        assert_eq!(page_start(2, 3), 0);
        assert_eq!(page_start(3, 3), 3);
        assert_eq!(page_start(7, 3), 6);
        assert_eq!(page_start(5, 0), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 8), "abcde...");
    }
}
