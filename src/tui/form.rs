//! Message form: eight labeled single-line inputs plus a submit mode.
//!
//! One stable submit path reads [`FormMode`] to decide between POST and
//! PUT; the mode is an explicit value, never a swapped handler. Editing a
//! card populates the form from the structured record held by the list,
//! not from rendered text.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{format_input_date, ArchivedMessage, DraftInput};

/// Width of the form pane in the side-by-side layout.
pub const FORM_WIDTH: u16 = 44;

/// What a submit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Submit POSTs a new record.
    #[default]
    Create,
    /// Submit PUTs a full replacement for the captured record id.
    Edit(i64),
}

/// The eight editable fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ChannelTitle,
    ChannelUsername,
    MessageId,
    Message,
    MessageDate,
    MediaPath,
    EmojiUsed,
    YoutubeLinks,
}

pub const FIELDS: [Field; 8] = [
    Field::ChannelTitle,
    Field::ChannelUsername,
    Field::MessageId,
    Field::Message,
    Field::MessageDate,
    Field::MediaPath,
    Field::EmojiUsed,
    Field::YoutubeLinks,
];

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::ChannelTitle => "Channel Title",
            Field::ChannelUsername => "Username",
            Field::MessageId => "Message ID",
            Field::Message => "Message",
            Field::MessageDate => "Date",
            Field::MediaPath => "Media Path",
            Field::EmojiUsed => "Emoji Used",
            Field::YoutubeLinks => "YouTube Links",
        }
    }
}

/// A single-line text buffer with a character-offset cursor.
#[derive(Default, Clone)]
struct FieldBuffer {
    text: String,
    cursor: usize,
}

impl FieldBuffer {
    fn set(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let end = self.char_to_byte(self.cursor);
            let start = self.char_to_byte(self.cursor - 1);
            self.text.drain(start..end);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let start = self.char_to_byte(self.cursor);
            let end = self.char_to_byte(self.cursor + 1);
            self.text.drain(start..end);
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// State of the message form.
pub struct FormState {
    pub mode: FormMode,
    buffers: [FieldBuffer; FIELDS.len()],
    /// Index into [`FIELDS`] of the focused field.
    active: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            buffers: Default::default(),
            active: 0,
        }
    }
}

impl FormState {
    /// The focused field.
    pub fn active_field(&self) -> Field {
        FIELDS[self.active]
    }

    pub fn next_field(&mut self) {
        self.active = (self.active + 1) % FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.active = (self.active + FIELDS.len() - 1) % FIELDS.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffers[self.active].insert_char(c);
    }

    pub fn backspace(&mut self) {
        self.buffers[self.active].backspace();
    }

    pub fn delete(&mut self) {
        self.buffers[self.active].delete();
    }

    pub fn move_left(&mut self) {
        self.buffers[self.active].move_left();
    }

    pub fn move_right(&mut self) {
        self.buffers[self.active].move_right();
    }

    pub fn move_home(&mut self) {
        self.buffers[self.active].move_home();
    }

    pub fn move_end(&mut self) {
        self.buffers[self.active].move_end();
    }

    /// Current text of a field.
    pub fn value(&self, field: Field) -> &str {
        let idx = FIELDS.iter().position(|f| *f == field).unwrap_or(0);
        &self.buffers[idx].text
    }

    fn set_value(&mut self, field: Field, text: String) {
        if let Some(idx) = FIELDS.iter().position(|f| *f == field) {
            self.buffers[idx].set(text);
        }
    }

    /// Fill the form from a stored record and arm submit as an update.
    ///
    /// A second call before any submit simply captures the newer record's
    /// id; the previous one is forgotten.
    pub fn populate(&mut self, record: &ArchivedMessage) {
        self.set_value(Field::ChannelTitle, record.channel_title.clone());
        self.set_value(Field::ChannelUsername, record.channel_username.clone());
        self.set_value(Field::MessageId, record.message_id.to_string());
        self.set_value(Field::Message, record.message.clone());
        self.set_value(Field::MessageDate, format_input_date(&record.message_date));
        self.set_value(Field::MediaPath, record.media_path.clone());
        self.set_value(Field::EmojiUsed, record.emoji_used.clone());
        self.set_value(Field::YoutubeLinks, record.youtube_links.clone());
        self.mode = FormMode::Edit(record.id);
        self.active = 0;
    }

    /// Clear every field and return the mode to `Create`.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.set(String::new());
        }
        self.mode = FormMode::Create;
        self.active = 0;
    }

    /// Snapshot the typed values for validation.
    pub fn input(&self) -> DraftInput {
        DraftInput {
            channel_title: self.value(Field::ChannelTitle).to_string(),
            channel_username: self.value(Field::ChannelUsername).to_string(),
            message_id: self.value(Field::MessageId).to_string(),
            message: self.value(Field::Message).to_string(),
            message_date: self.value(Field::MessageDate).to_string(),
            media_path: self.value(Field::MediaPath).to_string(),
            emoji_used: self.value(Field::EmojiUsed).to_string(),
            youtube_links: self.value(Field::YoutubeLinks).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Widest label, for aligning the value column.
const LABEL_WIDTH: usize = 13;

/// Render the form into the given area.
///
/// Uses `Frame` directly so the cursor can be placed in the focused field.
pub fn render(area: Rect, frame: &mut Frame, state: &FormState, focused: bool) {
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

    let title = match state.mode {
        FormMode::Create => " New Message ".to_string(),
        FormMode::Edit(id) => format!(" Edit Message #{} ", id),
    };

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
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let value_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 2);
    let mut cursor: Option<(u16, u16)> = None;
    let mut lines: Vec<Line> = Vec::new();

    for (idx, field) in FIELDS.iter().enumerate() {
        if idx >= inner.height as usize {
            break;
        }
        let is_active = idx == state.active;
        let label_style = if is_active && focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let buffer = &state.buffers[idx];
        let view = scrolled_view(&buffer.text, buffer.cursor, value_width);

        if is_active && focused {
            let x = inner.x + (LABEL_WIDTH + 2) as u16 + view.cursor_offset as u16;
            cursor = Some((x, inner.y + idx as u16));
        }

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>width$}: ", field.label(), width = LABEL_WIDTH),
                label_style,
            ),
            Span::styled(view.visible, Style::default().fg(Color::White)),
        ]));
    }

    // Submit hint below the fields, if there is room.
    if (FIELDS.len() as u16) < inner.height {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            match state.mode {
                FormMode::Create => "  Enter: create   Esc: clear",
                FormMode::Edit(_) => "  Enter: update   Esc: cancel edit",
            },
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    if let Some((cx, cy)) = cursor {
        frame.set_cursor_position((cx, cy));
    }
}

/// The visible slice of a field's text and the cursor column within it.
struct ScrolledView {
    visible: String,
    cursor_offset: usize,
}

/// Horizontal scrolling keeps the cursor inside the value column.
fn scrolled_view(text: &str, cursor: usize, width: usize) -> ScrolledView {
    if width == 0 {
        return ScrolledView {
            visible: String::new(),
            cursor_offset: 0,
        };
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() < width {
        return ScrolledView {
            visible: text.to_string(),
            cursor_offset: cursor,
        };
    }

    let start = if cursor < width { 0 } else { cursor - width + 1 };
    let end = (start + width).min(chars.len());
    ScrolledView {
        visible: chars[start..end].iter().collect(),
        cursor_offset: cursor - start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: i64) -> ArchivedMessage {
        ArchivedMessage {
            id,
            channel_title: "Channel".to_string(),
            channel_username: "@chan".to_string(),
            message_id: 55,
            message: "body".to_string(),
            message_date: Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 30).unwrap(),
            media_path: "m.jpg".to_string(),
            emoji_used: "🔥".to_string(),
            youtube_links: String::new(),
        }
    }

    #[test]
    fn test_typing_and_cursor_ops() {
        let mut form = FormState::default();
        for c in "héllo".chars() {
            form.insert_char(c);
        }
        assert_eq!(form.value(Field::ChannelTitle), "héllo");

        form.move_left();
        form.backspace();
        assert_eq!(form.value(Field::ChannelTitle), "hélo");

        form.move_home();
        form.delete();
        assert_eq!(form.value(Field::ChannelTitle), "élo");

        form.move_end();
        form.insert_char('!');
        assert_eq!(form.value(Field::ChannelTitle), "élo!");
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = FormState::default();
        assert_eq!(form.active_field(), Field::ChannelTitle);
        form.prev_field();
        assert_eq!(form.active_field(), Field::YoutubeLinks);
        form.next_field();
        assert_eq!(form.active_field(), Field::ChannelTitle);
    }

    #[test]
    fn test_populate_sets_edit_mode_and_values() {
        let mut form = FormState::default();
        form.populate(&record(9));
        assert_eq!(form.mode, FormMode::Edit(9));
        assert_eq!(form.value(Field::MessageId), "55");
        assert_eq!(form.value(Field::MessageDate), "2024-02-02T12:00:30");
    }

    #[test]
    fn test_unchanged_edit_round_trips_exactly() {
        let rec = record(3);
        let mut form = FormState::default();
        form.populate(&rec);
        // Submit without touching anything: the draft equals the record.
        assert_eq!(form.input().validate().unwrap(), rec.to_draft());
    }

    #[test]
    fn test_second_edit_overrides_first_id() {
        let mut form = FormState::default();
        form.populate(&record(1));
        form.populate(&record(2));
        assert_eq!(form.mode, FormMode::Edit(2));
    }

    #[test]
    fn test_reset_returns_to_create() {
        let mut form = FormState::default();
        form.populate(&record(8));
        form.reset();
        assert_eq!(form.mode, FormMode::Create);
        for field in FIELDS {
            assert_eq!(form.value(field), "");
        }
    }

    #[test]
    fn test_scrolled_view_keeps_cursor_visible() {
        let view = scrolled_view("abcdefghij", 10, 5);
        assert_eq!(view.visible, "fghij");
        assert_eq!(view.cursor_offset, 4);

        let view = scrolled_view("abc", 1, 5);
        assert_eq!(view.visible, "abc");
        assert_eq!(view.cursor_offset, 1);
    }
}
