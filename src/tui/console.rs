//! In-app console: captures tracing output and shows it in an overlay.
//!
//! While the alternate screen is active, log lines written to stderr would
//! corrupt the display, so the subscriber writes into a shared ring buffer
//! instead. The console pane renders that buffer; the list pane's
//! "See console for details" error text refers to it.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing_subscriber::fmt::MakeWriter;

/// Ring capacity: backpressure limit on the write path.
const RING_CAPACITY: usize = 400;

/// Cap on accumulated lines kept for scrollback.
const MAX_SCROLLBACK: usize = 1000;

/// Thread-safe ring of formatted log lines, shared between the tracing
/// subscriber (writer side) and the console pane (reader side).
#[derive(Clone, Default)]
pub struct LogRing {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, evicting the oldest when at capacity.
    ///
    /// A poisoned mutex is recovered rather than propagated; logging must
    /// not cascade a panic from another thread.
    pub fn push(&self, line: String) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if guard.len() >= RING_CAPACITY {
            guard.pop_front();
        }
        guard.push_back(line);
    }

    /// Take all buffered lines, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.drain(..).collect()
    }
}

/// Line-buffering writer handed to tracing-subscriber.
pub struct RingWriter {
    ring: LogRing,
    pending: Vec<u8>,
}

impl RingWriter {
    fn flush_complete_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            self.ring.push(text);
        }
    }
}

impl Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            let text = String::from_utf8_lossy(&self.pending).into_owned();
            self.ring.push(text);
            self.pending.clear();
        }
        Ok(())
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        let _ = Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogRing {
    type Writer = RingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            pending: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Console pane
// ---------------------------------------------------------------------------

/// State of the console overlay.
pub struct ConsoleState {
    ring: LogRing,
    lines: Vec<String>,
    pub visible: bool,
    /// 0 = pinned to the newest line.
    scroll_offset: usize,
}

impl ConsoleState {
    pub fn new(ring: LogRing) -> Self {
        Self {
            ring,
            lines: Vec::new(),
            visible: false,
            scroll_offset: 0,
        }
    }

    /// Pull new lines out of the ring. Called every tick so the mutex
    /// never accumulates unboundedly.
    pub fn refresh(&mut self) {
        let new_lines = self.ring.drain();
        if new_lines.is_empty() {
            return;
        }
        self.lines.extend(new_lines);
        if self.lines.len() > MAX_SCROLLBACK {
            let excess = self.lines.len() - MAX_SCROLLBACK;
            self.lines.drain(..excess);
            self.scroll_offset = self.scroll_offset.saturating_sub(excess);
        }
    }

    /// Toggle visibility; opening jumps to the newest lines.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    /// Scroll toward older lines, clamped at the oldest.
    pub fn scroll_up(&mut self, n: usize) {
        let max_offset = self.lines.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(max_offset);
    }

    /// Scroll toward newer lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    #[cfg(test)]
    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Render the console overlay over the bottom half of the screen.
pub fn render(frame: &mut Frame, state: &ConsoleState) {
    let area = frame.area();
    let height = (area.height / 2).max(3);
    let overlay = Rect::new(area.x, area.y + area.height - height, area.width, height);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Console ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // scroll_offset=0 shows the last `inner.height` lines.
    let end = state.lines.len().saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(inner.height as usize);

    let lines: Vec<Line> = state.lines[start..end]
        .iter()
        .map(|line| colorize_line(line))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Color a formatted log line by its level token.
fn colorize_line(line: &str) -> Line<'static> {
    let color = if line.contains(" ERROR ") {
        Color::Red
    } else if line.contains(" WARN ") {
        Color::Yellow
    } else if line.contains(" INFO ") {
        Color::Green
    } else if line.contains(" DEBUG ") || line.contains(" TRACE ") {
        Color::DarkGray
    } else {
        Color::White
    };

    Line::from(Span::styled(line.to_owned(), Style::default().fg(color)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ring_push_and_drain() {
        let ring = LogRing::new();
        ring.push("a".to_string());
        ring.push("b".to_string());
        assert_eq!(ring.drain(), vec!["a", "b"]);
        assert!(ring.drain().is_empty());
    }

    #[test]
    fn test_ring_evicts_oldest_at_capacity() {
        let ring = LogRing::new();
        for i in 0..RING_CAPACITY + 50 {
            ring.push(format!("line {}", i));
        }
        let lines = ring.drain();
        assert_eq!(lines.len(), RING_CAPACITY);
        assert_eq!(lines[0], "line 50");
    }

    #[test]
    fn test_writer_splits_lines() {
        let ring = LogRing::new();
        let mut writer = ring.make_writer();
        write!(writer, "first\nsecond\n").unwrap();
        assert_eq!(ring.drain(), vec!["first", "second"]);
    }

    #[test]
    fn test_writer_flushes_partial_line_on_drop() {
        let ring = LogRing::new();
        {
            let mut writer = ring.make_writer();
            write!(writer, "partial").unwrap();
            assert!(ring.drain().is_empty());
        }
        assert_eq!(ring.drain(), vec!["partial"]);
    }

    #[test]
    fn test_console_refresh_and_scroll_clamp() {
        let ring = LogRing::new();
        for i in 0..5 {
            ring.push(format!("line {}", i));
        }
        let mut state = ConsoleState::new(ring);
        assert_eq!(state.line_count(), 0);
        state.refresh();
        assert_eq!(state.line_count(), 5);

        state.scroll_up(100);
        assert_eq!(state.scroll_offset, 4);
        state.scroll_down(10);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_console_toggle_resets_scroll() {
        let ring = LogRing::new();
        ring.push("x".to_string());
        let mut state = ConsoleState::new(ring);
        state.refresh();
        state.scroll_up(1);
        state.toggle();
        assert!(state.visible);
        assert_eq!(state.scroll_offset, 0);
    }
}
