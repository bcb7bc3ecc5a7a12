//! UI rendering for the TUI

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Pane};
use super::console;
use super::form;
use super::help;
use super::list;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    // Split main area: message cards (fill) + form (fixed width)
    let [list_area, form_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(form::FORM_WIDTH)])
            .areas(main_area);

    list::render(
        list_area,
        frame.buffer_mut(),
        &app.list,
        app.active_pane == Pane::List,
    );

    form::render(form_area, frame, &app.form, app.active_pane == Pane::Form);

    render_status(status_area, frame.buffer_mut(), app);

    // Console overlay sits above the panes, help popup above everything.
    if app.console.visible {
        console::render(frame, &app.console);
    }

    if app.show_help {
        help::render_help_popup(frame);
    }
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = Span::styled(
        " TG Archive Admin",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Transient success indicator: green check for a few seconds after a
    // successful create.
    let notice = if app.success_notice_active(Instant::now()) {
        Span::styled(
            " Message created successfully ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("")
    };

    let help_indicator = Span::styled(" [?] Help ", Style::default().fg(Color::Gray));

    let left_width = title.content.len();
    let right_width = notice.content.len() + help_indicator.content.len();
    let padding_width = area.width.saturating_sub((left_width + right_width) as u16) as usize;
    let padding = Span::raw(" ".repeat(padding_width));

    let header_line = Line::from(vec![title, padding, notice, help_indicator]);
    Paragraph::new(header_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    // If there's a status message, show it prominently.
    if let Some(ref msg) = app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(Color::Red).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bg(Color::DarkGray)
        };
        let line = Line::from(Span::styled(format!(" {} ", msg), style));
        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let sep_style = Style::default().fg(Color::DarkGray);

    let pane = Span::styled(
        format!(" Tab: {} ", app.active_pane.as_str()),
        Style::default().fg(Color::Cyan),
    );

    let hints = match app.active_pane {
        Pane::List => "m: show/hide | r: refresh | e: edit | d: delete | q: quit",
        Pane::Form => "Enter: submit | Tab: next field | Esc: back",
    };
    let hint_span = Span::styled(hints, Style::default().fg(Color::Gray));

    let help_hint = Span::styled("?: help", Style::default().fg(Color::Gray));

    let status_line = Line::from(vec![
        pane,
        Span::styled("| ", sep_style),
        hint_span,
        Span::styled(" | ", sep_style),
        help_hint,
    ]);

    Paragraph::new(status_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}
