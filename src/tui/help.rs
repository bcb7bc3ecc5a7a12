//! Help popup overlay: keyboard shortcuts organized by category.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Popup dimensions.
const POPUP_WIDTH: u16 = 56;
const POPUP_HEIGHT: u16 = 22;

/// A shortcut entry: key binding and its description.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

/// A category of shortcuts with a title.
struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const MESSAGES: Category = Category {
    title: "MESSAGES",
    shortcuts: &[
        Shortcut {
            key: "m",
            desc: "Show/hide the message list",
        },
        Shortcut {
            key: "r",
            desc: "Refresh the list",
        },
        Shortcut {
            key: "Up/Down, k/j",
            desc: "Select a card",
        },
        Shortcut {
            key: "e, Enter",
            desc: "Edit the selected message",
        },
        Shortcut {
            key: "d",
            desc: "Delete the selected message",
        },
    ],
};

const FORM: Category = Category {
    title: "FORM",
    shortcuts: &[
        Shortcut {
            key: "Tab/Down, Shift+Tab/Up",
            desc: "Move between fields",
        },
        Shortcut {
            key: "Enter",
            desc: "Submit (create, or update when editing)",
        },
        Shortcut {
            key: "Esc",
            desc: "Clear the form and return to the list",
        },
    ],
};

const GENERAL: Category = Category {
    title: "GENERAL",
    shortcuts: &[
        Shortcut {
            key: "Tab",
            desc: "Jump from list to form",
        },
        Shortcut {
            key: "Ctrl+L",
            desc: "Toggle the console",
        },
        Shortcut {
            key: "PgUp/PgDn",
            desc: "Scroll the console",
        },
        Shortcut {
            key: "?",
            desc: "This help",
        },
        Shortcut {
            key: "q, Ctrl+C",
            desc: "Quit",
        },
    ],
};

const CATEGORIES: [&Category; 3] = [&MESSAGES, &FORM, &GENERAL];

/// Render the help popup centered on the screen.
pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();
    let width = POPUP_WIDTH.min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = Vec::new();
    for category in CATEGORIES {
        lines.push(Line::from(Span::styled(
            category.title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for shortcut in category.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<22}", shortcut.key),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(shortcut.desc, Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
