//! TUI application state and main event loop.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use super::backend::{self, BackendCommand, BackendHandle, BackendResponse};
use super::console::{ConsoleState, LogRing};
use super::form::{FormMode, FormState};
use super::list::{MessageListState, FETCH_ERROR_TEXT};
use super::ui;
use crate::api::client::ArchiveClient;

/// How long the success indicator stays up after a create.
const SUCCESS_NOTICE: Duration = Duration::from_secs(3);

/// Redraw/tick cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Active pane in the TUI.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    List,
    Form,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::List => "messages",
            Pane::Form => "form",
        }
    }
}

/// Application state.
pub struct App {
    /// Whether the app should exit.
    pub should_exit: bool,
    /// Active pane.
    pub active_pane: Pane,
    /// Message list pane state (holds the fetched records).
    pub list: MessageListState,
    /// Form pane state (holds the explicit Create/Edit mode).
    pub form: FormState,
    /// Console overlay state.
    pub console: ConsoleState,
    /// Help popup visibility.
    pub show_help: bool,
    /// Status bar message, replaced by the next action.
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Deadline for the transient create-success indicator.
    success_until: Option<Instant>,
    /// Page size for list fetches.
    page_size: usize,
    backend: BackendHandle,
}

impl App {
    pub fn new(backend: BackendHandle, log_ring: LogRing, page_size: usize) -> Self {
        Self {
            should_exit: false,
            active_pane: Pane::default(),
            list: MessageListState::default(),
            form: FormState::default(),
            console: ConsoleState::new(log_ring),
            show_help: false,
            status_message: None,
            status_is_error: false,
            success_until: None,
            page_size,
            backend,
        }
    }

    /// Whether the create-success indicator is still within its window.
    pub fn success_notice_active(&self, now: Instant) -> bool {
        self.success_until.is_some_and(|until| now < until)
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status_message = Some(text.into());
        self.status_is_error = false;
    }

    fn set_status_error(&mut self, text: impl Into<String>) {
        self.status_message = Some(text.into());
        self.status_is_error = true;
    }

    fn request_refresh(&mut self) {
        self.list.loading = true;
        self.backend.send(BackendCommand::LoadMessages {
            skip: 0,
            limit: self.page_size,
        });
    }

    /// Periodic housekeeping: expire the success notice, drain the log ring.
    pub fn tick(&mut self) {
        if let Some(until) = self.success_until {
            if Instant::now() >= until {
                self.success_until = None;
            }
        }
        self.console.refresh();
    }

    // -- input ---------------------------------------------------------

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global bindings first.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_exit = true;
                    return;
                }
                KeyCode::Char('l') => {
                    self.console.toggle();
                    return;
                }
                _ => {}
            }
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.console.visible {
            match key.code {
                KeyCode::PageUp => {
                    self.console.scroll_up(5);
                    return;
                }
                KeyCode::PageDown => {
                    self.console.scroll_down(5);
                    return;
                }
                KeyCode::Esc => {
                    self.console.toggle();
                    return;
                }
                _ => {}
            }
        }

        match self.active_pane {
            Pane::List => self.handle_list_key(key),
            Pane::Form => self.handle_form_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Tab => self.active_pane = Pane::Form,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('m') => {
                // Toggling to visible fetches; hiding keeps everything.
                if self.list.toggle() {
                    self.request_refresh();
                }
            }
            KeyCode::Char('r') => {
                if self.list.visible {
                    self.request_refresh();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.list.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Abandon the draft or the edit and go back to the list.
                self.form.reset();
                self.active_pane = Pane::List;
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.move_left(),
            KeyCode::Right => self.form.move_right(),
            KeyCode::Home => self.form.move_home(),
            KeyCode::End => self.form.move_end(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Delete => self.form.delete(),
            KeyCode::Char(c) => self.form.insert_char(c),
            _ => {}
        }
    }

    /// Populate the form from the structured record under the cursor.
    fn edit_selected(&mut self) {
        let Some(record) = self.list.selected_record() else {
            return;
        };
        let record = record.clone();
        self.form.populate(&record);
        self.active_pane = Pane::Form;
        self.set_status(format!("Editing message #{}", record.id));
    }

    fn delete_selected(&mut self) {
        let Some(record) = self.list.selected_record() else {
            return;
        };
        let id = record.id;
        tracing::info!("Deleting message id={}", id);
        self.backend.send(BackendCommand::DeleteMessage { id });
    }

    /// One submit path for both modes; the mode value decides POST vs PUT.
    fn submit_form(&mut self) {
        let draft = match self.form.input().validate() {
            Ok(draft) => draft,
            Err(e) => {
                // Rejected before any request is constructed.
                tracing::warn!("Form validation failed: {}", e);
                self.set_status_error(e.to_string());
                return;
            }
        };

        match self.form.mode {
            FormMode::Create => {
                self.backend.send(BackendCommand::CreateMessage { draft });
            }
            FormMode::Edit(id) => {
                self.backend
                    .send(BackendCommand::UpdateMessage { id, draft });
            }
        }
    }

    // -- backend responses ---------------------------------------------

    /// Apply a backend response to the UI state.
    ///
    /// Responses arrive in completion order; whichever list result lands
    /// last is the one displayed.
    pub fn handle_response(&mut self, resp: BackendResponse) {
        match resp {
            BackendResponse::Messages(Ok(records)) => {
                tracing::debug!("Fetched {} messages", records.len());
                self.list.set_records(records);
            }
            BackendResponse::Messages(Err(e)) => {
                tracing::error!("Error fetching messages: {:#}", e);
                self.list.set_error(FETCH_ERROR_TEXT);
            }
            BackendResponse::Created(Ok(created)) => {
                tracing::info!("Message created: id={}", created.id);
                self.form.reset();
                self.success_until = Some(Instant::now() + SUCCESS_NOTICE);
                self.set_status(format!("Message created with id {}.", created.id));
                self.request_refresh();
            }
            BackendResponse::Created(Err(e)) => {
                tracing::error!("Error creating message: {:#}", e);
                self.set_status_error(format!("Create failed: {:#}", e));
            }
            BackendResponse::Updated { id, result: Ok(_) } => {
                tracing::info!("Message updated: id={}", id);
                // A completed update disarms the edit; the form is a
                // create form again.
                self.form.reset();
                self.set_status(format!("Message {} updated.", id));
                self.request_refresh();
            }
            BackendResponse::Updated { id, result: Err(e) } => {
                // Keep Edit(id) armed so the user can retry.
                tracing::error!("Error updating message {}: {:#}", id, e);
                self.set_status_error(format!("Update failed: {:#}", e));
            }
            BackendResponse::Deleted { id, result: Ok(()) } => {
                tracing::info!("Message deleted: id={}", id);
                self.request_refresh();
            }
            BackendResponse::Deleted { id, result: Err(e) } => {
                // The list is stale now, but we do not refresh over it.
                tracing::error!("Error deleting message {}: {:#}", id, e);
                self.set_status_error(format!("Delete failed: {:#}", e));
            }
        }
    }
}

/// Run the TUI application with terminal restore on exit.
pub async fn run(client: ArchiveClient, log_ring: LogRing, page_size: usize) -> Result<()> {
    let (handle, resp_rx) = backend::start(client);
    let mut app = App::new(handle, log_ring, page_size);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app, resp_rx).await;
    ratatui::restore();
    result
}

async fn run_app(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    mut resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    while !app.should_exit {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => app.handle_key(key),
                    Some(Ok(_)) => {
                        // Resize and the rest are handled by the next draw.
                    }
                    Some(Err(e)) => {
                        tracing::error!("Terminal event error: {}", e);
                    }
                    None => app.should_exit = true,
                }
            }
            Some(resp) = resp_rx.recv() => {
                app.handle_response(resp);
            }
            _ = tick.tick() => {
                app.tick();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArchivedMessage;
    use crate::tui::backend::test_pair;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyEvent;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn record(id: i64) -> ArchivedMessage {
        ArchivedMessage {
            id,
            channel_title: "T".to_string(),
            channel_username: "@u".to_string(),
            message_id: id,
            message: "m".to_string(),
            message_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            media_path: String::new(),
            emoji_used: String::new(),
            youtube_links: String::new(),
        }
    }

    fn test_app() -> (App, UnboundedReceiver<BackendCommand>) {
        let (handle, cmd_rx, _resp_tx, _resp_rx) = test_pair();
        (App::new(handle, LogRing::new(), 10), cmd_rx)
    }

    #[test]
    fn test_toggle_visible_triggers_fetch_hide_does_not() {
        let (mut app, mut cmd_rx) = test_app();

        app.handle_key(key(KeyCode::Char('m')));
        assert!(app.list.visible);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadMessages { skip: 0, limit: 10 })
        ));

        app.handle_key(key(KeyCode::Char('m')));
        assert!(!app.list.visible);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_fetch_error_shows_literal_text() {
        let (mut app, _cmd_rx) = test_app();
        app.handle_response(BackendResponse::Messages(Err(anyhow::anyhow!("boom"))));
        assert_eq!(
            app.list.error.as_deref(),
            Some("Error fetching messages. See console for details.")
        );
    }

    #[test]
    fn test_empty_fetch_has_no_error() {
        let (mut app, _cmd_rx) = test_app();
        app.handle_response(BackendResponse::Messages(Ok(Vec::new())));
        assert!(app.list.error.is_none());
        assert!(app.list.records.is_empty());
    }

    #[test]
    fn test_create_success_clears_form_and_refreshes() {
        let (mut app, mut cmd_rx) = test_app();
        app.active_pane = Pane::Form;
        app.handle_key(key(KeyCode::Char('x')));

        app.handle_response(BackendResponse::Created(Ok(record(5))));

        assert_eq!(app.form.input(), Default::default());
        assert!(app.success_notice_active(Instant::now()));
        assert!(!app.success_notice_active(
            Instant::now() + SUCCESS_NOTICE + Duration::from_millis(1)
        ));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadMessages { .. })
        ));
    }

    #[test]
    fn test_create_failure_surfaces_error() {
        let (mut app, mut cmd_rx) = test_app();
        app.handle_response(BackendResponse::Created(Err(anyhow::anyhow!("500"))));
        assert!(app.status_is_error);
        assert!(app.status_message.as_deref().unwrap().contains("Create failed"));
        // No refresh over a failed create.
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_submit_in_edit_mode_puts_to_captured_id() {
        let (mut app, mut cmd_rx) = test_app();
        app.list.set_records(vec![record(1), record(2)]);
        app.list.visible = true;

        // Edit card 1, then card 2, no submit in between: the second wins.
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Esc));
        app.active_pane = Pane::List;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('e')));

        app.handle_key(key(KeyCode::Enter));
        match cmd_rx.try_recv() {
            Ok(BackendCommand::UpdateMessage { id, .. }) => assert_eq!(id, 2),
            other => panic!("expected update command, got {:?}", other),
        }
    }

    #[test]
    fn test_two_edits_without_submit_capture_second_id() {
        let (mut app, _cmd_rx) = test_app();
        app.list.set_records(vec![record(1), record(2)]);
        app.list.visible = true;

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.form.mode, FormMode::Edit(1));

        app.active_pane = Pane::List;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.form.mode, FormMode::Edit(2));
    }

    #[test]
    fn test_successful_update_returns_form_to_create() {
        let (mut app, _cmd_rx) = test_app();
        app.list.set_records(vec![record(3)]);
        app.list.visible = true;
        app.handle_key(key(KeyCode::Char('e')));

        app.handle_response(BackendResponse::Updated {
            id: 3,
            result: Ok(record(3)),
        });
        assert_eq!(app.form.mode, FormMode::Create);
    }

    #[test]
    fn test_failed_update_keeps_edit_armed() {
        let (mut app, _cmd_rx) = test_app();
        app.list.set_records(vec![record(3)]);
        app.list.visible = true;
        app.handle_key(key(KeyCode::Char('e')));

        app.handle_response(BackendResponse::Updated {
            id: 3,
            result: Err(anyhow::anyhow!("404")),
        });
        assert_eq!(app.form.mode, FormMode::Edit(3));
        assert!(app.status_is_error);
    }

    #[test]
    fn test_delete_failure_does_not_refresh() {
        let (mut app, mut cmd_rx) = test_app();
        app.handle_response(BackendResponse::Deleted {
            id: 9,
            result: Err(anyhow::anyhow!("404")),
        });
        assert!(cmd_rx.try_recv().is_err());
        assert!(app.status_is_error);

        app.handle_response(BackendResponse::Deleted {
            id: 9,
            result: Ok(()),
        });
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadMessages { .. })
        ));
    }

    #[test]
    fn test_invalid_message_id_blocks_dispatch() {
        let (mut app, mut cmd_rx) = test_app();
        app.active_pane = Pane::Form;
        // Field order starts at Channel Title; jump to Message ID.
        app.form.next_field();
        app.form.next_field();
        for c in "abc".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert!(cmd_rx.try_recv().is_err());
        assert!(app.status_is_error);
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .contains("message_id"));
    }

    #[test]
    fn test_delete_sends_selected_id() {
        let (mut app, mut cmd_rx) = test_app();
        app.list.set_records(vec![record(7), record(8)]);
        app.list.visible = true;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));

        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::DeleteMessage { id: 8 })
        ));
    }
}
