//! Async backend: bridges the TUI event loop with the archive API.
//!
//! Uses an mpsc channel pair. The TUI sends `BackendCommand` values, and a
//! background tokio task executes them and sends `BackendResponse` values
//! back. Each command runs in its own task, so nothing stops overlapping
//! requests; the last response to arrive drives the final render.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::api;
use crate::api::client::ArchiveClient;
use crate::models::{ArchivedMessage, MessageDraft};

/// Commands sent from the TUI event loop to the async backend.
#[derive(Debug)]
pub enum BackendCommand {
    LoadMessages { skip: usize, limit: usize },
    CreateMessage { draft: MessageDraft },
    UpdateMessage { id: i64, draft: MessageDraft },
    DeleteMessage { id: i64 },
}

/// Responses from the async backend to the TUI.
pub enum BackendResponse {
    Messages(Result<Vec<ArchivedMessage>>),
    Created(Result<ArchivedMessage>),
    Updated { id: i64, result: Result<ArchivedMessage> },
    Deleted { id: i64, result: Result<()> },
}

/// Cloneable handle for sending commands to the backend.
#[derive(Clone)]
pub struct BackendHandle {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
}

impl BackendHandle {
    /// Send a command to the backend (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }
}

/// Start the backend. Spawns a tokio task that processes commands.
///
/// Returns the command handle and the response receiver; the event loop
/// owns the receiver so responses can be awaited in a `tokio::select!`.
pub fn start(client: ArchiveClient) -> (BackendHandle, mpsc::UnboundedReceiver<BackendResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();

    tokio::spawn(backend_loop(client, cmd_rx, resp_tx));

    (BackendHandle { cmd_tx }, resp_rx)
}

/// Channel pair without a processing loop, for driving the app in tests.
#[cfg(test)]
pub fn test_pair() -> (
    BackendHandle,
    mpsc::UnboundedReceiver<BackendCommand>,
    mpsc::UnboundedSender<BackendResponse>,
    mpsc::UnboundedReceiver<BackendResponse>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();
    (BackendHandle { cmd_tx }, cmd_rx, resp_tx, resp_rx)
}

/// Background loop that processes commands.
///
/// The client is created once by the caller and shared across all calls.
async fn backend_loop(
    client: ArchiveClient,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
) {
    let client = Arc::new(client);

    while let Some(cmd) = cmd_rx.recv().await {
        let client = Arc::clone(&client);
        let resp_tx = resp_tx.clone();

        // Spawn each command as a separate task so we don't block the loop.
        tokio::spawn(async move {
            match cmd {
                BackendCommand::LoadMessages { skip, limit } => {
                    let result = api::list_messages_data(&client, skip, limit).await;
                    let _ = resp_tx.send(BackendResponse::Messages(result));
                }
                BackendCommand::CreateMessage { draft } => {
                    let result = api::create_message_data(&client, &draft).await;
                    let _ = resp_tx.send(BackendResponse::Created(result));
                }
                BackendCommand::UpdateMessage { id, draft } => {
                    let result = api::update_message_data(&client, id, &draft).await;
                    let _ = resp_tx.send(BackendResponse::Updated { id, result });
                }
                BackendCommand::DeleteMessage { id } => {
                    let result = api::delete_message_data(&client, id).await;
                    let _ = resp_tx.send(BackendResponse::Deleted { id, result });
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_send_reaches_receiver() {
        let (handle, mut cmd_rx, _resp_tx, _resp_rx) = test_pair();

        handle.send(BackendCommand::LoadMessages { skip: 0, limit: 10 });
        handle.send(BackendCommand::DeleteMessage { id: 4 });

        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadMessages { skip: 0, limit: 10 })
        ));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::DeleteMessage { id: 4 })
        ));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_send_on_closed_channel_does_not_panic() {
        let (handle, cmd_rx, _resp_tx, _resp_rx) = test_pair();
        drop(cmd_rx);
        handle.send(BackendCommand::LoadMessages { skip: 0, limit: 10 });
    }
}
