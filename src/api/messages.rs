//! Message CRUD operations against the archive backend.
//!
//! Each operation comes in two layers: a `*_data` function that returns
//! structured results (used by the TUI backend bridge) and a printing
//! wrapper for the CLI subcommands.

use anyhow::{Context, Result};

use super::client::ArchiveClient;
use crate::models::{format_display_date, ArchivedMessage, MessageDraft};

/// Fetch a page of message records.
pub async fn list_messages_data(
    client: &ArchiveClient,
    skip: usize,
    limit: usize,
) -> Result<Vec<ArchivedMessage>> {
    let url = format!("{}?skip={}&limit={}", client.collection_url(), skip, limit);
    let resp = client.get(&url).await?;
    resp.json()
        .await
        .context("Failed to parse message list response")
}

/// Fetch a single record by id.
pub async fn get_message_data(client: &ArchiveClient, id: i64) -> Result<ArchivedMessage> {
    let resp = client.get(&client.record_url(id)).await?;
    resp.json().await.context("Failed to parse message response")
}

/// Create a record. The server assigns the id.
pub async fn create_message_data(
    client: &ArchiveClient,
    draft: &MessageDraft,
) -> Result<ArchivedMessage> {
    let resp = client.post(&client.collection_url(), draft).await?;
    resp.json()
        .await
        .context("Failed to parse created message response")
}

/// Replace a record in full (no partial patch).
pub async fn update_message_data(
    client: &ArchiveClient,
    id: i64,
    draft: &MessageDraft,
) -> Result<ArchivedMessage> {
    let resp = client.put(&client.record_url(id), draft).await?;
    resp.json()
        .await
        .context("Failed to parse updated message response")
}

/// Delete a record by id.
pub async fn delete_message_data(client: &ArchiveClient, id: i64) -> Result<()> {
    client.delete(&client.record_url(id)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI printing wrappers
// ---------------------------------------------------------------------------

/// Render one record as indented card lines for terminal output.
pub fn card_lines(msg: &ArchivedMessage) -> Vec<String> {
    vec![
        format!("#{}  {}", msg.id, msg.channel_title),
        format!("  Username: {}", msg.channel_username),
        format!("  Message ID: {}", msg.message_id),
        format!("  Message: {}", msg.message),
        format!("  Date: {}", format_display_date(&msg.message_date)),
        format!("  Media Path: {}", msg.media_path),
        format!("  Emoji Used: {}", msg.emoji_used),
        format!("  YouTube Links: {}", msg.youtube_links),
    ]
}

/// List records and print them as cards (prints to stdout).
pub async fn list_messages(client: &ArchiveClient, skip: usize, limit: usize) -> Result<()> {
    let messages = list_messages_data(client, skip, limit).await?;

    println!("\nArchived Messages:");
    println!("{:-<60}", "");

    if messages.is_empty() {
        println!("  (no messages found)");
        return Ok(());
    }

    for msg in &messages {
        for line in card_lines(msg) {
            println!("{}", line);
        }
        println!();
    }

    Ok(())
}

/// Print a single record.
pub async fn show_message(client: &ArchiveClient, id: i64) -> Result<()> {
    let msg = get_message_data(client, id).await?;
    for line in card_lines(&msg) {
        println!("{}", line);
    }
    Ok(())
}

/// Create a record and report the assigned id.
pub async fn create_message(client: &ArchiveClient, draft: &MessageDraft) -> Result<()> {
    let created = create_message_data(client, draft).await?;
    tracing::info!("Created message id={}", created.id);
    println!("Message created with id {}.", created.id);
    Ok(())
}

/// Update a record in place.
pub async fn update_message(client: &ArchiveClient, id: i64, draft: &MessageDraft) -> Result<()> {
    let updated = update_message_data(client, id, draft).await?;
    tracing::info!("Updated message id={}", updated.id);
    println!("Message {} updated.", updated.id);
    Ok(())
}

/// Delete a record.
pub async fn delete_message(client: &ArchiveClient, id: i64) -> Result<()> {
    delete_message_data(client, id).await?;
    tracing::info!("Deleted message id={}", id);
    println!("Message {} deleted.", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_list_parses() {
        let messages: Vec<ArchivedMessage> = serde_json::from_str("[]").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_card_lines_render_all_nine_fields() {
        let msg = ArchivedMessage {
            id: 12,
            channel_title: "Ferris Daily".to_string(),
            channel_username: "@ferris".to_string(),
            message_id: 801,
            message: "crab facts".to_string(),
            message_date: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
            media_path: String::new(),
            emoji_used: "🦀".to_string(),
            youtube_links: String::new(),
        };
        let lines = card_lines(&msg);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "#12  Ferris Daily");
        assert_eq!(lines[4], "  Date: 2024-06-01 08:00:00");
        // Empty fields still render their label.
        assert_eq!(lines[5], "  Media Path: ");
    }
}
