//! API client module for the archive backend

pub mod client;
mod messages;

pub use messages::{
    create_message, create_message_data, delete_message, delete_message_data, get_message_data,
    list_messages, list_messages_data, show_message, update_message, update_message_data,
};
