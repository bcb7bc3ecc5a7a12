//! Data models for archive entities

mod message;

pub use message::*;
