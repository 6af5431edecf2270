//! companion-core — the footer's domain logic, no UI.
//!
//! Holds the attachment pipeline (picker, reader, aggregator, dispatcher),
//! the seams to the communication channel and conversation log, and the
//! footer view-model. Frontends subscribe to events via tokio::broadcast.

pub mod aggregate;
pub mod channel;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod footer;
pub mod history;
pub mod i18n;
pub mod picker;
pub mod pipeline;
pub mod reader;
pub mod types;
