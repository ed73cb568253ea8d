//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams committed pool events filtered
//! by event type, and answers `get_state` and `quote` commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
