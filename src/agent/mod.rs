//! Conversational agent commands
//!
//! Sends text straight to the agent behind the webhook, bypassing the SMS
//! layer, and can expire a session's contexts.

mod client;

pub use client::{resolve_token, AgentClient, AgentSession};
