//! SMS replay - scripted conversation playback for SMS webhooks
//!
//! This library resolves a client's scripted workflow into answers and
//! replays them against an SMS/MMS webhook, printing each reply.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod common;
pub mod playback;
pub mod printer;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use playback::{ResolvedAnswer, TestRun};
