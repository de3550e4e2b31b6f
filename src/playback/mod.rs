//! Webhook conversation playback
//!
//! Loads a client's scenario and config, resolves a workflow into the
//! answers to send, and replays them against the webhook one at a time,
//! printing each prompt the endpoint sends back.

pub mod config;
pub mod render;
pub mod request;
pub mod resolver;
mod runner;

pub use config::{ClientConfig, PayloadEncoding, ScenarioFile};
pub use render::{render, Rendered};
pub use request::{HttpTransport, Reply, Transport, WebhookPayload};
pub use resolver::{ResolvedAnswer, Resolver, RunOptions, TestRun};
pub use runner::{
    play, reset_session, run, PlaybackOptions, PlaybackReport, StepOutcome, StepStatus,
};
