//! Playback engine
//!
//! Sends a prepared run's answers one at a time, pausing the run's fixed
//! interval after each exchange. Transport and decode failures are
//! reported for the step and playback moves on; only configuration
//! errors and the strict policies end a run early.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::common::config::ResetPolicy;
use crate::common::{Error, Result};
use crate::printer;

use super::render::{render, Rendered};
use super::request::{Transport, WebhookPayload};
use super::resolver::{ResolvedAnswer, TestRun};

/// Policies for one playback
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackOptions {
    pub reset: ResetPolicy,
    /// Abort when a reply carries an empty message
    pub strict: bool,
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Rendered(Rendered),
    TransportFailed(String),
    RenderFailed(String),
}

/// Result of one step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub answer: ResolvedAnswer,
    pub status: StepStatus,
}

impl StepOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self.status, StepStatus::Rendered(_))
    }
}

/// Result of a playback
#[derive(Debug, Default)]
pub struct PlaybackReport {
    pub steps: Vec<StepOutcome>,
}

impl PlaybackReport {
    /// Number of steps whose reply was rendered
    pub fn rendered(&self) -> usize {
        self.steps.iter().filter(|s| s.is_rendered()).count()
    }

    /// Number of steps that failed in transport or decoding
    pub fn failed(&self) -> usize {
        self.steps.len() - self.rendered()
    }
}

#[derive(Deserialize, Default)]
struct DeleteSessionReply {
    #[serde(default)]
    message: String,
}

/// Reset the session if the policy asks for it, then play the run
///
/// A reset attempt is followed by one interval before the first answer.
pub async fn run<T: Transport + ?Sized>(
    transport: &T,
    test_run: &TestRun,
    options: &PlaybackOptions,
) -> Result<PlaybackReport> {
    match options.reset {
        ResetPolicy::Skip => info!("Skipping session reset"),
        ResetPolicy::Lenient => {
            if let Err(e) = reset_session(transport, test_run).await {
                warn!("{}", e);
            }
            tokio::time::sleep(test_run.interval).await;
        }
        ResetPolicy::Strict => {
            reset_session(transport, test_run).await?;
            tokio::time::sleep(test_run.interval).await;
        }
    }

    play(transport, test_run, options.strict).await
}

/// Clear server-side session state for the run's sender
pub async fn reset_session<T: Transport + ?Sized>(transport: &T, test_run: &TestRun) -> Result<()> {
    let url = format!("{}/delete-session", test_run.base_url.trim_end_matches('/'));
    info!("Delete session url: {}", url);

    let body = serde_json::json!({ "userId": test_run.from });
    let reply = transport
        .delete(&url, &body)
        .await
        .map_err(|e| Error::SessionReset(e.to_string()))?;

    let message = serde_json::from_slice::<DeleteSessionReply>(&reply.body)
        .unwrap_or_default()
        .message;

    if reply.status == 200 {
        info!("Delete session response: {}", message);
        Ok(())
    } else {
        Err(Error::SessionReset(format!(
            "status {}: {}",
            reply.status, message
        )))
    }
}

/// Send every answer in order
pub async fn play<T: Transport + ?Sized>(
    transport: &T,
    test_run: &TestRun,
    strict: bool,
) -> Result<PlaybackReport> {
    info!("Test Start");
    printer::divider();

    let mut report = PlaybackReport::default();
    let media_url = test_run.media_url.as_deref();

    for (i, answer) in test_run.answers.iter().enumerate() {
        let step = i + 1;
        printer::show_answer(answer, media_url);

        let payload = WebhookPayload::for_answer(answer, &test_run.from, media_url);
        let status = match transport
            .post(&test_run.url, &payload, test_run.encoding)
            .await
        {
            Err(e) => {
                error!(step, "Http post error: {}", e);
                StepStatus::TransportFailed(e.to_string())
            }
            Ok(reply) if !reply.is_success() => {
                let e = Error::HttpStatus {
                    url: test_run.url.clone(),
                    status: reply.status,
                };
                warn!(step, "{}", e);
                StepStatus::TransportFailed(e.to_string())
            }
            Ok(reply) => match render(&reply.body) {
                Ok(rendered) => {
                    printer::show_rendered(&rendered);
                    if rendered.empty && strict {
                        return Err(Error::EmptyMessage);
                    }
                    StepStatus::Rendered(rendered)
                }
                Err(e) => {
                    warn!(step, "{}", e);
                    StepStatus::RenderFailed(e.to_string())
                }
            },
        };

        printer::divider();
        report.steps.push(StepOutcome {
            answer: answer.clone(),
            status,
        });

        tokio::time::sleep(test_run.interval).await;
    }

    info!(
        "Test End: {} of {} replies rendered",
        report.rendered(),
        report.steps.len()
    );
    Ok(report)
}
