//! Conversational agent REST client
//!
//! Talks to the agent's v2 REST API with a bearer token: detect-intent for
//! a single text query and delete-all-contexts to expire a session.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::common::{Error, Result};
use crate::playback::config::AgentProfile;

/// Lifespan given to an input context sent with a query
const CONTEXT_LIFESPAN: u32 = 3;

/// Environment that uses the draft agent session path
const DEV_ENVIRONMENT: &str = "dev";

/// Environment variable holding a bearer token
const TOKEN_ENV: &str = "DIALOGFLOW_ACCESS_TOKEN";

/// Identifies one agent session
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub project_id: String,
    pub environment: String,
    pub user: String,
    pub session_id: String,
}

impl AgentSession {
    pub fn new(profile: &AgentProfile, environment: &str, session_id: &str) -> Self {
        Self {
            project_id: profile.project_id.clone(),
            environment: environment.to_string(),
            user: profile.user.clone(),
            session_id: session_id.to_string(),
        }
    }

    /// Resource path of the session
    pub fn path(&self) -> String {
        if self.environment == DEV_ENVIRONMENT {
            format!(
                "projects/{}/agent/sessions/{}",
                self.project_id, self.session_id
            )
        } else {
            format!(
                "projects/{}/agent/environments/{}/users/{}/sessions/{}",
                self.project_id, self.environment, self.user, self.session_id
            )
        }
    }
}

/// Pick the bearer token: flag, then environment, then profile
pub fn resolve_token(flag: Option<String>, profile: &AgentProfile) -> Result<String> {
    flag.or_else(|| std::env::var(TOKEN_ENV).ok())
        .or_else(|| profile.access_token.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "No access token. Pass --token, set {} or add accessToken to the profile",
                TOKEN_ENV
            ))
        })
}

/// Body of a detect-intent request
fn detect_intent_body(
    session_path: &str,
    text: &str,
    language: &str,
    context: Option<&str>,
) -> Value {
    let mut body = json!({
        "queryInput": {
            "text": {
                "text": text,
                "languageCode": language,
            }
        }
    });
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        body["queryParams"] = json!({
            "contexts": [{
                "name": format!("{}/contexts/{}", session_path, context),
                "lifespanCount": CONTEXT_LIFESPAN,
            }]
        });
    }
    body
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DetectIntentResponse {
    #[serde(default)]
    query_result: QueryResult,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    #[serde(default)]
    fulfillment_text: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Pull the message out of an API error body, falling back to the status
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("status {}", status))
}

/// Client for one agent endpoint
pub struct AgentClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl AgentClient {
    pub fn new(endpoint: &str, token: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Send one text query and return the fulfillment text
    pub async fn detect_intent(
        &self,
        session: &AgentSession,
        text: &str,
        language: &str,
        context: Option<&str>,
    ) -> Result<String> {
        let path = session.path();
        let url = format!("{}/{}:detectIntent", self.endpoint, path);
        debug!("Detect intent url: {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&detect_intent_body(&path, text, language, context))
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(&url, e))?;
        if !status.is_success() {
            return Err(Error::agent_request_failed(
                "detectIntent",
                &error_message(status, &body),
            ));
        }

        let parsed: DetectIntentResponse = serde_json::from_str(&body)?;
        Ok(parsed.query_result.fulfillment_text)
    }

    /// Delete every context of the session
    pub async fn delete_all_contexts(&self, session: &AgentSession) -> Result<()> {
        let url = format!("{}/{}/contexts", self.endpoint, session.path());
        debug!("Delete contexts url: {}", url);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::agent_request_failed(
            "deleteAllContexts",
            &error_message(status, &body),
        ))
    }
}
