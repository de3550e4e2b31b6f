//! Webhook requests
//!
//! Payloads mimic what the SMS provider posts to the webhook. Requests go
//! through the [`Transport`] trait so the engine can be driven without a
//! network.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::common::{Error, Result};

use super::config::PayloadEncoding;
use super::resolver::ResolvedAnswer;

const ACCOUNT_SID: &str = "test";
const TO: &str = "test";
const FROM_STATE: &str = "FL";
const MEDIA_CONTENT_TYPE: &str = "jpg";

/// Body of one webhook request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookPayload {
    #[serde(rename = "AccountSid")]
    pub account_sid: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "FromState")]
    pub from_state: String,
    #[serde(rename = "NumMedia", skip_serializing_if = "Option::is_none")]
    pub num_media: Option<String>,
    #[serde(rename = "MediaUrl0", skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(rename = "MediaContentType0", skip_serializing_if = "Option::is_none")]
    pub media_content_type: Option<String>,
}

impl WebhookPayload {
    /// Text message carrying `body`
    pub fn text(from: &str, body: &str) -> Self {
        Self {
            account_sid: ACCOUNT_SID.to_string(),
            from: from.to_string(),
            to: TO.to_string(),
            body: body.to_string(),
            from_state: FROM_STATE.to_string(),
            num_media: None,
            media_url: None,
            media_content_type: None,
        }
    }

    /// Image message with an empty body
    pub fn image(from: &str, media_url: &str) -> Self {
        Self {
            num_media: Some("1".to_string()),
            media_url: Some(media_url.to_string()),
            media_content_type: Some(MEDIA_CONTENT_TYPE.to_string()),
            ..Self::text(from, "")
        }
    }

    /// Payload for a resolved answer
    pub fn for_answer(answer: &ResolvedAnswer, from: &str, media_url: Option<&str>) -> Self {
        match answer {
            ResolvedAnswer::Text(body) => Self::text(from, body),
            ResolvedAnswer::Image => Self::image(from, media_url.unwrap_or_default()),
        }
    }
}

/// Status and raw body of an HTTP response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends webhook and session reset requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a payload to the webhook
    async fn post(
        &self,
        url: &str,
        payload: &WebhookPayload,
        encoding: PayloadEncoding,
    ) -> Result<Reply>;

    /// DELETE with a JSON body
    async fn delete(&self, url: &str, body: &serde_json::Value) -> Result<Reply>;
}

/// [`Transport`] over reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("sms-replay")
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn finish(url: &str, request: reqwest::RequestBuilder) -> Result<Reply> {
        let response = request.send().await.map_err(|e| Error::transport(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(url, e))?;
        Ok(Reply {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        payload: &WebhookPayload,
        encoding: PayloadEncoding,
    ) -> Result<Reply> {
        let request = self.client.post(url);
        let request = match encoding {
            PayloadEncoding::Json => request.json(payload),
            PayloadEncoding::Form => request.form(payload),
        };
        Self::finish(url, request).await
    }

    async fn delete(&self, url: &str, body: &serde_json::Value) -> Result<Reply> {
        Self::finish(url, self.client.delete(url).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_payload_keys() {
        let payload = WebhookPayload::for_answer(&ResolvedAnswer::text("Hello!"), "+1555", None);
        assert!(payload.num_media.is_none());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "AccountSid": "test",
                "From": "+1555",
                "To": "test",
                "Body": "Hello!",
                "FromState": "FL",
            })
        );
    }

    #[test]
    fn test_image_payload_keys() {
        let payload = WebhookPayload::for_answer(
            &ResolvedAnswer::Image,
            "+1555",
            Some("http://img/a.jpg"),
        );
        assert_eq!(payload.num_media.as_deref(), Some("1"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Body"], "");
        assert_eq!(json["From"], "+1555");
        assert_eq!(json["NumMedia"], "1");
        assert_eq!(json["MediaUrl0"], "http://img/a.jpg");
        assert_eq!(json["MediaContentType0"], "jpg");
    }

    #[test]
    fn test_literal_image_text_is_not_an_image() {
        // Only the sentinel sends media; a resolved text that happens to read
        // "image" is a message body.
        let payload = WebhookPayload::for_answer(&ResolvedAnswer::text("image"), "+1555", None);
        assert!(payload.num_media.is_none());
        assert_eq!(payload.body, "image");
    }

    #[test]
    fn test_reply_success_range() {
        let reply = |status| Reply {
            status,
            body: Vec::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(302).is_success());
        assert!(!reply(500).is_success());
    }
}
