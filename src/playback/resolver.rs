//! Answer resolution
//!
//! Turns a workflow's raw answer tokens into the answers actually sent.
//! Each token goes through the same layers in the same order: the
//! per-language context default, then the language translation, then the
//! token itself.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::common::{with_query, Error, Result};

use super::config::{ClientConfig, PayloadEncoding, ScenarioFile};

/// Raw token that sends an image instead of text
pub const IMAGE_TOKEN: &str = "image";

/// One playback step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAnswer {
    /// Literal message body
    Text(String),
    /// Send the run's image
    Image,
}

impl ResolvedAnswer {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }
}

/// Per-language lookup tables, built once per run
#[derive(Debug)]
pub struct Resolver<'a> {
    contexts: HashMap<&'a str, &'a str>,
    translation: &'a HashMap<String, String>,
}

impl<'a> Resolver<'a> {
    /// Build the tables for a language
    ///
    /// Fails when the config has no translation table for the language.
    pub fn new(config: &'a ClientConfig, language: &str) -> Result<Self> {
        let language = language.to_lowercase();
        let translation = config
            .translation
            .get(&language)
            .filter(|table| !table.is_empty())
            .ok_or_else(|| Error::TranslationMissing(language.clone()))?;

        let contexts = config
            .contexts
            .iter()
            .map(|name| {
                let key = format!("{}_{}", name, language);
                let value = config
                    .contexts_mapping
                    .get(&key)
                    .map(String::as_str)
                    .unwrap_or("");
                (name.as_str(), value)
            })
            .collect();

        Ok(Self {
            contexts,
            translation,
        })
    }

    /// Resolve a single raw token
    pub fn resolve_token(&self, token: &str) -> ResolvedAnswer {
        if token == IMAGE_TOKEN {
            return ResolvedAnswer::Image;
        }
        if let Some(value) = self.contexts.get(token).filter(|v| !v.is_empty()) {
            return ResolvedAnswer::text(*value);
        }
        if let Some(value) = self.translation.get(token).filter(|v| !v.is_empty()) {
            return ResolvedAnswer::text(value.as_str());
        }
        ResolvedAnswer::text(token)
    }

    /// Resolve an ordered token list, preserving order and repeats
    pub fn resolve(&self, tokens: &[String]) -> Vec<ResolvedAnswer> {
        tokens.iter().map(|t| self.resolve_token(t)).collect()
    }
}

/// What to replay
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    pub workflow: &'a str,
    pub language: &'a str,
    pub country: &'a str,
    /// `media_<variant>` key selecting the image
    pub image: Option<&'a str>,
}

/// Everything playback needs, built once and never mutated
#[derive(Debug, Clone)]
pub struct TestRun {
    pub from: String,
    /// Webhook URL including the country query string
    pub url: String,
    /// Webhook URL as written in the scenario file
    pub base_url: String,
    pub media_url: Option<String>,
    pub interval: Duration,
    pub encoding: PayloadEncoding,
    pub answers: Vec<ResolvedAnswer>,
}

impl TestRun {
    /// Build the run for a workflow
    pub fn prepare(
        scenario: &ScenarioFile,
        config: &ClientConfig,
        options: &RunOptions<'_>,
    ) -> Result<Self> {
        info!("Preparing test data...");

        let tokens = scenario
            .workflows
            .get(options.workflow)
            .ok_or_else(|| Error::WorkflowNotFound(options.workflow.to_string()))?;

        let resolver = Resolver::new(config, options.language)?;
        let answers = resolver.resolve(tokens);
        debug!(?answers, "Resolved answers");

        let media_url = scenario.media_url_for(options.image)?;
        if media_url.is_none() && answers.contains(&ResolvedAnswer::Image) {
            warn!(
                "Workflow '{}' sends an image but the scenario file has no media URL",
                options.workflow
            );
        }

        Ok(Self {
            from: scenario.from.clone(),
            url: with_query(&scenario.url, config.query_for(options.country)),
            base_url: scenario.url.clone(),
            media_url,
            interval: Duration::from_millis(config.request_interval_ms),
            encoding: config.payload_encoding,
            answers,
        })
    }
}
