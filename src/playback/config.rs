//! Client file types
//!
//! Defines the data structures for deserializing a client's JSON scenario
//! file (`<client>.json`) and config file (`<base>_config.json`).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::common::{Error, Result};

/// A client scenario loaded from `<client>.json`
#[derive(Deserialize, Debug)]
pub struct ScenarioFile {
    /// Sender identity used for every request
    pub from: String,
    /// Webhook endpoint, also the base of the session reset URL
    pub url: String,
    /// Default image URL for image steps
    #[serde(rename = "mediaURL", alias = "mediaURL0", default)]
    pub media_url: Option<String>,
    /// Named workflows
    #[serde(alias = "answers", default)]
    pub workflows: Workflows,
    /// Remaining keys, including `media_<variant>` image URLs
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Workflow name to ordered answer tokens
///
/// Accepts either a map of workflows or the older list of single-entry
/// maps. In the list form the first occurrence of a name wins.
#[derive(Deserialize, Debug, Default)]
#[serde(from = "WorkflowsRepr")]
pub struct Workflows(HashMap<String, Vec<String>>);

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkflowsRepr {
    Map(HashMap<String, Vec<String>>),
    List(Vec<HashMap<String, Vec<String>>>),
}

impl From<WorkflowsRepr> for Workflows {
    fn from(repr: WorkflowsRepr) -> Self {
        match repr {
            WorkflowsRepr::Map(map) => Workflows(map),
            WorkflowsRepr::List(list) => {
                let mut map = HashMap::new();
                for entry in list {
                    for (name, tokens) in entry {
                        map.entry(name).or_insert(tokens);
                    }
                }
                Workflows(map)
            }
        }
    }
}

impl Workflows {
    /// Raw answer tokens of a workflow
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

impl ScenarioFile {
    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Reading test file: {}", path.display());
        load_json(path)
    }

    /// Image URL for an optional variant
    ///
    /// Without a variant this is `mediaURL`. With one it is the
    /// `media_<variant>` entry, which must exist.
    pub fn media_url_for(&self, variant: Option<&str>) -> Result<Option<String>> {
        let Some(variant) = variant else {
            return Ok(self.media_url.clone());
        };
        let key = format!("media_{}", variant);
        match self.extra.get(&key).and_then(|v| v.as_str()) {
            Some(url) => Ok(Some(url.to_string())),
            None => Err(Error::Config(format!(
                "Image variant '{}' has no '{}' entry in the scenario file",
                variant, key
            ))),
        }
    }
}

/// How webhook payloads are encoded
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    /// JSON object body
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`, as the real SMS provider posts
    Form,
}

/// A client's configuration loaded from `<base>_config.json`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Pause after each request, in milliseconds
    #[serde(alias = "requestInterval", default)]
    pub request_interval_ms: u64,

    /// Contexts that get a per-language default answer
    #[serde(default)]
    pub contexts: Vec<String>,

    /// `<context>_<language>` to default answer
    #[serde(default)]
    pub contexts_mapping: HashMap<String, String>,

    /// Language to token to translated answer
    #[serde(alias = "translation_context", default)]
    pub translation: HashMap<String, HashMap<String, String>>,

    /// Lowercase country code to webhook query string
    #[serde(default)]
    pub query_string: HashMap<String, String>,

    /// Payload encoding for webhook requests
    #[serde(default)]
    pub payload_encoding: PayloadEncoding,

    /// Agent environment name to profile
    #[serde(default)]
    pub dialogflow: HashMap<String, AgentProfile>,
}

/// Conversational agent profile for one environment
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub project_id: String,
    #[serde(default)]
    pub user: String,
    pub access_token: Option<String>,
}

impl ClientConfig {
    /// Load a client config file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Reading config file: {}", path.display());
        load_json(path)
    }

    /// Query string configured for a country, if any
    pub fn query_for(&self, country: &str) -> Option<&str> {
        self.query_string
            .get(&country.to_lowercase())
            .map(String::as_str)
    }

    /// Agent profile for an environment
    pub fn agent_profile(&self, environment: &str) -> Result<&AgentProfile> {
        self.dialogflow.get(environment).ok_or_else(|| {
            Error::Config(format!(
                "No dialogflow profile for environment '{}'",
                environment
            ))
        })
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::json_parse(path, e))
}
