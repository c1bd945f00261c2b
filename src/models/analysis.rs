//! Request and response models for the analysis endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::errors::ValidationError;

/// A log file chosen by the user, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LogFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Raw form inputs as the user left them.
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    pub prompt: String,
    pub log_text: String,
    pub log_files: Vec<LogFile>,
}

/// A validated submission. Only constructed through [`AnalysisRequest::from_inputs`].
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub log_text: String,
    pub log_files: Vec<LogFile>,
}

impl AnalysisRequest {
    /// Validate the form inputs and snapshot them into a request.
    ///
    /// Log content is checked before the prompt so the user is first told
    /// to provide something to analyze.
    pub fn from_inputs(inputs: &FormInputs) -> Result<Self, ValidationError> {
        if inputs.log_files.is_empty() && inputs.log_text.trim().is_empty() {
            return Err(ValidationError::MissingLogs);
        }
        if inputs.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        Ok(Self {
            prompt: inputs.prompt.clone(),
            log_text: inputs.log_text.clone(),
            log_files: inputs.log_files.clone(),
        })
    }
}

/// Body returned by the analysis service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "lenient_error")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: Option<Stats>,
}

impl AnalysisResponse {
    /// The service-reported error, if any. Empty strings do not count.
    pub fn service_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Aggregate counts for the submitted log content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_lines: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub error_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub warning_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub critical_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub info_count: u64,
}

fn lenient_stats<'de, D>(deserializer: D) -> Result<Option<Stats>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(value @ Value::Object(_)) => Stats::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Strings are kept as is. Falsy values (`null`, `false`, `0`, `""`) mean
/// no error; an object with a string `message` yields that message; any
/// other value is reported as its JSON text.
fn lenient_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Object(ref map) => match map.get("message") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            _ => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

/// Numbers and numeric strings count; fractions truncate. Missing, negative,
/// and non-numeric values all count as zero.
fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate_count)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(truncate_count),
        _ => None,
    }
    .unwrap_or(0)
}

fn truncate_count(f: f64) -> Option<u64> {
    (f.is_finite() && f > 0.0).then(|| f as u64)
}
