//! Multipart payload assembly for the analysis endpoint.

use reqwest::multipart::{Form, Part};

use crate::models::AnalysisRequest;
use crate::services::errors::TransportError;

pub const FIELD_PROMPT: &str = "prompt";
pub const FIELD_LOG_TEXT: &str = "log_text";
pub const FIELD_LOG_FILES: &str = "log_files";

const DEFAULT_FILE_MIME: &str = "application/octet-stream";

/// One field of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => *name,
        }
    }
}

/// Ordered multipart body, independent of any HTTP client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<FormPart>,
}

impl MultipartPayload {
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(FormPart::name).collect()
    }

    /// Convert into a reqwest form, preserving part order.
    pub fn into_form(self) -> Result<Form, TransportError> {
        self.parts.into_iter().try_fold(Form::new(), |form, part| match part {
            FormPart::Text { name, value } => Ok(form.text(name, value)),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(|e| TransportError::InvalidPart(e.to_string()))?;
                Ok(form.part(name, part))
            }
        })
    }
}

/// Build the payload: `prompt` always, `log_text` only when non-empty, then
/// one `log_files` part per file in selection order.
pub fn build_payload(request: AnalysisRequest) -> MultipartPayload {
    let mut parts = Vec::with_capacity(2 + request.log_files.len());

    parts.push(FormPart::Text {
        name: FIELD_PROMPT,
        value: request.prompt,
    });

    if !request.log_text.is_empty() {
        parts.push(FormPart::Text {
            name: FIELD_LOG_TEXT,
            value: request.log_text,
        });
    }

    for file in request.log_files {
        parts.push(FormPart::File {
            name: FIELD_LOG_FILES,
            file_name: file.name,
            content_type: file
                .content_type
                .unwrap_or_else(|| DEFAULT_FILE_MIME.to_string()),
            bytes: file.bytes,
        });
    }

    MultipartPayload { parts }
}
