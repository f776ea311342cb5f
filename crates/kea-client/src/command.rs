//! KEA command envelope and response handling
//!
//! Every Control Agent request is a JSON object of the form
//! `{"command": ..., "service": [...], "arguments": {...}}`. The agent
//! forwards it to each listed daemon and answers with a JSON array holding
//! one `{"result": ..., "text": ..., "arguments": ...}` object per service.

use crate::error::KeaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// KEA daemon a command is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Dhcp4,
}

/// Command envelope sent to the Control Agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeaCommand {
    pub command: String,
    pub service: Vec<Service>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl KeaCommand {
    /// Build a command for the DHCPv4 daemon
    pub fn dhcp4(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            service: vec![Service::Dhcp4],
            arguments: None,
        }
    }

    /// Attach command arguments
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// KEA result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Error,
    Unsupported,
    /// Command succeeded but found nothing (e.g. no leases, nothing deleted)
    Empty,
    Conflict,
    Other(i64),
}

impl From<i64> for ResultCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ResultCode::Success,
            1 => ResultCode::Error,
            2 => ResultCode::Unsupported,
            3 => ResultCode::Empty,
            4 => ResultCode::Conflict,
            other => ResultCode::Other(other),
        }
    }
}

/// A single daemon's answer to a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub result: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl CommandResponse {
    pub fn code(&self) -> ResultCode {
        ResultCode::from(self.result)
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("Unknown error")
    }

    /// True when KEA reported an empty result (code 3)
    pub fn is_empty(&self) -> bool {
        self.code() == ResultCode::Empty
    }

    /// Arguments, or `null` when KEA sent none
    pub fn arguments(&self) -> &Value {
        self.arguments.as_ref().unwrap_or(&Value::Null)
    }
}

/// Decode a Control Agent response body.
///
/// The agent normally answers with an array (one entry per service); agent
/// level errors come back as a bare object. Only the first entry is used
/// since every command here targets a single service.
pub fn parse_response(body: &str) -> Result<CommandResponse, KeaError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        KeaError::InvalidResponse(format!(
            "{} - Response (first 500 chars): {}",
            e,
            body.chars().take(500).collect::<String>()
        ))
    })?;

    let first = match value {
        Value::Array(mut entries) => {
            if entries.is_empty() {
                return Err(KeaError::InvalidResponse(
                    "empty response array".to_string(),
                ));
            }
            entries.swap_remove(0)
        }
        object @ Value::Object(_) => object,
        other => {
            return Err(KeaError::InvalidResponse(format!(
                "expected an array or object, got: {}",
                other
            )));
        }
    };

    Ok(serde_json::from_value(first)?)
}

/// Normalize a response into success or a typed error.
///
/// Codes 0 and 3 are both successes; 3 only means the result set is empty.
/// Some KEA versions report missing hook commands with code 1 and a
/// descriptive text, so the text is inspected as well.
pub fn check(command: &str, response: CommandResponse) -> Result<CommandResponse, KeaError> {
    let code = response.code();
    info!(
        "KEA response for {}: result_code={}, msg={}",
        command,
        response.result,
        response.text.as_deref().unwrap_or("")
    );

    match code {
        ResultCode::Success | ResultCode::Empty => Ok(response),
        ResultCode::Unsupported => {
            debug!("Command {} not supported (result code 2)", command);
            Err(KeaError::Unsupported {
                command: command.to_string(),
                text: response.text().to_string(),
            })
        }
        ResultCode::Conflict => Err(KeaError::Conflict {
            command: command.to_string(),
            text: response.text().to_string(),
        }),
        ResultCode::Error | ResultCode::Other(_) => {
            let text = response.text().to_lowercase();
            if text.contains("not supported") || text.contains("command not found") {
                debug!("Command {} appears unsupported based on error message", command);
                return Err(KeaError::Unsupported {
                    command: command.to_string(),
                    text: response.text().to_string(),
                });
            }
            Err(KeaError::CommandFailed {
                command: command.to_string(),
                code: response.result,
                text: response.text().to_string(),
            })
        }
    }
}
