//! Client for the remote execution service.
//!
//! [`ExecutionClient::execute`] is total: whatever the transport does, the
//! caller gets an [`ExecutionOutcome`] whose strings can be shown as-is.
//! Network plumbing sits behind the [`Transport`] trait so tests can swap
//! in a [`mock::StubTransport`].

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const SERVER_ERROR_MESSAGE: &str = "Server error: Please check the server logs for details.";
pub const CONNECT_ERROR_MESSAGE: &str = "Error: Could not connect to the execution service.";
pub const TIMEOUT_MESSAGE: &str = "Error: The execution service did not respond in time.";
pub const APPLICATION_ERROR_MESSAGE: &str = "Error: The execution service reported an error.";
pub const MISSING_OUTPUTS_MESSAGE: &str = "Error: The execution service response had no outputs.";

/// How many characters of source to include in request logs.
const LOG_PREVIEW_CHARS: usize = 100;

/// JSON body of an execution request.
#[derive(Serialize)]
pub struct ExecuteRequest<'a> {
    pub language: &'a str,
    pub code: &'a str,
    pub inputs: &'a [String],
    pub key: &'a str,
}

impl fmt::Debug for ExecuteRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteRequest")
            .field("language", &self.language)
            .field("code", &preview(self.code))
            .field("inputs", &self.inputs)
            .field("key", &"***")
            .finish()
    }
}

/// JSON body the service answers with, success or not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub outputs: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServerReply {
    pub fn ok(outputs: Vec<String>) -> Self {
        Self {
            status: Some(serde_json::Value::from("ok")),
            outputs: Some(outputs),
            message: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: Some(serde_json::Value::from("error")),
            outputs: None,
            message: Some(message.to_string()),
        }
    }

    /// Only the exact string `"error"` marks an application failure.
    pub fn is_error(&self) -> bool {
        self.status.as_ref().and_then(|s| s.as_str()) == Some("error")
    }
}

/// A fault below the application protocol.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("Request failed with status code {code}")]
    Status { code: u16, message: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

/// Moves one request to the service and back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &ExecuteRequest<'_>) -> Result<ServerReply, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, request: &ExecuteRequest<'_>) -> Result<ServerReply, TransportError> {
        (**self).post(request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service ran the request and reported a failure.
    Application,
    /// The request never produced a usable reply.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success { outputs: Vec<String> },
    Failure { kind: FailureKind, messages: Vec<String> },
}

impl ExecutionOutcome {
    fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExecutionOutcome::Failure {
            kind,
            messages: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    /// The strings to display: outputs on success, messages on failure.
    pub fn lines(&self) -> &[String] {
        match self {
            ExecutionOutcome::Success { outputs } => outputs,
            ExecutionOutcome::Failure { messages, .. } => messages,
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            ExecutionOutcome::Success { outputs } => outputs,
            ExecutionOutcome::Failure { messages, .. } => messages,
        }
    }
}

/// Fold every transport result into an outcome. Priority:
/// application error, server-supplied message, 5xx, connection failure,
/// then anything else by description.
pub fn normalize(result: Result<ServerReply, TransportError>) -> ExecutionOutcome {
    match result {
        Ok(reply) if reply.is_error() => ExecutionOutcome::failure(
            FailureKind::Application,
            reply
                .message
                .unwrap_or_else(|| APPLICATION_ERROR_MESSAGE.to_string()),
        ),
        Ok(reply) => match reply.outputs {
            Some(outputs) => ExecutionOutcome::Success { outputs },
            None => ExecutionOutcome::failure(FailureKind::Transport, MISSING_OUTPUTS_MESSAGE),
        },
        Err(TransportError::Status {
            message: Some(message),
            ..
        }) => ExecutionOutcome::failure(FailureKind::Transport, message),
        Err(TransportError::Status { code, .. }) if code >= 500 => {
            ExecutionOutcome::failure(FailureKind::Transport, SERVER_ERROR_MESSAGE)
        }
        Err(TransportError::Connect(_)) => {
            ExecutionOutcome::failure(FailureKind::Transport, CONNECT_ERROR_MESSAGE)
        }
        Err(TransportError::Timeout) => {
            ExecutionOutcome::failure(FailureKind::Transport, TIMEOUT_MESSAGE)
        }
        Err(other) => ExecutionOutcome::failure(FailureKind::Transport, format!("Error: {other}")),
    }
}

/// Sends code to the execution service.
pub struct ExecutionClient {
    transport: Box<dyn Transport>,
    key: String,
}

impl ExecutionClient {
    pub fn new(transport: Box<dyn Transport>, key: impl Into<String>) -> Self {
        Self {
            transport,
            key: key.into(),
        }
    }

    pub async fn execute(&self, language: &str, code: &str, inputs: &[String]) -> ExecutionOutcome {
        let request = ExecuteRequest {
            language,
            code,
            inputs,
            key: &self.key,
        };
        debug!(?request, "sending execution request");

        let outcome = normalize(self.transport.post(&request).await);
        match &outcome {
            ExecutionOutcome::Success { outputs } => {
                debug!(outputs = outputs.len(), "execution finished");
            }
            ExecutionOutcome::Failure { kind, messages } => {
                warn!(?kind, message = %messages.join("; "), "execution failed");
            }
        }
        outcome
    }
}

/// First [`LOG_PREVIEW_CHARS`] characters of `code`, with an ellipsis if cut.
fn preview(code: &str) -> String {
    let mut chars = code.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
