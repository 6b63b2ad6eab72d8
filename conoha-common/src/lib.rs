use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// -----------------------------------------------------------------------------
// Requests
// -----------------------------------------------------------------------------

/// Body of `POST /minecraft`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, ToSchema)]
pub struct MinecraftRequest {
    #[serde(default)]
    #[schema(example = "!conoha server")]
    pub command: String,
}

impl MinecraftRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// Stream messages
// -----------------------------------------------------------------------------

/// The single result message emitted on a `Minecraft` stream.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct MinecraftResponse {
    pub message: String,
    #[serde(rename = "isNormal")]
    pub is_normal: bool,
}

/// Terminal error kinds a stream can close with.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCode {
    Unimplemented,
    Unauthenticated,
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unimplemented => "unimplemented",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Payload of the terminal `error` event.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct StreamError {
    pub code: ErrorCode,
    pub message: String,
}

impl StreamError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// SSE event names
pub const EVENT_RESULT: &str = "result";
pub const EVENT_ERROR: &str = "error";
