// Command dispatcher: chat command -> one authenticated ConoHa call -> one result
use conoha_common::{ErrorCode, MinecraftResponse, StreamError};
use conoha_providers::{CloudProvider, Credentials, ServerAction};
use std::sync::Arc;
use thiserror::Error;

use crate::status_label::display_label;

pub const UNRECOGNIZED_COMMAND_MESSAGE: &str = "登録されていないコマンドです";

/// Recognized chat commands. Matching is exact: no trimming, case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    ServerStatus,
    Start,
    Stop,
    Reboot,
}

impl CommandKind {
    pub fn literal(&self) -> &'static str {
        match self {
            CommandKind::ServerStatus => "!conoha server",
            CommandKind::Start => "!conoha start",
            CommandKind::Stop => "!conoha stop",
            CommandKind::Reboot => "!conoha reboot",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "!conoha server" => Some(CommandKind::ServerStatus),
            "!conoha start" => Some(CommandKind::Start),
            "!conoha stop" => Some(CommandKind::Stop),
            "!conoha reboot" => Some(CommandKind::Reboot),
            _ => None,
        }
    }

    /// The mutating action behind this command, if any.
    pub fn action(&self) -> Option<ServerAction> {
        match self {
            CommandKind::ServerStatus => None,
            CommandKind::Start => Some(ServerAction::Start),
            CommandKind::Stop => Some(ServerAction::Stop),
            CommandKind::Reboot => Some(ServerAction::Reboot),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("authentication failed: {0:#}")]
    Authentication(anyhow::Error),
    #[error("provider call failed: {0:#}")]
    ProviderCall(anyhow::Error),
    #[error("unrecognized command: {0:?}")]
    UnrecognizedCommand(String),
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Authentication(_) => ErrorCode::Unauthenticated,
            DispatchError::ProviderCall(_) => ErrorCode::Unavailable,
            DispatchError::UnrecognizedCommand(_) => ErrorCode::Unimplemented,
        }
    }

    /// What the caller sees. Provider details stay in the logs.
    pub fn to_stream_error(&self) -> StreamError {
        let message = match self {
            DispatchError::Authentication(_) => "ConoHaの認証に失敗しました",
            DispatchError::ProviderCall(_) => "ConoHaのAPI呼び出しに失敗しました",
            DispatchError::UnrecognizedCommand(_) => UNRECOGNIZED_COMMAND_MESSAGE,
        };
        StreamError::new(self.code(), message)
    }
}

/// Stateless per request; the credentials are the only thing it keeps.
pub struct Dispatcher {
    credentials: Credentials,
    provider: Arc<dyn CloudProvider>,
}

impl Dispatcher {
    pub fn new(credentials: Credentials, provider: Arc<dyn CloudProvider>) -> Self {
        Self {
            credentials,
            provider,
        }
    }

    pub async fn dispatch(&self, command: &str) -> Result<MinecraftResponse, DispatchError> {
        // Fresh token every request, and nothing goes out without one.
        let token = self
            .provider
            .get_token(&self.credentials)
            .await
            .map_err(DispatchError::Authentication)?;

        let Some(kind) = CommandKind::parse(command) else {
            return Err(DispatchError::UnrecognizedCommand(command.to_string()));
        };
        tracing::info!(command = kind.literal(), "dispatching");

        match kind.action() {
            None => {
                let status = self
                    .provider
                    .get_server_status(&token)
                    .await
                    .map_err(DispatchError::ProviderCall)?;
                Ok(MinecraftResponse {
                    message: display_label(&status.status).to_string(),
                    is_normal: true,
                })
            }
            Some(action) => {
                let outcome = self
                    .provider
                    .run_action(&token, action)
                    .await
                    .map_err(DispatchError::ProviderCall)?;
                Ok(MinecraftResponse {
                    is_normal: outcome.is_accepted(),
                    message: outcome.text,
                })
            }
        }
    }
}
