use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Provider code for "accepted, action in progress" on mutating server actions.
pub const ACCEPTED: u16 = 202;

/// Static credentials used to obtain a token. Read once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub tenant_id: String,
}

impl Credentials {
    pub fn new(username: String, password: String, tenant_id: String) -> Self {
        Self {
            username,
            password,
            tenant_id,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Short-lived auth token. Obtained per request and dropped afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Raw status reported for the managed server, plus the HTTP code of the call.
/// `status` is empty when the provider did not report one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerStatus {
    pub status: String,
    pub status_code: u16,
}

/// Outcome of a mutating server action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub text: String,
    pub status_code: u16,
}

impl ActionOutcome {
    /// True when the provider accepted the action (it may still be running).
    pub fn is_accepted(&self) -> bool {
        self.status_code == ACCEPTED
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerAction {
    Start,
    Stop,
    Reboot,
}

impl ServerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerAction::Start => "start",
            ServerAction::Stop => "stop",
            ServerAction::Reboot => "reboot",
        }
    }
}

/// Issues auth tokens from static credentials. No caching: every call authenticates.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_token(&self, credentials: &Credentials) -> Result<Token>;
}

/// Control endpoints of the single managed server.
///
/// Each method performs exactly one network call and never waits for the
/// action to complete. An `Err` means the call itself failed (transport,
/// unreadable body); provider-side rejections come back as a status code.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    async fn get_server_status(&self, token: &Token) -> Result<ServerStatus>;
    async fn start_server(&self, token: &Token) -> Result<ActionOutcome>;
    async fn stop_server(&self, token: &Token) -> Result<ActionOutcome>;
    async fn reboot_server(&self, token: &Token) -> Result<ActionOutcome>;

    async fn run_action(&self, token: &Token, action: ServerAction) -> Result<ActionOutcome> {
        match action {
            ServerAction::Start => self.start_server(token).await,
            ServerAction::Stop => self.stop_server(token).await,
            ServerAction::Reboot => self.reboot_server(token).await,
        }
    }
}

/// A full provider: identity plus compute.
pub trait CloudProvider: IdentityProvider + ComputeProvider {}

impl<T: IdentityProvider + ComputeProvider> CloudProvider for T {}

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "conoha")]
pub mod conoha;
