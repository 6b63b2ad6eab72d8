use crate::{ActionOutcome, ComputeProvider, Credentials, IdentityProvider, ServerStatus, Token};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Token handed out by [`MockProvider`]; compute calls reject anything else.
pub const MOCK_TOKEN: &str = "mock-token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockCall {
    GetToken,
    GetServerStatus,
    StartServer,
    StopServer,
    RebootServer,
}

/// Scripted in-memory provider for local runs and tests.
///
/// Records every call so callers can assert how many provider round-trips a
/// request cost.
pub struct MockProvider {
    server_status: String,
    status_code: u16,
    action_code: u16,
    action_text: String,
    fail_auth: bool,
    fail_transport: bool,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            server_status: "ACTIVE".to_string(),
            status_code: 200,
            action_code: crate::ACCEPTED,
            action_text: "202 Accepted".to_string(),
            fail_auth: false,
            fail_transport: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_server_status(mut self, status: impl Into<String>) -> Self {
        self.server_status = status.into();
        self
    }

    /// Status lookup answers with `code`; a non-2xx answer carries no status, as with ConoHa.
    pub fn with_status_response(mut self, code: u16, status: impl Into<String>) -> Self {
        self.status_code = code;
        self.server_status = status.into();
        self
    }

    pub fn with_action_response(mut self, code: u16, text: impl Into<String>) -> Self {
        self.action_code = code;
        self.action_text = text.into();
        self
    }

    /// Token requests fail as if the credentials were rejected.
    pub fn failing_auth(mut self) -> Self {
        self.fail_auth = true;
        self
    }

    /// Compute calls fail as if the endpoint were unreachable.
    pub fn failing_transport(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Compute calls only, in order.
    pub fn compute_calls(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != MockCall::GetToken)
            .collect()
    }

    fn record(&self, call: MockCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(e) => e.into_inner().push(call),
        }
    }

    fn check(&self, call: MockCall, token: &Token) -> Result<()> {
        self.record(call);
        if self.fail_transport {
            return Err(anyhow::anyhow!("mock: connection refused"));
        }
        if token.as_str() != MOCK_TOKEN {
            return Err(anyhow::anyhow!("mock: unexpected token"));
        }
        Ok(())
    }

    fn action(&self, call: MockCall, token: &Token) -> Result<ActionOutcome> {
        self.check(call, token)?;
        Ok(ActionOutcome {
            text: self.action_text.clone(),
            status_code: self.action_code,
        })
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn get_token(&self, credentials: &Credentials) -> Result<Token> {
        self.record(MockCall::GetToken);
        if self.fail_auth {
            return Err(anyhow::anyhow!(
                "mock: credentials rejected for {}",
                credentials.username
            ));
        }
        Ok(Token::new(MOCK_TOKEN))
    }
}

#[async_trait]
impl ComputeProvider for MockProvider {
    async fn get_server_status(&self, token: &Token) -> Result<ServerStatus> {
        self.check(MockCall::GetServerStatus, token)?;
        let status = if (200..300).contains(&self.status_code) {
            self.server_status.clone()
        } else {
            String::new()
        };
        Ok(ServerStatus {
            status,
            status_code: self.status_code,
        })
    }

    async fn start_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.action(MockCall::StartServer, token)
    }

    async fn stop_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.action(MockCall::StopServer, token)
    }

    async fn reboot_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.action(MockCall::RebootServer, token)
    }
}
