use crate::{ActionOutcome, ComputeProvider, Credentials, IdentityProvider, ServerAction, ServerStatus, Token};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::json;

pub const DEFAULT_IDENTITY_URL: &str = "https://identity.tyo1.conoha.io/v2.0";
pub const DEFAULT_COMPUTE_URL: &str = "https://compute.tyo1.conoha.io/v2";

/// ConoHa (OpenStack) client for a single server.
pub struct ConohaProvider {
    client: Client,
    identity_url: String,
    compute_url: String,
    tenant_id: String,
    server_id: String,
}

impl ConohaProvider {
    pub fn new(
        identity_url: String,
        compute_url: String,
        tenant_id: String,
        server_id: String,
    ) -> Result<Self> {
        // Transport defaults only: no per-command timeout.
        let client = Client::builder()
            .user_agent(concat!("conoha-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build ConoHa HTTP client")?;
        Ok(Self {
            client,
            identity_url: identity_url.trim().trim_end_matches('/').to_string(),
            compute_url: compute_url.trim().trim_end_matches('/').to_string(),
            tenant_id: tenant_id.trim().to_string(),
            server_id: server_id.trim().to_string(),
        })
    }

    fn server_url(&self) -> String {
        format!(
            "{}/{}/servers/{}",
            self.compute_url, self.tenant_id, self.server_id
        )
    }

    fn headers(&self, token: &Token) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Auth-Token",
            HeaderValue::from_str(token.as_str()).context("token is not a valid header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn post_action(&self, token: &Token, action: ServerAction) -> Result<ActionOutcome> {
        let url = format!("{}/action", self.server_url());
        let body = action_body(action);

        tracing::info!(
            "[ConoHa API] POST {} - {} server: server_id={}",
            url,
            action.as_str(),
            self.server_id
        );

        let resp = self
            .client
            .post(&url)
            .headers(self.headers(token)?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("ConoHa {} request failed", action.as_str()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("failed to read ConoHa {} response", action.as_str()))?;

        if status.as_u16() == crate::ACCEPTED {
            tracing::info!("[ConoHa API] POST {} accepted: status={}", url, status.as_u16());
        } else {
            tracing::warn!(
                "[ConoHa API] POST {} not accepted: status={}, response={}",
                url,
                status.as_u16(),
                text
            );
        }

        let text = if text.trim().is_empty() {
            status.to_string()
        } else {
            text
        };
        Ok(ActionOutcome {
            text,
            status_code: status.as_u16(),
        })
    }
}

fn action_body(action: ServerAction) -> serde_json::Value {
    match action {
        ServerAction::Start => json!({ "os-start": null }),
        ServerAction::Stop => json!({ "os-stop": null }),
        ServerAction::Reboot => json!({ "reboot": { "type": "SOFT" } }),
    }
}

#[async_trait]
impl IdentityProvider for ConohaProvider {
    async fn get_token(&self, credentials: &Credentials) -> Result<Token> {
        let url = format!("{}/tokens", self.identity_url);
        let body = json!({
            "auth": {
                "passwordCredentials": {
                    "username": credentials.username,
                    "password": credentials.password,
                },
                "tenantId": credentials.tenant_id,
            }
        });

        tracing::debug!(
            "[ConoHa API] POST {} - Issuing token: username={}, tenant_id={}",
            url,
            credentials.username,
            credentials.tenant_id
        );

        let resp = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .context("ConoHa token request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(
                "[ConoHa API] POST {} failed: status={}, response={}",
                url,
                status.as_u16(),
                text
            );
            return Err(anyhow::anyhow!(
                "ConoHa token request rejected: status={} body={}",
                status.as_u16(),
                text
            ));
        }

        let json_resp: serde_json::Value = resp
            .json()
            .await
            .context("ConoHa token response is not valid JSON")?;
        let id = json_resp["access"]["token"]["id"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("No token id in ConoHa token response"))?;

        Ok(Token::new(id))
    }
}

#[async_trait]
impl ComputeProvider for ConohaProvider {
    async fn get_server_status(&self, token: &Token) -> Result<ServerStatus> {
        let url = self.server_url();
        tracing::info!("[ConoHa API] GET {} - Getting server status", url);

        let resp = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .send()
            .await
            .context("ConoHa server status request failed")?;

        let status_code = resp.status().as_u16();
        let success = resp.status().is_success();
        let text = resp
            .text()
            .await
            .context("failed to read ConoHa server status response")?;

        if !success {
            tracing::warn!("[ConoHa API] GET {} failed: status={}", url, status_code);
            return Ok(ServerStatus {
                status: String::new(),
                status_code,
            });
        }

        // A body we cannot read a status from maps to "no status", like an unknown one.
        let status = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v["server"]["status"].as_str().map(|s| s.to_string()))
            .unwrap_or_default();

        if status.is_empty() {
            tracing::warn!("[ConoHa API] GET {} succeeded but no status in response", url);
        } else {
            tracing::info!(
                "[ConoHa API] GET {} succeeded: status={}, server_status={}",
                url,
                status_code,
                status
            );
        }

        Ok(ServerStatus {
            status,
            status_code,
        })
    }

    async fn start_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.post_action(token, ServerAction::Start).await
    }

    async fn stop_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.post_action(token, ServerAction::Stop).await
    }

    async fn reboot_server(&self, token: &Token) -> Result<ActionOutcome> {
        self.post_action(token, ServerAction::Reboot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    const TENANT: &str = "tenant-1";
    const SERVER: &str = "server-1";
    const ISSUED: &str = "tok-123";

    #[derive(Default)]
    struct Fake {
        server_status: Mutex<String>,
        action_reply: Mutex<Option<(u16, String)>>,
        actions: Mutex<Vec<serde_json::Value>>,
        token_requests: Mutex<Vec<serde_json::Value>>,
    }

    fn authorized(headers: &AxumHeaders) -> bool {
        headers
            .get("x-auth-token")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == ISSUED)
            .unwrap_or(false)
    }

    async fn tokens(
        State(fake): State<Arc<Fake>>,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        fake.token_requests.lock().unwrap().push(body.clone());
        if body["auth"]["passwordCredentials"]["password"] != json!("pw") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"unauthorized": {}}))).into_response();
        }
        Json(json!({"access": {"token": {"id": ISSUED, "expires": "2026-10-20T00:00:00Z"}}}))
            .into_response()
    }

    async fn show_server(
        State(fake): State<Arc<Fake>>,
        Path((tenant, server)): Path<(String, String)>,
        headers: AxumHeaders,
    ) -> impl IntoResponse {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        if tenant != TENANT || server != SERVER {
            return StatusCode::NOT_FOUND.into_response();
        }
        let status = fake.server_status.lock().unwrap().clone();
        Json(json!({"server": {"id": SERVER, "status": status}})).into_response()
    }

    async fn server_action(
        State(fake): State<Arc<Fake>>,
        Path((_tenant, _server)): Path<(String, String)>,
        headers: AxumHeaders,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        fake.actions.lock().unwrap().push(body);
        match fake.action_reply.lock().unwrap().clone() {
            Some((code, text)) => {
                (StatusCode::from_u16(code).unwrap(), text).into_response()
            }
            None => StatusCode::ACCEPTED.into_response(),
        }
    }

    async fn spawn_fake(fake: Arc<Fake>) -> String {
        let app = Router::new()
            .route("/identity/tokens", post(tokens))
            .route("/compute/{tenant}/servers/{server}", get(show_server))
            .route("/compute/{tenant}/servers/{server}/action", post(server_action))
            .with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base: &str) -> ConohaProvider {
        ConohaProvider::new(
            format!("{}/identity/", base),
            format!("{}/compute", base),
            TENANT.to_string(),
            SERVER.to_string(),
        )
        .unwrap()
    }

    fn creds(password: &str) -> Credentials {
        Credentials::new("gncu1".into(), password.into(), TENANT.into())
    }

    #[tokio::test]
    async fn get_token_sends_password_credentials() {
        let fake = Arc::new(Fake::default());
        let base = spawn_fake(fake.clone()).await;

        let token = provider(&base).get_token(&creds("pw")).await.unwrap();
        assert_eq!(token.as_str(), ISSUED);

        let sent = fake.token_requests.lock().unwrap()[0].clone();
        assert_eq!(sent["auth"]["passwordCredentials"]["username"], json!("gncu1"));
        assert_eq!(sent["auth"]["tenantId"], json!(TENANT));
    }

    #[tokio::test]
    async fn rejected_credentials_are_an_error() {
        let fake = Arc::new(Fake::default());
        let base = spawn_fake(fake).await;

        let err = provider(&base).get_token(&creds("wrong")).await.unwrap_err();
        assert!(err.to_string().contains("401"), "{}", err);
    }

    #[tokio::test]
    async fn server_status_is_read_from_server_object() {
        let fake = Arc::new(Fake::default());
        *fake.server_status.lock().unwrap() = "SHUTOFF".to_string();
        let base = spawn_fake(fake).await;

        let status = provider(&base)
            .get_server_status(&Token::new(ISSUED))
            .await
            .unwrap();
        assert_eq!(
            status,
            ServerStatus {
                status: "SHUTOFF".into(),
                status_code: 200
            }
        );
    }

    #[tokio::test]
    async fn server_status_with_bad_token_has_empty_status() {
        let fake = Arc::new(Fake::default());
        let base = spawn_fake(fake).await;

        let status = provider(&base)
            .get_server_status(&Token::new("stale"))
            .await
            .unwrap();
        assert_eq!(status.status, "");
        assert_eq!(status.status_code, 401);
    }

    #[tokio::test]
    async fn actions_post_openstack_bodies() {
        let fake = Arc::new(Fake::default());
        let base = spawn_fake(fake.clone()).await;
        let p = provider(&base);
        let token = Token::new(ISSUED);

        for action in [ServerAction::Start, ServerAction::Stop, ServerAction::Reboot] {
            let outcome = p.run_action(&token, action).await.unwrap();
            assert_eq!(outcome.status_code, 202);
            assert_eq!(outcome.text, "202 Accepted");
            assert!(outcome.is_accepted());
        }

        let actions = fake.actions.lock().unwrap().clone();
        assert_eq!(
            actions,
            vec![
                json!({"os-start": null}),
                json!({"os-stop": null}),
                json!({"reboot": {"type": "SOFT"}}),
            ]
        );
    }

    #[tokio::test]
    async fn rejected_action_keeps_provider_text() {
        let fake = Arc::new(Fake::default());
        let body = r#"{"conflictingRequest": {"message": "Cannot 'stop' instance while it is in vm_state stopped", "code": 409}}"#;
        *fake.action_reply.lock().unwrap() = Some((409, body.to_string()));
        let base = spawn_fake(fake).await;

        let outcome = provider(&base)
            .stop_server(&Token::new(ISSUED))
            .await
            .unwrap();
        assert_eq!(outcome.status_code, 409);
        assert_eq!(outcome.text, body);
        assert!(!outcome.is_accepted());
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_call_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let p = provider(&format!("http://{}", addr));

        assert!(p.get_token(&creds("pw")).await.is_err());
        assert!(p.start_server(&Token::new(ISSUED)).await.is_err());
        assert!(p.get_server_status(&Token::new(ISSUED)).await.is_err());
    }

    #[test]
    fn urls_are_normalised() {
        let p = ConohaProvider::new(
            " https://identity.example/v2.0/ ".into(),
            "https://compute.example/v2/".into(),
            " t ".into(),
            "s".into(),
        )
        .unwrap();
        assert_eq!(p.identity_url, "https://identity.example/v2.0");
        assert_eq!(p.server_url(), "https://compute.example/v2/t/servers/s");
    }
}
