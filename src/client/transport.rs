//! HTTP transport to the appliance REST API

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::common::{ClientConfig, Credentials, Error, Result};

/// API family a path belongs to (`/api/internal/...` or `/api/v1/...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    Internal,
    V1,
}

impl ApiVersion {
    pub fn prefix(&self) -> &'static str {
        match self {
            ApiVersion::Internal => "internal",
            ApiVersion::V1 => "v1",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// JSON request/response calls against the appliance.
///
/// `path` always starts with `/` and is relative to the API family, e.g.
/// `/managed_volume/{id}`. Implementations return the decoded body of a
/// successful response and map everything else to an [`Error`].
pub trait Transport: Send + Sync {
    fn get(
        &self,
        api: ApiVersion,
        path: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Value>> + Send;

    fn post(
        &self,
        api: ApiVersion,
        path: &str,
        body: &Value,
        timeout: Duration,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(concat!("mvctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(&config.node),
            credentials: config.credentials()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, api: ApiVersion, path: &str) -> String {
        format!("{}/api/{}{}", self.base_url, api.prefix(), path)
    }

    fn request(
        &self,
        method: Method,
        api: ApiVersion,
        path: &str,
        timeout: Duration,
    ) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(api, path))
            .timeout(timeout)
            .header(ACCEPT, "application/json");

        match &self.credentials {
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => builder.bearer_auth(token),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(e.to_string())
            } else {
                Error::Transport(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }

        // 202/204 responses may carry no body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, api: ApiVersion, path: &str, timeout: Duration) -> Result<Value> {
        tracing::debug!("GET {}", self.url(api, path));
        let builder = self.request(Method::GET, api, path, timeout);
        self.send(builder).await
    }

    async fn post(
        &self,
        api: ApiVersion,
        path: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        tracing::debug!("POST {} {}", self.url(api, path), body);
        let builder = self
            .request(Method::POST, api, path, timeout)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(builder).await
    }
}

/// Normalise the configured node into `scheme://host[:port]`
fn base_url(node: &str) -> String {
    let node = node.trim().trim_end_matches('/');
    if node.starts_with("http://") || node.starts_with("https://") {
        node.to_string()
    } else {
        format!("https://{}", node)
    }
}

/// Pull the human-readable message out of an error body
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
