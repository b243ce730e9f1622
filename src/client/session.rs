//! Explicit connection context handed to every operation

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::client::transport::{ApiVersion, HttpTransport, Transport};
use crate::common::{ClientConfig, Result};

/// Default per-call timeout when neither the caller nor the config sets one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A transport plus the defaults operations fall back to.
///
/// Operations borrow the session; it holds no per-call state, so one
/// session can serve concurrent callers.
pub struct Session<T> {
    transport: T,
    default_timeout: Duration,
}

impl Session<HttpTransport> {
    /// Open a session against the appliance described by `config`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        tracing::info!("Using appliance at {}", transport.base_url());
        let timeout = config.timeout().unwrap_or(DEFAULT_TIMEOUT);
        Ok(Session::new(transport).with_timeout(timeout))
    }
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Per-call timeout, falling back to the session default
    pub fn timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.default_timeout)
    }

    pub async fn get(
        &self,
        api: ApiVersion,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.transport.get(api, path, self.timeout(timeout)).await
    }

    /// GET and decode the body into `R`
    pub async fn get_as<R: DeserializeOwned>(
        &self,
        api: ApiVersion,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<R> {
        let value = self.get(api, path, timeout).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post(
        &self,
        api: ApiVersion,
        path: &str,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.transport
            .post(api, path, body, self.timeout(timeout))
            .await
    }
}
