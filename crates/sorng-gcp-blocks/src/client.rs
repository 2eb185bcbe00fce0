//! Generic operation invoker.
//!
//! All the Google Cloud REST APIs covered here follow one pattern:
//! - Base URL: `https://{service}.googleapis.com`
//! - Auth: `Authorization: Bearer {access_token}`
//! - Request/Response: JSON
//!
//! [`OperationInvoker::invoke`] drives one call through
//! `ResolvingAuth → BuildingRequest → AwaitingResponse → Succeeded | Failed`.
//! Every call is a single round trip: no retries, no polling, no pagination.

use crate::auth::CredentialResolver;
use crate::body;
use crate::config::AppConfig;
use crate::descriptor::OperationDescriptor;
use crate::error::{InvocationError, InvocationResult};
use crate::template;
use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("sorng-gcp-blocks/", env!("CARGO_PKG_VERSION"));

/// Stages of one invocation, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStage {
    Idle,
    ResolvingAuth,
    BuildingRequest,
    AwaitingResponse,
    Succeeded,
    Failed,
}

impl fmt::Display for InvocationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ResolvingAuth => "resolving-auth",
            Self::BuildingRequest => "building-request",
            Self::AwaitingResponse => "awaiting-response",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// HTTP settings for an [`OperationInvoker`].
#[derive(Debug, Clone)]
pub struct InvokerSettings {
    /// Replaces `https://{service}.googleapis.com` (emulators, tests).
    pub endpoint_override: Option<String>,
    pub user_agent: String,
    /// Whole-request timeout. `None` lets a call run to completion.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            endpoint_override: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            connect_timeout: Duration::from_secs(15),
        }
    }
}

impl InvokerSettings {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Stateless executor for [`OperationDescriptor`]s. Cheap to clone; clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OperationInvoker {
    http: Client,
    resolver: CredentialResolver,
    settings: InvokerSettings,
}

impl Default for OperationInvoker {
    fn default() -> Self {
        Self::new(InvokerSettings::default())
    }
}

impl OperationInvoker {
    pub fn new(settings: InvokerSettings) -> Self {
        let mut builder = Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        });
        Self::with_client(http, settings)
    }

    /// Use a caller-built `reqwest::Client`.
    pub fn with_client(http: Client, settings: InvokerSettings) -> Self {
        Self {
            resolver: CredentialResolver::new(http.clone()),
            http,
            settings,
        }
    }

    pub fn settings(&self) -> &InvokerSettings {
        &self.settings
    }

    /// Root URL for a service.
    pub fn base_url(&self, service: &str) -> String {
        match self.settings.endpoint_override {
            Some(ref url) => url.clone(),
            None => format!("https://{}.googleapis.com", service),
        }
    }

    /// Perform one operation and return its decoded JSON payload.
    pub async fn invoke(
        &self,
        descriptor: &OperationDescriptor,
        config: &AppConfig,
        input: &Map<String, Value>,
    ) -> InvocationResult {
        trace_stage(descriptor, InvocationStage::Idle);
        let result = self.run(descriptor, config, input).await;
        match &result {
            Ok(_) => trace_stage(descriptor, InvocationStage::Succeeded),
            Err(e) => {
                trace_stage(descriptor, InvocationStage::Failed);
                warn!("GCP operation {} failed: {}", descriptor.id, e);
            }
        }
        result
    }

    async fn run(
        &self,
        descriptor: &OperationDescriptor,
        config: &AppConfig,
        input: &Map<String, Value>,
    ) -> InvocationResult {
        trace_stage(descriptor, InvocationStage::ResolvingAuth);
        let token = self
            .resolver
            .resolve(config, &descriptor.scopes, descriptor.credential_modes)
            .await?;

        trace_stage(descriptor, InvocationStage::BuildingRequest);
        let project = config.effective_project_id(descriptor.credential_modes);
        let url = template::expand(
            &self.base_url(&descriptor.service),
            &descriptor.path_template,
            input,
            project.as_deref(),
        )?;
        let pairs = template::query_pairs(&descriptor.query_fields, input)?;
        let url = template::append_query(url, &pairs);
        let payload = body::assemble(descriptor.body_mode, &descriptor.input_fields, input);

        debug!("GCP {} {} → {}", descriptor.id, descriptor.method.as_str(), url);

        let mut request = self
            .http
            .request(descriptor.method.into(), url)
            .bearer_auth(&token)
            .header(USER_AGENT, &self.settings.user_agent)
            .header(CONTENT_TYPE, "application/json");
        if let Some(ref payload) = payload {
            request = request.json(payload);
        }

        trace_stage(descriptor, InvocationStage::AwaitingResponse);
        let response = request.send().await.map_err(InvocationError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InvocationError::rejected(status, &text));
        }

        let text = response.text().await.map_err(InvocationError::transport)?;
        decode_success(&text)
    }
}

/// Decode a 2xx body; empty and `null` bodies become `{}`.
pub fn decode_success(text: &str) -> InvocationResult {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(v) => Ok(v),
        Err(e) => Err(InvocationError::Decode(e.to_string())),
    }
}

fn trace_stage(descriptor: &OperationDescriptor, stage: InvocationStage) {
    debug!("GCP operation {}: {}", descriptor.id, stage);
}
