//! Reqwest-based transport to the execution service (Piston wire contract).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::request::ExecutionRequest;

/// Compile-stage budget sent to the service when the config does not override it.
const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 10_000;

/// Terminal transport failures. Every network-facing path maps into one of
/// these; nothing opaque escapes to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("network error: {0}")]
    Network(String),
    #[error("execution service returned {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// Raw response body, kept for diagnostics.
        body: String,
    },
}

/// One runtime/version pair offered by the execution service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Raw per-stage output as the service reports it. `output` is the combined
/// stdout+stderr stream some deployments populate instead of `stdout`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawStage {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub signal: Option<String>,
}

/// Raw execution response. `compile` is present only for compiled runtimes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawExecution {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version: String,
    pub compile: Option<RawStage>,
    pub run: Option<RawStage>,
}

#[derive(Debug, Serialize)]
struct FileEntry {
    name: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ExecutePayload {
    language: &'static str,
    version: &'static str,
    files: Vec<FileEntry>,
    stdin: String,
    args: Vec<String>,
    compile_timeout: u64,
    run_timeout: u64,
    run_memory_limit: i64,
}

/// Uniform retry policy. Only network-level failures are retryable, and only
/// idempotent calls (the runtime listing) apply it; `execute` never retries
/// because re-running a side-effecting program needs caller opt-in.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, failure: &TransportFailure) -> bool {
        matches!(failure, TransportFailure::Network(_))
    }
}

/// Seam between the bridge and the wire. Test doubles implement this to
/// record calls and replay canned responses.
#[async_trait]
pub trait ExecutionTransport: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<RawExecution, TransportFailure>;
    async fn runtimes(&self) -> Result<Vec<RuntimeInfo>, TransportFailure>;
}

/// HTTP transport speaking the execution service's native contract. Pointing
/// the base URL at a same-origin relay that forwards verbatim works unchanged.
pub struct HttpTransport {
    client: Client,
    base: String,
    api_key: Option<String>,
    compile_timeout_ms: u64,
    run_memory_limit: i64,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let base = cfg
            .get("EXECUTION_API_BASE")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("Missing EXECUTION_API_BASE. Set it in env or the runbox rc file")
            })?;

        let api_key = cfg.get("EXECUTION_API_KEY").filter(|s| !s.trim().is_empty());

        let compile_timeout_ms = cfg
            .get("COMPILE_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_COMPILE_TIMEOUT_MS);
        let run_memory_limit = cfg
            .get("RUN_MEMORY_LIMIT")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(-1);

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            api_key,
            compile_timeout_ms,
            run_memory_limit,
            retry: RetryPolicy::default(),
        })
    }

    fn payload(&self, request: &ExecutionRequest) -> ExecutePayload {
        ExecutePayload {
            language: request.language.runtime_name,
            version: request.language.runtime_version,
            files: vec![FileEntry {
                name: request.file_name.clone(),
                content: request.source_text.clone(),
            }],
            stdin: request.stdin.clone(),
            args: request.args.clone(),
            compile_timeout: self.compile_timeout_ms,
            run_timeout: request.timeout_ms,
            run_memory_limit: self.run_memory_limit,
        }
    }

    async fn fetch_runtimes(&self) -> Result<Vec<RuntimeInfo>, TransportFailure> {
        let url = format!("{}/runtimes", self.base);
        let mut call = self.client.get(&url);
        if let Some(key) = &self.api_key {
            call = call.header(AUTHORIZATION, key.as_str());
        }
        let resp = call.send().await.map_err(classify_reqwest_error)?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportFailure::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(http_failure(status, body));
        }
        serde_json::from_str(&body)
            .map_err(|e| TransportFailure::Network(format!("malformed runtime listing: {e}")))
    }
}

#[async_trait]
impl ExecutionTransport for HttpTransport {
    async fn execute(&self, request: &ExecutionRequest) -> Result<RawExecution, TransportFailure> {
        let url = format!("{}/execute", self.base);
        let payload = self.payload(request);

        let mut call = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            // Per-request deadline; reqwest aborts the in-flight request on
            // expiry, so no work dangles after the caller gives up.
            .timeout(Duration::from_millis(request.timeout_ms))
            .json(&payload);
        if let Some(key) = &self.api_key {
            call = call.header(AUTHORIZATION, key.as_str());
        }

        let resp = call.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportFailure::Timeout(request.timeout_ms)
            } else {
                classify_reqwest_error(e)
            }
        })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportFailure::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(http_failure(status, body));
        }
        serde_json::from_str(&body)
            .map_err(|e| TransportFailure::Network(format!("malformed execution response: {e}")))
    }

    async fn runtimes(&self) -> Result<Vec<RuntimeInfo>, TransportFailure> {
        let mut attempt = 1;
        loop {
            match self.fetch_runtimes().await {
                Ok(list) => return Ok(list),
                Err(failure)
                    if attempt < self.retry.max_attempts && self.retry.is_retryable(&failure) =>
                {
                    log::warn!(
                        "runtime listing failed (attempt {attempt}): {failure}; retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        // Listing path has no caller budget; the deadline reports as 0.
        TransportFailure::Timeout(0)
    } else {
        TransportFailure::Network(e.to_string())
    }
}

/// Build an HTTP failure, pulling a message out of a structured `{error,
/// details}` body when there is one and falling back to the raw text.
fn http_failure(status: StatusCode, body: String) -> TransportFailure {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });
    TransportFailure::Http {
        status: status.as_u16(),
        message,
        body,
    }
}
