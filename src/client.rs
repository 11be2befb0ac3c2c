//! HTTP client for the remote optimization service
//!
//! The service does the actual instance selection; this client only posts
//! JSON request bodies to the routed endpoint and decodes the JSON arrays it
//! answers with. There is no client-side timeout and no retry: one call runs
//! to completion or failure exactly once.

use crate::error::{CostctlError, Result, FALLBACK_TRANSPORT_MESSAGE};
use crate::interpret::OptimizationResults;
use crate::model::OptimizationRequest;
use crate::provider::{endpoint, Provider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// User agent for optimizer requests
const USER_AGENT: &str = concat!("costctl/", env!("CARGO_PKG_VERSION"));

/// The optimization service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptimizerApi: Send + Sync {
    /// Send a fleet or single-instance request to `provider`'s endpoint and
    /// decode the answer as the matching result kind.
    async fn optimize(
        &self,
        provider: Provider,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResults>;
}

/// Error body the service sends with failed responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// reqwest-backed optimizer client
#[derive(Debug, Clone)]
pub struct OptimizerClient {
    http_client: Client,
    base_url: String,
}

impl OptimizerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CostctlError::Transport {
                endpoint: String::new(),
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the raw body of a 2xx answer.
    async fn post<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} body={}", url, serde_json::to_string(body)?);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                CostctlError::Transport {
                    endpoint: path.to_string(),
                    status: None,
                    message: FALLBACK_TRANSPORT_MESSAGE.to_string(),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| CostctlError::Transport {
            endpoint: path.to_string(),
            status: Some(status.as_u16()),
            message: FALLBACK_TRANSPORT_MESSAGE.to_string(),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = error_message(&String::from_utf8_lossy(&bytes));
            warn!("{} answered {}: {}", path, status, message);
            return Err(CostctlError::Transport {
                endpoint: path.to_string(),
                status: Some(status.as_u16()),
                message,
                source: None,
            });
        }

        Ok(bytes.to_vec())
    }
}

/// Server-provided `message`, or the generic fallback.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_TRANSPORT_MESSAGE.to_string())
}

#[async_trait]
impl OptimizerApi for OptimizerClient {
    async fn optimize(
        &self,
        provider: Provider,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResults> {
        let operation = request.operation();
        let path = endpoint(provider, operation);
        match request {
            OptimizationRequest::Fleet(fleet) => {
                info!("Optimizing {} app(s) on {} via {}", fleet.apps.len(), provider, path)
            }
            OptimizationRequest::Single(single) => info!(
                "Searching {} vCPU / {} GB instances on {} via {}",
                single.vcpus, single.memory, provider, path
            ),
        }

        let body = self.post(path, request).await?;
        let results = OptimizationResults::decode(operation, &body).map_err(|e| {
            warn!("Malformed response from {}: {}", path, e);
            CostctlError::Transport {
                endpoint: path.to_string(),
                status: None,
                message: FALLBACK_TRANSPORT_MESSAGE.to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        if results.is_empty() {
            info!("{} returned no results", path);
        } else {
            info!("Received {} result(s)", results.len());
        }
        Ok(results)
    }
}
