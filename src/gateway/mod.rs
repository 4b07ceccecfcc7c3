//! Provider gateway for chat completions.
//!
//! Transport concerns (authentication, HTTP, retry with backoff) stop here.
//! Whatever error escapes `ChatGateway::chat` is final for the caller.

pub mod error;
pub mod openrouter;
pub mod types;

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use openrouter::{ChatProvider, OpenRouterAdapter};

pub use error::{ErrorContext, ProviderError};
pub use types::*;

#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

pub struct ProviderGateway<P: ChatProvider = OpenRouterAdapter> {
    provider: P,
    config: GatewayConfig,
}

#[async_trait::async_trait]
impl<P: ChatProvider> ChatGateway for ProviderGateway<P> {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError> {
        ProviderGateway::chat(self, req).await
    }
}

impl ProviderGateway<OpenRouterAdapter> {
    pub fn from_env() -> Result<Self, ProviderError> {
        let openrouter = OpenRouterAdapter::from_env()?;
        Ok(Self {
            provider: openrouter,
            config: GatewayConfig::default(),
        })
    }
}

impl<P: ChatProvider> ProviderGateway<P> {
    pub fn with_config(provider: P, config: GatewayConfig) -> Self {
        Self { provider, config }
    }

    pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.provider.chat(&req).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.max_retries {
                        return Err(err);
                    }

                    let delay = match &err {
                        ProviderError::RateLimited { retry_after, .. } => {
                            (*retry_after).min(backoff_delay(self.config.retry_base_delay, 5))
                        }
                        _ => backoff_delay(self.config.retry_base_delay, attempt),
                    };
                    warn!(
                        model = req.model.model_id(),
                        code = err.code(),
                        request_id = err.request_id(),
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        error = %err,
                        "Chat request failed; retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let multiplier = 2u32.pow(attempt.min(5));
    base * multiplier
}
