//! The comparison oracle: given a query and two documents, say which one
//! fits better. Only the leading token of the answer matters.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::gateway::{ChatGateway, ChatModel, ChatRequest, ProviderError};
use crate::prompts::PromptTemplate;

/// Default model if none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// The answer only needs "Line A" / "Line B"; leave room for a short
/// explanation some models insist on.
pub const JUDGE_MAX_OUTPUT_TOKENS: u32 = 16;

/// Default cap on in-flight oracle requests.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Stateless judging capability.
///
/// `doc_a` is presented first ("Line A"), `doc_b` second ("Line B").
/// An `Err` means the oracle could not be reached at all; an unhelpful
/// answer is still `Ok`.
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    async fn judge(&self, query: &str, doc_a: &str, doc_b: &str) -> Result<String, ProviderError>;
}

#[async_trait::async_trait]
impl<O: Oracle + ?Sized> Oracle for Arc<O> {
    async fn judge(&self, query: &str, doc_a: &str, doc_b: &str) -> Result<String, ProviderError> {
        (**self).judge(query, doc_a, doc_b).await
    }
}

/// Oracle backed by a chat model behind a `ChatGateway`.
pub struct LlmOracle<G: ChatGateway> {
    gateway: Arc<G>,
    model: String,
    template: PromptTemplate,
    permits: Semaphore,
}

impl<G: ChatGateway> LlmOracle<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            template: PromptTemplate::default(),
            permits: Semaphore::new(DEFAULT_MAX_IN_FLIGHT),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        template.validate();
        self.template = template;
        self
    }

    /// Bound concurrent chat requests across every strategy.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.permits = Semaphore::new(max_in_flight.max(1));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl<G: ChatGateway> Oracle for LlmOracle<G> {
    async fn judge(&self, query: &str, doc_a: &str, doc_b: &str) -> Result<String, ProviderError> {
        let prompt = self.template.render(query, doc_a, doc_b);
        let request = ChatRequest::new(ChatModel::openrouter(&self.model), prompt.to_messages())
            .max_tokens(JUDGE_MAX_OUTPUT_TOKENS);

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProviderError::config("oracle request pool closed"))?;
        let response = self.gateway.chat(request).await?;

        debug!(
            model = %self.model,
            latency_ms = response.latency.as_millis() as u64,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Oracle answered"
        );
        Ok(response.content.trim().to_string())
    }
}
