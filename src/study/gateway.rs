//! The question/answer seam with the platform's answering service

use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiClient, ContextRef};
use crate::study::FALLBACK_ANSWER;

/// Asks the answering service and always hands back displayable text.
#[derive(Clone)]
pub struct ChatGateway {
    api: Arc<ApiClient>,
}

impl ChatGateway {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Ask one question, optionally scoped to a video or document.
    ///
    /// Returns the service's answer verbatim on success. Every failure mode
    /// (transport, bad status, undecodable body) collapses into the fixed
    /// fallback text, so callers have no error path to handle here.
    ///
    /// The question is sent trimmed; callers reject empty input before it
    /// gets this far.
    pub async fn ask(&self, question: &str, context: Option<ContextRef>) -> String {
        match self.api.send_chat(question, context).await {
            Ok(reply) => reply.response,
            Err(err) => {
                warn!("study question failed: {err}");
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}
