//! Mock text generator for tests.
//!
//! Queued responses are consumed in order and every request is recorded,
//! so tests can assert on call counts and prompt contents without any
//! network access.

use crate::{GenerationRequest, GenerationResponse, LlmError, TextGenerator, TokenUsage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Configurable mock implementation of [`TextGenerator`].
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<Result<GenerationResponse, LlmError>>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    /// Create a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with nominal usage.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_response_full(text, TokenUsage::new(10, 5))
    }

    /// Queue a successful response with explicit usage.
    pub fn with_response_full(self, text: impl Into<String>, usage: TokenUsage) -> Self {
        self.responses.lock().unwrap().push_back(Ok(GenerationResponse {
            text: text.into(),
            usage,
        }));
        self
    }

    /// Queue an error.
    pub fn with_error(self, error: LlmError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of the recorded requests.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.calls.lock().unwrap().push(request.clone());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Unavailable(
                    "mock generator has no queued response".to_string(),
                ))
            })
    }
}
