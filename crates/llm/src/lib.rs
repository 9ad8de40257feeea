//! Client abstraction for the external text-generation service.
//!
//! The pipeline talks to the service through the [`TextGenerator`] trait:
//! a system prompt, a user prompt, and generation parameters go in; the
//! response text and a token-usage record come out. [`openai::OpenAiClient`]
//! is the HTTP implementation; [`mock::MockGenerator`] serves tests.

pub mod error;
pub mod mock;
pub mod openai;

pub use error::LlmError;
pub use mock::MockGenerator;
pub use openai::{OpenAiClient, OpenAiConfig};

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Default completion budget per call.
pub const DEFAULT_MAX_TOKENS: u32 = 10_000;

/// Token accounting returned by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Create a usage record; the total is derived.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

impl Sum for TokenUsage {
    fn sum<I: Iterator<Item = TokenUsage>>(iter: I) -> TokenUsage {
        iter.fold(TokenUsage::zero(), Add::add)
    }
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// System instructions.
    pub system: String,
    /// User instructions.
    pub user: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Model override; the client's configured default applies when unset.
    pub model: Option<String>,
}

impl GenerationRequest {
    /// Create a request with the default completion budget.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            model: None,
        }
    }

    /// Set the completion budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set a per-request model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A generation response: text plus usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Generated text.
    pub text: String,
    /// Token usage for this call.
    pub usage: TokenUsage,
}

/// The external text-generation capability the pipeline depends on.
pub trait TextGenerator: Send + Sync {
    /// Execute one blocking generation round-trip.
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usage_derives_total() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn token_usage_adds_componentwise() {
        let a = TokenUsage::new(100, 50);
        let b = TokenUsage::new(10, 5);
        let sum = a + b;

        assert_eq!(sum.prompt_tokens, 110);
        assert_eq!(sum.completion_tokens, 55);
        assert_eq!(sum.total_tokens, 165);
    }

    #[test]
    fn token_usage_sums_over_iterator() {
        let total: TokenUsage = [TokenUsage::new(1, 2), TokenUsage::new(3, 4)]
            .into_iter()
            .sum();
        assert_eq!(total, TokenUsage::new(4, 6));
    }

    #[test]
    fn request_builder_works() {
        let request = GenerationRequest::new("system", "user")
            .with_max_tokens(512)
            .with_model("small-model");

        assert_eq!(request.system, "system");
        assert_eq!(request.user, "user");
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.model.as_deref(), Some("small-model"));
    }

    #[test]
    fn request_defaults_to_standard_budget() {
        let request = GenerationRequest::new("s", "u");
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(request.model.is_none());
    }
}
