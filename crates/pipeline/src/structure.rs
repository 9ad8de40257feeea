//! Slide outline generation.

use crate::prompts;
use crate::GenerationSettings;
use deck_llm::{LlmError, TextGenerator, TokenUsage};

/// Produces the slide outline (titles plus key messages) for a deck.
#[derive(Debug, Clone)]
pub struct StructureGenerator {
    settings: GenerationSettings,
}

impl StructureGenerator {
    /// Create an outline generator with the given settings.
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Request a slide outline from the service.
    ///
    /// Returns the outline JSON text and the usage of the call.
    pub fn generate(
        &self,
        generator: &dyn TextGenerator,
        user_prompt: &str,
        reference: Option<&str>,
        num_slides: usize,
    ) -> Result<(String, TokenUsage), LlmError> {
        let request = self.settings.request(
            prompts::structure_system_prompt(),
            prompts::structure_user_prompt(user_prompt, reference.unwrap_or(""), num_slides),
        );

        let response = generator.generate(&request)?;
        log::debug!(
            "outline generation used {} tokens",
            response.usage.total_tokens
        );

        Ok((response.text, response.usage))
    }
}
