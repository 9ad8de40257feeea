//! Slide content generation.

use crate::prompts;
use crate::GenerationSettings;
use deck_llm::{LlmError, TextGenerator, TokenUsage};

/// Expands a slide outline into full pandoc-ready slide markdown.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    settings: GenerationSettings,
}

impl ContentGenerator {
    /// Create a content generator with the given settings.
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Request full slide content for the given outline.
    ///
    /// Returns the slide markdown and the usage of the call.
    pub fn generate(
        &self,
        generator: &dyn TextGenerator,
        outline: &str,
        reference: Option<&str>,
    ) -> Result<(String, TokenUsage), LlmError> {
        let request = self.settings.request(
            prompts::content_system_prompt(),
            prompts::content_user_prompt(outline, reference.unwrap_or("")),
        );

        let response = generator.generate(&request)?;
        log::debug!(
            "content generation used {} tokens",
            response.usage.total_tokens
        );

        Ok((response.text, response.usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_llm::MockGenerator;

    #[test]
    fn test_generate_embeds_outline_and_reference() {
        let mock = MockGenerator::new()
            .with_response_full("# Deck\n\n## Slide", TokenUsage::new(300, 400));
        let generator = ContentGenerator::new(GenerationSettings::default());

        let (content, usage) = generator
            .generate(&mock, "{\"title\": \"Deck\"}", Some("# Ref"))
            .unwrap();

        assert_eq!(content, "# Deck\n\n## Slide");
        assert_eq!(usage, TokenUsage::new(300, 400));

        let calls = mock.calls();
        assert!(calls[0].user.contains("{\"title\": \"Deck\"}"));
        assert!(calls[0].user.contains("# Ref"));
        assert!(calls[0].system.contains("::: notes"));
    }
}
