//! Slide-deck generation pipeline.
//!
//! Three strictly sequential stages over an external text-generation
//! service: outline, content, and optional diagram enhancement. Each
//! stage consumes the previous stage's output document and produces a
//! new one; token usage is accumulated by addition across stages.

pub mod config;
pub mod content;
pub mod convert;
pub mod diagram;
pub mod error;
pub mod prompts;
pub mod storage;
pub mod structure;

pub use config::{PipelineConfig, PipelineConfigBuilder, SessionPaths};
pub use content::ContentGenerator;
pub use convert::{convert_to_deck, ConvertError};
pub use diagram::{DiagramOutcome, DiagramProcessor, DiagramUsage};
pub use error::{PipelineError, Result};
pub use structure::StructureGenerator;

use deck_core::DiagramNormalizer;
use deck_llm::{GenerationRequest, TextGenerator, TokenUsage, DEFAULT_MAX_TOKENS};
use std::path::Path;

/// Shared per-call generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model override; the client default applies when unset.
    pub model: Option<String>,
    /// Completion budget per call.
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationSettings {
    /// Settings derived from a pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Build a request carrying these settings.
    pub fn request(&self, system: String, user: String) -> GenerationRequest {
        let mut request = GenerationRequest::new(system, user).with_max_tokens(self.max_tokens);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        request
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Usage of the outline call.
    pub structure_usage: TokenUsage,
    /// Usage of the content call.
    pub content_usage: TokenUsage,
    /// Diagram stage outcome, when that stage ran.
    pub diagram: Option<DiagramOutcome>,
}

impl PipelineSummary {
    /// Combined usage of every call in the run.
    pub fn total_usage(&self) -> TokenUsage {
        let diagram = self
            .diagram
            .as_ref()
            .map(|d| d.usage.total())
            .unwrap_or_default();
        self.structure_usage + self.content_usage + diagram
    }
}

/// Run the full generation pipeline.
///
/// Stages run strictly in sequence; a failed generation call aborts the
/// run with no partial state. Converter failures are logged and skipped
/// because the markdown artifact is already persisted by then.
pub fn generate_presentation(
    config: &PipelineConfig,
    generator: &dyn TextGenerator,
) -> Result<PipelineSummary> {
    let reference = match &config.reference_path {
        Some(path) => Some(storage::read_text(path)?),
        None => None,
    };
    let settings = GenerationSettings::from_config(config);

    log::info!("generating slide outline");
    let (outline, structure_usage) = StructureGenerator::new(settings.clone()).generate(
        generator,
        &config.user_prompt,
        reference.as_deref(),
        config.num_slides,
    )?;

    log::info!("generating slide content");
    let (slide_content, content_usage) =
        ContentGenerator::new(settings.clone()).generate(generator, &outline, reference.as_deref())?;

    storage::write_text(&config.paths.content_markdown, &slide_content)?;
    report_conversion(
        convert_to_deck(&config.paths.content_markdown, &config.paths.basic_deck),
        &config.paths.basic_deck,
    );

    if !config.enable_diagrams {
        return Ok(PipelineSummary {
            structure_usage,
            content_usage,
            diagram: None,
        });
    }

    log::info!("enhancing slides with diagrams");
    let normalizer = DiagramNormalizer::new()
        .with_lookback_window(config.lookback_window)
        .with_unterminated(config.unterminated);
    let outcome =
        DiagramProcessor::new(settings, normalizer).process(generator, &slide_content)?;

    storage::write_text(&config.paths.final_markdown, &outcome.finalized)?;
    report_conversion(
        convert_to_deck(&config.paths.final_markdown, &config.paths.final_deck),
        &config.paths.final_deck,
    );

    Ok(PipelineSummary {
        structure_usage,
        content_usage,
        diagram: Some(outcome),
    })
}

fn report_conversion(result: std::result::Result<(), ConvertError>, output: &Path) {
    match result {
        Ok(()) => log::info!("deck written to {}", output.display()),
        Err(err) => log::error!("deck conversion skipped: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_llm::{LlmError, MockGenerator};

    fn test_config(dir: &Path, diagrams: bool) -> PipelineConfig {
        PipelineConfig::builder("deck")
            .prompt("Explain the test pyramid")
            .diagrams(diagrams)
            .output_dir(dir)
            .build()
            .unwrap()
    }

    #[test]
    fn test_full_run_makes_four_calls_and_persists_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let mock = MockGenerator::new()
            .with_response_full("{\"title\": \"Deck\"}", TokenUsage::new(10, 20))
            .with_response_full("# Deck\n\n## Slide", TokenUsage::new(30, 40))
            .with_response_full("# Deck with diagram", TokenUsage::new(50, 60))
            .with_response_full("# Deck with diagram", TokenUsage::new(5, 5));

        let summary = generate_presentation(&config, &mock).unwrap();

        assert_eq!(mock.call_count(), 4);
        assert_eq!(summary.structure_usage, TokenUsage::new(10, 20));
        assert_eq!(summary.content_usage, TokenUsage::new(30, 40));
        assert_eq!(summary.total_usage(), TokenUsage::new(95, 125));

        assert!(config.paths.content_markdown.exists());
        assert!(config.paths.final_markdown.exists());
        assert_eq!(
            storage::read_text(&config.paths.content_markdown).unwrap(),
            "# Deck\n\n## Slide"
        );
    }

    #[test]
    fn test_stages_chain_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let mock = MockGenerator::new()
            .with_response("OUTLINE")
            .with_response("CONTENT")
            .with_response("ENHANCED")
            .with_response("REPAIRED");

        generate_presentation(&config, &mock).unwrap();

        let calls = mock.calls();
        // Content call sees the outline, diagram insertion sees the
        // content, repair sees the insertion output.
        assert!(calls[1].user.contains("OUTLINE"));
        assert!(calls[2].user.contains("CONTENT"));
        assert!(calls[3].user.contains("ENHANCED"));
    }

    #[test]
    fn test_diagrams_disabled_makes_two_calls() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), false);
        let mock = MockGenerator::new()
            .with_response("outline")
            .with_response("content");

        let summary = generate_presentation(&config, &mock).unwrap();

        assert_eq!(mock.call_count(), 2);
        assert!(summary.diagram.is_none());
        assert!(config.paths.content_markdown.exists());
        assert!(!config.paths.final_markdown.exists());
    }

    #[test]
    fn test_invalid_config_fails_before_any_call() {
        let mock = MockGenerator::new();
        let err = PipelineConfig::builder("deck").build().unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_generation_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let mock = MockGenerator::new()
            .with_response("outline")
            .with_error(LlmError::Unavailable("quota exhausted".into()));

        let err = generate_presentation(&config, &mock).unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert_eq!(mock.call_count(), 2);
        // The failing stage left nothing behind.
        assert!(!config.paths.content_markdown.exists());
    }

    #[test]
    fn test_missing_reference_file_fails_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder("deck")
            .reference(dir.path().join("absent.md"))
            .output_dir(dir.path())
            .build()
            .unwrap();
        let mock = MockGenerator::new();

        let err = generate_presentation(&config, &mock).unwrap_err();

        assert!(matches!(err, PipelineError::Io { .. }));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_reference_content_reaches_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let reference_path = dir.path().join("ref.md");
        storage::write_text(&reference_path, "# Reference body").unwrap();

        let config = PipelineConfig::builder("deck")
            .reference(&reference_path)
            .diagrams(false)
            .output_dir(dir.path())
            .build()
            .unwrap();
        let mock = MockGenerator::new()
            .with_response("outline")
            .with_response("content");

        generate_presentation(&config, &mock).unwrap();

        let calls = mock.calls();
        assert!(calls[0].user.contains("# Reference body"));
        assert!(calls[1].user.contains("# Reference body"));
    }

    #[test]
    fn test_final_markdown_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let broken = "## Slide\n\n```mermaid\npie\n```\n```\n```\n\n::: notes\nok\n:::";
        let mock = MockGenerator::new()
            .with_response("outline")
            .with_response("content")
            .with_response(broken)
            .with_response(broken);

        let summary = generate_presentation(&config, &mock).unwrap();
        let outcome = summary.diagram.unwrap();

        let finalized = storage::read_text(&config.paths.final_markdown).unwrap();
        assert_eq!(finalized, outcome.finalized);
        assert_eq!(finalized.matches("```").count(), 2);
        assert!(outcome.report.is_valid());
        // The pre-repair content is preserved untouched.
        assert_eq!(outcome.enhanced, broken);
    }
}
