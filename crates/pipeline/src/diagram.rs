//! Diagram enhancement pipeline.
//!
//! Two service calls (insertion, then repair) followed by deterministic
//! local cleanup: fence normalization and structural validation. The
//! outcome keeps the pre-repair content alongside the final content so a
//! caller can diff or fall back if repair degraded quality.

use crate::prompts;
use crate::GenerationSettings;
use deck_core::{validate, DiagramNormalizer, Document, ValidationReport};
use deck_llm::{LlmError, TextGenerator, TokenUsage};

/// Usage of the two diagram-stage calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagramUsage {
    /// Usage of the insertion call.
    pub generation: TokenUsage,
    /// Usage of the repair call.
    pub validation: TokenUsage,
}

impl DiagramUsage {
    /// Combined usage of both calls.
    pub fn total(&self) -> TokenUsage {
        self.generation + self.validation
    }
}

/// Result of the diagram enhancement stage.
///
/// `enhanced` is the insertion output before any repair; `finalized` is
/// the repaired, normalized, validated content. Both are returned on
/// purpose so callers can compare them.
#[derive(Debug, Clone)]
pub struct DiagramOutcome {
    /// Content as returned by the insertion call.
    pub enhanced: String,
    /// Content after repair, normalization, and validation.
    pub finalized: String,
    /// Usage of both calls.
    pub usage: DiagramUsage,
    /// Structural findings on the finalized content. Advisory: findings
    /// never fail the stage.
    pub report: ValidationReport,
}

/// Runs the diagram insertion and repair calls plus local cleanup.
#[derive(Debug, Clone)]
pub struct DiagramProcessor {
    settings: GenerationSettings,
    normalizer: DiagramNormalizer,
}

impl DiagramProcessor {
    /// Create a processor with the given settings and normalizer.
    pub fn new(settings: GenerationSettings, normalizer: DiagramNormalizer) -> Self {
        Self {
            settings,
            normalizer,
        }
    }

    /// Enhance slide content with diagrams and clean the result.
    pub fn process(
        &self,
        generator: &dyn TextGenerator,
        slide_content: &str,
    ) -> Result<DiagramOutcome, LlmError> {
        let request = self.settings.request(
            prompts::diagram_generation_system_prompt(),
            prompts::diagram_generation_user_prompt(slide_content),
        );
        let enhanced = generator.generate(&request)?;
        log::debug!(
            "diagram insertion used {} tokens",
            enhanced.usage.total_tokens
        );

        let request = self.settings.request(
            prompts::diagram_validation_system_prompt(),
            prompts::diagram_validation_user_prompt(&enhanced.text),
        );
        let repaired = generator.generate(&request)?;
        log::debug!("diagram repair used {} tokens", repaired.usage.total_tokens);

        let (normalized, normalize_report) = self
            .normalizer
            .normalize_with_report(&Document::parse(&repaired.text));
        if normalize_report.stripped_lines > 0 || normalize_report.orphans_removed > 0 {
            log::info!(
                "normalization stripped {} stray fence lines and {} orphan markers",
                normalize_report.stripped_lines,
                normalize_report.orphans_removed
            );
        }
        for line in &normalize_report.unterminated_openers {
            log::warn!("diagram block at line {line} has no closing fence");
        }

        let report = validate(&normalized);
        for violation in &report.violations {
            log::warn!("structural violation: {violation}");
        }

        Ok(DiagramOutcome {
            enhanced: enhanced.text,
            finalized: normalized.to_string(),
            usage: DiagramUsage {
                generation: enhanced.usage,
                validation: repaired.usage,
            },
            report,
        })
    }
}
