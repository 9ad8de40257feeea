//! Pipeline configuration and session output paths.
//!
//! Configuration is validated at build time: a run needs a prompt, a
//! reference document, or both, and fails fast before any client is
//! touched otherwise.

use crate::error::{PipelineError, Result};
use deck_core::normalize::DEFAULT_LOOKBACK_WINDOW;
use deck_core::UnterminatedFence;
use deck_llm::DEFAULT_MAX_TOKENS;
use std::path::{Path, PathBuf};

/// Prompt used when only a reference document is supplied.
pub const DEFAULT_SUMMARY_PROMPT: &str = "Create a presentation to summarize the document.";

/// Default number of slides.
pub const DEFAULT_NUM_SLIDES: usize = 20;

/// Validated configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Clean deck name (extension stripped).
    pub name: String,
    /// The presentation request driving the outline.
    pub user_prompt: String,
    /// Optional reference markdown document.
    pub reference_path: Option<PathBuf>,
    /// Number of slides to generate.
    pub num_slides: usize,
    /// Whether the diagram enhancement stage runs.
    pub enable_diagrams: bool,
    /// Model override for all calls.
    pub model: Option<String>,
    /// Completion budget per call.
    pub max_tokens: u32,
    /// Orphan-marker look-back window.
    pub lookback_window: usize,
    /// Policy for unterminated diagram blocks.
    pub unterminated: UnterminatedFence,
    /// Artifact locations for this session.
    pub paths: SessionPaths,
}

impl PipelineConfig {
    /// Start building a configuration for the given output name.
    pub fn builder(output_name: impl Into<String>) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(output_name)
    }

    /// Human-readable configuration summary.
    pub fn summary(&self) -> String {
        format!(
            "=== Presentation Configuration ===\n\
             Name: {}\n\
             Reference: {}\n\
             Prompt: {}\n\
             Slides: {}\n\
             Diagrams: {}\n\
             Session directory: {}\n\
             Final output: {}\n\
             ==================================",
            self.name,
            self.reference_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none (prompt-only generation)".to_string()),
            self.user_prompt,
            self.num_slides,
            if self.enable_diagrams { "enabled" } else { "disabled" },
            self.paths.session_dir.display(),
            self.paths.final_deck.display(),
        )
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    output_name: String,
    user_prompt: Option<String>,
    reference_path: Option<PathBuf>,
    num_slides: usize,
    enable_diagrams: bool,
    output_dir: PathBuf,
    model: Option<String>,
    max_tokens: u32,
    lookback_window: usize,
    unterminated: UnterminatedFence,
}

impl PipelineConfigBuilder {
    fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            user_prompt: None,
            reference_path: None,
            num_slides: DEFAULT_NUM_SLIDES,
            enable_diagrams: true,
            output_dir: PathBuf::from("./outputs"),
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
            unterminated: UnterminatedFence::default(),
        }
    }

    /// Set the presentation request.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    /// Set the reference markdown document.
    pub fn reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_path = Some(path.into());
        self
    }

    /// Set the slide count.
    pub fn num_slides(mut self, count: usize) -> Self {
        self.num_slides = count;
        self
    }

    /// Enable or disable the diagram enhancement stage.
    pub fn diagrams(mut self, enabled: bool) -> Self {
        self.enable_diagrams = enabled;
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set a model override.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the completion budget per call.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the orphan-marker look-back window.
    pub fn lookback_window(mut self, lines: usize) -> Self {
        self.lookback_window = lines;
        self
    }

    /// Set the unterminated-block policy.
    pub fn unterminated(mut self, policy: UnterminatedFence) -> Self {
        self.unterminated = policy;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        self.build_with_timestamp(&timestamp)
    }

    fn build_with_timestamp(self, timestamp: &str) -> Result<PipelineConfig> {
        if self.user_prompt.is_none() && self.reference_path.is_none() {
            return Err(PipelineError::Config(
                "either a prompt or a reference file must be supplied".to_string(),
            ));
        }

        if self.num_slides == 0 {
            return Err(PipelineError::Config(
                "slide count must be positive".to_string(),
            ));
        }

        let name = clean_name(&self.output_name);
        if name.is_empty() {
            return Err(PipelineError::Config(
                "output name must not be empty".to_string(),
            ));
        }

        let paths = SessionPaths::new(&name, &self.output_dir, timestamp);

        Ok(PipelineConfig {
            name,
            user_prompt: self
                .user_prompt
                .unwrap_or_else(|| DEFAULT_SUMMARY_PROMPT.to_string()),
            reference_path: self.reference_path,
            num_slides: self.num_slides,
            enable_diagrams: self.enable_diagrams,
            model: self.model,
            max_tokens: self.max_tokens,
            lookback_window: self.lookback_window,
            unterminated: self.unterminated,
            paths,
        })
    }
}

/// Artifact locations for one timestamped session.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    /// Directory holding all artifacts of this run.
    pub session_dir: PathBuf,
    /// Slide markdown before diagram enhancement.
    pub content_markdown: PathBuf,
    /// Slide markdown after diagram enhancement.
    pub final_markdown: PathBuf,
    /// Converted deck from the pre-enhancement markdown.
    pub basic_deck: PathBuf,
    /// Converted deck from the final markdown.
    pub final_deck: PathBuf,
}

impl SessionPaths {
    fn new(name: &str, output_dir: &Path, timestamp: &str) -> Self {
        let session_dir = output_dir.join(format!("{name}_{timestamp}"));
        Self {
            content_markdown: session_dir.join(format!("{name}_content.md")),
            final_markdown: session_dir.join(format!("{name}_final.md")),
            basic_deck: session_dir.join(format!("{name}_basic.pptx")),
            final_deck: session_dir.join(format!("{name}.pptx")),
            session_dir,
        }
    }
}

/// Strip any extension from the requested output name.
fn clean_name(output_name: &str) -> String {
    Path::new(output_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_prompt_or_reference() {
        let err = PipelineConfig::builder("deck").build().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_build_with_prompt_only() {
        let config = PipelineConfig::builder("deck")
            .prompt("Explain the water cycle")
            .build()
            .unwrap();

        assert_eq!(config.user_prompt, "Explain the water cycle");
        assert!(config.reference_path.is_none());
        assert_eq!(config.num_slides, DEFAULT_NUM_SLIDES);
        assert!(config.enable_diagrams);
    }

    #[test]
    fn test_reference_only_uses_default_prompt() {
        let config = PipelineConfig::builder("deck")
            .reference("notes.md")
            .build()
            .unwrap();

        assert_eq!(config.user_prompt, DEFAULT_SUMMARY_PROMPT);
        assert_eq!(config.reference_path.as_deref(), Some(Path::new("notes.md")));
    }

    #[test]
    fn test_prompt_and_reference_together_are_accepted() {
        let config = PipelineConfig::builder("deck")
            .prompt("Summarize the key utilities")
            .reference("notes.md")
            .build()
            .unwrap();

        assert_eq!(config.user_prompt, "Summarize the key utilities");
        assert!(config.reference_path.is_some());
    }

    #[test]
    fn test_zero_slides_is_rejected() {
        let err = PipelineConfig::builder("deck")
            .prompt("x")
            .num_slides(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_output_name_extension_is_stripped() {
        let config = PipelineConfig::builder("quarterly_review.pptx")
            .prompt("x")
            .build()
            .unwrap();
        assert_eq!(config.name, "quarterly_review");
    }

    #[test]
    fn test_session_paths_layout() {
        let config = PipelineConfig::builder("deck")
            .prompt("x")
            .output_dir("/tmp/decks")
            .build_with_timestamp("20260101_120000")
            .unwrap();

        let paths = &config.paths;
        assert_eq!(
            paths.session_dir,
            PathBuf::from("/tmp/decks/deck_20260101_120000")
        );
        assert_eq!(
            paths.content_markdown,
            paths.session_dir.join("deck_content.md")
        );
        assert_eq!(paths.final_markdown, paths.session_dir.join("deck_final.md"));
        assert_eq!(paths.basic_deck, paths.session_dir.join("deck_basic.pptx"));
        assert_eq!(paths.final_deck, paths.session_dir.join("deck.pptx"));
    }

    #[test]
    fn test_summary_mentions_key_settings() {
        let config = PipelineConfig::builder("deck")
            .prompt("Explain queues")
            .num_slides(7)
            .diagrams(false)
            .build()
            .unwrap();

        let summary = config.summary();
        assert!(summary.contains("Explain queues"));
        assert!(summary.contains("7"));
        assert!(summary.contains("disabled"));
    }
}
