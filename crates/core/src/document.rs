//! Line-oriented document model for slide markdown.
//!
//! A [`Document`] is an ordered sequence of lines. Pipeline stages never
//! mutate a document in place; each stage produces a new one.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Fence marker that opens and closes diagram blocks.
pub const FENCE_MARKER: &str = "```";

/// Language tag that marks a fenced block as a diagram.
pub const DIAGRAM_TAG: &str = "mermaid";

/// Directive prefix that opens a speaker-notes region.
pub const NOTES_OPEN: &str = "::: notes";

/// Directive line that closes a speaker-notes region.
pub const NOTES_CLOSE: &str = ":::";

/// Horizontal-rule token separating slides.
pub const SLIDE_SEPARATOR: &str = "---";

/// Matches a diagram opener: a backtick run, the diagram tag, and nothing
/// else except stray marker characters the generator may have duplicated.
static FENCE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^`{3,}\s*mermaid\s*`*$").unwrap());

/// Matches a bare fence line: a backtick run and nothing else.
static FENCE_BARE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`{3,}$").unwrap());

/// A markdown document as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Create a document from pre-split lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Parse text into a document, splitting on newlines.
    ///
    /// Carriage returns are stripped so Windows line endings round-trip
    /// to plain `\n`.
    pub fn parse(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self { lines }
    }

    /// All lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line at a 0-based index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Structural classification of a single document line.
///
/// Every line falls into exactly one kind; downstream passes branch on
/// this instead of re-matching patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Ordinary content.
    Plain,
    /// Diagram opener (fence marker plus diagram tag, possibly with
    /// duplicated marker characters to be stripped).
    FenceOpen,
    /// A fence marker alone on its line.
    FenceBare,
    /// A line starting with the fence marker that is neither a diagram
    /// opener nor bare (e.g. an ordinary code-block opener).
    FencePrefixed,
    /// Speaker-notes opening directive.
    NotesOpen,
    /// Speaker-notes closing directive.
    NotesClose,
    /// Slide separator.
    Separator,
}

/// Classify a line by its trimmed form.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed == SLIDE_SEPARATOR {
        return LineKind::Separator;
    }
    if trimmed == NOTES_CLOSE {
        return LineKind::NotesClose;
    }
    if trimmed.starts_with(NOTES_OPEN) {
        return LineKind::NotesOpen;
    }
    if trimmed.starts_with(FENCE_MARKER) {
        if FENCE_OPEN_REGEX.is_match(trimmed) {
            return LineKind::FenceOpen;
        }
        if FENCE_BARE_REGEX.is_match(trimmed) {
            return LineKind::FenceBare;
        }
        return LineKind::FencePrefixed;
    }

    LineKind::Plain
}

/// The canonical diagram opener line.
pub fn canonical_opener() -> String {
    format!("{}{}", FENCE_MARKER, DIAGRAM_TAG)
}
