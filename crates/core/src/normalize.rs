//! Diagram block cleanup.
//!
//! Rebuilds every diagram block with a single opener and closer, drops
//! fence-marker lines the upstream generator duplicated inside block
//! bodies, and sweeps orphan closer lines left outside any block.
//!
//! Normalization is total and idempotent. It never fails and never
//! touches a line outside a diagram block span other than deleting an
//! orphan marker.

use crate::document::{canonical_opener, classify, Document, LineKind, FENCE_MARKER};
use crate::scan::scan;

/// Default number of lines searched above an orphan candidate for a
/// fence line that could legitimately own it.
pub const DEFAULT_LOOKBACK_WINDOW: usize = 10;

/// What to do with a diagram opener that has no closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnterminatedFence {
    /// Leave the block untouched and flag it in the report.
    #[default]
    Preserve,
    /// Clean the body and close the block at the end of its span.
    CloseAtEnd,
}

/// Normalizer for diagram blocks in slide markdown.
#[derive(Debug, Clone)]
pub struct DiagramNormalizer {
    /// Look-back window for orphan marker deletion.
    lookback_window: usize,
    /// Policy for unterminated blocks.
    unterminated: UnterminatedFence,
}

impl Default for DiagramNormalizer {
    fn default() -> Self {
        Self {
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
            unterminated: UnterminatedFence::Preserve,
        }
    }
}

/// What a normalization pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Stray fence-marker lines dropped from inside block spans.
    pub stripped_lines: usize,
    /// Orphan bare-marker lines deleted outside blocks.
    pub orphans_removed: usize,
    /// 1-based line numbers of openers with no closer.
    pub unterminated_openers: Vec<usize>,
}

impl NormalizeReport {
    /// True when the pass left the document byte-identical.
    pub fn is_clean(&self) -> bool {
        self.stripped_lines == 0 && self.orphans_removed == 0 && self.unterminated_openers.is_empty()
    }
}

impl DiagramNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orphan look-back window (in lines).
    pub fn with_lookback_window(mut self, lines: usize) -> Self {
        self.lookback_window = lines;
        self
    }

    /// Set the unterminated-block policy.
    pub fn with_unterminated(mut self, policy: UnterminatedFence) -> Self {
        self.unterminated = policy;
        self
    }

    /// Normalize all diagram blocks, returning the cleaned document.
    pub fn normalize(&self, doc: &Document) -> Document {
        self.normalize_with_report(doc).0
    }

    /// Normalize all diagram blocks, returning the cleaned document and a
    /// report of what changed.
    pub fn normalize_with_report(&self, doc: &Document) -> (Document, NormalizeReport) {
        let lines = doc.lines();
        let outcome = scan(doc);

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut report = NormalizeReport::default();

        let mut next_block = 0;
        let mut i = 0;
        while i < lines.len() {
            if let Some(block) = outcome
                .blocks
                .get(next_block)
                .filter(|b| b.open_line == i)
            {
                if let Some(close) = block.close_line {
                    out.push(canonical_opener());
                    for idx in block.body() {
                        if is_fence_line(&lines[idx]) {
                            report.stripped_lines += 1;
                        } else {
                            out.push(lines[idx].clone());
                        }
                    }
                    out.push(FENCE_MARKER.to_string());
                    // Everything past the genuine closer in the span is
                    // absorbed stray material.
                    report.stripped_lines += block.end_line - close;
                } else {
                    report.unterminated_openers.push(block.open_line + 1);
                    match self.unterminated {
                        UnterminatedFence::Preserve => {
                            for idx in block.open_line..=block.end_line {
                                out.push(lines[idx].clone());
                            }
                        }
                        UnterminatedFence::CloseAtEnd => {
                            out.push(canonical_opener());
                            for idx in block.body() {
                                if is_fence_line(&lines[idx]) {
                                    report.stripped_lines += 1;
                                } else {
                                    out.push(lines[idx].clone());
                                }
                            }
                            out.push(FENCE_MARKER.to_string());
                        }
                    }
                }
                i = block.end_line + 1;
                next_block += 1;
                continue;
            }

            let line = &lines[i];
            if classify(line) == LineKind::FenceBare && self.is_orphan(&out) {
                log::debug!("dropping orphan fence marker at line {}", i + 1);
                report.orphans_removed += 1;
            } else {
                out.push(line.clone());
            }
            i += 1;
        }

        (Document::new(out), report)
    }

    /// A bare marker with no fence line within the look-back window above
    /// it is a leftover closer from an already-consumed block.
    fn is_orphan(&self, emitted: &[String]) -> bool {
        !emitted
            .iter()
            .rev()
            .take(self.lookback_window)
            .any(|l| l.trim().starts_with(FENCE_MARKER))
    }
}

/// Lines that are fence syntax of any shape (bare, opener, or prefixed).
fn is_fence_line(line: &str) -> bool {
    matches!(
        classify(line),
        LineKind::FenceBare | LineKind::FenceOpen | LineKind::FencePrefixed
    )
}
