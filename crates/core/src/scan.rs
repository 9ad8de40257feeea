//! Diagram block boundary detection.
//!
//! Walks a document once and pairs every diagram opener with its first
//! bare closer, absorbing stray duplicate closers into the same span.
//! Openers with no closer are reported as unterminated, never repaired
//! here.

use crate::document::{classify, Document, LineKind};
use std::ops::Range;

/// A diagram block span located within a document. Line indices are
/// 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Index of the opener line.
    pub open_line: usize,
    /// Index of the first bare closer, or `None` for an unterminated block.
    pub close_line: Option<usize>,
    /// Last line belonging to the span (inclusive). For a terminated block
    /// this extends past `close_line` over any absorbed stray closers; for
    /// an unterminated block it runs to the line before the next opener,
    /// or to the end of the document.
    pub end_line: usize,
}

impl DiagramBlock {
    /// Whether a closer was found for this block.
    pub fn is_terminated(&self) -> bool {
        self.close_line.is_some()
    }

    /// Range of inner content lines (between opener and closer, or to the
    /// span end when unterminated).
    pub fn body(&self) -> Range<usize> {
        let end = self.close_line.unwrap_or(self.end_line + 1);
        (self.open_line + 1)..end
    }
}

/// Result of scanning a document for diagram blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Blocks in document order.
    pub blocks: Vec<DiagramBlock>,
}

impl ScanOutcome {
    /// 0-based opener indices of unterminated blocks.
    pub fn unterminated(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .filter(|b| !b.is_terminated())
            .map(|b| b.open_line)
            .collect()
    }
}

/// Locate every diagram block span in the document.
pub fn scan(doc: &Document) -> ScanOutcome {
    let lines = doc.lines();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if classify(&lines[i]) != LineKind::FenceOpen {
            i += 1;
            continue;
        }

        // Seek the first bare closer; a second opener ends the search.
        let mut j = i + 1;
        let mut close = None;
        while j < lines.len() {
            match classify(&lines[j]) {
                LineKind::FenceOpen => break,
                LineKind::FenceBare => {
                    close = Some(j);
                    break;
                }
                _ => j += 1,
            }
        }

        match close {
            Some(c) => {
                // Stray closers directly after the genuine one (blank lines
                // between them allowed) belong to this block, not to a new
                // one.
                let mut end = c;
                let mut k = c + 1;
                loop {
                    let mut m = k;
                    while m < lines.len() && lines[m].trim().is_empty() {
                        m += 1;
                    }
                    if m < lines.len() && classify(&lines[m]) == LineKind::FenceBare {
                        end = m;
                        k = m + 1;
                    } else {
                        break;
                    }
                }
                blocks.push(DiagramBlock {
                    open_line: i,
                    close_line: Some(c),
                    end_line: end,
                });
                i = end + 1;
            }
            None => {
                blocks.push(DiagramBlock {
                    open_line: i,
                    close_line: None,
                    end_line: j.saturating_sub(1),
                });
                i = j;
            }
        }
    }

    ScanOutcome { blocks }
}
