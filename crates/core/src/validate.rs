//! Structural validation of notes regions and slide boundaries.
//!
//! A single pass over the document tracks whether a speaker-notes region
//! is open and which slide the scan is in, and records every violation
//! with its slide and line. The validator never mutates the document;
//! findings are data for the caller to act on.

use crate::document::{classify, Document, LineKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notes region still open when a slide separator was reached.
pub const MSG_OPEN_AT_SEPARATOR: &str = "notes section not closed before slide separator";
/// Notes opening directive while a region was already open.
pub const MSG_ALREADY_OPEN: &str = "notes section already open";
/// Closing directive with no matching open in the same slide.
pub const MSG_CLOSE_WITHOUT_OPEN: &str = "closing notes without a matching open";
/// Notes region still open when the document ended.
pub const MSG_OPEN_AT_EOF: &str = "notes section not closed at end of document";

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 1-based ordinal of the slide the violation belongs to.
    pub slide: usize,
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide {}, line {}: {}", self.slide, self.line, self.message)
    }
}

/// All violations found in one validation pass, in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Violations in ascending line order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when no violations were found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "document structure is valid");
        }
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Check that every notes region opens and closes within its slide.
pub fn validate(doc: &Document) -> ValidationReport {
    let mut violations = Vec::new();
    let mut notes_open = false;
    let mut slide_index = 1usize;

    for (idx, line) in doc.lines().iter().enumerate() {
        let number = idx + 1;
        match classify(line) {
            LineKind::Separator => {
                if notes_open {
                    violations.push(Violation {
                        slide: slide_index,
                        line: number,
                        message: MSG_OPEN_AT_SEPARATOR.to_string(),
                    });
                    notes_open = false;
                }
                slide_index += 1;
            }
            LineKind::NotesOpen => {
                if notes_open {
                    violations.push(Violation {
                        slide: slide_index,
                        line: number,
                        message: MSG_ALREADY_OPEN.to_string(),
                    });
                }
                // Repeated opens do not nest.
                notes_open = true;
            }
            LineKind::NotesClose => {
                if notes_open {
                    notes_open = false;
                } else {
                    violations.push(Violation {
                        slide: slide_index,
                        line: number,
                        message: MSG_CLOSE_WITHOUT_OPEN.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    if notes_open {
        violations.push(Violation {
            slide: slide_index,
            line: doc.len(),
            message: MSG_OPEN_AT_EOF.to_string(),
        });
    }

    ValidationReport { violations }
}
