//! Document model, diagram-fence normalization, and structural validation
//! for generated slide markdown.

pub mod document;
pub mod normalize;
pub mod scan;
pub mod validate;

pub use document::{classify, Document, LineKind};
pub use normalize::{DiagramNormalizer, NormalizeReport, UnterminatedFence};
pub use scan::{scan, DiagramBlock, ScanOutcome};
pub use validate::{validate, ValidationReport, Violation};
