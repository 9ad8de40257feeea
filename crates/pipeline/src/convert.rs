//! External markdown-to-deck conversion.
//!
//! Conversion shells out to pandoc. Failures here never abort a run: the
//! markdown artifact is already persisted, so the caller logs the error
//! and keeps going.

use std::io;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// The converter executable.
pub const CONVERTER_PROGRAM: &str = "pandoc";

/// Conversion failures, reported but never propagated as pipeline errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter executable is not installed or not on PATH.
    #[error("converter 'pandoc' not found in PATH")]
    NotFound,

    /// The converter ran and exited non-zero.
    #[error("converter exited with status {status}")]
    Failed {
        /// Process exit code (-1 when terminated by signal).
        status: i32,
    },

    /// Spawning the converter failed for another reason.
    #[error("failed to run converter: {0}")]
    Io(String),
}

/// Convert a markdown file into a deck file.
pub fn convert_to_deck(input: &Path, output: &Path) -> Result<(), ConvertError> {
    run_converter(CONVERTER_PROGRAM, input, output)
}

fn run_converter(program: &str, input: &Path, output: &Path) -> Result<(), ConvertError> {
    let status = Command::new(program)
        .arg("-o")
        .arg(output)
        .arg(input)
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(ConvertError::Failed {
            status: status.code().unwrap_or(-1),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ConvertError::NotFound),
        Err(err) => Err(ConvertError::Io(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_program_reports_not_found() {
        let err = run_converter(
            "definitely-not-a-real-converter",
            &PathBuf::from("in.md"),
            &PathBuf::from("out.pptx"),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NotFound));
    }

    #[test]
    fn test_successful_exit_is_ok() {
        // `true` ignores its arguments and exits zero.
        run_converter("true", &PathBuf::from("in.md"), &PathBuf::from("out.pptx")).unwrap();
    }

    #[test]
    fn test_nonzero_exit_reports_status() {
        let err = run_converter("false", &PathBuf::from("in.md"), &PathBuf::from("out.pptx"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Failed { status: 1 }));
    }
}
