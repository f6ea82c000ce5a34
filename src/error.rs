use std::fmt;

use crate::dsl::error::ExecError;
use crate::settings::SettingsError;

/// Terminal outcome of a failed conversion. Every variant aborts the run.
#[derive(Debug)]
pub enum AppError {
    /// An expression did not match the grammar.
    Compile { expression: String, message: String },
    /// The VM faulted while evaluating an expression for a track.
    Execution { track: usize, source: ExecError },
    /// The VM faulted on a one-off evaluation outside any conversion.
    Evaluation { expression: String, source: ExecError },
    /// The input image could not be read or decoded.
    Input { message: String },
    /// The output file could not be written.
    Output { message: String },
    /// The settings file is unreadable or invalid.
    Config { message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Compile { expression, message } => {
                write!(f, "Parsing of expression {expression} failed: {message}")
            }
            AppError::Execution { track, source } => {
                write!(f, "Evaluation failed in track {track}: {source}")
            }
            AppError::Evaluation { expression, source } => {
                write!(f, "Evaluation of expression {expression} failed: {source}")
            }
            AppError::Input { message } => write!(f, "Could not load input file: {message}"),
            AppError::Output { message } => write!(f, "Could not write output file: {message}"),
            AppError::Config { message } => write!(f, "Invalid settings: {message}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Execution { source, .. } | AppError::Evaluation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Config {
            message: e.to_string(),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::Input {
            message: e.to_string(),
        }
    }
}
