//! Error types for the ledger CSV adapter and CLI.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while loading input or running the CLI.
///
/// The statistics and settlement passes themselves are total: data
/// inconsistencies degrade to defined zero-contribution results and are
/// logged, never surfaced as errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file arguments
    #[error("Missing arguments. Usage: split-ledger <members.csv> <bills.csv> [stats [category-id] [paymode-id] | settle [center-member-id]]")]
    MissingArgument,

    /// Unrecognized CLI command
    #[error("Unknown command `{command}`, expected `stats` or `settle`")]
    UnknownCommand { command: String },

    /// A CLI argument failed to parse
    #[error("Invalid value `{value}` for {name}")]
    InvalidArgument { name: &'static str, value: String },
}
