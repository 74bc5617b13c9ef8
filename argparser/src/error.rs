//! Error taxonomy for the parsing engine.
//!
//! All variants are parse-time failures: the scan stops at the first one,
//! and the failed session is discarded. The `Display` text is the exact
//! single-line message written to the caller's error sink.

pub type Result<T> = std::result::Result<T, ParseError>;

/// Returning this error from the scan (or from a handler) stops parsing.
///
/// The contained string is the option as the user wrote it, dashes
/// included (`--file`, `-n`).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A long or short name not present in the registry.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// A value attached to an option that takes no argument.
    #[error("Option {0} does not allow an argument.")]
    UnexpectedArgument(String),

    /// A mandatory argument with no token left to satisfy it.
    #[error("Option {0} requires an argument.")]
    MissingArgument(String),

    /// Raised by an option handler to abort the parse.
    #[error("{0}")]
    Handler(String),
}
