//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library and the CLI.
///
/// The mangling passes themselves are infallible over a parsed document;
/// everything here originates at the edges (parsing raw input, reading
/// files, loading configuration).
#[derive(Debug, Error)]
pub enum Error {
    /// The HTML front-end rejected fundamentally unparsable input.
    /// Propagated unmodified from the parser.
    #[error("malformed HTML document: {0}")]
    Html(tl::ParseError),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    /// Config validation failed (e.g. a whitelist entry without a
    /// `#`/`.` prefix, which could never match anything).
    #[error("config validation error: {0}")]
    Config(String),
}

impl From<tl::ParseError> for Error {
    fn from(err: tl::ParseError) -> Self {
        Self::Html(err)
    }
}
