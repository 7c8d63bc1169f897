use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by structural operations.
///
/// Every variant is reported before any tree state is written, so a returned
/// error always means the forest is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required handle (`node`, `parent`, `child`, `target`) does not resolve to a live node.
    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    /// The requested attach would make a node its own ancestor or descendant.
    #[error("tree circularity: {0}")]
    TreeCircularity(String),
}

impl Error {
    pub(crate) fn missing(name: &str) -> Self {
        Error::MissingRequiredArgument(name.into())
    }
}
