use thiserror::Error;

/// A region token could not be mapped onto a scope. Raised before any
/// fetching starts, so a bad token never costs network traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionResolutionError {
    #[error("empty region token")]
    EmptyToken,

    #[error("unrecognized region token '{0}'")]
    UnknownToken(String),
}
