use thiserror::Error;

/// Errors raised while normalizing filters, building expression trees,
/// or rendering them into a dialect.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed filter shape: an operator applied to the wrong operand
    /// type, a non-list where a list is required, or an unparseable
    /// condition. Surfaced straight to the caller.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A candidate kind matched by key but rejected the value's shape.
    /// Internal to the construction protocol: it advances to the next
    /// candidate key instead of failing the build.
    #[error("unrecognized expression type: {0}")]
    UnrecognizedExprType(String),

    /// No registered node kind matched any candidate key derived from the
    /// value.
    #[error("cannot recognize a node kind from {0}")]
    UnrecognizedNodeKind(String),

    /// Duplicate discriminant key at registration time. A static
    /// configuration error: the registry bootstrap treats it as fatal.
    #[error("discriminant registry conflict: {0}")]
    RegistryConflict(String),

    /// The node kind has no rendering defined for the requested dialect.
    #[error("{kind} is not supported in the {dialect} dialect")]
    UnsupportedOperation {
        kind: &'static str,
        dialect: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
