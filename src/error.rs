//! Error types shared across the crate.

/// Errors raised while building or paginating a collection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The raw payload could not be read as a search response.
  #[error("invalid search response: {0}")]
  Response(#[from] serde_json::Error),

  /// The hit factory rejected one of the hits. Construction stops at the
  /// first failure, so no partial collection is ever produced.
  #[error("failed to build model from hit #{position}: {source}")]
  Hit {
    /// Zero-based position of the hit within `hits.hits`.
    position: usize,
    /// The error reported by the factory.
    #[source]
    source: HitError,
  },

  /// The current page or path could not be resolved.
  #[error("cannot resolve current page: {0}")]
  Resolver(String),

  /// A page size of zero was requested.
  #[error("per-page count must be at least 1")]
  InvalidPerPage,
}

/// Errors a [`HitFactory`](crate::factory::HitFactory) may report for a single hit.
#[derive(Debug, thiserror::Error)]
pub enum HitError {
  /// The hit carries no `_source` document.
  #[error("hit has no `_source` document")]
  MissingSource,

  /// The `_source` document does not match the model's shape.
  #[error("cannot decode `_source`: {0}")]
  Decode(#[from] serde_json::Error),

  /// Any other model-specific failure.
  #[error("{0}")]
  Custom(String),
}

impl HitError {
  pub fn custom(message: impl Into<String>) -> Self {
    HitError::Custom(message.into())
  }
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
