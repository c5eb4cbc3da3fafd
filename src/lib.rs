//! Bouncy - model collections built from Elasticsearch search responses.
//!
//! Bouncy takes the raw body of a search response, turns every hit into a
//! model through a [`HitFactory`](factory::HitFactory), and hands back an
//! [`ElasticCollection`](collection::ElasticCollection) that keeps the
//! response metadata around and can be cut into length-aware pages.

pub mod collection;
pub mod error;
pub mod factory;
pub mod page;
pub mod paginator;
pub mod types;

pub use error::{Error, HitError, Result};

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::collection::*;
  pub use crate::error::*;
  pub use crate::factory::*;
  pub use crate::page::*;
  pub use crate::paginator::*;
  pub use crate::types::*;
}
