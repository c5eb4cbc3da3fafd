//! Typed view of a raw search response.
//!
//! Every key is optional: the collection has to cope with partial payloads
//! (for instance an error response without `hits`), so nothing here insists
//! on a field being present. Keys the crate does not model are kept in
//! [`SearchResponse::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single hit record, handed as-is to a [`HitFactory`](crate::factory::HitFactory).
pub type Hit = Map<String, Value>;

/// The full body returned by a search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
  /// Time in milliseconds the query took to run.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub took: Option<u64>,
  /// Whether the query timed out before every shard answered.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timed_out: Option<bool>,
  /// Shard statistics, kept as a raw mapping so that any key can be looked up.
  #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
  pub shards: Option<Value>,
  /// The matched documents and their totals.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hits: Option<Hits>,
  /// Everything else the engine returned (aggregations, suggestions, scroll ids, ...).
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl SearchResponse {
  /// Parses a response from its JSON text.
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }

  /// Reads a response out of an already parsed JSON value.
  pub fn from_value(value: Value) -> serde_json::Result<Self> {
    serde_json::from_value(value)
  }

  /// Number of hit records carried by this response.
  pub fn hit_count(&self) -> usize {
    self.hits.as_ref().map_or(0, |hits| hits.hits.len())
  }
}

/// The `hits` section of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
  /// Number of documents matching the query, across all pages.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<HitsTotal>,
  /// Highest relevance score; `null` when results are sorted on a field.
  #[serde(default)]
  pub max_score: Option<f64>,
  /// The hit records of this response, in rank order.
  #[serde(default)]
  pub hits: Vec<Hit>,
}

/// Total number of matching documents.
///
/// Older engines report a bare integer, newer ones an object with a
/// `relation` telling whether the count is exact or a lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
  /// A bare integer count, always exact.
  Count(u64),
  /// A count together with how it relates to the real total.
  Tracked {
    /// The counted number of matches.
    value: u64,
    /// Whether `value` is exact or a lower bound.
    #[serde(default)]
    relation: TotalRelation,
  },
}

impl HitsTotal {
  /// The counted number of matches, whichever form was used.
  pub fn value(&self) -> u64 {
    match *self {
      HitsTotal::Count(value) | HitsTotal::Tracked { value, .. } => value,
    }
  }

  /// The relation of the count; a bare integer is always exact.
  pub fn relation(&self) -> TotalRelation {
    match *self {
      HitsTotal::Count(_) => TotalRelation::Exact,
      HitsTotal::Tracked { relation, .. } => relation,
    }
  }
}

/// How [`HitsTotal::value`] relates to the real number of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TotalRelation {
  /// The count is exact.
  #[default]
  #[serde(rename = "eq")]
  Exact,
  /// The engine stopped counting; the real total is at least the value.
  #[serde(rename = "gte")]
  LowerBound,
}

/// Decoded shard counters from `_shards`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardStats {
  /// Shards the query was sent to.
  #[serde(default)]
  pub total: u64,
  /// Shards that answered successfully.
  #[serde(default)]
  pub successful: u64,
  /// Shards skipped because they could not hold a match.
  #[serde(default)]
  pub skipped: u64,
  /// Shards that failed to answer.
  #[serde(default)]
  pub failed: u64,
  /// Per-shard failure reports, if any.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub failures: Vec<Value>,
}
