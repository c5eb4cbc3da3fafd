//! Turning hit records into model values.
//!
//! A [`HitFactory`] is the only thing an [`ElasticCollection`](crate::collection::ElasticCollection)
//! needs to know about the models it holds. Three ready-made factories are
//! provided:
//!
//! * any closure `Fn(&Hit) -> Result<T, HitError>`,
//! * [`ModelFactory`], for types implementing [`FromHit`],
//! * [`SourceFactory`], which decodes `_source` with serde and keeps the
//!   hit metadata next to it in a [`Document`].

use crate::error::HitError;
use crate::types::Hit;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Builds one model value out of one hit record.
///
/// # Examples
///
/// ```rust
/// use bouncy::prelude::*;
///
/// let ids = |hit: &Hit| -> Result<String, HitError> {
///   hit
///     .get("_id")
///     .and_then(|id| id.as_str())
///     .map(str::to_owned)
///     .ok_or_else(|| HitError::custom("hit without id"))
/// };
///
/// let response = serde_json::json!({ "hits": { "total": 1, "hits": [{ "_id": "42" }] } });
/// let collection = ElasticCollection::from_value(response, &ids).unwrap();
/// assert_eq!(collection.items(), ["42".to_string()]);
/// ```
pub trait HitFactory<T> {
  /// Converts a single hit. Any error aborts the whole collection.
  fn from_hit(&self, hit: &Hit) -> Result<T, HitError>;
}

impl<T, F> HitFactory<T> for F
where
  F: Fn(&Hit) -> Result<T, HitError>,
{
  fn from_hit(&self, hit: &Hit) -> Result<T, HitError> {
    self(hit)
  }
}

/// Model types that know how to rebuild themselves from a hit.
pub trait FromHit: Sized {
  fn from_hit(hit: &Hit) -> Result<Self, HitError>;
}

/// Adapts a [`FromHit`] model into a [`HitFactory`].
pub struct ModelFactory<M> {
  _model: PhantomData<fn() -> M>,
}

impl<M> ModelFactory<M> {
  pub fn new() -> Self {
    Self { _model: PhantomData }
  }
}

impl<M> Default for ModelFactory<M> {
  fn default() -> Self {
    Self::new()
  }
}

impl<M: FromHit> HitFactory<M> for ModelFactory<M> {
  fn from_hit(&self, hit: &Hit) -> Result<M, HitError> {
    <M as FromHit>::from_hit(hit)
  }
}

/// A model decoded from `_source`, together with the metadata of the hit it came from.
///
/// Dereferences to the model, so fields can be read directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<M> {
  /// Document id (`_id`).
  #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Index the document lives in (`_index`).
  #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
  pub index: Option<String>,
  /// Mapping type (`_type`), only reported by older engines.
  #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
  pub doc_type: Option<String>,
  /// Relevance score (`_score`); absent when sorting on a field.
  #[serde(rename = "_score", skip_serializing_if = "Option::is_none")]
  pub score: Option<f64>,
  /// Document version (`_version`), present when the query asked for it.
  #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
  pub version: Option<u64>,
  /// Highlighted fragments keyed by field name.
  #[serde(skip_serializing_if = "HashMap::is_empty")]
  pub highlight: HashMap<String, Vec<String>>,
  /// The decoded `_source`.
  #[serde(rename = "_source")]
  pub source: M,
}

impl<M> Document<M> {
  /// First highlighted fragment for `field`, if the engine returned one.
  pub fn highlight(&self, field: &str) -> Option<&str> {
    self
      .highlight
      .get(field)
      .and_then(|fragments| fragments.first())
      .map(String::as_str)
  }

  pub fn into_source(self) -> M {
    self.source
  }
}

impl<M: DeserializeOwned> FromHit for Document<M> {
  fn from_hit(hit: &Hit) -> Result<Self, HitError> {
    let source = hit.get("_source").ok_or(HitError::MissingSource)?;
    let highlight = match hit.get("highlight") {
      Some(value) => HashMap::<String, Vec<String>>::deserialize(value)?,
      None => HashMap::new(),
    };

    Ok(Document {
      id: string_field(hit, "_id"),
      index: string_field(hit, "_index"),
      doc_type: string_field(hit, "_type"),
      score: hit.get("_score").and_then(Value::as_f64),
      version: hit.get("_version").and_then(Value::as_u64),
      highlight,
      source: M::deserialize(source)?,
    })
  }
}

impl<M> Deref for Document<M> {
  type Target = M;

  fn deref(&self) -> &M {
    &self.source
  }
}

impl<M> DerefMut for Document<M> {
  fn deref_mut(&mut self) -> &mut M {
    &mut self.source
  }
}

fn string_field(hit: &Hit, key: &str) -> Option<String> {
  hit.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Decodes `_source` of every hit into `M` and wraps it in a [`Document`].
pub struct SourceFactory<M> {
  _model: PhantomData<fn() -> M>,
}

impl<M> SourceFactory<M> {
  pub fn new() -> Self {
    Self { _model: PhantomData }
  }
}

impl<M> Default for SourceFactory<M> {
  fn default() -> Self {
    Self::new()
  }
}

impl<M: DeserializeOwned> HitFactory<Document<M>> for SourceFactory<M> {
  fn from_hit(&self, hit: &Hit) -> Result<Document<M>, HitError> {
    <Document<M> as FromHit>::from_hit(hit)
  }
}
