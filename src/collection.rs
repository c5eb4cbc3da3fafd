//! The collection of models built from a search response.

use crate::error::{Error, Result};
use crate::factory::HitFactory;
use crate::page::PageResolver;
use crate::paginator::{LengthAwarePage, PaginationOptions, DEFAULT_PER_PAGE};
use crate::types::{SearchResponse, ShardStats, TotalRelation};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

/// An ordered collection of models built from the hits of one search response.
///
/// The models are created once, when the collection is built, by running
/// every hit through a [`HitFactory`]. The response is kept alongside so its
/// metadata (totals, timing, shard statistics) stays available.
///
/// Metadata accessors never fail: a key missing from the response reads as
/// `None` (or `0` for [`total`](Self::total)).
///
/// # Examples
///
/// ```rust
/// use bouncy::prelude::*;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Post {
///   title: String,
/// }
///
/// let response = serde_json::json!({
///   "took": 3,
///   "timed_out": false,
///   "hits": {
///     "total": 3,
///     "max_score": 1.0,
///     "hits": [
///       { "_id": "1", "_source": { "title": "one" } },
///       { "_id": "2", "_source": { "title": "two" } },
///       { "_id": "3", "_source": { "title": "three" } }
///     ]
///   }
/// });
///
/// let posts = ElasticCollection::from_value(response, &SourceFactory::<Post>::new()).unwrap();
/// assert_eq!(posts.total(), 3);
///
/// let page = posts.paginate(2, &RequestContext::from_url("/posts?page=2").unwrap()).unwrap();
/// assert_eq!(page.items()[0].title, "three");
/// assert_eq!(page.last_page(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ElasticCollection<T> {
  items: Vec<T>,
  response: SearchResponse,
}

impl<T> ElasticCollection<T> {
  /// Builds the collection, invoking `factory` once per hit, in order.
  ///
  /// A response without `hits` gives an empty collection. The first factory
  /// failure aborts construction with [`Error::Hit`].
  pub fn new<F>(response: SearchResponse, factory: &F) -> Result<Self>
  where
    F: HitFactory<T> + ?Sized,
  {
    let items = match &response.hits {
      Some(hits) => hits
        .hits
        .iter()
        .enumerate()
        .map(|(position, hit)| {
          trace!(position, "building model from hit");
          factory
            .from_hit(hit)
            .map_err(|source| Error::Hit { position, source })
        })
        .collect::<Result<Vec<T>>>()?,
      None => Vec::new(),
    };

    debug!(
      items = items.len(),
      total = ?response.hits.as_ref().and_then(|h| h.total).map(|t| t.value()),
      "built collection from search response"
    );

    Ok(Self { items, response })
  }

  /// Parses `json` as a search response and builds the collection from it.
  pub fn from_json<F>(json: &str, factory: &F) -> Result<Self>
  where
    F: HitFactory<T> + ?Sized,
  {
    Self::new(SearchResponse::from_json(json)?, factory)
  }

  /// Reads a search response out of `value` and builds the collection from it.
  pub fn from_value<F>(value: Value, factory: &F) -> Result<Self>
  where
    F: HitFactory<T> + ?Sized,
  {
    Self::new(SearchResponse::from_value(value)?, factory)
  }

  /// Total number of matching documents, or `0` when the response has no hits.
  ///
  /// This is the engine's count, not the number of items held here.
  pub fn total(&self) -> u64 {
    self
      .response
      .hits
      .as_ref()
      .and_then(|hits| hits.total)
      .map_or(0, |total| total.value())
  }

  /// Whether [`total`](Self::total) is exact or a lower bound.
  pub fn total_relation(&self) -> Option<TotalRelation> {
    self
      .response
      .hits
      .as_ref()
      .and_then(|hits| hits.total)
      .map(|total| total.relation())
  }

  /// Highest relevance score among the hits.
  pub fn max_score(&self) -> Option<f64> {
    self.response.hits.as_ref().and_then(|hits| hits.max_score)
  }

  /// Milliseconds the query took to run.
  pub fn took(&self) -> Option<u64> {
    self.response.took
  }

  pub fn timed_out(&self) -> Option<bool> {
    self.response.timed_out
  }

  /// Shard statistics.
  ///
  /// With no `key`, or a `key` the statistics do not contain (or hold as
  /// `null`), the whole `_shards` mapping is returned. Otherwise only that
  /// field is.
  pub fn shards(&self, key: Option<&str>) -> Option<&Value> {
    let shards = self.response.shards.as_ref()?;
    match key.and_then(|key| shards.get(key)).filter(|field| !field.is_null()) {
      Some(field) => Some(field),
      None => Some(shards),
    }
  }

  /// Decoded shard counters.
  ///
  /// `None` when the response has no `_shards`; `Some(Err(_))` when it has
  /// one that does not look like shard counters.
  pub fn shard_stats(&self) -> Option<serde_json::Result<ShardStats>> {
    let shards = self.response.shards.as_ref()?;
    Some(ShardStats::deserialize(shards))
  }

  /// Trims the collection in place.
  ///
  /// A positive `limit` keeps the first `limit` items and a negative one the
  /// last `|limit|`. `None` and `Some(0)` leave the collection untouched.
  pub fn limit(&mut self, limit: Option<i64>) -> &mut Self {
    let Some(limit) = limit.filter(|limit| *limit != 0) else {
      return self;
    };

    let keep = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
    if keep < self.items.len() {
      if limit < 0 {
        self.items.drain(..self.items.len() - keep);
      } else {
        self.items.truncate(keep);
      }
    }

    debug!(limit, items = self.items.len(), "limited collection");
    self
  }

  /// Returns page `resolver.current_page("page")` of the collection, `per_page` items long.
  ///
  /// The page is always cut from the items currently held, whatever
  /// [`limit`](Self::limit) left of them, while its `total` stays the
  /// engine's count. Pages past the end are empty rather than an error.
  pub fn paginate<R>(&self, per_page: usize, resolver: &R) -> Result<LengthAwarePage<&T>>
  where
    R: PageResolver + ?Sized,
  {
    self.paginate_with(&PaginationOptions::default().per_page(per_page), resolver)
  }

  /// [`paginate`](Self::paginate) with the default page size of 15.
  pub fn paginate_default<R>(&self, resolver: &R) -> Result<LengthAwarePage<&T>>
  where
    R: PageResolver + ?Sized,
  {
    self.paginate(DEFAULT_PER_PAGE, resolver)
  }

  /// Paginates using explicit [`PaginationOptions`].
  pub fn paginate_with<R>(&self, options: &PaginationOptions, resolver: &R) -> Result<LengthAwarePage<&T>>
  where
    R: PageResolver + ?Sized,
  {
    let (current_page, path) = resolve(options, resolver)?;
    let range = page_range(self.items.len(), options.per_page, current_page);
    debug!(current_page, per_page = options.per_page, ?range, "paginating collection");

    LengthAwarePage::new(
      self.items[range].iter().collect(),
      self.total(),
      options.per_page,
      current_page,
      path,
      options.page_name.as_str(),
    )
  }

  /// Consumes the collection and returns an owned page of it.
  pub fn into_page<R>(self, options: &PaginationOptions, resolver: &R) -> Result<LengthAwarePage<T>>
  where
    R: PageResolver + ?Sized,
  {
    let (current_page, path) = resolve(options, resolver)?;
    let range = page_range(self.items.len(), options.per_page, current_page);
    debug!(current_page, per_page = options.per_page, ?range, "paginating collection");

    let total = self.total();
    let mut items = self.items;
    LengthAwarePage::new(
      items.drain(range).collect(),
      total,
      options.per_page,
      current_page,
      path,
      options.page_name.as_str(),
    )
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn into_items(self) -> Vec<T> {
    self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn first(&self) -> Option<&T> {
    self.items.first()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  /// The response the collection was built from.
  pub fn response(&self) -> &SearchResponse {
    &self.response
  }
}

fn resolve<R>(options: &PaginationOptions, resolver: &R) -> Result<(usize, String)>
where
  R: PageResolver + ?Sized,
{
  if options.per_page == 0 {
    return Err(Error::InvalidPerPage);
  }
  let current_page = resolver.current_page(&options.page_name)?.max(1);
  let path = resolver.current_path()?;
  Ok((current_page, path))
}

/// Index range of `current_page` within `len` items, clamped to the bounds.
fn page_range(len: usize, per_page: usize, current_page: usize) -> std::ops::Range<usize> {
  let start = (current_page - 1).saturating_mul(per_page).min(len);
  let end = start.saturating_add(per_page).min(len);
  start..end
}

impl<T> IntoIterator for ElasticCollection<T> {
  type Item = T;
  type IntoIter = std::vec::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_iter()
  }
}

impl<'a, T> IntoIterator for &'a ElasticCollection<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}
