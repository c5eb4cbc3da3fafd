//! Length-aware pages of results.

use crate::error::{Error, Result};
use crate::page::PAGE_NAME;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Number of items per page when the caller does not pick one.
pub const DEFAULT_PER_PAGE: usize = 15;

/// Options controlling how a collection is split into pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
  /// Number of items on a page. Must be at least 1.
  #[serde(default = "default_per_page")]
  pub per_page: usize,
  /// Name of the query-string parameter holding the page number.
  #[serde(default = "default_page_name")]
  pub page_name: String,
}

fn default_per_page() -> usize {
  DEFAULT_PER_PAGE
}

fn default_page_name() -> String {
  PAGE_NAME.to_string()
}

impl Default for PaginationOptions {
  fn default() -> Self {
    Self {
      per_page: default_per_page(),
      page_name: default_page_name(),
    }
  }
}

impl PaginationOptions {
  /// Sets the number of items per page.
  pub fn per_page(mut self, per_page: usize) -> Self {
    self.per_page = per_page;
    self
  }

  /// Sets the page parameter name.
  pub fn page_name(mut self, page_name: impl Into<String>) -> Self {
    self.page_name = page_name.into();
    self
  }
}

/// One page of a larger result set, aware of how many results exist in total.
///
/// Besides the items themselves it knows enough to render navigation: the
/// number of the last page, the positions of its first and last item, and
/// links to neighbouring pages.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthAwarePage<T> {
  items: Vec<T>,
  total: u64,
  per_page: usize,
  current_page: usize,
  last_page: usize,
  path: String,
  page_name: String,
}

impl<T> LengthAwarePage<T> {
  /// Wraps an already sliced page of `items`.
  ///
  /// `current_page` values below 1 are treated as page 1 and a trailing `/`
  /// is dropped from `path` (except for the root path itself).
  pub fn new(
    items: Vec<T>,
    total: u64,
    per_page: usize,
    current_page: usize,
    path: impl Into<String>,
    page_name: impl Into<String>,
  ) -> Result<Self> {
    if per_page == 0 {
      return Err(Error::InvalidPerPage);
    }

    let path = path.into();
    let path = if path == "/" {
      path
    } else {
      path.trim_end_matches('/').to_string()
    };

    let pages = total.div_ceil(per_page as u64);
    let last_page = usize::try_from(pages).unwrap_or(usize::MAX).max(1);

    Ok(Self {
      items,
      total,
      per_page,
      current_page: current_page.max(1),
      last_page,
      path,
      page_name: page_name.into(),
    })
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn into_items(self) -> Vec<T> {
    self.items
  }

  /// Total number of results across every page.
  pub fn total(&self) -> u64 {
    self.total
  }

  pub fn per_page(&self) -> usize {
    self.per_page
  }

  pub fn current_page(&self) -> usize {
    self.current_page
  }

  /// Number of the last page; never less than 1.
  pub fn last_page(&self) -> usize {
    self.last_page
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn page_name(&self) -> &str {
    &self.page_name
  }

  /// Number of items on this page.
  pub fn count(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  /// 1-based position of the first item on this page within the whole result set.
  ///
  /// `None` for an empty page, or when the position does not fit in a `usize`.
  pub fn first_item(&self) -> Option<usize> {
    if self.items.is_empty() {
      return None;
    }
    (self.current_page - 1)
      .checked_mul(self.per_page)?
      .checked_add(1)
  }

  /// 1-based position of the last item on this page within the whole result set.
  pub fn last_item(&self) -> Option<usize> {
    self
      .first_item()?
      .checked_add(self.items.len() - 1)
  }

  pub fn on_first_page(&self) -> bool {
    self.current_page <= 1
  }

  pub fn on_last_page(&self) -> bool {
    !self.has_more_pages()
  }

  pub fn has_more_pages(&self) -> bool {
    self.current_page < self.last_page
  }

  /// Whether there is more than one page to navigate.
  pub fn has_pages(&self) -> bool {
    self.current_page != 1 || self.has_more_pages()
  }

  /// Link to `page`, built on the base path. Pages below 1 link to page 1.
  pub fn url(&self, page: usize) -> String {
    let page = page.max(1);
    let separator = if self.path.contains('?') { '&' } else { '?' };
    let query = url::form_urlencoded::Serializer::new(String::new())
      .append_pair(&self.page_name, &page.to_string())
      .finish();
    format!("{}{}{}", self.path, separator, query)
  }

  pub fn next_page_url(&self) -> Option<String> {
    self
      .has_more_pages()
      .then(|| self.url(self.current_page + 1))
  }

  pub fn previous_page_url(&self) -> Option<String> {
    (self.current_page > 1).then(|| self.url(self.current_page - 1))
  }

  /// Transforms every item on the page, keeping the page metadata.
  pub fn map<U, F>(self, f: F) -> LengthAwarePage<U>
  where
    F: FnMut(T) -> U,
  {
    LengthAwarePage {
      items: self.items.into_iter().map(f).collect(),
      total: self.total,
      per_page: self.per_page,
      current_page: self.current_page,
      last_page: self.last_page,
      path: self.path,
      page_name: self.page_name,
    }
  }
}

impl<T> IntoIterator for LengthAwarePage<T> {
  type Item = T;
  type IntoIter = std::vec::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_iter()
  }
}

impl<'a, T> IntoIterator for &'a LengthAwarePage<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}

impl<T: Serialize> Serialize for LengthAwarePage<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("LengthAwarePage", 12)?;
    state.serialize_field("current_page", &self.current_page)?;
    state.serialize_field("data", &self.items)?;
    state.serialize_field("first_page_url", &self.url(1))?;
    state.serialize_field("from", &self.first_item())?;
    state.serialize_field("last_page", &self.last_page)?;
    state.serialize_field("last_page_url", &self.url(self.last_page))?;
    state.serialize_field("next_page_url", &self.next_page_url())?;
    state.serialize_field("path", &self.path)?;
    state.serialize_field("per_page", &self.per_page)?;
    state.serialize_field("prev_page_url", &self.previous_page_url())?;
    state.serialize_field("to", &self.last_item())?;
    state.serialize_field("total", &self.total)?;
    state.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::{json, Value};

  fn page(items: Vec<u32>, total: u64, per_page: usize, current: usize) -> LengthAwarePage<u32> {
    LengthAwarePage::new(items, total, per_page, current, "/posts", "page").unwrap()
  }

  #[test]
  fn computes_last_page() {
    assert_eq!(page(vec![], 0, 15, 1).last_page(), 1);
    assert_eq!(page(vec![], 30, 15, 1).last_page(), 2);
    assert_eq!(page(vec![], 31, 15, 1).last_page(), 3);
  }

  #[test]
  fn item_positions() {
    let p = page(vec![5, 6], 5, 2, 3);
    assert_eq!(p.first_item(), Some(5));
    assert_eq!(p.last_item(), Some(6));

    let empty = page(vec![], 5, 2, 9);
    assert_eq!(empty.first_item(), None);
    assert_eq!(empty.last_item(), None);
  }

  #[test]
  fn item_positions_do_not_overflow_on_huge_pages() {
    let p = page(vec![1], 10, 2, usize::MAX);
    assert_eq!(p.first_item(), None);
    assert_eq!(p.last_item(), None);

    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["from"], Value::Null);
    assert_eq!(json["to"], Value::Null);
    assert_eq!(json["current_page"], json!(usize::MAX));

    let edge = LengthAwarePage::new(vec![1, 2], 10, 1, usize::MAX, "/posts", "page").unwrap();
    assert_eq!(edge.first_item(), Some(usize::MAX));
    assert_eq!(edge.last_item(), None);
  }

  #[test]
  fn navigation_links() {
    let middle = page(vec![3, 4], 6, 2, 2);
    assert_eq!(middle.previous_page_url().as_deref(), Some("/posts?page=1"));
    assert_eq!(middle.next_page_url().as_deref(), Some("/posts?page=3"));
    assert!(middle.has_pages());

    let only = page(vec![1], 1, 2, 1);
    assert_eq!(only.previous_page_url(), None);
    assert_eq!(only.next_page_url(), None);
    assert!(!only.has_pages());
    assert!(only.on_first_page());
    assert!(only.on_last_page());
  }

  #[test]
  fn url_appends_to_existing_query_and_trims_slash() {
    let p = LengthAwarePage::new(vec![1], 10, 1, 1, "/search?q=a b", "p").unwrap();
    assert_eq!(p.url(2), "/search?q=a b&p=2");

    let p = LengthAwarePage::new(vec![1], 10, 1, 1, "/posts/", "page").unwrap();
    assert_eq!(p.path(), "/posts");
    assert_eq!(p.url(0), "/posts?page=1");

    let root = LengthAwarePage::new(vec![1], 10, 1, 1, "/", "page").unwrap();
    assert_eq!(root.path(), "/");
  }

  #[test]
  fn zero_per_page_is_rejected() {
    let err = LengthAwarePage::<u32>::new(vec![], 1, 0, 1, "/", "page").unwrap_err();
    assert!(matches!(err, Error::InvalidPerPage));
  }

  #[test]
  fn serializes_length_aware_shape() {
    let p = page(vec![3, 4], 5, 2, 2);
    assert_eq!(
      serde_json::to_value(&p).unwrap(),
      json!({
        "current_page": 2,
        "data": [3, 4],
        "first_page_url": "/posts?page=1",
        "from": 3,
        "last_page": 3,
        "last_page_url": "/posts?page=3",
        "next_page_url": "/posts?page=3",
        "path": "/posts",
        "per_page": 2,
        "prev_page_url": "/posts?page=1",
        "to": 4,
        "total": 5
      })
    );
  }

  #[test]
  fn options_defaults_and_overrides() {
    let defaults: PaginationOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(defaults, PaginationOptions::default());
    assert_eq!(defaults.per_page, 15);
    assert_eq!(defaults.page_name, "page");

    let custom = PaginationOptions::default().per_page(50).page_name("p");
    assert_eq!(custom.per_page, 50);
    assert_eq!(custom.page_name, "p");
  }

  #[test]
  fn map_keeps_metadata() {
    let p = page(vec![1, 2], 4, 2, 1).map(|n| n * 10);
    assert_eq!(p.items(), &[10, 20]);
    assert_eq!(p.total(), 4);
    assert_eq!(p.last_page(), 2);
  }
}
