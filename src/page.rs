//! Resolving the current page and base path of a request.
//!
//! Web frameworks usually read these from ambient request state. Here they
//! are an explicit dependency of [`paginate`](crate::collection::ElasticCollection::paginate):
//! anything implementing [`PageResolver`] will do, and [`RequestContext`]
//! covers the common case of a request URL.

use crate::error::{Error, Result};
use std::collections::HashMap;
use url::Url;

/// Name of the query-string parameter carrying the page number.
pub const PAGE_NAME: &str = "page";

/// Supplies the page number and base path a page of results is built for.
pub trait PageResolver {
  /// Current page number, read from the parameter called `page_name`.
  ///
  /// Implementations should return `1` rather than fail when the parameter
  /// is absent or not a valid page number.
  fn current_page(&self, page_name: &str) -> Result<usize>;

  /// Base path (without query string) that page links are built on.
  fn current_path(&self) -> Result<String>;
}

impl<R: PageResolver + ?Sized> PageResolver for &R {
  fn current_page(&self, page_name: &str) -> Result<usize> {
    (**self).current_page(page_name)
  }

  fn current_path(&self) -> Result<String> {
    (**self).current_path()
  }
}

/// The parts of an incoming request that pagination cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
  path: String,
  params: HashMap<String, String>,
}

impl RequestContext {
  /// A context sitting on `page` of `path`.
  pub fn new(page: usize, path: impl Into<String>) -> Self {
    Self::with_path(path).param(PAGE_NAME, page.to_string())
  }

  /// A context for `path` with no query parameters; resolves to page 1.
  pub fn with_path(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      params: HashMap::new(),
    }
  }

  /// Builds a context out of a request URL.
  ///
  /// Both absolute (`https://example.com/posts?page=2`) and origin-relative
  /// (`/posts?page=2`) URLs are accepted. The base path keeps the scheme and
  /// host when the URL has them.
  pub fn from_url(raw: &str) -> Result<Self> {
    let (url, relative) = match Url::parse(raw) {
      Ok(url) => (url, false),
      Err(url::ParseError::RelativeUrlWithoutBase) => {
        let base = Url::parse("http://localhost/").map_err(|e| Error::Resolver(e.to_string()))?;
        let url = base
          .join(raw)
          .map_err(|e| Error::Resolver(format!("{raw}: {e}")))?;
        (url, true)
      }
      Err(e) => return Err(Error::Resolver(format!("{raw}: {e}"))),
    };

    let path = if relative {
      url.path().to_string()
    } else {
      let mut base = url.clone();
      base.set_query(None);
      base.set_fragment(None);
      base.to_string()
    };

    // Repeated parameters: the last one wins, as with most form decoders.
    let params = url.query_pairs().into_owned().collect();
    Ok(Self { path, params })
  }

  /// Adds or replaces a query parameter.
  pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.params.insert(name.into(), value.into());
    self
  }

  pub fn path(&self) -> &str {
    &self.path
  }
}

impl PageResolver for RequestContext {
  fn current_page(&self, page_name: &str) -> Result<usize> {
    Ok(self
      .params
      .get(page_name)
      .and_then(|raw| raw.trim().parse::<usize>().ok())
      .filter(|page| *page >= 1)
      .unwrap_or(1))
  }

  fn current_path(&self) -> Result<String> {
    Ok(self.path.clone())
  }
}
