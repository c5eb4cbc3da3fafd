use bouncy::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn letters(ids: &[&str], total: usize) -> ElasticCollection<String> {
  let hits: Vec<Value> = ids.iter().map(|id| json!({ "_id": id })).collect();
  let factory = |hit: &Hit| -> Result<String, HitError> {
    hit
      .get("_id")
      .and_then(Value::as_str)
      .map(str::to_owned)
      .ok_or(HitError::MissingSource)
  };
  ElasticCollection::from_value(json!({ "hits": { "total": total, "hits": hits } }), &factory).unwrap()
}

fn cloned(page: &LengthAwarePage<&String>) -> Vec<String> {
  page.iter().map(|s| s.to_string()).collect()
}

/// A resolver standing in for a request that cannot be inspected.
struct Unavailable;

impl PageResolver for Unavailable {
  fn current_page(&self, _page_name: &str) -> Result<usize> {
    Err(Error::Resolver("no request in scope".into()))
  }

  fn current_path(&self) -> Result<String> {
    Err(Error::Resolver("no request in scope".into()))
  }
}

#[test]
fn second_page_of_two() {
  let collection = letters(&["a", "b", "c", "d", "e"], 5);
  let page = collection.paginate(2, &RequestContext::new(2, "/letters")).unwrap();

  assert_eq!(cloned(&page), vec!["c", "d"]);
  assert_eq!(page.total(), 5);
  assert_eq!(page.per_page(), 2);
  assert_eq!(page.current_page(), 2);
  assert_eq!(page.last_page(), 3);
  assert_eq!(page.path(), "/letters");
  assert_eq!(page.page_name(), "page");
}

#[test]
fn one_big_page_keeps_everything_in_order() {
  let collection = letters(&["a", "b", "c"], 3);
  let page = collection.paginate_default(&RequestContext::from_url("/letters").unwrap()).unwrap();

  assert_eq!(page.current_page(), 1);
  assert_eq!(page.per_page(), 15);
  assert_eq!(cloned(&page), vec!["a", "b", "c"]);
  assert!(!page.has_pages());
}

#[test]
fn pages_past_the_end_are_empty() {
  let collection = letters(&["a", "b", "c"], 3);
  let page = collection.paginate(2, &RequestContext::new(9, "/letters")).unwrap();

  assert!(page.is_empty());
  assert_eq!(page.current_page(), 9);
  assert_eq!(page.first_item(), None);
  assert_eq!(page.next_page_url(), None);
  assert_eq!(page.previous_page_url().as_deref(), Some("/letters?page=8"));
}

#[test]
fn paginate_reslices_whatever_limit_left() {
  let mut collection = letters(&["a", "b", "c", "d", "e"], 5);
  collection.limit(Some(-2));

  let page = collection.paginate(2, &RequestContext::new(1, "/letters")).unwrap();
  assert_eq!(cloned(&page), vec!["d", "e"]);
  assert_eq!(page.total(), 5);
}

#[test]
fn total_comes_from_the_engine_not_the_page() {
  let collection = letters(&["a", "b"], 40);
  let page = collection
    .paginate(2, &RequestContext::from_url("https://shop.test/letters?page=1").unwrap())
    .unwrap();

  assert_eq!(page.total(), 40);
  assert_eq!(page.last_page(), 20);
  assert_eq!(page.next_page_url().as_deref(), Some("https://shop.test/letters?page=2"));
}

#[test]
fn custom_page_name_drives_resolution_and_links() {
  let collection = letters(&["a", "b", "c", "d"], 4);
  let options = PaginationOptions::default().per_page(3).page_name("p");
  let page = collection
    .paginate_with(&options, &RequestContext::from_url("/letters?p=2&page=1").unwrap())
    .unwrap();

  assert_eq!(cloned(&page), vec!["d"]);
  assert_eq!(page.page_name(), "p");
  assert_eq!(page.previous_page_url().as_deref(), Some("/letters?p=1"));
}

#[test]
fn resolver_failures_propagate() {
  let collection = letters(&["a"], 1);
  let err = collection.paginate(5, &Unavailable).unwrap_err();
  assert!(matches!(err, Error::Resolver(_)));
}

#[test]
fn resolvers_can_be_trait_objects() {
  let collection = letters(&["a", "b", "c"], 3);
  let resolver: Box<dyn PageResolver> = Box::new(RequestContext::new(2, "/letters"));
  let page = collection.paginate(2, resolver.as_ref()).unwrap();
  assert_eq!(cloned(&page), vec!["c"]);
}

#[test]
fn owned_pages_serialize_to_the_length_aware_shape() {
  let collection = letters(&["a", "b", "c", "d", "e"], 5);
  let page = collection
    .into_page(&PaginationOptions::default().per_page(2), &RequestContext::new(3, "/letters"))
    .unwrap();

  assert_eq!(
    serde_json::to_value(&page).unwrap(),
    json!({
      "current_page": 3,
      "data": ["e"],
      "first_page_url": "/letters?page=1",
      "from": 5,
      "last_page": 3,
      "last_page_url": "/letters?page=3",
      "next_page_url": null,
      "path": "/letters",
      "per_page": 2,
      "prev_page_url": "/letters?page=2",
      "to": 5,
      "total": 5
    })
  );
}

#[test]
fn response_without_hits_paginates_to_one_empty_page() {
  let collection: ElasticCollection<String> =
    ElasticCollection::from_value(json!({ "took": 2, "timed_out": false }), &|_: &Hit| -> Result<String, HitError> {
      Err(HitError::custom("no hits expected"))
    })
    .unwrap();
  let page = collection.paginate_default(&RequestContext::new(1, "/letters")).unwrap();

  assert!(page.is_empty());
  assert_eq!(page.total(), 0);
  assert_eq!(page.last_page(), 1);
  assert_eq!(page.first_item(), None);
  assert_eq!(page.next_page_url(), None);
  assert!(!page.has_pages());
}

#[test]
fn limit_on_an_empty_collection_is_harmless() {
  let mut collection = letters(&[], 0);
  collection.limit(Some(3)).limit(Some(-3)).limit(Some(0));
  assert!(collection.is_empty());

  let page = collection.paginate(2, &RequestContext::new(1, "/letters")).unwrap();
  assert!(page.is_empty());
  assert_eq!(page.last_page(), 1);
}
