//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use mathswitch_core::{
  item::NewItem,
  link::{Link, LinkLabel},
  materialize::SourcePriority,
  pipeline::resolve,
  source::Source,
  store::ConceptStore,
};
use mathswitch_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::api_router;

async fn seeded() -> (Router, Arc<SqliteStore>) {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let mut ids = Vec::new();
  for (source, identifier, name) in [
    (Source::Wikidata, "Q83478", "Group"),
    (Source::NLab, "group", "group"),
    (Source::AgdaUnimath, "ring", "Ring"),
    (Source::MathWorld, "AbelianGroup", "Abelian group"),
  ] {
    let item = store
      .insert_item(NewItem {
        source,
        identifier: identifier.into(),
        url: format!("https://example.org/{identifier}"),
        name: Some(name.into()),
        description: None,
      })
      .await
      .unwrap()
      .into_inner();
    ids.push(item.item_id);
  }
  store
    .insert_link(Link { source_item: ids[0], destination_item: ids[1], label: LinkLabel::Wikidata })
    .await
    .unwrap();
  resolve(&store, &SourcePriority::default()).await.unwrap();

  let store = Arc::new(store);
  (api_router(store.clone()), store)
}

async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
  let response = router
    .oneshot(Request::get(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = response.status();
  let headers = response.headers().clone();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, headers, json)
}

#[tokio::test]
async fn concept_by_name_lists_members() {
  let (router, _) = seeded().await;
  let (status, _, body) = get(router, "/concepts/GROUP").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["concept"]["name"], "Group");
  assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_concept_is_404() {
  let (router, _) = seeded().await;
  let (status, _, body) = get(router, "/concepts/monoid").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("monoid"));
}

#[tokio::test]
async fn search_matches_substring() {
  let (router, _) = seeded().await;
  let (status, _, body) = get(router, "/concepts?q=group").await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<&str> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, vec!["Abelian group", "Group"]);
}

#[tokio::test]
async fn listing_without_query_returns_all() {
  let (router, _) = seeded().await;
  let (_, _, body) = get(router, "/concepts").await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn item_redirects_to_its_concept() {
  let (router, store) = seeded().await;
  let (status, headers, _) = get(router.clone(), "/items/nL/group").await;
  assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);

  let group = store.get_concept_by_name("group").await.unwrap().unwrap();
  let location = headers[header::LOCATION].to_str().unwrap();
  assert_eq!(location, format!("../../concepts/id/{}", group.concept_id));

  let (status, _, body) = get(router, &format!("/concepts/id/{}", group.concept_id)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["concept"]["name"], "Group");
}

#[tokio::test]
async fn unknown_item_is_404() {
  let (router, _) = seeded().await;
  let (status, _, _) = get(router, "/items/Wd/Q99999").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_count_items_per_source() {
  let (router, _) = seeded().await;
  let (status, _, body) = get(router, "/stats").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["items_by_source"]["Wd"], 1);
  assert_eq!(body["items_by_source"]["AUm"], 1);
  assert_eq!(body["concepts"], 3);
}
