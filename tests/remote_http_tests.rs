// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::json;
use tripclip::config::RemoteConfig;
use tripclip::remote::{HttpRemoteStore, RemoteError, RemoteStore};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer, token: Option<&str>) -> HttpRemoteStore {
    HttpRemoteStore::new(&RemoteConfig {
        base_url: format!("{}/", server.uri()),
        api_token: token.map(str::to_string),
        timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn upsert_puts_the_document_with_bearer_token() {
    let server = MockServer::start().await;
    let doc = json!({ "id": "t1", "userId": "u1", "name": "Tokyo" });
    Mock::given(method("PUT"))
        .and(path("/trips/t1"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(&doc))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server, Some("secret"));
    store.upsert("trips", "t1", doc).await.unwrap();
}

#[tokio::test]
async fn delete_patches_a_tombstone() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/transactions/x9"))
        .and(body_partial_json(json!({ "isDeleted": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    store.delete("transactions", "x9").await.unwrap();
}

#[tokio::test]
async fn delete_of_unknown_document_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such document"))
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    store.delete("trips", "never-mirrored").await.unwrap();
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    let err = store.upsert("trips", "t1", json!({})).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    match err {
        RemoteError::Api { message, .. } => assert_eq!(message, "quota exceeded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_filters_by_owner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trips"))
        .and(query_param("userId", "u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": "a" }, { "id": "b" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    let docs = store.fetch_all("trips", "u1").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["id"], json!("b"));
}

#[tokio::test]
async fn fetch_all_accepts_wrapped_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "documents": [{ "id": "t" }] })),
        )
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    let docs = store.fetch_all("transactions", "u1").await.unwrap();
    assert_eq!(docs, vec![json!({ "id": "t" })]);
}
