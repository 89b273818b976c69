//! PostgREST source against a mocked Supabase REST API.

use std::{sync::Arc, time::Duration};

use deck::{DeckError, DeckLoader, DeckSource, PostgrestSource, SourceError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer) -> PostgrestSource {
    PostgrestSource::new(&server.uri(), "anon-key", Duration::from_secs(2)).unwrap()
}

async fn mount_event(server: &MockServer, proposal_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/eventos"))
        .and(query_param("id_lei", format!("eq.{proposal_id}")))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_proposals_sends_key_and_columns() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/leis"))
        .and(query_param(
            "select",
            "id,siglatipo,numero,ano,ementa,descricaotipo,tema",
        ))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "siglatipo": "PL", "numero": 10, "ano": 2024, "ementa": "Primeira", "descricaotipo": "Projeto de Lei", "tema": "Saude"},
            {"id": 2, "siglatipo": "PLP", "numero": 11, "ano": 2023, "ementa": "Segunda", "descricaotipo": null, "tema": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = source(&server).fetch_proposals().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "1");
    assert_eq!(rows[1].type_abbrev.as_deref(), Some("PLP"));
}

#[tokio::test]
async fn test_linked_vote_event() {
    let server = MockServer::start().await;
    mount_event(&server, "1", json!([{"id_evento": "2386419-72"}])).await;
    mount_event(&server, "2", json!([])).await;

    let source = source(&server);

    assert_eq!(
        source.linked_vote_event("1").await.unwrap().as_deref(),
        Some("2386419-72")
    );
    assert_eq!(source.linked_vote_event("2").await.unwrap(), None);
}

#[tokio::test]
async fn test_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/leis"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = source(&server).fetch_proposals().await;

    assert!(matches!(result, Err(SourceError::Status { status: 401 })));
}

#[tokio::test]
async fn test_invalid_key() {
    let result = PostgrestSource::new("http://localhost", "bad\nkey", Duration::from_secs(1));

    assert!(matches!(result, Err(SourceError::InvalidKey)));
}

#[tokio::test]
async fn test_trailing_slash_trimmed() {
    let source =
        PostgrestSource::new("http://localhost:54321/", "k", Duration::from_secs(1)).unwrap();

    assert_eq!(source.base_url(), "http://localhost:54321");
}

#[tokio::test]
async fn test_load_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/leis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "siglatipo": "PL", "numero": 1, "ano": 2024, "ementa": "a"},
            {"id": 2, "siglatipo": "PL", "numero": 2, "ano": 2024, "ementa": "b"},
            {"id": 3, "siglatipo": "PL", "numero": 3, "ano": 2024, "ementa": "c"}
        ])))
        .mount(&server)
        .await;
    mount_event(&server, "1", json!([{"id_evento": "A"}])).await;
    mount_event(&server, "2", json!([])).await;
    mount_event(&server, "3", json!([{"id_evento": "C"}])).await;

    let deck = DeckLoader::new(Arc::new(source(&server)))
        .load()
        .await
        .unwrap();

    let ids: Vec<&str> = deck.iter().map(|p| p.vote_event_id.as_str()).collect();
    assert_eq!(ids, ["A", "C"]);
    assert_eq!(deck.get(1).unwrap().title, "PL 3/2024");
}

#[tokio::test]
async fn test_load_fails_when_store_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/leis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = DeckLoader::new(Arc::new(source(&server))).load().await;

    assert!(matches!(result, Err(DeckError::DataUnavailable(_))));
}
