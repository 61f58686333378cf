use std::sync::Arc;
use std::time::Duration;

use catalog_core::FailureKind;
use catalog_engine::{CardSource, CatalogStore, HttpCardSource, SourceSettings, StoreSettings};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpCardSource {
    HttpCardSource::new(SourceSettings {
        base_url: server.uri(),
        ..SourceSettings::default()
    })
    .expect("valid settings")
}

async fn last_query(server: &MockServer) -> Option<String> {
    server
        .received_requests()
        .await
        .and_then(|requests| requests.last().and_then(|r| r.url.query().map(String::from)))
}

#[tokio::test]
async fn search_decodes_cards_and_keeps_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(query_param("name", "pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [
                {
                    "id": "xy7-54",
                    "name": "Pikachu",
                    "imageUrl": "https://images.example.com/xy7-54.png",
                    "supertype": "Pokémon"
                }
            ]
        })))
        .mount(&server)
        .await;

    let page = source_for(&server)
        .search("pikachu", 3, 27)
        .await
        .expect("search ok");

    assert_eq!(page.cards.len(), 1);
    assert_eq!(page.cards[0].name(), "Pikachu");
    assert_eq!(page.cards[0].extra().get("supertype"), Some(&json!("Pokémon")));
    assert_eq!(
        last_query(&server).await.as_deref(),
        Some("page=3&name=pikachu&pageSize=27")
    );
}

#[tokio::test]
async fn missing_cards_member_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let page = source_for(&server).search("", 1, 27).await.unwrap();
    assert!(page.cards.is_empty());
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = source_for(&server).search("", 1, 27).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = source_for(&server).search("", 1, 27).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "cards": [] })),
        )
        .mount(&server)
        .await;

    let source = HttpCardSource::new(SourceSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..SourceSettings::default()
    })
    .unwrap();

    let err = source.search("", 1, 27).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789abcdef"))
        .mount(&server)
        .await;

    let source = HttpCardSource::new(SourceSettings {
        base_url: server.uri(),
        max_bytes: 10,
        ..SourceSettings::default()
    })
    .unwrap();

    let err = source.search("", 1, 27).await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 10, .. }));
}

#[tokio::test]
async fn store_load_over_http_matches_wire_contract() {
    catalog_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [{ "id": "1", "name": "MeuPokemon", "imageUrl": "https://images.example.com/1.png" }]
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::new(Arc::new(source_for(&server)), StoreSettings::default());
    store.load("").await.expect("load ok");

    assert_eq!(
        last_query(&server).await.as_deref(),
        Some("page=1&name=&pageSize=27")
    );
    let state = store.snapshot();
    assert_eq!(state.ids(), ["1".to_string()]);
    assert_eq!(state.cards_by_id()["1"].name(), "MeuPokemon");
    assert_eq!(state.query(), "");
    assert_eq!(state.page(), 1);
    assert!(!state.loading());
}

#[tokio::test]
async fn store_next_page_over_http_requests_page_two() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [{ "id": "pp-1", "name": "PokePicles", "imageUrl": "" }]
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::new(Arc::new(source_for(&server)), StoreSettings::default());
    store.set_query("picles");
    store.load_next().await.expect("next ok");

    assert_eq!(
        last_query(&server).await.as_deref(),
        Some("page=2&name=picles&pageSize=27")
    );
    assert_eq!(store.snapshot().page(), 2);
}
