mod common;

use common::{mount_token_endpoint, TestEnvironment};
use openplantbook_sdk::Error;
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn search_returns_parsed_page_with_count() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path("/plant/search"))
        .and(query_param("alias", "abelia chinensis"))
        .and(header("Authorization", "Bearer TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_page_body()))
        .expect(1)
        .mount(&env.server)
        .await;

    let page = env
        .client
        .search_plants("abelia chinensis", None)
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    let plant = &page.results[0];
    assert_eq!(plant.pid, "abelia chinensis");
    assert_eq!(plant.display_pid, "Abelia chinensis");
    assert_eq!(plant.alias, "chinese abelia");
    assert_eq!(plant.category.as_deref(), Some("Caprifoliaceae, Abelia"));
}

#[tokio::test]
async fn search_forwards_language_code() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path("/plant/search"))
        .and(query_param("alias", "abelia"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_page_body()))
        .expect(1)
        .mount(&env.server)
        .await;

    env.client.search_plants("abelia", Some("de")).await.unwrap();
}

#[tokio::test]
async fn detail_parses_species_record() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/plant/detail/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::plant_detail_body()))
        .expect(1)
        .mount(&env.server)
        .await;

    let detail = env
        .client
        .get_plant_detail("abelia chinensis", None)
        .await
        .unwrap();

    assert_eq!(detail.pid, "abelia chinensis");
    assert_eq!(detail.display_pid, "Abelia chinensis");
    assert_eq!(detail.max_light_lux, 30000.0);
    assert_eq!(detail.min_light_lux, 3500.0);
    assert_eq!(detail.max_temp, 35.0);
    assert_eq!(detail.min_temp, 8.0);
    assert_eq!(detail.max_soil_ec, 2000.0);
    assert_eq!(detail.max_light_mmol, Some(4500.0));
    assert_eq!(
        detail.image_url.as_deref(),
        Some("https://opb-img.plantbook.io/abelia%20chinensis.jpg")
    );

    // The PID is percent-encoded into the request path.
    let requests = env.server.received_requests().await.unwrap();
    let detail_request = requests
        .iter()
        .find(|r| r.url.path().starts_with("/plant/detail"))
        .unwrap();
    assert_eq!(detail_request.url.path(), "/plant/detail/abelia%20chinensis");
}

#[tokio::test]
async fn detail_forwards_language_code() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/plant/detail/.+$"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::plant_detail_body()))
        .expect(1)
        .mount(&env.server)
        .await;

    env.client
        .get_plant_detail("abelia chinensis", Some("de"))
        .await
        .unwrap();
}

#[tokio::test]
async fn detail_not_found_surfaces_as_api_error() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/plant/detail/.+$"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Not found."})),
        )
        .expect(1)
        .mount(&env.server)
        .await;

    let err = env
        .client
        .get_plant_detail("no such plant", None)
        .await
        .unwrap_err();
    match err {
        Error::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn search_server_error_surfaces_as_api_error() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    mount_token_endpoint(&env.server, "TOKEN", 1).await;
    Mock::given(method("GET"))
        .and(path("/plant/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&env.server)
        .await;

    let err = env.client.search_plants("abelia", None).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("internal error"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_surfaces_as_transport_error() {
    common::init_test_logging();

    // Reserve a port, then shut the server down so the connection is refused.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = openplantbook_sdk::PlantbookClient::with_base_url("id", "secret", uri);
    let err = client.search_plants("abelia", None).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
