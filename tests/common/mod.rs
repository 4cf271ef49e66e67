use openplantbook_sdk::PlantbookClient;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";

/// A mock OpenPlantbook server plus a client pointed at it.
pub struct TestEnvironment {
    pub server: MockServer,
    pub client: PlantbookClient,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let client = PlantbookClient::with_base_url(CLIENT_ID, CLIENT_SECRET, server.uri());
        Self { server, client }
    }
}

/// Mount the token endpoint, answering every exchange with `access_token`
/// valid for an hour. `expected_calls` is verified when the server drops.
#[allow(dead_code)]
pub async fn mount_token_endpoint(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// One-row search page for "abelia chinensis", matching the live API shape.
#[allow(dead_code)]
pub fn search_page_body() -> serde_json::Value {
    serde_json::json!({
        "count": 1,
        "next": null,
        "previous": null,
        "results": [{
            "pid": "abelia chinensis",
            "display_pid": "Abelia chinensis",
            "alias": "chinese abelia",
            "category": "Caprifoliaceae, Abelia",
        }],
    })
}

/// Full species record for "abelia chinensis", matching the live API shape.
#[allow(dead_code)]
pub fn plant_detail_body() -> serde_json::Value {
    serde_json::json!({
        "pid": "abelia chinensis",
        "display_pid": "Abelia chinensis",
        "alias": "chinese abelia",
        "category": "Caprifoliaceae, Abelia",
        "max_light_mmol": 4500,
        "min_light_mmol": 2500,
        "max_light_lux": 30000,
        "min_light_lux": 3500,
        "max_temp": 35,
        "min_temp": 8,
        "max_env_humid": 85,
        "min_env_humid": 30,
        "max_soil_moist": 60,
        "min_soil_moist": 15,
        "max_soil_ec": 2000,
        "min_soil_ec": 350,
        "image_url": "https://opb-img.plantbook.io/abelia%20chinensis.jpg",
    })
}

/// Mount the search endpoint answering with [`search_page_body`].
#[allow(dead_code)]
pub async fn mount_search_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/plant/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page_body()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
