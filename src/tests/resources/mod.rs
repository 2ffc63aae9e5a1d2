use crate::core::infrastructure::api_client::ApiClient;
use crate::{ClientConfig, GatewayUrl, ImportClient};
use wiremock::MockServer;

mod dashboard_tests;
mod harvester_tests;
mod inventory_tests;
mod plan_tests;
mod source_tests;

fn create_test_client(mock_server: &MockServer) -> ImportClient {
    let base_url = GatewayUrl::new(&mock_server.uri()).unwrap();
    let api_client = ApiClient::new(base_url, &ClientConfig::default()).unwrap();
    ImportClient { api_client }
}
