//! Integration tests for `ApiClient` against a wiremock server.

use secrecy::SecretString;
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scanconf_api::{ApiClient, ApiConfig, ApiError, ApplianceKind};
use scanconf_core::{ApplianceState, EmptyCategoryPolicy, RouteEntry, UpdateScope, VlanEntry};

const LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<APPLIANCE_LIST_OUTPUT>
  <RESPONSE>
    <DATETIME>2026-10-19T09:00:00Z</DATETIME>
    <APPLIANCE_LIST>
      <APPLIANCE>
        <ID>1001</ID>
        <NAME>scanner-east</NAME>
        <VLANS>
          <SETTING>Enabled</SETTING>
          <VLAN>
            <ID>10</ID>
            <NAME>corp</NAME>
            <IP_ADDRESS>10.0.0.0</IP_ADDRESS>
            <NETMASK>255.255.255.0</NETMASK>
          </VLAN>
        </VLANS>
      </APPLIANCE>
    </APPLIANCE_LIST>
  </RESPONSE>
</APPLIANCE_LIST_OUTPUT>"#;

const ERROR_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<SIMPLE_RETURN>
  <RESPONSE>
    <DATETIME>2026-10-19T09:00:00Z</DATETIME>
    <CODE>1905</CODE>
    <TEXT>parameter id has invalid value</TEXT>
  </RESPONSE>
</SIMPLE_RETURN>"#;

const UPDATED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<SIMPLE_RETURN>
  <RESPONSE>
    <DATETIME>2026-10-19T09:00:01Z</DATETIME>
    <TEXT>Appliance updated</TEXT>
  </RESPONSE>
</SIMPLE_RETURN>"#;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    // Trailing slash is stripped by the client.
    let config = ApiConfig::new(
        format!("{}/", server.uri()),
        "apiuser",
        SecretString::from("s3cret".to_string()),
    );
    let client = ApiClient::connect(&config).unwrap();
    (server, client)
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/xml")
}

// ── Snapshot ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_appliances() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/fo/appliance/"))
        .and(query_param("action", "list"))
        .and(query_param("output_mode", "full"))
        .and(basic_auth("apiuser", "s3cret"))
        .and(header("X-Requested-With", "scanconf"))
        .respond_with(xml(LIST_XML))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client.list_appliances().await.unwrap();
    assert_eq!(snapshot.appliances().len(), 1);

    let state = ApplianceState::from_snapshot(&snapshot.appliances()[0]);
    assert_eq!(state.id(), "1001");
    assert!(state.has_vlan(&VlanEntry::new("10", "corp", "10.0.0.0", "255.255.255.0")));
}

#[tokio::test]
async fn test_list_appliances_remote_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/fo/appliance/"))
        .respond_with(xml(ERROR_XML))
        .mount(&server)
        .await;

    let result = client.list_appliances().await;
    match result {
        Err(ApiError::Remote { code, text }) => {
            assert_eq!(code, "1905");
            assert_eq!(text, "parameter id has invalid value");
        }
        other => panic!("expected Remote error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_appliances_http_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/fo/appliance/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.list_appliances().await;
    assert!(
        matches!(result, Err(ApiError::Status { status: 401, .. })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_appliances_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/fo/appliance/"))
        .respond_with(xml("<APPLIANCE_LIST_OUTPUT><RESPONSE>"))
        .mount(&server)
        .await;

    let result = client.list_appliances().await;
    assert!(
        matches!(result, Err(ApiError::Snapshot(_))),
        "expected Snapshot error, got: {result:?}"
    );
}

// ── Updates ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_virtual_appliance() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/fo/appliance/"))
        .and(query_param("action", "update"))
        .and(query_param("id", "1001"))
        .and(query_param("set_routes", "10.0.1.0|255.255.255.0|10.0.0.1|r1"))
        .and(query_param("set_vlans", ""))
        .respond_with(xml(UPDATED_XML))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = ApplianceState::new("1001", "scanner-east");
    state.add_route(RouteEntry::new("r1", "10.0.1.0", "255.255.255.0", "10.0.0.1"));
    let payload = state.build_update_payload(UpdateScope::ALL, EmptyCategoryPolicy::Clear);

    client
        .update_appliance("1001", ApplianceKind::Virtual, &payload)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_sends_reserved_characters_intact() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/fo/appliance/"))
        .and(query_param("id", "1001"))
        .and(query_param(
            "set_vlans",
            "10|10.0.0.0|255.255.255.0|lab#2,20|10.0.2.0|255.255.255.0|r&d+ops",
        ))
        .respond_with(xml(UPDATED_XML))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = ApplianceState::new("1001", "scanner-east");
    state.add_vlan(VlanEntry::new("10", "lab#2", "10.0.0.0", "255.255.255.0"));
    state.add_vlan(VlanEntry::new("20", "r&d+ops", "10.0.2.0", "255.255.255.0"));
    let payload = state.build_update_payload(
        UpdateScope {
            routes: false,
            vlans: true,
        },
        EmptyCategoryPolicy::Clear,
    );

    client
        .update_appliance("1001", ApplianceKind::Virtual, &payload)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_physical_appliance() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/fo/appliance/physical/"))
        .and(query_param("id", "2002"))
        .respond_with(xml(UPDATED_XML))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = ApplianceState::new("2002", "scanner-rack");
    state.add_vlan(VlanEntry::new("10", "corp", "10.0.0.0", "255.255.255.0"));
    let payload = state.build_update_payload(
        UpdateScope {
            routes: false,
            vlans: true,
        },
        EmptyCategoryPolicy::Clear,
    );

    client
        .update_appliance("2002", ApplianceKind::Physical, &payload)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_remote_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/fo/appliance/"))
        .respond_with(xml(ERROR_XML))
        .mount(&server)
        .await;

    let payload = ApplianceState::new("9", "ghost")
        .build_update_payload(UpdateScope::ALL, EmptyCategoryPolicy::Clear);
    let result = client
        .update_appliance("9", ApplianceKind::Virtual, &payload)
        .await;

    assert!(
        matches!(result, Err(ApiError::Remote { .. })),
        "expected Remote error, got: {result:?}"
    );
}

#[test]
fn test_invalid_proxy_is_rejected() {
    let mut config = ApiConfig::new(
        "https://api.example.com",
        "apiuser",
        SecretString::from("s3cret".to_string()),
    );
    config.proxy_url = Some("http://[::1".to_string());

    assert!(matches!(
        ApiClient::connect(&config),
        Err(ApiError::Config(_))
    ));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let config = ApiConfig::new(
        "https://api.example.com//",
        "apiuser",
        SecretString::from("s3cret".to_string()),
    );
    let client = ApiClient::connect(&config).unwrap();
    assert_eq!(client.base_url(), "https://api.example.com");
}
