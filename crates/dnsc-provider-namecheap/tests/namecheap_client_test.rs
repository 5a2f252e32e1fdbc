// Integration tests for the Namecheap adapter using wiremock.

use dnsc_core::{
    DeleteOperation, DesiredState, EngineConfig, Error, NamecheapConfig, RecordAdapter,
    RecordEngine, RecordKey, RecordType, RecordValues, SetOperation,
};
use dnsc_provider_namecheap::{NamecheapAdapter, NamecheapHttpClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const ZONE: &str = "example.com";

const GET_HOSTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <RequestedCommand>namecheap.domains.dns.gethosts</RequestedCommand>
  <CommandResponse Type="namecheap.domains.dns.getHosts">
    <DomainDNSGetHostsResult Domain="example.com" EmailType="MX" IsUsingOurDNS="true">
      <host HostId="11" Name="www" Type="CNAME" Address="some.other.domain" MXPref="10" TTL="3600" />
      <host HostId="12" Name="mail" Type="MX" Address="mx.example.com" MXPref="20" TTL="1800" />
      <host HostId="13" Name="txt" Type="TXT" Address="delete1" MXPref="10" TTL="300" />
      <host HostId="14" Name="txt" Type="TXT" Address="delete2" MXPref="10" TTL="300" />
    </DomainDNSGetHostsResult>
  </CommandResponse>
</ApiResponse>"#;

const SET_HOSTS_OK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <CommandResponse Type="namecheap.domains.dns.setHosts">
    <DomainDNSSetHostsResult Domain="example.com" IsSuccess="true" />
  </CommandResponse>
</ApiResponse>"#;

const MIXED_TTL_TXT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <CommandResponse Type="namecheap.domains.dns.getHosts">
    <DomainDNSGetHostsResult Domain="example.com" IsUsingOurDNS="true">
      <host HostId="21" Name="txt" Type="TXT" Address="a" MXPref="10" TTL="300" />
      <host HostId="22" Name="txt" Type="TXT" Address="b" MXPref="10" TTL="1800" />
    </DomainDNSGetHostsResult>
  </CommandResponse>
</ApiResponse>"#;

fn error_response(number: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="ERROR" xmlns="http://api.namecheap.com/xml.response">
  <Errors>
    <Error Number="{number}">{message}</Error>
  </Errors>
</ApiResponse>"#
    )
}

fn config(client_ip: Option<&str>) -> NamecheapConfig {
    let mut config = NamecheapConfig::new("apiuser", "apikey");
    config.client_ip = client_ip.map(str::to_string);
    config
}

async fn setup() -> (MockServer, NamecheapAdapter) {
    let server = MockServer::start().await;
    let client = NamecheapHttpClient::with_endpoints(
        config(Some("203.0.113.7")),
        format!("{}/xml.response", server.uri()),
        format!("{}/ip", server.uri()),
    )
    .unwrap();
    (server, NamecheapAdapter::with_client(client))
}

async fn mount_get_hosts(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/xml.response"))
        .and(query_param("Command", "namecheap.domains.dns.getHosts"))
        .and(query_param("SLD", "example"))
        .and(query_param("TLD", "com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_set_hosts(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/xml.response"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SET_HOSTS_OK))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Decoded form body of the single setHosts request
async fn set_hosts_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("setHosts was called");
    String::from_utf8(post.body.clone()).unwrap()
}

fn engine(adapter: NamecheapAdapter) -> RecordEngine {
    RecordEngine::new(Box::new(adapter), EngineConfig::default())
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_single_entry_carries_host_id() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;

    let record_set = adapter
        .fetch(&RecordKey::new(ZONE, "WWW", RecordType::Cname))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record_set.id.as_deref(), Some("11"));
    assert_eq!(record_set.ttl, Some(3600));
    assert_eq!(
        record_set.values,
        RecordValues::Cname("some.other.domain".to_string())
    );
}

#[tokio::test]
async fn test_fetch_missing_name_is_none() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;

    let found = adapter
        .fetch(&RecordKey::new(ZONE, "nope", RecordType::A))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_fetch_unknown_domain_is_none() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, &error_response("2019166", "Domain not found")).await;

    let found = adapter
        .fetch(&RecordKey::new(ZONE, "www", RecordType::A))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_api_key_error_maps_to_authentication() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, &error_response("1011102", "API Key is invalid")).await;

    let result = adapter
        .fetch(&RecordKey::new(ZONE, "www", RecordType::A))
        .await;
    assert!(
        matches!(result, Err(Error::Authentication(_))),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_single_label_domain_is_invalid() {
    let (_server, adapter) = setup().await;

    let err = adapter
        .fetch(&RecordKey::new("localhost", "www", RecordType::A))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
}

#[tokio::test]
async fn test_client_ip_is_looked_up_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.4\n"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xml.response"))
        .and(query_param("ClientIp", "198.51.100.4"))
        .and(query_param("UserName", "apiuser"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GET_HOSTS))
        .expect(2)
        .mount(&server)
        .await;

    let client = NamecheapHttpClient::with_endpoints(
        config(None),
        format!("{}/xml.response", server.uri()),
        format!("{}/ip", server.uri()),
    )
    .unwrap();
    let adapter = NamecheapAdapter::with_client(client);

    let key = RecordKey::new(ZONE, "www", RecordType::Cname);
    adapter.fetch(&key).await.unwrap();
    adapter.fetch(&key).await.unwrap();
}

// ── Through the engine ──────────────────────────────────────────────

#[tokio::test]
async fn test_delete_txt_value_keeps_other_entries() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;
    mount_set_hosts(&server, 1).await;

    let desired = DesiredState::new(ZONE, "txt", "TXT").with_value("DELETE1");
    let op = engine(adapter).delete(&desired).await.unwrap();
    assert_eq!(op, DeleteOperation::Deleted);

    let body = set_hosts_body(&server).await;
    assert!(body.contains("Command=namecheap.domains.dns.setHosts"), "{body}");
    assert!(body.contains("HostName1=www"), "{body}");
    assert!(body.contains("HostName2=mail"), "{body}");
    assert!(body.contains("MXPref2=20"), "{body}");
    assert!(body.contains("Address3=delete2"), "{body}");
    assert!(body.contains("EmailType=MX"), "{body}");
    assert!(!body.contains("delete1"), "{body}");
    assert!(!body.contains("HostName4"), "{body}");
}

#[tokio::test]
async fn test_set_existing_value_ignores_case_and_skips_write() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;
    mount_set_hosts(&server, 0).await;

    let desired = DesiredState::new(ZONE, "www", "CNAME").with_value("Some.Other.Domain");
    let result = engine(adapter).set(&desired).await.unwrap();

    assert_eq!(result.set_operation, SetOperation::Noop);
    assert_eq!(result.dns_record.ttl.as_deref(), Some("3600"));
}

#[tokio::test]
async fn test_set_new_record_appends_entry() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;
    mount_set_hosts(&server, 1).await;

    let desired = DesiredState::new(ZONE, "api", "A")
        .with_value("192.0.2.10")
        .with_ttl(600);
    let result = engine(adapter).set(&desired).await.unwrap();

    assert_eq!(result.set_operation, SetOperation::Created);
    assert_eq!(result.dns_record.values, vec!["192.0.2.10"]);

    let body = set_hosts_body(&server).await;
    assert!(body.contains("HostName5=api"), "{body}");
    assert!(body.contains("RecordType5=A"), "{body}");
    assert!(body.contains("Address5=192.0.2.10"), "{body}");
    assert!(body.contains("TTL5=600"), "{body}");
    assert!(body.contains("Address4=delete2"), "{body}");
}

#[tokio::test]
async fn test_append_keeps_ttl_of_other_entries() {
    let (server, adapter) = setup().await;

    // One read for the engine's fetch, one right before setHosts
    Mock::given(method("GET"))
        .and(path("/xml.response"))
        .and(query_param("Command", "namecheap.domains.dns.getHosts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MIXED_TTL_TXT))
        .expect(2)
        .mount(&server)
        .await;
    mount_set_hosts(&server, 1).await;

    let desired = DesiredState::new(ZONE, "txt", "TXT").with_value("c");
    let result = engine(adapter).set(&desired).await.unwrap();
    assert_eq!(result.set_operation, SetOperation::Updated);

    let body = set_hosts_body(&server).await;
    assert!(body.contains("Address1=a&TTL1=300"), "{body}");
    assert!(body.contains("Address2=c&TTL2=300"), "{body}");
    assert!(body.contains("Address3=b&TTL3=1800"), "{body}");
}

#[tokio::test]
async fn test_caller_ttl_applies_to_every_entry() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, MIXED_TTL_TXT).await;
    mount_set_hosts(&server, 1).await;

    let desired = DesiredState::new(ZONE, "txt", "TXT").with_value("a").with_ttl(600);
    let result = engine(adapter).set(&desired).await.unwrap();
    assert_eq!(result.set_operation, SetOperation::Updated);

    let body = set_hosts_body(&server).await;
    assert!(body.contains("Address1=a&TTL1=600"), "{body}");
    assert!(body.contains("Address2=b&TTL2=600"), "{body}");
}

#[tokio::test]
async fn test_delete_keeps_ttl_of_remaining_entries() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, MIXED_TTL_TXT).await;
    mount_set_hosts(&server, 1).await;

    let desired = DesiredState::new(ZONE, "txt", "TXT").with_value("a");
    let op = engine(adapter).delete(&desired).await.unwrap();
    assert_eq!(op, DeleteOperation::Deleted);

    let body = set_hosts_body(&server).await;
    assert!(body.contains("Address1=b&TTL1=1800"), "{body}");
    assert!(!body.contains("HostName2"), "{body}");
}

#[tokio::test]
async fn test_unacknowledged_set_hosts_is_provider_error() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;

    Mock::given(method("POST"))
        .and(path("/xml.response"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ApiResponse Status="OK"><CommandResponse><DomainDNSSetHostsResult Domain="example.com" IsSuccess="false" /></CommandResponse></ApiResponse>"#,
        ))
        .mount(&server)
        .await;

    let desired = DesiredState::new(ZONE, "api", "A").with_value("192.0.2.10");
    let err = engine(adapter).set(&desired).await.unwrap_err();
    assert!(matches!(err, Error::Provider { .. }), "{err:?}");
}

#[tokio::test]
async fn test_srv_is_not_implemented() {
    let (server, adapter) = setup().await;
    mount_get_hosts(&server, GET_HOSTS).await;
    mount_set_hosts(&server, 0).await;

    let desired = DesiredState::new(ZONE, "_sip._tcp", "SRV")
        .with_value("sip.example.com")
        .with_priority(1)
        .with_weight(1)
        .with_port(5060);
    let err = engine(adapter).set(&desired).await.unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)), "{err:?}");
}
