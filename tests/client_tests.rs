//! REST client tests against a mock FlashArray or FlashBlade.

use std::time::Duration;

use purefa_check::array::blade::DEFAULT_BLADE_API_VERSION;
use purefa_check::array::client::ClientOptions;
use purefa_check::array::{ArrayApi, FlashArrayClient, FlashBladeClient};
use purefa_check::check::{Check, Invocation};
use purefa_check::sources::{
    status_context, AlertCounter, FlashBladeInspector, OccupancySampler, PodInspector, Source,
};
use purefa_check::{MetricValue, Verdict};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/api/1.16";

fn client(server: &MockServer) -> FlashArrayClient {
    FlashArrayClient::new(&server.uri(), "secret-token", &ClientOptions::default()).unwrap()
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("{API}/auth/session")))
        .and(body_json(json!({ "api_token": "secret-token" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_json(json!({ "username": "pureuser" })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API}/auth/session")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

fn invocation() -> Invocation {
    Invocation::new(Duration::from_secs(5), tracing::Dispatch::none())
}

#[tokio::test]
async fn test_alert_check_over_rest() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/message")))
        .and(query_param("open", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "current_severity": "critical", "component_name": "ct0.eth0", "id": 1 },
            { "current_severity": "critical", "component_name": "ct1.eth0", "id": 2 },
            { "current_severity": "warning", "component_name": "array", "id": 3 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let check = Check::new(Source::Alerts(AlertCounter::new()))
        .with_context(AlertCounter::context("critical", None, Some("0:1")).unwrap())
        .with_context(AlertCounter::context("warning", None, None).unwrap())
        .with_context(AlertCounter::context("info", None, None).unwrap());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Critical);
    assert_eq!(result.results[0].metric.value, MetricValue::Int(2));
}

#[tokio::test]
async fn test_array_occupancy_over_rest() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/array")))
        .and(query_param("space", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "hostname": "fa01", "total": 50, "capacity": 200, "data_reduction": 3.1 }
        ])))
        .mount(&server)
        .await;

    let check = Check::new(Source::Occupancy(OccupancySampler::array()))
        .with_context(OccupancySampler::context(Some("0:80"), Some("0:95")).unwrap());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Ok);
    assert_eq!(
        result.summary_line(),
        "PURE_FA_OCCUPANCY OK - FA occupancy is 25.0% | 'FA occupancy'=25.0%;0:80;0:95;0;100"
    );
}

#[tokio::test]
async fn test_volume_occupancy_object_response() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/volume/vol1")))
        .and(query_param("space", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "vol1", "total": 20000, "size": 40000, "volumes": 12345
        })))
        .mount(&server)
        .await;

    let check = Check::new(Source::Occupancy(OccupancySampler::volume("vol1", false)))
        .with_context(OccupancySampler::context(None, None).unwrap());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Ok);
    assert_eq!(result.results[0].metric.value, MetricValue::Int(12345));
}

#[tokio::test]
async fn test_pod_queries() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/pod")))
        .and(query_param("action", "monitor"))
        .and(query_param("mirrored", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "pod1", "usec_per_mirrored_write_op": 900 }
        ])))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/pod")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "pod1", "arrays": [
                { "name": "fa01", "status": "online" },
                { "name": "fa02", "status": "offline" }
            ]}
        ])))
        .mount(&server)
        .await;

    let check = Check::new(Source::Pods(PodInspector::new(None, 3.0))).with_context(status_context());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Critical);
    assert!(result
        .summary_line()
        .contains("For pod pod1 the array fa02 is offline"));
}

#[tokio::test]
async fn test_rejected_token_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/auth/session")))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let check = Check::new(Source::Alerts(AlertCounter::new()));
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Unknown);
    assert_eq!(
        result.summary_line(),
        "PURE_FA_ALERT UNKNOWN - FA REST call returned \"HTTP 401: invalid api token\""
    );
}

#[tokio::test]
async fn test_error_status_is_unknown() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/volume/missing")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"[{"msg": "Volume does not exist.", "ctx": "missing"}]"#),
        )
        .mount(&server)
        .await;

    let check = Check::new(Source::Occupancy(OccupancySampler::volume("missing", true)))
        .with_context(OccupancySampler::context(None, None).unwrap());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Unknown);
    assert_eq!(result.exit_code(), 3);
    assert!(result.summary_line().contains("Volume does not exist."));
}

#[tokio::test]
async fn test_close_without_session_is_noop() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(client(&server).close().await.is_ok());
}

#[tokio::test]
async fn test_session_opened_once() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/hardware")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "CT0", "status": "ok" }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let array = client(&server);
    assert_eq!(array.hardware(None).await.unwrap().len(), 1);
    assert_eq!(array.hardware(None).await.unwrap().len(), 1);
    array.close().await.unwrap();
}

#[tokio::test]
async fn test_volume_name_is_one_path_segment() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/volume/pod1::vol%2F1")))
        .and(query_param("space", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "pod1::vol/1", "total": 10, "size": 40, "volumes": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let check = Check::new(Source::Occupancy(OccupancySampler::volume("pod1::vol/1", false)))
        .with_context(OccupancySampler::context(None, None).unwrap());
    let result = invocation().execute(&check, &client(&server)).await;

    assert_eq!(result.verdict, Verdict::Ok);
    assert_eq!(result.results[0].metric.value, MetricValue::Int(7));
}

fn blade_client(server: &MockServer) -> FlashBladeClient {
    let options = ClientOptions {
        api_version: DEFAULT_BLADE_API_VERSION.to_string(),
        ..ClientOptions::default()
    };
    FlashBladeClient::new(&server.uri(), "secret-token", &options).unwrap()
}

async fn mount_blade(server: &MockServer, component: &str, status: &str) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("api-token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-auth-token", "fb-session"))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{DEFAULT_BLADE_API_VERSION}/hardware")))
        .and(query_param("names", component))
        .and(header("x-auth-token", "fb-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pagination_info": { "total_item_count": 1 },
            "items": [{ "name": component, "status": status, "serial": "FB123" }]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("x-auth-token", "fb-session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

async fn blade_check(component: &str, status: &str) -> purefa_check::CheckResult {
    let server = MockServer::start().await;
    mount_blade(&server, component, status).await;
    let check = Check::new(Source::Blade(FlashBladeInspector::new(component)))
        .with_context(status_context());
    invocation().execute(&check, &blade_client(&server)).await
}

#[tokio::test]
async fn test_blade_healthy_component() {
    let result = blade_check("CH1.FB1", "healthy").await;
    assert_eq!(result.verdict, Verdict::Ok);
    let line = result.summary_line();
    assert!(line.starts_with("PURE_FB_CH1.FB1 OK - "), "{line}");
    assert!(line.contains("'CH1.FB1 status'=0;"), "{line}");
}

#[tokio::test]
async fn test_blade_failed_component() {
    let result = blade_check("CH1.FM2", "critical").await;
    assert_eq!(result.verdict, Verdict::Critical);
    assert_eq!(result.exit_code(), 2);
}

#[tokio::test]
async fn test_blade_unused_component_is_unknown() {
    let result = blade_check("CH1.FB9", "unused").await;
    assert_eq!(result.verdict, Verdict::Unknown);
    assert_eq!(result.exit_code(), 3);
}

#[tokio::test]
async fn test_blade_without_auth_header_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let check = Check::new(Source::Blade(FlashBladeInspector::new("CH1")))
        .with_context(status_context());
    let result = invocation().execute(&check, &blade_client(&server)).await;
    assert_eq!(result.verdict, Verdict::Unknown);
    assert!(result.summary_line().contains("x-auth-token"));
}
