use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::service::error::ServiceError;
use crate::service::request::ServiceCall;
use crate::service::transport::{HttpTransport, ServiceTransport};

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_get_sends_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/PersonaBar/AdminLogs/GetLogItems"))
        .and(query_param("pageSize", "10"))
        .and(query_param("logType", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": true, "Results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let call = ServiceCall::get("PersonaBar", "AdminLogs", "GetLogItems")
        .param("pageSize", 10)
        .param("logType", "*");
    let body = transport(&server.uri()).send(&call).await.unwrap();
    assert_eq!(body, json!({"Success": true, "Results": []}));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/PersonaBar/TaskScheduler/UpdateSchedulerSettings"))
        .and(body_json(json!({"SchedulerMode": "1", "SchedulerdelayAtAppStart": "2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let call = ServiceCall::post("PersonaBar", "TaskScheduler", "UpdateSchedulerSettings")
        .param("SchedulerMode", "1")
        .param("SchedulerdelayAtAppStart", "2");
    transport(&server.uri()).send(&call).await.unwrap();
}

#[tokio::test]
async fn test_http_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"Message": "Authorization has been denied"})))
        .mount(&server)
        .await;

    let call = ServiceCall::get("PersonaBar", "Users", "GetUsers");
    let err = transport(&server.uri()).send(&call).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Http {
            route: "PersonaBar/Users/GetUsers".to_string(),
            status: 401,
            message: "Authorization has been denied".to_string(),
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let call = ServiceCall::get("PersonaBar", "Users", "GetUsers");
    let err = transport(&server.uri()).send(&call).await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode { .. }));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let call = ServiceCall::post("PersonaBar", "TaskScheduler", "StartSchedule");
    let body = transport(&server.uri()).send(&call).await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let call = ServiceCall::get("PersonaBar", "Users", "GetUsers");
    let err = transport("http://127.0.0.1:1").send(&call).await.unwrap_err();
    assert!(matches!(err, ServiceError::Network { ref route, .. } if route == "PersonaBar/Users/GetUsers"));
}
