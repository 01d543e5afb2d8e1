//! HTTP-level tests for the Comtrade client against a local mock server

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use collector::traits::{TradeApi, TradeQuery};
use collector::{CollectorError, ComtradeClient};

const ENDPOINT: &str = "/data/v1/get/C/A/HS";

fn client(server: &MockServer, key: Option<&str>) -> ComtradeClient {
    ComtradeClient::new(key.map(str::to_string))
        .with_base_url(format!("{}{ENDPOINT}", server.uri()))
}

fn query() -> TradeQuery {
    TradeQuery {
        year: 2021,
        cmd_code: "2709".to_string(),
        reporter_code: "842".to_string(),
        partner_code: "156".to_string(),
    }
}

#[tokio::test]
async fn sends_the_fixed_query_parameters_and_normalizes_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("period", "2021"))
        .and(query_param("reporterCode", "842"))
        .and(query_param("cmdCode", "2709"))
        .and(query_param("flowCode", "M"))
        .and(query_param("partnerCode", "156"))
        .and(query_param("partner2Code", "0"))
        .and(query_param("customsCode", "C00"))
        .and(query_param("motCode", "0"))
        .and(query_param("maxRecords", "100"))
        .and(query_param("includeDesc", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "data": [
                {
                    "refYear": 2021,
                    "reporterCode": 842,
                    "reporterDesc": "USA",
                    "partnerDesc": "China",
                    "PartnerCodeIsoAlpha3": "CHN",
                    "cmdCode": "2709",
                    "primaryValue": 1234.5
                },
                { "primaryValue": "55.5" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server, None).fetch(&query()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].reporter_desc.as_deref(), Some("USA"));
    assert_eq!(records[0].partner_iso3.as_deref(), Some("CHN"));
    assert_eq!(records[0].primary_value, 1234.5);
    assert_eq!(records[1].primary_value, 55.5);
}

#[tokio::test]
async fn bare_array_responses_normalize_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "reporterDesc": "Japan", "primaryValue": 7.0 }
        ])))
        .mount(&server)
        .await;

    let records = client(&server, None).fetch(&query()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reporter_desc.as_deref(), Some("Japan"));
}

#[tokio::test]
async fn empty_result_set_is_ok_with_zero_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let records = client(&server, None).fetch(&query()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server, None).fetch(&query()).await;
    match result {
        Err(CollectorError::Api { message }) => assert!(message.contains("500")),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn subscription_key_is_sent_as_a_header_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(header("Ocp-Apim-Subscription-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server, Some("secret-key")).fetch(&query()).await.unwrap();
    assert!(records.is_empty());
}
