use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::{ConfigError, FetchError},
    location::Location,
    model::WeatherSnapshot,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://opendata.cwa.gov.tw/api/v1/rest/datastore";

/// Today's general forecast for every county and city.
const DATASET: &str = "F-C0032-001";

const TIMEOUT: Duration = Duration::from_secs(10);

// Positions inside `weatherElement`. The provider does not name them.
const WX: usize = 0;
const POP: usize = 1;
const MIN_T: usize = 2;
const CI: usize = 3;
const MAX_T: usize = 4;

/// Client for the Central Weather Administration open-data API.
#[derive(Debug, Clone)]
pub struct CwaProvider {
    api_key: String,
    endpoint: Url,
    http: Client,
}

impl CwaProvider {
    pub fn new(api_key: String) -> Result<Self, ConfigError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let endpoint = Url::parse(&format!("{}/{DATASET}", base_url.trim_end_matches('/')))
            .map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;

        let http = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_key,
            endpoint,
            http,
        })
    }

    async fn request(&self, location: &Location) -> Result<String, FetchError> {
        debug!(%location, endpoint = %self.endpoint, "requesting forecast");

        let res = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("Authorization", self.api_key.as_str()),
                ("locationName", location.as_str()),
            ])
            .send()
            .await
            .map_err(|e| network_error("request to CWA failed", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| network_error("failed to read CWA response body", e))?;

        if !status.is_success() {
            return Err(FetchError::Provider(format!(
                "CWA request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for CwaProvider {
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherSnapshot, FetchError> {
        let result = match self.request(location).await {
            Ok(body) => parse_snapshot(*location, &body),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(%location, kind = %e.kind(), error = %e, "weather fetch failed");
        }

        result
    }
}

/// The request URL carries the API key; strip it before the error is shown or logged.
fn network_error(context: &str, err: reqwest::Error) -> FetchError {
    FetchError::Network(format!("{context}: {}", err.without_url()))
}

#[derive(Debug, Deserialize)]
struct CwaResponse {
    success: Option<Value>,
    records: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CwaRecords {
    #[serde(default)]
    location: Vec<CwaLocation>,
}

#[derive(Debug, Deserialize)]
struct CwaLocation {
    #[serde(rename = "weatherElement")]
    weather_element: Vec<Value>,
}

/// Extract today's snapshot from a raw forecast body.
pub fn parse_snapshot(location: Location, body: &str) -> Result<WeatherSnapshot, FetchError> {
    let data: CwaResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::Provider(format!(
            "response is not valid JSON ({e}): {}",
            truncate_body(body)
        ))
    })?;

    match &data.success {
        Some(Value::String(s)) if s == "true" => {}
        Some(Value::Bool(true)) => {}
        Some(other) => {
            return Err(FetchError::Provider(format!(
                "provider reported success={other}"
            )));
        }
        None => {
            return Err(FetchError::Provider(
                "response has no success flag".to_string(),
            ));
        }
    }

    // The envelope is checked first so a malformed `records` is a schema
    // error, not a provider one.
    let records: CwaRecords = data
        .records
        .ok_or_else(|| FetchError::Schema("records missing".to_string()))
        .and_then(|raw| {
            serde_json::from_value(raw).map_err(|e| FetchError::Schema(format!("records: {e}")))
        })?;

    let elements = records
        .location
        .first()
        .map(|loc| loc.weather_element.as_slice())
        .ok_or_else(|| FetchError::Schema("records.location is empty".to_string()))?;

    let mut missing = Vec::new();
    let mut take = |index: usize, key: &str| -> String {
        match field(elements, index, key) {
            Ok(v) => v,
            Err(path) => {
                missing.push(path);
                String::new()
            }
        }
    };

    let condition = take(WX, "parameterName");
    let condition_code = take(WX, "parameterValue");
    let precipitation_probability = take(POP, "parameterName");
    let min_temp = take(MIN_T, "parameterName");
    let comfort = take(CI, "parameterName");
    let max_temp = take(MAX_T, "parameterName");

    if !missing.is_empty() {
        return Err(FetchError::Schema(format!(
            "missing or malformed: {}",
            missing.join(", ")
        )));
    }

    Ok(WeatherSnapshot {
        location,
        condition,
        condition_code,
        min_temp,
        max_temp,
        precipitation_probability,
        comfort,
        fetched_at: Utc::now(),
    })
}

/// Reads `weatherElement[index].time[0].parameter.<key>`; on failure returns the path.
fn field(elements: &[Value], index: usize, key: &str) -> Result<String, String> {
    let path = || format!("weatherElement[{index}].time[0].parameter.{key}");

    let parameter: &Map<String, Value> = elements
        .get(index)
        .and_then(|e| e.get("time"))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get("parameter"))
        .and_then(Value::as_object)
        .ok_or_else(path)?;

    match parameter.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(path()),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use crate::presentation::{SUNNY, icon_for};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn element(name: &str) -> Value {
        json!({"time": [{"parameter": {"parameterName": name}}]})
    }

    fn payload() -> Value {
        json!({
            "success": "true",
            "records": {"location": [{"weatherElement": [
                {"time": [{"parameter": {"parameterName": "晴", "parameterValue": "1"}}]},
                element("10"),
                element("20"),
                element("舒適"),
                element("30"),
            ]}]}
        })
    }

    fn taipei() -> Location {
        Location::parse("臺北市").expect("valid location")
    }

    async fn mock_ok(server: &MockServer, body: Value) {
        Mock::given(method("GET"))
            .and(path("/F-C0032-001"))
            .and(query_param("Authorization", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> CwaProvider {
        CwaProvider::with_base_url("test_key".into(), &server.uri()).expect("provider")
    }

    #[tokio::test]
    async fn taipei_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/F-C0032-001"))
            .and(query_param("Authorization", "test_key"))
            .and(query_param("locationName", "臺北市"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .mount(&server)
            .await;

        let snap = provider(&server).fetch_weather(&taipei()).await.unwrap();

        assert_eq!(snap.location, taipei());
        assert_eq!(snap.condition, "晴");
        assert_eq!(snap.condition_code, "1");
        assert_eq!(snap.min_temp, "20");
        assert_eq!(snap.max_temp, "30");
        assert_eq!(snap.precipitation_probability, "10");
        assert_eq!(snap.comfort, "舒適");
        assert_eq!(icon_for(&snap.condition_code), Some(SUNNY));
    }

    #[tokio::test]
    async fn every_location_yields_a_full_snapshot() {
        let server = MockServer::start().await;
        mock_ok(&server, payload()).await;
        let provider = provider(&server);

        for loc in Location::all() {
            let snap = provider.fetch_weather(&loc).await.unwrap();
            assert_eq!(snap.location, loc);
            for value in [
                &snap.condition,
                &snap.min_temp,
                &snap.max_temp,
                &snap.precipitation_probability,
                &snap.comfort,
            ] {
                assert!(!value.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn success_false_is_provider_error() {
        let server = MockServer::start().await;
        let mut body = payload();
        body["success"] = json!("false");
        mock_ok(&server, body).await;

        let err = provider(&server).fetch_weather(&taipei()).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Provider);
    }

    #[tokio::test]
    async fn missing_third_element_is_schema_error() {
        let server = MockServer::start().await;
        let body = json!({
            "success": "true",
            "records": {"location": [{"weatherElement": [
                {"time": [{"parameter": {"parameterName": "晴", "parameterValue": "1"}}]},
                element("10"),
            ]}]}
        });
        mock_ok(&server, body).await;

        let err = provider(&server).fetch_weather(&taipei()).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Schema);
        assert!(err.to_string().contains("weatherElement[2]"));
    }

    #[tokio::test]
    async fn non_json_body_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch_weather(&taipei()).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Provider);
    }

    #[tokio::test]
    async fn http_error_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch_weather(&taipei()).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Provider);
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            CwaProvider::with_base_url("test_key".into(), &format!("http://{addr}")).unwrap();
        let err = provider.fetch_weather(&taipei()).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let body = json!({
            "success": "true",
            "records": {"location": [{"weatherElement": [
                {"time": [{"parameter": {"parameterName": "晴"}}]},
                element("10"),
                element("20"),
            ]}]}
        });
        let err = parse_snapshot(taipei(), &body.to_string()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("weatherElement[0].time[0].parameter.parameterValue"));
        assert!(msg.contains("weatherElement[3]"));
        assert!(msg.contains("weatherElement[4]"));
        assert!(!msg.contains("weatherElement[1]"));
    }

    #[test]
    fn missing_records_is_schema_error() {
        let err = parse_snapshot(taipei(), r#"{"success":"true"}"#).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Schema);
    }

    #[test]
    fn missing_success_flag_is_provider_error() {
        let err = parse_snapshot(taipei(), r#"{"records":{}}"#).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Provider);
    }

    #[test]
    fn numeric_values_are_stringified() {
        let mut body = payload();
        body["records"]["location"][0]["weatherElement"][2] =
            json!({"time": [{"parameter": {"parameterName": 18}}]});
        let snap = parse_snapshot(taipei(), &body.to_string()).unwrap();
        assert_eq!(snap.min_temp, "18");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = CwaProvider::new("   ".into()).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = CwaProvider::with_base_url("k".into(), "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "晴".repeat(300);
        let out = truncate_body(&long);
        assert_eq!(out.chars().count(), 203);
    }

    #[tokio::test]
    async fn network_error_does_not_expose_api_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            CwaProvider::with_base_url("SECRET-KEY-123".into(), &format!("http://{addr}")).unwrap();
        let err = provider.fetch_weather(&taipei()).await.unwrap_err();

        assert_eq!(err.kind(), FetchErrorKind::Network);
        assert!(!err.message().contains("SECRET-KEY-123"));
        assert!(!err.to_string().contains("Authorization"));
    }

    #[test]
    fn malformed_records_is_schema_error() {
        let body = json!({"success": "true", "records": {"location": "臺北市"}});
        let err = parse_snapshot(taipei(), &body.to_string()).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Schema);
    }

    #[test]
    fn empty_location_list_is_schema_error() {
        let body = json!({"success": "true", "records": {"location": []}});
        let err = parse_snapshot(taipei(), &body.to_string()).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Schema);
        assert!(err.to_string().contains("records.location is empty"));
    }

    #[test]
    fn non_object_body_is_provider_error() {
        let err = parse_snapshot(taipei(), r#""sunny""#).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Provider);
    }
}
