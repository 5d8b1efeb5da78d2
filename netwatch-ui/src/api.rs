//! API client for communicating with the Netwatch alert manager

use netwatch_common::{AlertRecord, AlertStatus, Severity, SuppressDuration, Team};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const API_BASE: &str = "http://localhost:8008/api";

const SESSION_TOKEN_KEY: &str = "netwatch.session";
const SESSION_USER_KEY: &str = "netwatch.user";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn resolve_url(path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", API_BASE, path)
    }
}

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

/// Session token from browser session storage, if the user logged in
pub fn session_token() -> Option<String> {
    session_storage()?.get_item(SESSION_TOKEN_KEY).ok()?
}

pub fn store_session(token: &str, user: &str) {
    if let Some(storage) = session_storage() {
        let _ = storage.set_item(SESSION_TOKEN_KEY, token);
        let _ = storage.set_item(SESSION_USER_KEY, user);
    }
}

/// Login name recorded at sign-in; used as the acknowledge owner
pub fn current_user() -> Option<String> {
    session_storage()?.get_item(SESSION_USER_KEY).ok()?
}

fn with_auth(request: reqwasm::http::Request) -> reqwasm::http::Request {
    match session_token() {
        Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
        None => request,
    }
}

/// Generic JSON fetch helper
pub async fn fetch_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = with_auth(reqwasm::http::Request::get(&resolve_url(path)))
        .send()
        .await
        .map_err(|e| ApiError { message: e.to_string() })?;

    if response.ok() {
        response.json().await.map_err(|e| ApiError { message: e.to_string() })
    } else {
        Err(ApiError { message: format!("HTTP {}", response.status()) })
    }
}

/// POST request helper
pub async fn post_json<T: DeserializeOwned, B: Serialize>(path: &str, body: &B) -> Result<T, ApiError> {
    let payload = serde_json::to_string(body).map_err(|e| ApiError { message: e.to_string() })?;
    let response = with_auth(reqwasm::http::Request::post(&resolve_url(path)))
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .map_err(|e| ApiError { message: e.to_string() })?;

    if response.ok() {
        response.json().await.map_err(|e| ApiError { message: e.to_string() })
    } else {
        Err(ApiError { message: format!("HTTP {}", response.status()) })
    }
}

/// POST helper for endpoints that return no body
pub async fn post_unit<B: Serialize>(path: &str, body: &B) -> Result<(), ApiError> {
    let payload = serde_json::to_string(body).map_err(|e| ApiError { message: e.to_string() })?;
    let response = with_auth(reqwasm::http::Request::post(&resolve_url(path)))
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .map_err(|e| ApiError { message: e.to_string() })?;

    if response.ok() {
        Ok(())
    } else {
        Err(ApiError { message: format!("HTTP {}", response.status()) })
    }
}

/// Server-side query for the alert list. The alert manager accepts every
/// dimension, but only status, time range and limit narrow the snapshot it
/// returns; the dashboard applies the rest client-side.
#[derive(Clone, Debug, Default)]
pub struct AlertQuery {
    pub status_in: Vec<AlertStatus>,
    pub severity_in: Vec<Severity>,
    pub site_in: Vec<String>,
    pub device_in: Vec<String>,
    pub source_in: Vec<String>,
    pub team_in: Vec<String>,
    pub time_range_hours: Option<u32>,
    pub name_substring: Option<String>,
    pub limit: Option<usize>,
    pub include_history: bool,
}

impl AlertQuery {
    fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();

        let mut push_list = |key: &str, values: Vec<String>| {
            if !values.is_empty() {
                params.push(format!("{}={}", key, urlencoding::encode(&values.join(","))));
            }
        };
        push_list("status", self.status_in.iter().map(|s| s.as_str().to_string()).collect());
        push_list("severity", self.severity_in.iter().map(|s| s.as_str().to_string()).collect());
        push_list("site", self.site_in.clone());
        push_list("device", self.device_in.clone());
        push_list("source", self.source_in.clone());
        push_list("team", self.team_in.clone());

        if let Some(hours) = self.time_range_hours {
            params.push(format!("time_range_hours={}", hours));
        }
        if let Some(name) = &self.name_substring {
            if !name.is_empty() {
                params.push(format!("name={}", urlencoding::encode(name)));
            }
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if self.include_history {
            params.push("include_history=true".to_string());
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Fetch the alert snapshot
pub async fn list_alerts(query: &AlertQuery) -> Result<Vec<AlertRecord>, ApiError> {
    fetch_json(&format!("/alerts{}", query.to_query_string())).await
}

#[derive(Serialize)]
struct AcknowledgeRequest<'a> {
    owner: &'a str,
}

/// Acknowledge one alert on behalf of `owner`
pub async fn acknowledge_alert(id: &str, owner: &str) -> Result<(), ApiError> {
    post_unit(
        &format!("/alerts/{}/acknowledge", urlencoding::encode(id)),
        &AcknowledgeRequest { owner },
    )
    .await
}

/// Clear one alert
pub async fn clear_alert(id: &str) -> Result<(), ApiError> {
    post_unit(&format!("/alerts/{}/clear", urlencoding::encode(id)), &()).await
}

#[derive(Serialize)]
struct SuppressRequest<'a> {
    duration: SuppressDuration,
    reason: &'a str,
}

/// Suppress one alert for the given duration
pub async fn suppress_alert(id: &str, duration: SuppressDuration, reason: &str) -> Result<(), ApiError> {
    post_unit(
        &format!("/alerts/{}/suppress", urlencoding::encode(id)),
        &SuppressRequest { duration, reason },
    )
    .await
}

#[derive(Serialize)]
struct SeverityRequest {
    severity: Severity,
}

/// Reclassify one alert's severity
pub async fn update_severity(id: &str, severity: Severity) -> Result<(), ApiError> {
    post_unit(
        &format!("/alerts/{}/severity", urlencoding::encode(id)),
        &SeverityRequest { severity },
    )
    .await
}

/// Teams alerts can be routed to; feeds peripheral views only
pub async fn list_teams() -> Result<Vec<Team>, ApiError> {
    fetch_json("/teams").await
}

/// Leaf alerts contributing to a server-side aggregate
pub async fn list_contributing_alerts(aggregate_id: &str) -> Result<Vec<AlertRecord>, ApiError> {
    fetch_json(&format!("/alerts/{}/contributing", urlencoding::encode(aggregate_id))).await
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange credentials for a session token
pub async fn login(username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    post_json("/auth/login", &LoginRequest { username, password }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty_by_default() {
        assert_eq!(AlertQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_query_string_includes_server_side_filters() {
        let query = AlertQuery {
            status_in: vec![AlertStatus::Active, AlertStatus::Suppressed],
            time_range_hours: Some(24),
            limit: Some(500),
            include_history: true,
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string(),
            "?status=ACTIVE%2CSUPPRESSED&time_range_hours=24&limit=500&include_history=true"
        );
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = AlertQuery {
            name_substring: Some("BGP session".to_string()),
            site_in: vec!["fra1".to_string()],
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "?site=fra1&name=BGP%20session");
    }

    #[test]
    fn test_empty_name_substring_is_omitted() {
        let query = AlertQuery {
            name_substring: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "");
    }
}
