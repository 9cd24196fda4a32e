//! Local stand-in for the Galtinn directory and OAuth provider.
//!
//! [`MockGaltinn`] binds an axum server to an ephemeral loopback port and
//! serves paginated `/users/`, `/discordprofiles/` and `/groups/` listings
//! plus the `/oauth/token/` and `/oauth/userinfo/` endpoints. Responses are
//! driven by fixture JSON and can be switched to failure statuses per page.
//!
//! ```rust,ignore
//! let galtinn = MockGaltinn::start().await?;
//! galtinn.set_page_size(10);
//! galtinn.set_users(records);
//! galtinn.fail_page("users", 2, 500);
//! ```

use axum::{
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use url::Url;

use crate::error::TestError;

/// Access token handed out by the mock token endpoint.
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Default)]
struct MockState {
    base_url: String,
    page_size: usize,
    users: Vec<Value>,
    profiles: Vec<Value>,
    groups: Vec<Value>,
    failures: HashMap<(String, usize), u16>,
    token_status: Option<u16>,
    userinfo: Value,
    userinfo_status: Option<u16>,
    token_requests: Vec<HashMap<String, String>>,
    deleted_profiles: Vec<u64>,
    authorization_headers: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

/// Handle to a running mock server.
///
/// The server task is detached and lives until the test runtime shuts down.
#[derive(Clone)]
pub struct MockGaltinn {
    /// Base URL of the server, without a trailing slash.
    pub url: String,
    state: Shared,
}

impl MockGaltinn {
    /// Binds to `127.0.0.1:0` and starts serving.
    ///
    /// # Returns
    /// - `Ok(MockGaltinn)` - Handle with the bound base URL
    /// - `Err(TestError::Io)` - Failed to bind the listener
    pub async fn start() -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);

        let state: Shared = Arc::new(Mutex::new(MockState {
            base_url: url.clone(),
            page_size: DEFAULT_PAGE_SIZE,
            userinfo: json!({ "sub": "1", "preferred_username": "user1" }),
            ..Default::default()
        }));

        let app = Router::new()
            .route("/users/", get(list_users))
            .route("/discordprofiles/", get(list_profiles))
            .route("/discordprofiles/{id}/", delete(delete_profile))
            .route("/groups/", get(list_groups))
            .route("/oauth/token/", post(token))
            .route("/oauth/userinfo/", get(userinfo))
            .with_state(state.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { url, state })
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of results per listing page.
    pub fn set_page_size(&self, page_size: usize) {
        self.lock().page_size = page_size.max(1);
    }

    pub fn set_users(&self, users: Vec<Value>) {
        self.lock().users = users;
    }

    pub fn set_profiles(&self, profiles: Vec<Value>) {
        self.lock().profiles = profiles;
    }

    pub fn set_groups(&self, groups: Vec<Value>) {
        self.lock().groups = groups;
    }

    /// Makes `page` (1-based) of `resource` answer with `status`.
    ///
    /// `resource` is the listing path segment: `users`, `discordprofiles`
    /// or `groups`.
    pub fn fail_page(&self, resource: &str, page: usize, status: u16) {
        self.lock()
            .failures
            .insert((resource.to_string(), page), status);
    }

    /// Makes the token endpoint answer with `status` instead of a token.
    pub fn set_token_status(&self, status: u16) {
        self.lock().token_status = Some(status);
    }

    pub fn set_userinfo(&self, userinfo: Value) {
        self.lock().userinfo = userinfo;
    }

    /// Makes the userinfo endpoint answer with `status`.
    pub fn set_userinfo_status(&self, status: u16) {
        self.lock().userinfo_status = Some(status);
    }

    /// Form bodies received by the token endpoint, in arrival order.
    pub fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.lock().token_requests.clone()
    }

    /// Ids of discord profiles deleted through the API.
    pub fn deleted_profiles(&self) -> Vec<u64> {
        self.lock().deleted_profiles.clone()
    }

    /// `Authorization` headers seen on directory requests.
    pub fn authorization_headers(&self) -> Vec<String> {
        self.lock().authorization_headers.clone()
    }
}

fn record_authorization(state: &mut MockState, headers: &HeaderMap) {
    if let Some(value) = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
    {
        state.authorization_headers.push(value.to_string());
    }
}

fn field_matches(record: &Value, pointer: &str, expected: Option<&String>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    match record.pointer(pointer) {
        Some(Value::Number(n)) => n.to_string() == *expected,
        Some(Value::String(s)) => s == expected,
        _ => false,
    }
}

async fn list_users(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
    record_authorization(&mut state, &headers);

    let items: Vec<Value> = state
        .users
        .iter()
        .filter(|user| field_matches(user, "/id", query.get("id")))
        .filter(|user| {
            field_matches(
                user,
                "/discord_profile/discord_id",
                query.get("discord_profile__discord_id"),
            )
        })
        .cloned()
        .collect();

    paginate(&state, "users", items, &query)
}

async fn list_profiles(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
    record_authorization(&mut state, &headers);

    let items: Vec<Value> = state
        .profiles
        .iter()
        .filter(|profile| field_matches(profile, "/discord_id", query.get("discord_id")))
        .filter(|profile| field_matches(profile, "/user", query.get("user")))
        .cloned()
        .collect();

    paginate(&state, "discordprofiles", items, &query)
}

async fn list_groups(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
    record_authorization(&mut state, &headers);

    let items = state.groups.clone();

    paginate(&state, "groups", items, &query)
}

async fn delete_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> StatusCode {
    let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
    record_authorization(&mut state, &headers);

    let before = state.profiles.len();
    state
        .profiles
        .retain(|profile| profile.get("id").and_then(Value::as_u64) != Some(id));

    if state.profiles.len() == before {
        return StatusCode::NOT_FOUND;
    }

    state.deleted_profiles.push(id);
    StatusCode::NO_CONTENT
}

async fn token(State(state): State<Shared>, Form(form): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
    state.token_requests.push(form);

    if let Some(status) = state.token_status {
        return status_response(status);
    }

    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "openid profile email",
    }))
    .into_response()
}

async fn userinfo(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap_or_else(|p| p.into_inner());

    let expected = format!("Bearer {}", MOCK_ACCESS_TOKEN);
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if let Some(status) = state.userinfo_status {
        return status_response(status);
    }

    Json(state.userinfo.clone()).into_response()
}

fn status_response(status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "mock failure").into_response()
}

fn page_link(
    state: &MockState,
    resource: &str,
    query: &HashMap<String, String>,
    page: usize,
) -> Option<String> {
    let mut params: Vec<(String, String)> = query
        .iter()
        .filter(|(key, _)| key.as_str() != "page")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    params.sort();
    if page > 1 {
        params.push(("page".to_string(), page.to_string()));
    }

    Url::parse_with_params(&format!("{}/{}/", state.base_url, resource), params)
        .ok()
        .map(String::from)
}

fn paginate(
    state: &MockState,
    resource: &str,
    items: Vec<Value>,
    query: &HashMap<String, String>,
) -> Response {
    let page = query
        .get("page")
        .and_then(|page| page.parse::<usize>().ok())
        .unwrap_or(1);

    if let Some(status) = state.failures.get(&(resource.to_string(), page)) {
        return status_response(*status);
    }

    let start = (page.saturating_sub(1)) * state.page_size;
    if page == 0 || (page > 1 && start >= items.len()) {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Invalid page." })))
            .into_response();
    }

    let end = (start + state.page_size).min(items.len());
    let next = (end < items.len()).then(|| page_link(state, resource, query, page + 1));
    let previous = (page > 1).then(|| page_link(state, resource, query, page - 1));

    Json(json!({
        "count": items.len(),
        "next": next.flatten(),
        "previous": previous.flatten(),
        "results": items[start..end].to_vec(),
    }))
    .into_response()
}
