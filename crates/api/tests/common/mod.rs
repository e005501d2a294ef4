#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tagsweep_api::config::ServerConfig;
use tagsweep_api::router::build_app_router;
use tagsweep_api::state::AppState;
use tagsweep_core::prefs::PrefStore;
use tagsweep_zabbix::{ZabbixClient, ZabbixConfig};

// ---------------------------------------------------------------------------
// Mock Zabbix server
// ---------------------------------------------------------------------------

/// In-process JSON-RPC server standing in for Zabbix.
///
/// Seeded objects are served by `{object}.get` (with `countOutput` and
/// `{object}ids` filtering) and mutated by `{object}.update`, so
/// fetch-modify-push mutations behave like the real thing. Every call is
/// recorded for assertions.
pub struct MockZabbix {
    objects: Mutex<HashMap<String, Vec<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
    fail_updates: Mutex<HashSet<i64>>,
}

impl MockZabbix {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_updates: Mutex::new(HashSet::new()),
        })
    }

    /// Seed the remote objects for one kind noun (`host`, `trigger`, `item`).
    pub fn seed(&self, object: &str, objects: Vec<Value>) {
        self.objects
            .lock()
            .unwrap()
            .insert(object.to_string(), objects);
    }

    /// Make `{object}.update` fail for one id with a permissions error.
    pub fn fail_update(&self, id: i64) {
        self.fail_updates.lock().unwrap().insert(id);
    }

    /// Params of every recorded call to `method`, in order.
    pub fn calls_for(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    /// Bind an ephemeral port and serve the JSON-RPC endpoint.
    pub async fn start(self: &Arc<Self>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock local addr");

        let router = Router::new()
            .route("/api_jsonrpc.php", post(Self::handle))
            .with_state(Arc::clone(self));
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });

        format!("http://{addr}")
    }

    async fn handle(State(mock): State<Arc<MockZabbix>>, Json(request): Json<Value>) -> Json<Value> {
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].clone();
        let id = request["id"].clone();
        mock.calls.lock().unwrap().push((method.clone(), params.clone()));

        let (object, action) = method.split_once('.').unwrap_or((method.as_str(), ""));
        let result = match (object, action) {
            ("apiinfo", "version") => json!("7.0.0"),
            (object, "get") => mock.handle_get(object, &params),
            (object, "update") => match mock.handle_update(object, &params) {
                Ok(result) => result,
                Err(error) => {
                    return Json(json!({"jsonrpc": "2.0", "error": error, "id": id}));
                }
            },
            _ => json!([]),
        };
        Json(json!({"jsonrpc": "2.0", "result": result, "id": id}))
    }

    fn handle_get(&self, object: &str, params: &Value) -> Value {
        let objects = self.objects.lock().unwrap();
        let list = objects.get(object).cloned().unwrap_or_default();

        if params["countOutput"].as_bool() == Some(true) {
            return json!(list.len().to_string());
        }

        let ids_param = format!("{object}ids");
        let id_field = format!("{object}id");
        if let Some(wanted) = params[ids_param.as_str()].as_array() {
            let wanted: HashSet<String> = wanted.iter().map(id_string).collect();
            let filtered: Vec<Value> = list
                .into_iter()
                .filter(|o| wanted.contains(&id_string(&o[id_field.as_str()])))
                .collect();
            return json!(filtered);
        }
        json!(list)
    }

    fn handle_update(&self, object: &str, params: &Value) -> Result<Value, Value> {
        let id_field = format!("{object}id");
        let id = params[id_field.as_str()].as_i64().unwrap_or_default();

        if self.fail_updates.lock().unwrap().contains(&id) {
            return Err(json!({
                "code": -32500,
                "message": "Application error.",
                "data": "No permissions to referred object or it does not exist!",
            }));
        }

        let mut objects = self.objects.lock().unwrap();
        if let Some(list) = objects.get_mut(object) {
            for stored in list.iter_mut() {
                if id_string(&stored[id_field.as_str()]) == id.to_string() {
                    stored["tags"] = params["tags"].clone();
                }
            }
        }

        let mut result = json!({});
        result[format!("{object}ids").as_str()] = json!([id.to_string()]);
        Ok(result)
    }
}

/// Ids arrive as strings from current servers and as numbers from older
/// ones; normalise both for comparison.
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn host_fixture(id: i64, name: &str, flags: &str, tags: &[(&str, &str)]) -> Value {
    json!({
        "hostid": id.to_string(),
        "host": name,
        "name": name,
        "status": "0",
        "flags": flags,
        "tags": tag_values(tags),
    })
}

pub fn item_fixture(
    id: i64,
    name: &str,
    key: &str,
    host: (i64, &str),
    tags: &[(&str, &str)],
) -> Value {
    json!({
        "itemid": id.to_string(),
        "name": name,
        "key_": key,
        "status": "0",
        "flags": "0",
        "tags": tag_values(tags),
        "hosts": [{"hostid": host.0.to_string(), "name": host.1}],
    })
}

fn tag_values(tags: &[(&str, &str)]) -> Value {
    let tags: Vec<Value> = tags
        .iter()
        .map(|(name, value)| json!({"tag": name, "value": value}))
        .collect();
    json!(tags)
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A full application wired to a [`MockZabbix`] and a throwaway
/// preference store.
pub struct TestHarness {
    pub app: Router,
    pub zabbix: Arc<MockZabbix>,
    _prefs_dir: tempfile::TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(prefs_path: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        prefs_path: prefs_path.to_string(),
    }
}

/// Start a mock Zabbix seeded with three hosts and build the app against
/// it. Host 3 is discovery-created.
pub async fn harness() -> TestHarness {
    let zabbix = MockZabbix::new();
    zabbix.seed(
        "host",
        vec![
            host_fixture(1, "web-01", "0", &[("env", "prod")]),
            host_fixture(2, "web-02", "0", &[("env", "staging"), ("team", "sre")]),
            host_fixture(3, "db-01", "4", &[]),
        ],
    );

    let base_url = zabbix.start().await;
    let prefs_dir = tempfile::tempdir().expect("create prefs dir");
    let prefs_path = prefs_dir.path().join("preferences.json");
    let prefs_path = prefs_path.to_str().expect("prefs path utf-8").to_string();

    let config = test_config(&prefs_path);
    let client = ZabbixClient::new(
        ZabbixConfig::new(&base_url, "test-token").with_timeout(Duration::from_secs(5)),
    )
    .expect("build zabbix client");

    let state = AppState {
        zabbix: Arc::new(client),
        prefs: Arc::new(PrefStore::open(&prefs_path).expect("open prefs")),
        config: Arc::new(config.clone()),
    };

    TestHarness {
        app: build_app_router(state, &config),
        zabbix,
        _prefs_dir: prefs_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    app.oneshot(request).await.expect("send request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse body as JSON")
}
