//! JSON-RPC 2.0 transport and typed entity fetches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tagsweep_core::entity::{Entity, EntityKind};

use crate::error::ZabbixError;
use crate::models::{Host, Item, Trigger};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Path of the JSON-RPC endpoint under the server base URL.
const API_PATH: &str = "/api_jsonrpc.php";

/// User-Agent header sent with every request.
const USER_AGENT: &str = "tagsweep";

/// Default request timeout when the config does not override it.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Connection settings for one Zabbix server.
#[derive(Debug, Clone)]
pub struct ZabbixConfig {
    /// Server base URL, e.g. `https://zabbix.example.com`.
    pub url: String,
    /// Pre-provisioned API token, sent as a bearer header.
    pub api_token: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl ZabbixConfig {
    pub fn new(url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// JSON-RPC error object. Zabbix puts the human-readable detail in `data`
/// and a generic category in `message`.
#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<String>,
}

impl RpcError {
    fn into_error(self) -> ZabbixError {
        let message = match self.data {
            Some(data) if !data.is_empty() => data,
            _ => self.message,
        };
        ZabbixError::Api {
            code: self.code,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for one Zabbix server. Cheap to clone is not a goal; wrap it in
/// an `Arc` to share across tasks.
pub struct ZabbixClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
    request_id: AtomicU64,
}

impl ZabbixClient {
    pub fn new(config: ZabbixConfig) -> Result<Self, ZabbixError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        let endpoint = format!("{}{}", config.url.trim_end_matches('/'), API_PATH);
        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token,
            request_id: AtomicU64::new(1),
        })
    }

    /// Execute one JSON-RPC call and decode its `result` field.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ZabbixError> {
        self.post_rpc(method, params, true).await
    }

    /// Probe the server with `apiinfo.version`. The method must be called
    /// without an authorization header.
    pub async fn ping(&self) -> Result<String, ZabbixError> {
        self.post_rpc("apiinfo.version", json!({}), false).await
    }

    async fn post_rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
        with_auth: bool,
    ) -> Result<T, ZabbixError> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if with_auth {
            request = request.bearer_auth(&self.api_token);
        }

        let response = request.send().await?;
        let response = Self::ensure_success(response).await?;
        let body: RpcResponse<T> = response.json().await?;

        if let Some(error) = body.error {
            let error = error.into_error();
            tracing::warn!(method, %error, "Zabbix call failed");
            return Err(error);
        }
        body.result.ok_or_else(|| {
            ZabbixError::Malformed(format!("response for '{method}' has neither result nor error"))
        })
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ZabbixError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ZabbixError::Http {
            status: status.as_u16(),
            body,
        })
    }

    // -- typed fetches ------------------------------------------------------

    /// Fetch entities of one kind as display rows, sorted by the kind's
    /// natural field. `limit`/`offset` page the remote query itself.
    pub async fn fetch_entities(
        &self,
        kind: EntityKind,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Entity>, ZabbixError> {
        let params = list_params(kind, limit, offset);
        let entities: Vec<Entity> = match kind {
            EntityKind::Host => {
                let rows: Vec<Host> = self.call(kind.get_method(), params).await?;
                rows.into_iter().map(Host::into_entity).collect()
            }
            EntityKind::Trigger => {
                let rows: Vec<Trigger> = self.call(kind.get_method(), params).await?;
                rows.into_iter().map(Trigger::into_entity).collect()
            }
            EntityKind::Item => {
                let rows: Vec<Item> = self.call(kind.get_method(), params).await?;
                rows.into_iter().map(Item::into_entity).collect()
            }
        };
        tracing::debug!(kind = kind.noun(), count = entities.len(), "Fetched entities");
        Ok(entities)
    }

    /// Fetch monitored items with their wire fields intact, for grouping
    /// by item key.
    pub async fn fetch_items(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Item>, ZabbixError> {
        let params = list_params(EntityKind::Item, limit, offset);
        self.call(EntityKind::Item.get_method(), params).await
    }

    /// Count entities of one kind without fetching rows.
    pub async fn fetch_count(&self, kind: EntityKind) -> Result<u64, ZabbixError> {
        let mut params = json!({ "countOutput": true });
        if kind == EntityKind::Item {
            params["monitored"] = json!(true);
        }
        let count: serde_json::Value = self.call(kind.get_method(), params).await?;
        parse_count(&count)
            .ok_or_else(|| ZabbixError::Malformed(format!("countOutput returned {count}")))
    }
}

/// Query parameters for a list fetch, matching what the server is asked
/// for per kind: hosts carry no host join, triggers expand their
/// description macros, items are restricted to monitored ones.
fn list_params(kind: EntityKind, limit: Option<u64>, offset: Option<u64>) -> serde_json::Value {
    let mut params = match kind {
        EntityKind::Host => json!({
            "output": ["hostid", "host", "name", "status", "flags"],
            "selectTags": "extend",
        }),
        EntityKind::Trigger => json!({
            "output": ["triggerid", "description", "status", "priority", "url", "expression", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "expandDescription": true,
        }),
        EntityKind::Item => json!({
            "output": ["itemid", "name", "key_", "type", "status", "value_type", "delay", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "monitored": true,
        }),
    };
    params["sortfield"] = json!(kind.sort_field());
    params["sortorder"] = json!("ASC");
    if let Some(limit) = limit {
        params["limit"] = json!(limit);
    }
    if let Some(offset) = offset {
        params["offset"] = json!(offset);
    }
    params
}

/// `countOutput` responses arrive as a bare string on current servers and
/// as a number on some older ones.
fn parse_count(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
