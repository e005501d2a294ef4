use std::sync::Arc;

use tagsweep_core::prefs::PrefStore;
use tagsweep_zabbix::ZabbixClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Client for the configured Zabbix server.
    pub zabbix: Arc<ZabbixClient>,
    /// File-backed preference store.
    pub prefs: Arc<PrefStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
