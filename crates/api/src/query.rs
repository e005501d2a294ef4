//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for entity list endpoints (`?per_page=&limit=&offset=`).
///
/// `per_page` configures client-side pagination and is echoed back in the
/// response; `limit` and `offset` page the remote Zabbix query itself.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub per_page: Option<usize>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
