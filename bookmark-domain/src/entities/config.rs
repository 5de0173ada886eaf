// Runtime configuration entities
// Populated by the infrastructure config loader, consumed everywhere else.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    /// Root URL of the host platform, used to build redirect targets.
    pub www_root: String,
    /// Base URL of the platform's local API this service calls.
    pub platform_base_url: String,
    pub platform_api_token: Option<String>,
    /// Public URL of this service, recorded as the return-after-login
    /// marker by the platform session layer.
    pub public_base_url: String,
    pub session_cookie_name: String,
    /// Users holding this capability skip the bookmark and land on the
    /// course overview page.
    pub manage_capability: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
