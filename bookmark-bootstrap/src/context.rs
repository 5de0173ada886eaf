use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clickhouse::Client;

use bookmark_application::AppState;
use bookmark_infrastructure::{AppConfig, ClickhouseViewLog, PlatformClient};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let mut clickhouse = Client::default()
            .with_url(&db_config.clickhouse_url)
            .with_database(&db_config.clickhouse_database);
        if let Some(user) = &db_config.clickhouse_user {
            clickhouse = clickhouse.with_user(user);
        }
        if let Some(password) = &db_config.clickhouse_password {
            clickhouse = clickhouse.with_password(password);
        }

        let view_log = Arc::new(ClickhouseViewLog::new(clickhouse));
        let platform = Arc::new(PlatformClient::new(
            runtime_config.platform_base_url.clone(),
            runtime_config.platform_api_token.clone(),
            Duration::from_secs(runtime_config.request_timeout_seconds),
        )?);

        let state = AppState {
            config: runtime_config,
            view_log,
            catalog: platform.clone(),
            access: platform,
        };

        Ok(Self { state })
    }
}
