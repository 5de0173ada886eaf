use anyhow::Result;
use async_trait::async_trait;
use clickhouse::Client;
use serde::Deserialize;

use bookmark_domain::ports::ViewLogRepository;
use bookmark_domain::{ActivityId, CourseId, UserId, ViewEventRow};

/// Context level the platform assigns to course-module view events.
const CONTEXT_MODULE: &str = "module";

/// Read-only view over the platform's `view_events` log table. The table is
/// created and populated by the platform's logging pipeline, never by this
/// service.
#[derive(Clone)]
pub struct ClickhouseViewLog {
    client: Client,
}

#[derive(Debug, Deserialize, clickhouse::Row)]
struct LatestViewRow {
    activity_id: u64,
    event_id: u64,
    time_viewed: i64,
}

impl ClickhouseViewLog {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn latest_view_sql(user_id: UserId, course_id: CourseId, activity_ids: &[ActivityId]) -> String {
    let id_list = activity_ids
        .iter()
        .map(|id| id.0.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT activity_id, event_id, time_viewed \
         FROM view_events \
         WHERE user_id = {} AND course_id = {} \
         AND context_level = '{}' AND action = 'viewed' \
         AND activity_id IN ({}) \
         ORDER BY time_viewed DESC, event_id DESC \
         LIMIT 1",
        user_id.0, course_id.0, CONTEXT_MODULE, id_list
    )
}

#[async_trait]
impl ViewLogRepository for ClickhouseViewLog {
    async fn latest_module_view(
        &self,
        user_id: UserId,
        course_id: CourseId,
        activity_ids: &[ActivityId],
    ) -> Result<Vec<ViewEventRow>> {
        if activity_ids.is_empty() {
            // An empty IN list is not valid SQL and matches nothing anyway.
            return Ok(Vec::new());
        }
        let query = latest_view_sql(user_id, course_id, activity_ids);
        let rows = self.client.query(&query).fetch_all::<LatestViewRow>().await?;
        Ok(rows
            .into_iter()
            .map(|row| ViewEventRow {
                activity_id: ActivityId(row.activity_id),
                event_id: row.event_id,
                time_viewed: row.time_viewed,
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
