use async_trait::async_trait;

use crate::entities::ViewEventRow;
use crate::value_objects::{ActivityId, CourseId, UserId};

/// Read-only access to the platform's append-only view-event log. The log
/// is owned and populated by the platform; this service never writes to it.
#[async_trait]
pub trait ViewLogRepository: Send + Sync {
    /// The latest module-level "viewed" event for the user in the course,
    /// restricted to the given activity ids. Contract: at most one row,
    /// ordered by view time descending with event id as the tiebreak.
    async fn latest_module_view(
        &self,
        user_id: UserId,
        course_id: CourseId,
        activity_ids: &[ActivityId],
    ) -> anyhow::Result<Vec<ViewEventRow>>;

    async fn ping(&self) -> anyhow::Result<()>;
}
