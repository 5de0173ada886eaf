// Entry-activity resolution
// Picks the activity a user should land on when opening a course: the most
// recently viewed one that is still eligible, else the first eligible one
// in course layout order.

use thiserror::Error;

use crate::entities::{ActivityRef, RedirectTarget};
use crate::ports::ViewLogRepository;
use crate::value_objects::{ActivityId, CourseId, UserId};

/// Activity type never used as a recency-based redirect target. A "url"
/// module the user viewed last is just an outbound link, not a place to
/// resume; one legitimately placed first in a course is still a valid
/// fallback, so `first_activity` does not apply this exclusion.
pub const DENYLISTED_TYPE: &str = "url";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("view log returned {0} rows where at most one was expected")]
    DuplicateRows(usize),
    #[error("view log row references activity {0} outside the candidate set")]
    ForeignRow(ActivityId),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// The most recently viewed, still eligible activity for the user in the
/// course. Issues exactly one read against the view log, and none at all
/// when no activity could ever match.
pub async fn most_recent_activity(
    log: &dyn ViewLogRepository,
    user_id: UserId,
    course_id: CourseId,
    activities: &[ActivityRef],
) -> Result<Option<RedirectTarget>, ResolveError> {
    let eligible: Vec<&ActivityRef> = eligible_activities(activities).collect();
    if eligible.is_empty() {
        return Ok(None);
    }

    // The denylist applies to the recency path only.
    let candidate_ids: Vec<ActivityId> = eligible
        .iter()
        .filter(|activity| activity.type_name != DENYLISTED_TYPE)
        .map(|activity| activity.id)
        .collect();

    let rows = log
        .latest_module_view(user_id, course_id, &candidate_ids)
        .await?;
    if rows.len() > 1 {
        return Err(ResolveError::DuplicateRows(rows.len()));
    }
    let row = match rows.into_iter().next() {
        Some(row) => row,
        None => return Ok(None),
    };

    let activity = eligible
        .iter()
        .find(|activity| activity.id == row.activity_id)
        .ok_or(ResolveError::ForeignRow(row.activity_id))?;
    Ok(Some(RedirectTarget {
        type_name: activity.type_name.clone(),
        activity_id: activity.id,
    }))
}

/// The first eligible activity in course layout order. Pure fallback for
/// users with no usable viewing history; no I/O.
pub fn first_activity(activities: &[ActivityRef]) -> Option<RedirectTarget> {
    eligible_activities(activities)
        .next()
        .map(|activity| RedirectTarget {
            type_name: activity.type_name.clone(),
            activity_id: activity.id,
        })
}

fn eligible_activities<'a>(
    activities: &'a [ActivityRef],
) -> impl Iterator<Item = &'a ActivityRef> + 'a {
    activities
        .iter()
        .filter(|activity| activity.visible && activity.available)
}
