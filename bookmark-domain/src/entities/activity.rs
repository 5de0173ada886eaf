// Activity entities
// One course module as the platform's course catalog reports it, plus the
// view-log projection and the resolver output.

use serde::{Deserialize, Serialize};

use crate::value_objects::ActivityId;

/// One course activity instance, in course layout order. `visible` is the
/// administrator flag; `available` reflects conditional-release rules the
/// platform has already evaluated for the current user and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRef {
    pub id: ActivityId,
    pub type_name: String,
    pub visible: bool,
    pub available: bool,
}

/// Projection of one row from the platform's append-only view-event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEventRow {
    pub activity_id: ActivityId,
    pub event_id: u64,
    pub time_viewed: i64,
}

/// The activity a user should be redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    pub type_name: String,
    pub activity_id: ActivityId,
}
