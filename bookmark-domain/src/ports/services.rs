use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::ActivityRef;
use crate::value_objects::{CourseId, UserId};

/// An authenticated session resolved against a specific course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSession {
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("course {0} does not exist")]
    CourseMissing(CourseId),
    #[error("login required")]
    NotLoggedIn { login_url: String },
    #[error("user may not access course {0}")]
    Denied(CourseId),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Authentication, enrollment and capability checks, all delegated to the
/// host platform.
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Validates the session and the user's enrollment in the course.
    /// `wants_url` is passed along so the platform can record where to
    /// return the user after login.
    async fn require_course_login(
        &self,
        session_token: &str,
        course_id: CourseId,
        wants_url: &str,
    ) -> Result<CourseSession, AccessError>;

    async fn has_capability(
        &self,
        capability: &str,
        course_id: CourseId,
        user_id: UserId,
    ) -> anyhow::Result<bool>;
}

/// The platform's course outline provider.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Activities in course layout order, with visibility and availability
    /// already evaluated for the current user and time.
    async fn course_activities(&self, course_id: CourseId) -> anyhow::Result<Vec<ActivityRef>>;
}
