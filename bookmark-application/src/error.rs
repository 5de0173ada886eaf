use thiserror::Error;

use bookmark_domain::{AccessError, CourseId, ResolveError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("no activity found in course {0}")]
    ActivityNotFound(CourseId),
    #[error("login required")]
    LoginRequired { login_url: String },
    #[error("access to course {0} denied")]
    Forbidden(CourseId),
    #[error("view log integrity: {0}")]
    Integrity(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AccessError> for AppError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::CourseMissing(course_id) => AppError::CourseNotFound(course_id),
            AccessError::NotLoggedIn { login_url } => AppError::LoginRequired { login_url },
            AccessError::Denied(course_id) => AppError::Forbidden(course_id),
            AccessError::Transport(err) => AppError::Internal(err),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::DuplicateRows(_) | ResolveError::ForeignRow(_) => {
                AppError::Integrity(value.to_string())
            }
            ResolveError::Store(err) => AppError::Internal(err),
        }
    }
}
