use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use bookmark_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    NotFound(String),
    Forbidden(String),
    LoginRedirect(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::CourseNotFound(course_id) => {
                HttpError::NotFound(format!("course {} not found", course_id))
            }
            AppError::ActivityNotFound(course_id) => {
                HttpError::NotFound(format!("no activity found in course {}", course_id))
            }
            AppError::LoginRequired { login_url } => HttpError::LoginRedirect(login_url),
            AppError::Forbidden(course_id) => {
                HttpError::Forbidden(format!("access to course {} denied", course_id))
            }
            AppError::Integrity(message) => {
                error!("view log integrity failure: {}", message);
                HttpError::Internal(message)
            }
            AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::LoginRedirect(url) => return Redirect::to(&url).into_response(),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
