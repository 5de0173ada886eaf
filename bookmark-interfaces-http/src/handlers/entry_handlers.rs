use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Redirect;

use bookmark_application::queries::entry_queries::{self, EntryRedirect};
use bookmark_application::{AppError, AppState};
use bookmark_domain::{CourseId, RedirectTarget};

use crate::error::HttpError;
use crate::middleware::session_token;

/// GET /{course_id} — sends the user to their entry activity for the
/// course, or to the course overview page for users who manage activities.
pub async fn redirect_to_entry(
    State(state): State<AppState>,
    Path(course_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Redirect, HttpError> {
    let course_id = CourseId(course_id);
    let token = session_token(&state.config, &headers).unwrap_or_default();
    let wants_url = format!("{}/{}", state.config.public_base_url, course_id);

    let session = match state
        .access
        .require_course_login(&token, course_id, &wants_url)
        .await
    {
        Ok(session) => session,
        Err(err) => return Err(AppError::from(err).into()),
    };

    let entry = entry_queries::resolve_entry(&state, &session, course_id).await?;
    let location = match entry {
        EntryRedirect::CourseOverview(course_id) => {
            course_overview_url(&state.config.www_root, course_id)
        }
        EntryRedirect::Activity(target) => activity_view_url(&state.config.www_root, &target),
    };
    Ok(Redirect::to(&location))
}

fn course_overview_url(www_root: &str, course_id: CourseId) -> String {
    format!("{}/course/view.php?id={}", www_root, course_id)
}

fn activity_view_url(www_root: &str, target: &RedirectTarget) -> String {
    format!(
        "{}/mod/{}/view.php?id={}",
        www_root, target.type_name, target.activity_id
    )
}
