use tracing::error;

use crate::{AppError, AppState};
use bookmark_domain::services::resolver;
use bookmark_domain::{CourseId, CourseSession, RedirectTarget};

/// Where the handler should send the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRedirect {
    CourseOverview(CourseId),
    Activity(RedirectTarget),
}

/// Decides the entry point for an enrolled user opening a course. Users who
/// manage activities go straight to the course overview; everyone else gets
/// their most recently viewed activity, or the first eligible one.
pub async fn resolve_entry(
    state: &AppState,
    session: &CourseSession,
    course_id: CourseId,
) -> Result<EntryRedirect, AppError> {
    let manages = state
        .access
        .has_capability(&state.config.manage_capability, course_id, session.user_id)
        .await
        .map_err(|err| {
            error!("capability check failed for course {}: {}", course_id, err);
            AppError::Internal(err)
        })?;
    if manages {
        return Ok(EntryRedirect::CourseOverview(course_id));
    }

    let activities = state
        .catalog
        .course_activities(course_id)
        .await
        .map_err(|err| {
            error!("activity fetch failed for course {}: {}", course_id, err);
            AppError::Internal(err)
        })?;

    let recent = resolver::most_recent_activity(
        state.view_log.as_ref(),
        session.user_id,
        course_id,
        &activities,
    )
    .await
    .map_err(|err| {
        error!("entry resolution failed for course {}: {}", course_id, err);
        AppError::from(err)
    })?;

    recent
        .or_else(|| resolver::first_activity(&activities))
        .map(EntryRedirect::Activity)
        .ok_or(AppError::ActivityNotFound(course_id))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use bookmark_domain::ports::{AccessGate, CourseCatalog, ViewLogRepository};
    use bookmark_domain::{
        AccessError, ActivityId, ActivityRef, RuntimeConfig, UserId, ViewEventRow,
    };

    const USER: UserId = UserId(7);
    const COURSE: CourseId = CourseId(42);

    struct FakeAccessGate {
        manages: bool,
        capability_calls: AtomicUsize,
    }

    #[async_trait]
    impl AccessGate for FakeAccessGate {
        async fn require_course_login(
            &self,
            _session_token: &str,
            _course_id: CourseId,
            _wants_url: &str,
        ) -> Result<CourseSession, AccessError> {
            Ok(CourseSession { user_id: USER })
        }

        async fn has_capability(
            &self,
            _capability: &str,
            _course_id: CourseId,
            _user_id: UserId,
        ) -> anyhow::Result<bool> {
            self.capability_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.manages)
        }
    }

    struct FakeCatalog {
        activities: Vec<ActivityRef>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CourseCatalog for FakeCatalog {
        async fn course_activities(
            &self,
            _course_id: CourseId,
        ) -> anyhow::Result<Vec<ActivityRef>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.activities.clone())
        }
    }

    struct FakeViewLog {
        rows: Vec<ViewEventRow>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ViewLogRepository for FakeViewLog {
        async fn latest_module_view(
            &self,
            _user_id: UserId,
            _course_id: CourseId,
            activity_ids: &[ActivityId],
        ) -> anyhow::Result<Vec<ViewEventRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|row| activity_ids.contains(&row.activity_id))
                .take(1)
                .cloned()
                .collect())
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn activity(id: u64, type_name: &str) -> ActivityRef {
        ActivityRef {
            id: ActivityId(id),
            type_name: type_name.to_string(),
            visible: true,
            available: true,
        }
    }

    fn test_config() -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:3240".to_string(),
            www_root: "http://lms.example".to_string(),
            platform_base_url: "http://lms.example/local/api".to_string(),
            platform_api_token: None,
            public_base_url: "http://bookmark.example".to_string(),
            session_cookie_name: "PlatformSession".to_string(),
            manage_capability: "course:manageactivities".to_string(),
            request_timeout_seconds: 15,
        }
    }

    struct Fixture {
        state: AppState,
        access: Arc<FakeAccessGate>,
        catalog: Arc<FakeCatalog>,
        view_log: Arc<FakeViewLog>,
    }

    fn fixture(manages: bool, activities: Vec<ActivityRef>, rows: Vec<ViewEventRow>) -> Fixture {
        let access = Arc::new(FakeAccessGate {
            manages,
            capability_calls: AtomicUsize::new(0),
        });
        let catalog = Arc::new(FakeCatalog {
            activities,
            calls: AtomicUsize::new(0),
        });
        let view_log = Arc::new(FakeViewLog {
            rows,
            calls: AtomicUsize::new(0),
        });
        let state = AppState {
            config: test_config(),
            view_log: view_log.clone(),
            catalog: catalog.clone(),
            access: access.clone(),
        };
        Fixture {
            state,
            access,
            catalog,
            view_log,
        }
    }

    fn session() -> CourseSession {
        CourseSession { user_id: USER }
    }

    #[tokio::test]
    async fn managing_user_goes_to_course_overview_without_resolving() {
        let fx = fixture(true, vec![activity(10, "quiz")], Vec::new());
        let entry = resolve_entry(&fx.state, &session(), COURSE)
            .await
            .expect("resolve entry");
        assert_eq!(entry, EntryRedirect::CourseOverview(COURSE));
        assert_eq!(fx.catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.view_log.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.access.capability_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recent_view_wins_over_first_activity() {
        let rows = vec![ViewEventRow {
            activity_id: ActivityId(11),
            event_id: 1,
            time_viewed: 1000,
        }];
        let fx = fixture(false, vec![activity(10, "quiz"), activity(11, "forum")], rows);
        let entry = resolve_entry(&fx.state, &session(), COURSE)
            .await
            .expect("resolve entry");
        assert_eq!(
            entry,
            EntryRedirect::Activity(RedirectTarget {
                type_name: "forum".to_string(),
                activity_id: ActivityId(11),
            })
        );
    }

    #[tokio::test]
    async fn empty_log_falls_back_to_first_activity() {
        let fx = fixture(
            false,
            vec![activity(10, "quiz"), activity(11, "forum")],
            Vec::new(),
        );
        let entry = resolve_entry(&fx.state, &session(), COURSE)
            .await
            .expect("resolve entry");
        assert_eq!(
            entry,
            EntryRedirect::Activity(RedirectTarget {
                type_name: "quiz".to_string(),
                activity_id: ActivityId(10),
            })
        );
        // One catalog fetch feeds both resolver paths.
        assert_eq!(fx.catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn course_without_activities_is_not_found() {
        let fx = fixture(false, Vec::new(), Vec::new());
        let err = resolve_entry(&fx.state, &session(), COURSE)
            .await
            .expect_err("no activity to land on");
        match err {
            AppError::ActivityNotFound(course_id) => assert_eq!(course_id, COURSE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_internal_error() {
        struct FailingViewLog;

        #[async_trait]
        impl ViewLogRepository for FailingViewLog {
            async fn latest_module_view(
                &self,
                _user_id: UserId,
                _course_id: CourseId,
                _activity_ids: &[ActivityId],
            ) -> anyhow::Result<Vec<ViewEventRow>> {
                Err(anyhow::anyhow!("connection refused"))
            }

            async fn ping(&self) -> anyhow::Result<()> {
                Err(anyhow::anyhow!("connection refused"))
            }
        }

        let fx = fixture(false, vec![activity(10, "quiz")], Vec::new());
        let state = AppState {
            view_log: Arc::new(FailingViewLog),
            ..fx.state
        };
        let err = resolve_entry(&state, &session(), COURSE)
            .await
            .expect_err("store failure must not become a 404");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
