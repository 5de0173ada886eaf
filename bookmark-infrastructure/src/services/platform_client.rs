use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;

use bookmark_domain::ports::{AccessGate, CourseCatalog};
use bookmark_domain::{
    AccessError, ActivityId, ActivityRef, CourseId, CourseSession, UserId,
};

/// Client for the host platform's local API: session/enrollment checks,
/// capability checks and the course outline.
pub struct PlatformClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequireLoginReply {
    user_id: u64,
}

#[derive(Debug, Deserialize)]
struct NotLoggedInReply {
    login_url: String,
}

#[derive(Debug, Deserialize)]
struct CapabilityReply {
    granted: bool,
}

#[derive(Debug, Deserialize)]
struct ActivityDto {
    id: u64,
    #[serde(rename = "modname")]
    type_name: String,
    visible: bool,
    available: bool,
}

impl PlatformClient {
    pub fn new(base_url: String, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl AccessGate for PlatformClient {
    async fn require_course_login(
        &self,
        session_token: &str,
        course_id: CourseId,
        wants_url: &str,
    ) -> Result<CourseSession, AccessError> {
        let request = self
            .http
            .post(self.url("/session/require-course-login"))
            .json(&json!({
                "session": session_token,
                "courseid": course_id.0,
                "wantsurl": wants_url,
            }));
        let response = self
            .with_token(request)
            .send()
            .await
            .map_err(|err| AccessError::Transport(err.into()))?;
        match response.status() {
            StatusCode::OK => {
                let reply: RequireLoginReply = response
                    .json()
                    .await
                    .map_err(|err| AccessError::Transport(err.into()))?;
                Ok(CourseSession {
                    user_id: UserId(reply.user_id),
                })
            }
            StatusCode::NOT_FOUND => Err(AccessError::CourseMissing(course_id)),
            StatusCode::UNAUTHORIZED => {
                let reply: NotLoggedInReply = response
                    .json()
                    .await
                    .map_err(|err| AccessError::Transport(err.into()))?;
                Err(AccessError::NotLoggedIn {
                    login_url: reply.login_url,
                })
            }
            StatusCode::FORBIDDEN => Err(AccessError::Denied(course_id)),
            status => Err(AccessError::Transport(anyhow!(
                "require-course-login returned {}",
                status
            ))),
        }
    }

    async fn has_capability(
        &self,
        capability: &str,
        course_id: CourseId,
        user_id: UserId,
    ) -> Result<bool> {
        let request = self
            .http
            .get(self.url(&format!("/courses/{}/capability", course_id.0)))
            .query(&[
                ("capability", capability.to_string()),
                ("userid", user_id.0.to_string()),
            ]);
        let response = self.with_token(request).send().await?.error_for_status()?;
        let reply: CapabilityReply = response.json().await?;
        Ok(reply.granted)
    }
}

#[async_trait]
impl CourseCatalog for PlatformClient {
    async fn course_activities(&self, course_id: CourseId) -> Result<Vec<ActivityRef>> {
        let request = self
            .http
            .get(self.url(&format!("/courses/{}/activities", course_id.0)));
        let response = self.with_token(request).send().await?.error_for_status()?;
        let rows: Vec<ActivityDto> = response.json().await?;
        Ok(rows
            .into_iter()
            .map(|dto| ActivityRef {
                id: ActivityId(dto.id),
                type_name: dto.type_name,
                visible: dto.visible,
                available: dto.available,
            })
            .collect())
    }
}
