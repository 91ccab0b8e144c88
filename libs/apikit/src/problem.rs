use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// The request path this occurrence happened on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    /// Stable machine-readable error code.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Field-level details for 4xx problems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON Pointer to the invalid location (e.g., "/inventory_id").
    pub pointer: String,
}

impl ValidationError {
    pub fn new(pointer: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            pointer: pointer.into(),
        }
    }
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            request_id: None,
            errors: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ValidationError>) -> Self {
        if !errors.is_empty() {
            self.errors = Some(errors);
        }
        self
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = (status, axum::Json(self.0)).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Static entry of an error catalog: everything about an error except the
/// occurrence-specific detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            self.title,
            detail,
        )
        .with_code(self.code)
        .with_type(self.type_url)
    }
}

/// Per-request data every problem carries: the request path and the
/// request id assigned by the middleware stack.
#[derive(Debug, Clone, Default)]
pub struct ProblemContext {
    pub instance: String,
    pub request_id: Option<String>,
}

impl ProblemContext {
    pub fn respond(&self, problem: Problem) -> ProblemResponse {
        let problem = problem.with_instance(self.instance.clone());
        match &self.request_id {
            Some(id) => problem.with_request_id(id.clone()).into(),
            None => problem.into(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ProblemContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            instance: parts.uri.path().to_owned(),
            request_id: parts
                .extensions
                .get::<crate::request_id::XRequestId>()
                .map(|r| r.0.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let p = Problem::new(StatusCode::CONFLICT, "Conflict", "already returned");
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn problem_builder_pattern() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "missing fields")
            .with_code("rentals.request.validation.v1")
            .with_instance("/api/v1/rentals")
            .with_request_id("req-456")
            .with_errors(vec![ValidationError::new("/staff_id", "is required")]);

        assert_eq!(p.status, 400);
        assert_eq!(p.instance, "/api/v1/rentals");
        assert_eq!(p.request_id.as_deref(), Some("req-456"));
        assert_eq!(p.errors.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_optional_members_are_omitted() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not Found", "gone").with_errors(vec![]);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert!(v.get("instance").is_none());
        assert!(v.get("request_id").is_none());
        assert!(v.get("errors").is_none());
    }

    #[test]
    fn context_stamps_instance_and_request_id() {
        let ctx = ProblemContext {
            instance: "/api/v1/rentals/7/return".into(),
            request_id: Some("rid-1".into()),
        };
        let resp = ctx.respond(Problem::new(StatusCode::CONFLICT, "Conflict", "x"));
        assert_eq!(resp.0.instance, "/api/v1/rentals/7/return");
        assert_eq!(resp.0.request_id.as_deref(), Some("rid-1"));

        let bare = ProblemContext::default().respond(Problem::new(StatusCode::CONFLICT, "C", "x"));
        assert!(bare.0.request_id.is_none());
    }

    #[test]
    fn err_def_to_problem() {
        let def = ErrDef {
            status: 503,
            title: "Service Unavailable",
            code: "test.storage.unavailable.v1",
            type_url: "https://errors.example.com/test.storage.unavailable.v1",
        };
        let p = def.to_problem("pool timed out");
        assert_eq!(p.status, 503);
        assert_eq!(p.title, "Service Unavailable");
        assert_eq!(p.detail, "pool timed out");
        assert_eq!(p.code, def.code);
        assert_eq!(p.type_url, def.type_url);
    }
}
