use std::time::Duration;

use axum::{middleware::from_fn, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::request_id::{self, MakeReqId};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Knobs for the shared HTTP middleware stack.
#[derive(Debug, Clone)]
pub struct HttpLayers {
    pub timeout: Duration,
    pub body_limit: usize,
    pub cors: bool,
}

impl Default for HttpLayers {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            body_limit: DEFAULT_BODY_LIMIT,
            cors: false,
        }
    }
}

impl HttpLayers {
    /// `timeout_sec == 0` keeps the default timeout.
    pub fn with_timeout_secs(mut self, timeout_sec: u64) -> Self {
        if timeout_sec > 0 {
            self.timeout = Duration::from_secs(timeout_sec);
        }
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Wraps `router` with the middleware stack.
    ///
    /// Layers are added innermost first, so the effective order for a request is:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
    /// -> Timeout -> CORS -> BodyLimit -> handler.
    pub fn apply(&self, router: Router) -> Router {
        let x_request_id = request_id::header();

        let mut router = router.layer(RequestBodyLimitLayer::new(self.body_limit));
        if self.cors {
            router = router.layer(CorsLayer::permissive());
        }
        router
            .layer(TimeoutLayer::new(self.timeout))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
    }
}
