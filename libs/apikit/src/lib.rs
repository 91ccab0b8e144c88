//! Shared HTTP plumbing: Problem Details, request ids, the middleware stack,
//! health endpoint and shutdown signal.

pub mod health;
pub mod middleware;
pub mod problem;
pub mod request_id;
pub mod shutdown;

pub use middleware::HttpLayers;
pub use problem::{
    ErrDef, Problem, ProblemContext, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON,
};
pub use request_id::XRequestId;
pub use shutdown::wait_for_shutdown;
