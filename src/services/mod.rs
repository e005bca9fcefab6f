//! External service interactions
//!
//! - HTTP client for the table metadata backend
//! - Backend operations as data, with category-tagged failures
//! - Background execution of requests on worker threads

pub mod api;
pub mod operation;
pub mod request_runner;

pub use api::{ApiClient, ApiError, CallOptions, Endpoint, TableApi};
pub use operation::{ApiOutcome, ApiRequest, Operation, OperationError};
pub use request_runner::{Reply, RequestRunner, Ticket};
