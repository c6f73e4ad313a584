//! HTTP handler modules for the program API.
//!
//! Each sub-module implements thin handlers that parse requests, delegate to
//! [`ProgramService`] on the blocking pool, and return JSON responses.
//! No business logic lives in handlers.

use std::sync::Arc;

use crate::error::{ApiError, ServiceError};
use crate::service::ProgramService;

pub mod health;
pub mod programs;

/// Runs a service call on the blocking pool and maps its error with the
/// endpoint's fixed failure message.
pub(crate) async fn run_service<T, F>(
    service: Arc<ProgramService>,
    failure: &'static str,
    call: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&ProgramService) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&service)).await {
        Ok(result) => result.map_err(|err| ApiError::from_service(err, failure)),
        Err(join_err) => {
            tracing::error!(error = %join_err, "{failure}");
            Err(ApiError::Internal(failure))
        }
    }
}
