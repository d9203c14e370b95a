use thiserror::Error;

/// Failures surfaced by the service layer around the weather core.
///
/// The core itself never fails; these cover request validation, saved places
/// and the provider boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Never shown to users: the facade falls back to synthetic data instead.
    #[error("Weather provider failed: {0:#}")]
    UpstreamProvider(#[source] anyhow::Error),

    #[error("Not authorized: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0:#}")]
    Server(#[source] anyhow::Error),
}

impl ServiceError {
    /// HTTP status the dashboard API answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::UpstreamProvider(_) => 502,
            ServiceError::Auth(_) => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::Server(_) => 500,
        }
    }
}
