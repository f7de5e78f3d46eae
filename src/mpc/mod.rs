//! Minor Planet Center collaborators
//!
//! The tracker only sees the two traits below; `identifier` and
//! `observations` hold the HTTP implementations against the public MPC API.

pub mod identifier;
pub mod observations;

use crate::brightness::ObservationSample;
use crate::catalog::LookupResult;
use async_trait::async_trait;

pub use identifier::MpcIdentifierClient;
pub use observations::MpcObservationsClient;

#[derive(Debug)]
pub enum MpcError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(String),
}

impl From<reqwest::Error> for MpcError {
    fn from(err: reqwest::Error) -> Self {
        MpcError::Http(err)
    }
}

impl std::fmt::Display for MpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MpcError::Http(e) => write!(f, "HTTP error: {}", e),
            MpcError::Status(s) => write!(f, "MPC API error: {}", s),
            MpcError::Decode(e) => write!(f, "Unexpected MPC response: {}", e),
        }
    }
}

impl std::error::Error for MpcError {}

/// Batch designation lookup
#[async_trait]
pub trait IdentifierLookup: Send + Sync {
    /// Resolve every designation in one request
    ///
    /// Designations missing from the response come back as not found.
    async fn lookup(&self, designations: &[String]) -> Result<Vec<LookupResult>, MpcError>;
}

/// Per-object observation history
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn observations(&self, designation: &str) -> Result<Vec<ObservationSample>, MpcError>;
}

pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, MpcError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
