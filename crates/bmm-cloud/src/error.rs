//! Cloud provider error types.

use thiserror::Error;
use uuid::Uuid;

use bmm_core::ProviderIdError;

/// Errors surfaced by the instance lifecycle operations.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("node {0} has no provider ID")]
    MissingProviderId(String),

    #[error("failed to parse provider ID: {0}")]
    ProviderId(#[from] ProviderIdError),

    #[error("failed to get instance {instance_id}: {reason}")]
    LookupFailed { instance_id: Uuid, reason: String },

    #[error("instance {0} not found")]
    LookupNotFound(Uuid),

    #[error("failed to get instance {instance_id}, status {status}")]
    LookupUnexpectedStatus { instance_id: Uuid, status: u16 },
}

pub type CloudResult<T> = Result<T, CloudError>;
