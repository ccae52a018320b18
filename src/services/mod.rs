pub mod city_service;
pub mod error;
pub mod mail_service;
pub mod point_of_interest_service;

pub use city_service::{CityListQuery, CityService};
pub use error::ServiceError;
pub use mail_service::{LocalMailService, MailService};
pub use point_of_interest_service::PointOfInterestService;

use tracing::warn;

use crate::api::Validate;
use crate::patch::{apply_patch, PatchOperation, Patchable};

/// Reject a payload that fails field validation
pub(crate) fn validated<P: Validate>(payload: P) -> Result<P, ServiceError> {
    payload.validate().map_err(|field_errors| {
        warn!("Payload failed validation on fields {:?}", field_errors.keys().collect::<Vec<_>>());
        ServiceError::validation_failed(field_errors)
    })?;
    Ok(payload)
}

/// Apply a patch document to an update projection and validate the outcome.
/// Nothing is persisted here; the caller copies the result onto the entity.
pub(crate) fn patched<P>(current: &P, operations: &[PatchOperation]) -> Result<P, ServiceError>
where
    P: Patchable + Validate,
{
    let candidate = apply_patch(current, operations).map_err(|e| {
        warn!("Rejected patch document: {}", e);
        ServiceError::from(e)
    })?;
    validated(candidate)
}
