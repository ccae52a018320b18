use std::sync::Arc;

use tracing::{info, warn};

use super::city_service::city_not_found;
use super::{patched, validated, MailService, ServiceError};
use crate::api::dto::{PointOfInterestForCreationDto, PointOfInterestForUpdateDto};
use crate::auth::CallerIdentity;
use crate::database::models::{NewPointOfInterest, PointOfInterest};
use crate::database::CityInfoRepository;
use crate::patch::PatchOperation;

/// Points of interest are only visible to callers whose `city` claim names the parent city.
/// Ownership is checked before existence, so a foreign caller gets 403 even for unknown ids.
#[derive(Clone)]
pub struct PointOfInterestService {
    repository: Arc<dyn CityInfoRepository>,
    mail: Arc<dyn MailService>,
}

impl PointOfInterestService {
    pub fn new(repository: Arc<dyn CityInfoRepository>, mail: Arc<dyn MailService>) -> Self {
        Self { repository, mail }
    }

    /// Exact, case-sensitive match between the caller's city and the target city's name
    pub async fn authorize(&self, caller_city: Option<&str>, city_id: i64) -> Result<bool, ServiceError> {
        Ok(self.repository.city_name_matches_city_id(caller_city, city_id).await?)
    }

    async fn ensure_authorized(&self, caller: &CallerIdentity, city_id: i64) -> Result<(), ServiceError> {
        if !self.authorize(caller.city.as_deref(), city_id).await? {
            warn!("Caller {} denied access to points of interest of city {}", caller.subject, city_id);
            return Err(ServiceError::Forbidden(
                "You are not allowed to access points of interest of this city".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_city_exists(&self, city_id: i64) -> Result<(), ServiceError> {
        if !self.repository.city_exists(city_id).await? {
            info!("City with id {} wasn't found when accessing points of interest", city_id);
            return Err(city_not_found(city_id));
        }
        Ok(())
    }

    async fn find(&self, city_id: i64, point_of_interest_id: i64) -> Result<PointOfInterest, ServiceError> {
        self.ensure_city_exists(city_id).await?;
        self.repository
            .get_point_of_interest(city_id, point_of_interest_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Point of interest with id {} wasn't found in city {}",
                    point_of_interest_id, city_id
                ))
            })
    }

    pub async fn list(&self, caller: &CallerIdentity, city_id: i64) -> Result<Vec<PointOfInterest>, ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        self.ensure_city_exists(city_id).await?;
        Ok(self.repository.get_points_of_interest(city_id).await?)
    }

    pub async fn get(
        &self,
        caller: &CallerIdentity,
        city_id: i64,
        point_of_interest_id: i64,
    ) -> Result<PointOfInterest, ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        self.find(city_id, point_of_interest_id).await
    }

    pub async fn create(
        &self,
        caller: &CallerIdentity,
        city_id: i64,
        payload: PointOfInterestForCreationDto,
    ) -> Result<PointOfInterest, ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        self.ensure_city_exists(city_id).await?;
        let payload = validated(payload)?;

        let created = self
            .repository
            .add_point_of_interest(city_id, NewPointOfInterest::from(payload))
            .await?;
        info!("Created point of interest {} in city {}", created.id, city_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        caller: &CallerIdentity,
        city_id: i64,
        point_of_interest_id: i64,
        payload: PointOfInterestForUpdateDto,
    ) -> Result<(), ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        let mut point_of_interest = self.find(city_id, point_of_interest_id).await?;
        let payload = validated(payload)?;

        payload.apply_to(&mut point_of_interest);
        self.repository.save_point_of_interest(&point_of_interest).await?;
        Ok(())
    }

    pub async fn patch(
        &self,
        caller: &CallerIdentity,
        city_id: i64,
        point_of_interest_id: i64,
        operations: &[PatchOperation],
    ) -> Result<(), ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        let mut point_of_interest = self.find(city_id, point_of_interest_id).await?;
        let candidate = patched(&PointOfInterestForUpdateDto::from(&point_of_interest), operations)?;

        candidate.apply_to(&mut point_of_interest);
        self.repository.save_point_of_interest(&point_of_interest).await?;
        Ok(())
    }

    pub async fn delete(
        &self,
        caller: &CallerIdentity,
        city_id: i64,
        point_of_interest_id: i64,
    ) -> Result<(), ServiceError> {
        self.ensure_authorized(caller, city_id).await?;
        let point_of_interest = self.find(city_id, point_of_interest_id).await?;

        if !self.repository.delete_point_of_interest(&point_of_interest).await? {
            return Err(ServiceError::NotFound(format!(
                "Point of interest with id {} wasn't found in city {}",
                point_of_interest_id, city_id
            )));
        }

        self.mail.send(
            "Point of interest deleted.",
            &format!(
                "Point of interest {} with id {} was deleted.",
                point_of_interest.name, point_of_interest.id
            ),
        );
        Ok(())
    }
}
