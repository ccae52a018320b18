use std::sync::Arc;

use tracing::{debug, info};

use super::{patched, validated, ServiceError};
use crate::api::dto::{CityForCreationDto, CityForUpdateDto};
use crate::config::PaginationConfig;
use crate::database::models::{City, NewCity};
use crate::database::CityInfoRepository;
use crate::filter::CityFilter;
use crate::pagination::{PageRequest, PaginationMetadata};
use crate::patch::PatchOperation;

/// Raw listing parameters as received from the client
#[derive(Debug, Clone, Default)]
pub struct CityListQuery {
    pub name: Option<String>,
    pub search_query: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Clone)]
pub struct CityService {
    repository: Arc<dyn CityInfoRepository>,
    pagination: PaginationConfig,
}

impl CityService {
    pub fn new(repository: Arc<dyn CityInfoRepository>, pagination: PaginationConfig) -> Self {
        Self { repository, pagination }
    }

    /// One page of cities plus the metadata describing the whole result set
    pub async fn list_cities(&self, query: &CityListQuery) -> Result<(Vec<City>, PaginationMetadata), ServiceError> {
        let filter = CityFilter::new(query.name.as_deref(), query.search_query.as_deref());
        let page = PageRequest::clamped(
            query.page_number,
            query.page_size,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        );

        let total = self.repository.count_cities(&filter).await?;
        let cities = self.repository.list_cities(&filter, page).await?;
        debug!("Listed {} of {} cities on page {}", cities.len(), total, page.page_number);

        Ok((cities, PaginationMetadata::new(total, page.page_size, page.page_number)))
    }

    pub async fn get_city(&self, city_id: i64, include_points_of_interest: bool) -> Result<City, ServiceError> {
        self.repository
            .get_city(city_id, include_points_of_interest)
            .await?
            .ok_or_else(|| city_not_found(city_id))
    }

    pub async fn create_city(&self, payload: CityForCreationDto) -> Result<City, ServiceError> {
        let payload = validated(payload)?;
        let city = self.repository.create_city(NewCity::from(payload)).await?;
        info!("Created city {}", city.id);
        Ok(city)
    }

    /// Full replacement of the client-editable fields
    pub async fn update_city(&self, city_id: i64, payload: CityForUpdateDto) -> Result<(), ServiceError> {
        let mut city = self.get_city(city_id, false).await?;
        let payload = validated(payload)?;
        payload.apply_to(&mut city);
        self.repository.save_city(&city).await?;
        Ok(())
    }

    pub async fn patch_city(&self, city_id: i64, operations: &[PatchOperation]) -> Result<(), ServiceError> {
        let mut city = self.get_city(city_id, false).await?;
        let candidate = patched(&CityForUpdateDto::from(&city), operations)?;
        candidate.apply_to(&mut city);
        self.repository.save_city(&city).await?;
        Ok(())
    }

    /// Removes the city and every point of interest it owns
    pub async fn delete_city(&self, city_id: i64) -> Result<(), ServiceError> {
        if !self.repository.delete_city(city_id).await? {
            return Err(city_not_found(city_id));
        }
        info!("Deleted city {}", city_id);
        Ok(())
    }
}

pub(crate) fn city_not_found(city_id: i64) -> ServiceError {
    ServiceError::NotFound(format!("City with id {} wasn't found", city_id))
}
