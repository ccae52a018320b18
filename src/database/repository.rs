use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::city::CITIES_TABLE;
use super::models::{City, NewCity, NewPointOfInterest, PointOfInterest};
use crate::filter::{CityFilter, Filter, FilterError, FilterOrderInfo};
use crate::pagination::PageRequest;

/// Persistence capability behind the cities API.
///
/// Every mutating method is a save boundary: when it returns `Ok` the change is
/// committed, when it returns `Err` nothing was written.
#[async_trait]
pub trait CityInfoRepository: Send + Sync {
    /// Number of cities matching the filter, ignoring paging
    async fn count_cities(&self, filter: &CityFilter) -> Result<u64, DatabaseError>;

    /// One page of matching cities ordered by name, without points of interest
    async fn list_cities(&self, filter: &CityFilter, page: PageRequest) -> Result<Vec<City>, DatabaseError>;

    async fn get_city(&self, city_id: i64, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError>;

    async fn city_exists(&self, city_id: i64) -> Result<bool, DatabaseError>;

    /// True when the city exists and its stored name equals `city_name` exactly
    async fn city_name_matches_city_id(&self, city_name: Option<&str>, city_id: i64) -> Result<bool, DatabaseError>;

    /// Points of interest of a city in insertion order
    async fn get_points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError>;

    async fn get_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest_id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError>;

    async fn create_city(&self, city: NewCity) -> Result<City, DatabaseError>;

    /// Write back name and description. `NotFound` when the city vanished meanwhile.
    async fn save_city(&self, city: &City) -> Result<(), DatabaseError>;

    /// Delete a city together with its points of interest
    async fn delete_city(&self, city_id: i64) -> Result<bool, DatabaseError>;

    /// `NotFound` when the city does not exist
    async fn add_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, DatabaseError>;

    async fn save_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<(), DatabaseError>;

    async fn delete_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<bool, DatabaseError>;

    /// Cheap probe used by the health endpoint
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// Builds the cities listing query: filter predicates, name ordering and optional paging.
/// Count and page queries are built from the same filter so they always agree.
pub fn cities_query(filter: &CityFilter, page: Option<PageRequest>) -> Result<Filter, FilterError> {
    let mut query = Filter::new(CITIES_TABLE)?;
    query
        .select(vec!["id".to_string(), "name".to_string(), "description".to_string()])?
        .where_clause(filter.condition())?
        .order(vec![FilterOrderInfo::asc("name"), FilterOrderInfo::asc("id")])?;
    if let Some(page) = page {
        query.limit(page.limit(), Some(page.offset()));
    }
    Ok(query)
}
