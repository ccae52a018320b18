use async_trait::async_trait;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{City, NewCity, NewPointOfInterest, PointOfInterest};
use super::repository::{cities_query, CityInfoRepository};
use crate::filter::CityFilter;
use crate::pagination::PageRequest;

#[derive(Debug, Default)]
struct MemoryState {
    /// Cities own their points of interest
    cities: Vec<City>,
    last_city_id: i64,
    last_point_of_interest_id: i64,
}

impl MemoryState {
    fn city(&self, city_id: i64) -> Option<&City> {
        self.cities.iter().find(|c| c.id == city_id)
    }

    fn city_mut(&mut self, city_id: i64) -> Option<&mut City> {
        self.cities.iter_mut().find(|c| c.id == city_id)
    }
}

/// In-process store used for development and tests. Constructed once and shared
/// through the application state; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn without_children(city: &City) -> City {
    City {
        id: city.id,
        name: city.name.clone(),
        description: city.description.clone(),
        points_of_interest: vec![],
    }
}

#[async_trait]
impl CityInfoRepository for MemoryRepository {
    async fn count_cities(&self, filter: &CityFilter) -> Result<u64, DatabaseError> {
        let query = cities_query(filter, None)?;
        let state = self.state.read().await;
        Ok(query.count(&state.cities))
    }

    async fn list_cities(&self, filter: &CityFilter, page: PageRequest) -> Result<Vec<City>, DatabaseError> {
        let query = cities_query(filter, Some(page))?;
        let state = self.state.read().await;
        Ok(query.apply(&state.cities).into_iter().map(without_children).collect())
    }

    async fn get_city(&self, city_id: i64, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.city(city_id).map(|city| {
            if include_points_of_interest {
                city.clone()
            } else {
                without_children(city)
            }
        }))
    }

    async fn city_exists(&self, city_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.state.read().await.city(city_id).is_some())
    }

    async fn city_name_matches_city_id(&self, city_name: Option<&str>, city_id: i64) -> Result<bool, DatabaseError> {
        let Some(city_name) = city_name else { return Ok(false) };
        let state = self.state.read().await;
        Ok(state.city(city_id).is_some_and(|c| c.name == city_name))
    }

    async fn get_points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.city(city_id).map(|c| c.points_of_interest.clone()).unwrap_or_default())
    }

    async fn get_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest_id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .city(city_id)
            .and_then(|c| c.points_of_interest.iter().find(|p| p.id == point_of_interest_id))
            .cloned())
    }

    async fn create_city(&self, city: NewCity) -> Result<City, DatabaseError> {
        let mut state = self.state.write().await;
        state.last_city_id += 1;
        let created = City {
            id: state.last_city_id,
            name: city.name,
            description: city.description,
            points_of_interest: vec![],
        };
        state.cities.push(created.clone());
        Ok(created)
    }

    async fn save_city(&self, city: &City) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state
            .city_mut(city.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("city {}", city.id)))?;
        stored.name = city.name.clone();
        stored.description = city.description.clone();
        Ok(())
    }

    async fn delete_city(&self, city_id: i64) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.cities.len();
        state.cities.retain(|c| c.id != city_id);
        Ok(state.cities.len() < before)
    }

    async fn add_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, DatabaseError> {
        let mut state = self.state.write().await;
        let id = state.last_point_of_interest_id + 1;
        let city = state
            .city_mut(city_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("city {}", city_id)))?;
        let created = PointOfInterest {
            id,
            city_id,
            name: point_of_interest.name,
            description: point_of_interest.description,
        };
        city.points_of_interest.push(created.clone());
        state.last_point_of_interest_id = id;
        Ok(created)
    }

    async fn save_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state
            .city_mut(point_of_interest.city_id)
            .and_then(|c| c.points_of_interest.iter_mut().find(|p| p.id == point_of_interest.id))
            .ok_or_else(|| DatabaseError::NotFound(format!("point of interest {}", point_of_interest.id)))?;
        stored.name = point_of_interest.name.clone();
        stored.description = point_of_interest.description.clone();
        Ok(())
    }

    async fn delete_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(city) = state.city_mut(point_of_interest.city_id) else { return Ok(false) };
        let before = city.points_of_interest.len();
        city.points_of_interest.retain(|p| p.id != point_of_interest.id);
        Ok(city.points_of_interest.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_city(name: &str, description: Option<&str>) -> NewCity {
        NewCity { name: name.to_string(), description: description.map(str::to_string) }
    }

    fn new_poi(name: &str) -> NewPointOfInterest {
        NewPointOfInterest { name: name.to_string(), description: None }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = MemoryRepository::new();
        let a = repo.create_city(new_city("A", None)).await.unwrap();
        let b = repo.create_city(new_city("B", None)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let p1 = repo.add_point_of_interest(a.id, new_poi("x")).await.unwrap();
        let p2 = repo.add_point_of_interest(b.id, new_poi("y")).await.unwrap();
        assert_ne!(p1.id, p2.id);
    }

    #[tokio::test]
    async fn point_of_interest_lookup_uses_parent_and_child_ids() {
        let repo = MemoryRepository::new();
        let a = repo.create_city(new_city("A", None)).await.unwrap();
        let b = repo.create_city(new_city("B", None)).await.unwrap();
        let poi = repo.add_point_of_interest(a.id, new_poi("x")).await.unwrap();

        assert!(repo.get_point_of_interest(a.id, poi.id).await.unwrap().is_some());
        assert!(repo.get_point_of_interest(b.id, poi.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adding_to_missing_city_fails_without_consuming_an_id() {
        let repo = MemoryRepository::new();
        let err = repo.add_point_of_interest(42, new_poi("x")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));

        let city = repo.create_city(new_city("A", None)).await.unwrap();
        let poi = repo.add_point_of_interest(city.id, new_poi("x")).await.unwrap();
        assert_eq!(poi.id, 1);
    }

    #[tokio::test]
    async fn delete_city_removes_children() {
        let repo = MemoryRepository::new();
        let city = repo.create_city(new_city("A", None)).await.unwrap();
        let poi = repo.add_point_of_interest(city.id, new_poi("x")).await.unwrap();

        assert!(repo.delete_city(city.id).await.unwrap());
        assert!(!repo.delete_city(city.id).await.unwrap());
        assert!(repo.get_point_of_interest(city.id, poi.id).await.unwrap().is_none());
        assert!(repo.get_points_of_interest(city.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_strips_children_and_filters() {
        let repo = MemoryRepository::new();
        let paris = repo.create_city(new_city("Paris", Some("The one with the big tower."))).await.unwrap();
        repo.create_city(new_city("Antwerp", None)).await.unwrap();
        repo.add_point_of_interest(paris.id, new_poi("Eiffel Tower")).await.unwrap();

        let filter = CityFilter::new(None, Some("tower"));
        let page = PageRequest { page_number: 1, page_size: 10 };
        let cities = repo.list_cities(&filter, page).await.unwrap();

        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Paris");
        assert!(cities[0].points_of_interest.is_empty());
        assert_eq!(repo.count_cities(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn name_match_requires_exact_case() {
        let repo = MemoryRepository::new();
        let manila = repo.create_city(new_city("Manila", None)).await.unwrap();

        assert!(repo.city_name_matches_city_id(Some("Manila"), manila.id).await.unwrap());
        assert!(!repo.city_name_matches_city_id(Some("manila"), manila.id).await.unwrap());
        assert!(!repo.city_name_matches_city_id(Some(" Manila"), manila.id).await.unwrap());
        assert!(!repo.city_name_matches_city_id(None, manila.id).await.unwrap());
        assert!(!repo.city_name_matches_city_id(Some("Manila"), manila.id + 1).await.unwrap());
    }
}
