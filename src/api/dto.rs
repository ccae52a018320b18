use serde::{Deserialize, Serialize};

use super::validation::{null_as_empty, validate_name_and_description, FieldErrors, Validate};
use crate::database::models::{City, NewCity, NewPointOfInterest, PointOfInterest};
use crate::patch::Patchable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityForCreationDto {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Client-editable view of a city; the surface PUT and PATCH operate on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityForUpdateDto {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Client-editable view of a point of interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&City> for CityWithoutPointsOfInterestDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }
}

impl From<&City> for CityDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
            number_of_points_of_interest: city.points_of_interest.len(),
            points_of_interest: city.points_of_interest.iter().map(PointOfInterestDto::from).collect(),
        }
    }
}

impl From<&PointOfInterest> for PointOfInterestDto {
    fn from(point_of_interest: &PointOfInterest) -> Self {
        Self {
            id: point_of_interest.id,
            name: point_of_interest.name.clone(),
            description: point_of_interest.description.clone(),
        }
    }
}

impl From<CityForCreationDto> for NewCity {
    fn from(dto: CityForCreationDto) -> Self {
        Self { name: dto.name, description: dto.description }
    }
}

impl From<PointOfInterestForCreationDto> for NewPointOfInterest {
    fn from(dto: PointOfInterestForCreationDto) -> Self {
        Self { name: dto.name, description: dto.description }
    }
}

impl From<&City> for CityForUpdateDto {
    fn from(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }
}

impl CityForUpdateDto {
    /// Copy the projection's fields onto the stored entity
    pub fn apply_to(self, city: &mut City) {
        city.name = self.name;
        city.description = self.description;
    }
}

impl From<&PointOfInterest> for PointOfInterestForUpdateDto {
    fn from(point_of_interest: &PointOfInterest) -> Self {
        Self {
            name: point_of_interest.name.clone(),
            description: point_of_interest.description.clone(),
        }
    }
}

impl PointOfInterestForUpdateDto {
    pub fn apply_to(self, point_of_interest: &mut PointOfInterest) {
        point_of_interest.name = self.name;
        point_of_interest.description = self.description;
    }
}

impl Patchable for CityForUpdateDto {
    const FIELDS: &'static [&'static str] = &["name", "description"];
}

impl Patchable for PointOfInterestForUpdateDto {
    const FIELDS: &'static [&'static str] = &["name", "description"];
}

impl Validate for CityForCreationDto {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name_and_description(&self.name, self.description.as_deref())
    }
}

impl Validate for CityForUpdateDto {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name_and_description(&self.name, self.description.as_deref())
    }
}

impl Validate for PointOfInterestForCreationDto {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name_and_description(&self.name, self.description.as_deref())
    }
}

impl Validate for PointOfInterestForUpdateDto {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_name_and_description(&self.name, self.description.as_deref())
    }
}
