// handlers/protected/cities.rs - /api/cities and /api/cities/:city_id

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::header::LOCATION,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::dto::{CityDto, CityForCreationDto, CityForUpdateDto, CityWithoutPointsOfInterestDto};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::PaginationMetadata;
use crate::patch::PatchOperation;
use crate::services::CityListQuery;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesQuery {
    pub name: Option<String>,
    pub search_query: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<CitiesQuery> for CityListQuery {
    fn from(query: CitiesQuery) -> Self {
        Self {
            name: query.name,
            search_query: query.search_query,
            page_number: query.page_number,
            page_size: query.page_size,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    /// Also accepted as the singular `includePointOfInterest`
    #[serde(default, alias = "includePointOfInterest")]
    pub include_points_of_interest: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CityRepresentation {
    WithPointsOfInterest(CityDto),
    WithoutPointsOfInterest(CityWithoutPointsOfInterestDto),
}

/// GET /api/cities - filtered, paged listing with `X-Pagination` metadata
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CitiesQuery>, QueryRejection>,
) -> ApiResult<Vec<CityWithoutPointsOfInterestDto>> {
    let Query(query) = query?;
    let (cities, metadata) = state.cities.list_cities(&CityListQuery::from(query)).await?;

    let pagination = serde_json::to_string(&metadata).map_err(|e| {
        tracing::error!("Failed to serialize pagination metadata: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;

    let dtos: Vec<CityWithoutPointsOfInterestDto> = cities.iter().map(CityWithoutPointsOfInterestDto::from).collect();
    Ok(ApiResponse::success(dtos).with_header(PaginationMetadata::HEADER, &pagination))
}

/// GET /api/cities/:city_id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> ApiResult<CityRepresentation> {
    let Path(city_id) = path?;
    let Query(query) = query?;

    let city = state.cities.get_city(city_id, query.include_points_of_interest).await?;
    let representation = if query.include_points_of_interest {
        CityRepresentation::WithPointsOfInterest(CityDto::from(&city))
    } else {
        CityRepresentation::WithoutPointsOfInterest(CityWithoutPointsOfInterestDto::from(&city))
    };
    Ok(ApiResponse::success(representation))
}

/// POST /api/cities
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CityForCreationDto>, JsonRejection>,
) -> ApiResult<CityWithoutPointsOfInterestDto> {
    let Json(payload) = payload?;
    let city = state.cities.create_city(payload).await?;

    let location = format!("/api/cities/{}", city.id);
    Ok(ApiResponse::created(CityWithoutPointsOfInterestDto::from(&city)).with_header(LOCATION, &location))
}

/// PUT /api/cities/:city_id
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CityForUpdateDto>, JsonRejection>,
) -> ApiResult<()> {
    let Path(city_id) = path?;
    let Json(payload) = payload?;
    state.cities.update_city(city_id, payload).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// PATCH /api/cities/:city_id
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> ApiResult<()> {
    let Path(city_id) = path?;
    let Json(operations) = payload?;
    state.cities.patch_city(city_id, &operations).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/cities/:city_id - also removes the city's points of interest
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(city_id) = path?;
    state.cities.delete_city(city_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
