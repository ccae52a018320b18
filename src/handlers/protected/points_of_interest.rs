// handlers/protected/points_of_interest.rs - /api/cities/:city_id/pointsofinterest[/:point_of_interest_id]
//
// Every handler runs the ownership check before looking anything up.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    http::header::LOCATION,
    Extension, Json,
};

use crate::api::dto::{PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto};
use crate::app::AppState;
use crate::auth::CallerIdentity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::patch::PatchOperation;

/// GET /api/cities/:city_id/pointsofinterest
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<PointOfInterestDto>> {
    let Path(city_id) = path?;
    let points_of_interest = state.points_of_interest.list(&caller, city_id).await?;
    Ok(ApiResponse::success(
        points_of_interest.iter().map(PointOfInterestDto::from).collect(),
    ))
}

/// GET /api/cities/:city_id/pointsofinterest/:point_of_interest_id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<PointOfInterestDto> {
    let Path((city_id, point_of_interest_id)) = path?;
    let point_of_interest = state.points_of_interest.get(&caller, city_id, point_of_interest_id).await?;
    Ok(ApiResponse::success(PointOfInterestDto::from(&point_of_interest)))
}

/// POST /api/cities/:city_id/pointsofinterest
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PointOfInterestForCreationDto>, JsonRejection>,
) -> ApiResult<PointOfInterestDto> {
    let Path(city_id) = path?;
    let Json(payload) = payload?;

    let created = state.points_of_interest.create(&caller, city_id, payload).await?;
    let location = format!("/api/cities/{}/pointsofinterest/{}", city_id, created.id);
    Ok(ApiResponse::created(PointOfInterestDto::from(&created)).with_header(LOCATION, &location))
}

/// PUT /api/cities/:city_id/pointsofinterest/:point_of_interest_id
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<PointOfInterestForUpdateDto>, JsonRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    let Json(payload) = payload?;
    state
        .points_of_interest
        .update(&caller, city_id, point_of_interest_id, payload)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// PATCH /api/cities/:city_id/pointsofinterest/:point_of_interest_id
pub async fn patch(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    let Json(operations) = payload?;
    state
        .points_of_interest
        .patch(&caller, city_id, point_of_interest_id, &operations)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/cities/:city_id/pointsofinterest/:point_of_interest_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    state
        .points_of_interest
        .delete(&caller, city_id, point_of_interest_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}
