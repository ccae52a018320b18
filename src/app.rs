use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::CityInfoRepository;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::services::{CityService, LocalMailService, MailService, PointOfInterestService};

/// Shared request state, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn CityInfoRepository>,
    pub cities: CityService,
    pub points_of_interest: PointOfInterestService,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn CityInfoRepository>) -> Self {
        let mail: Arc<dyn MailService> = Arc::new(LocalMailService::new(&config.mail));
        Self::with_mail_service(config, repository, mail)
    }

    pub fn with_mail_service(
        config: AppConfig,
        repository: Arc<dyn CityInfoRepository>,
        mail: Arc<dyn MailService>,
    ) -> Self {
        let cities = CityService::new(repository.clone(), config.pagination.clone());
        let points_of_interest = PointOfInterestService::new(repository.clone(), mail);
        Self {
            config: Arc::new(config),
            repository,
            cities,
            points_of_interest,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Public
        .route("/", get(handlers::public::health::root))
        .route("/health", get(handlers::public::health::health))
        .merge(auth_public_routes())
        // Protected
        .merge(city_routes(state.clone()))
        // Global middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new().route("/api/authentication/authenticate", post(auth::authenticate_post))
}

fn city_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{cities, points_of_interest};

    Router::new()
        .route("/api/cities", get(cities::list).post(cities::create))
        .route(
            "/api/cities/:city_id",
            get(cities::get)
                .put(cities::update)
                .patch(cities::patch)
                .delete(cities::delete),
        )
        .route(
            "/api/cities/:city_id/pointsofinterest",
            get(points_of_interest::list).post(points_of_interest::create),
        )
        .route(
            "/api/cities/:city_id/pointsofinterest/:point_of_interest_id",
            get(points_of_interest::get)
                .put(points_of_interest::update)
                .patch(points_of_interest::patch)
                .delete(points_of_interest::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
