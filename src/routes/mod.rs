// Route exports
pub mod error;
pub mod matches;
pub mod profiles;

use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::HealthResponse;
use crate::services::{
    bearer_token, AuthVerifier, CacheManager, Caller, MatchingService, ProfileStore, RateLimiter,
};

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub matching: Arc<MatchingService>,
    pub auth: Arc<dyn AuthVerifier>,
    pub rate_limiter: Arc<RateLimiter>,
    pub matching_settings: MatchingSettings,
    pub cache: Option<Arc<CacheManager>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        matcher: Matcher,
        auth: Arc<dyn AuthVerifier>,
        rate_limiter: Arc<RateLimiter>,
        matching_settings: MatchingSettings,
    ) -> Self {
        Self {
            matching: Arc::new(MatchingService::new(store.clone(), matcher)),
            store,
            auth,
            rate_limiter,
            matching_settings,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<CacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Authenticate the caller and charge the request to its rate limit
pub(crate) fn authorize(state: &AppState, req: &HttpRequest) -> Result<Caller, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let caller = state.auth.verify(bearer_token(header)?)?;

    if let Err(limited) = state.rate_limiter.check(&caller.user_id) {
        tracing::warn!("Rate limited caller {}: {}", caller.user_id, limited);
        return Err(limited.into());
    }

    Ok(caller)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(health_check))
                .configure(matches::configure)
                .configure(profiles::configure),
        );
}
