use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mentor_match::config::{LoggingSettings, Settings};
use mentor_match::core::Matcher;
use mentor_match::models::ScoringWeights;
use mentor_match::routes::{self, AppState};
use mentor_match::services::{
    AppwriteClient, AppwriteCollections, CacheManager, CachedProfileStore, JwtVerifier,
    ProfileStore, RateLimiter,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Mentor Match service...");

    // Initialize Appwrite client
    let collections = AppwriteCollections {
        mentee_profiles: settings.collection.mentee_profiles.clone(),
        mentor_profiles: settings.collection.mentor_profiles.clone(),
        mentor_area_attribute: settings.collection.mentor_area_attribute.clone(),
    };

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        collections,
    )
    .map_err(|e| {
        error!("Failed to create Appwrite client: {}", e);
        std::io::Error::other(e.to_string())
    })?
    .with_page_size(settings.matching.page_size);

    info!("Appwrite client initialized");

    // Initialize cache manager (optional - the store works without it)
    let cache = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(300);
        let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

        let cache = match CacheManager::new(settings.cache.redis_url.as_deref(), l1_size, ttl).await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-memory cache only", e);
                CacheManager::in_memory(l1_size, ttl)
            }
        };

        info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
            l1_size, ttl, cache.stats().redis_enabled);
        Some(Arc::new(cache))
    } else {
        info!("Caching disabled");
        None
    };

    let store: Arc<dyn ProfileStore> = match &cache {
        Some(cache) => Arc::new(CachedProfileStore::new(appwrite, cache.clone())),
        None => Arc::new(appwrite),
    };

    // Initialize matcher with configured weights
    let weights = ScoringWeights::from(&settings.scoring.weights);
    let matcher = Matcher::new(weights, settings.matching.options());

    info!("Matcher initialized with weights: {:?}, options: {:?}", weights, matcher.options());

    let auth = Arc::new(JwtVerifier::from_settings(&settings.auth));
    let rate_limiter = Arc::new(RateLimiter::new(
        settings.rate_limit.max_requests,
        Duration::from_secs(settings.rate_limit.window_secs),
    ));

    info!(
        "Rate limiting at {} requests per {}s per caller",
        settings.rate_limit.max_requests, settings.rate_limit.window_secs
    );

    // Build application state
    let mut app_state = AppState::new(
        store,
        matcher,
        auth,
        rate_limiter,
        settings.matching.clone(),
    );
    if let Some(cache) = cache {
        app_state = app_state.with_cache(cache);
    }

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
