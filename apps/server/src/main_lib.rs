use std::sync::Arc;

use recipesaver_core::{
    blobs::BlobStoreTrait,
    events::DomainEventSink,
    recipes::{RecipeService, RecipeServiceTrait},
    search::SessionSettings,
    users::UserRepositoryTrait,
};
use recipesaver_storage_sqlite::{
    db::{self, DbPool},
    RecipeRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{decode_secret_key, random_secret_key, AuthManager},
    blobs::FsBlobStore,
    config::Config,
    domain_events::WebDomainEventSink,
    events::EventBus,
    favorites::FavoriteToggles,
    search_sessions::SearchSessions,
};

/// Capacity of the SSE broadcast channel.
const EVENT_BUS_CAPACITY: usize = 256;

pub struct AppState {
    pub recipe_service: Arc<dyn RecipeServiceTrait>,
    pub user_repository: Arc<dyn UserRepositoryTrait>,
    pub blob_store: Arc<dyn BlobStoreTrait>,
    pub auth: Arc<AuthManager>,
    pub event_bus: EventBus,
    pub search_sessions: Arc<SearchSessions>,
    pub favorite_toggles: FavoriteToggles,
    pub db_pool: Arc<DbPool>,
    pub db_path: String,
    pub max_upload_bytes: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("RS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let jwt_secret = match config.jwt_secret.as_deref() {
        Some(raw) => decode_secret_key(raw)?,
        None => {
            tracing::warn!("RS_JWT_SECRET is not set; issued tokens will not survive a restart");
            random_secret_key()
        }
    };
    let auth = Arc::new(AuthManager::new(&jwt_secret, config.token_ttl));

    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
    let domain_event_sink: Arc<dyn DomainEventSink> =
        Arc::new(WebDomainEventSink::new(event_bus.clone()));

    let recipe_repository = Arc::new(RecipeRepository::new(pool.clone(), writer.clone()));
    let recipe_service: Arc<dyn RecipeServiceTrait> =
        Arc::new(RecipeService::new(recipe_repository, domain_event_sink));
    let user_repository: Arc<dyn UserRepositoryTrait> =
        Arc::new(UserRepository::new(pool.clone(), writer));

    let blob_store: Arc<dyn BlobStoreTrait> = Arc::new(FsBlobStore::new(
        config.upload_dir.clone(),
        config.public_base_url.clone(),
    )?);
    tracing::info!("Serving uploads from {}", config.upload_dir.display());

    let search_sessions = Arc::new(SearchSessions::new(
        recipe_service.clone(),
        SessionSettings {
            debounce: config.search_debounce,
        },
    ));

    Ok(Arc::new(AppState {
        recipe_service,
        user_repository,
        blob_store,
        auth,
        event_bus,
        search_sessions,
        favorite_toggles: FavoriteToggles::new(),
        db_pool: pool,
        db_path: config.db_path.clone(),
        max_upload_bytes: config.max_upload_bytes,
    }))
}
