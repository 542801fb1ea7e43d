#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::cache::MokaListCache;
#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

#[cfg(feature = "server")]
pub mod cache;
pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role a bearer token must carry to use the API.
pub const SERVICE_ACCESS_ROLE: &str = "support";

/// Shared state handed to every worker.
#[cfg(feature = "server")]
#[derive(Clone)]
pub struct AppState {
    pub repo: DieselRepository,
    pub cache: web::Data<MokaListCache>,
    pub config: ServerConfig,
}

#[cfg(feature = "server")]
impl AppState {
    pub fn new(repo: DieselRepository, config: ServerConfig) -> Self {
        let cache = MokaListCache::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_capacity,
        );
        Self {
            repo,
            cache: web::Data::new(cache),
            config,
        }
    }

    /// Registers app data, extractor settings and routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.repo.clone()))
            .app_data(self.cache.clone())
            .app_data(web::Data::new(self.config.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .configure(routes::configure);
    }
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let state = AppState::new(DieselRepository::new(pool), server_config.clone());
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(bind_address)?
    .run()
    .await
}
