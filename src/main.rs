use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod calculation;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod store;
mod utils;

use calculation::ContributionService;
use config::Config;
use db::{init_db, run_migrations};
use routes::RateLimits;
use store::MySqlStore;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Contribution service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // refuse to start rather than run against a missing database
    let config = Config::from_env().context("Invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    if config.run_migrations {
        run_migrations(&pool).await.context("Failed to migrate database")?;
    }

    let service = Data::new(ContributionService::new(
        Arc::new(MySqlStore::new(pool)),
        config.default_selection(),
    ));
    let limits = Arc::new(RateLimits::from_config(&config).context("Invalid rate limits")?);

    info!(
        addr = %config.server_addr,
        default_city = %config.default_city,
        default_year = ?config.default_city_year,
        "Listening"
    );

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let config = config.clone();
        let limits = limits.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(move |cfg| routes::configure(cfg, &config, &limits))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
