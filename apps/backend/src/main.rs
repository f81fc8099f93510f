use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use time::Duration;
use tracing::{error, info};
use veto_backend::config::app::AppConfig;
use veto_backend::config::db::{db_kind_from_env, DbProfile};
use veto_backend::directory::{Directory, HttpDirectory};
use veto_backend::infra::state::build_state;
use veto_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use veto_backend::realtime::RedisSink;
use veto_backend::routes;
use veto_backend::AppError;

mod telemetry;

async fn build_app_state(config: &AppConfig) -> Result<veto_backend::AppState, AppError> {
    let mut builder = build_state()
        .with_db(db_kind_from_env()?, DbProfile::Prod)
        .with_stale_after(Duration::hours(config.stale_after_hours));

    match &config.directory_base_url {
        Some(url) => {
            let client = HttpDirectory::new(url)?;
            builder = builder.with_directory(Directory::http(client));
            info!(directory = %url, "using HTTP tournament directory");
        }
        None => info!("DIRECTORY_BASE_URL not set; using in-memory directory"),
    }

    match &config.redis_url {
        Some(url) => {
            builder = builder.with_events(Arc::new(RedisSink::connect(url).await?));
            info!("publishing veto events to Redis");
        }
        None => info!("REDIS_URL not set; veto events stay in-process"),
    }

    builder.build().await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables are provided by the runtime (compose env_file,
    // or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_app_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, "starting veto backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
