mod config;
mod db;
mod entities;
mod error;
mod mapper;
mod models;
mod movies;
mod names;
mod routes;
mod statistics;

use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, movies::MovieService, statistics::StatisticsService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: MovieService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,netmovies=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(config.database_url.as_str()).await?;
    let statistics = StatisticsService::new(db.clone());
    let movies = MovieService::new(db, statistics);

    let state = Arc::new(AppState { config: config.clone(), movies });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, per_page = config.movies_per_page, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
