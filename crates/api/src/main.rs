use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use estoque_api::app::{self, services::AppServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    estoque_observability::init();

    let services = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new().max_connections(8).connect(&url).await?;
            Arc::new(AppServices::postgres(pool).await?)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using volatile in-memory stores");
            Arc::new(AppServices::memory())
        }
    };

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
