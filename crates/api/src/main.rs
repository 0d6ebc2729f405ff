use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bankledger_observability::init();

    let services = Arc::new(bankledger_api::app::services::build_services().await?);
    let app = bankledger_api::app::build_app(services);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
