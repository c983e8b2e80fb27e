use relay_dns_api::{create_api_routes, AppState};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::info;

pub async fn start_http_server(bind_addr: String, state: AppState) -> anyhow::Result<()> {
    let socket_addr = SocketAddr::from_str(&bind_addr)?;
    let app = create_api_routes(state);

    let listener = tokio::net::TcpListener::bind(socket_addr).await?;
    info!(bind_address = %socket_addr, "HTTP debug endpoint listening");

    axum::serve(listener, app).await?;
    Ok(())
}
