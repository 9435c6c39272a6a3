use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    larder_observability::init();

    let config = larder_api::config::AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let app = larder_api::app::build_app(&config).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("failed to bind {bind_addr}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
