#![recursion_limit = "256"]

mod config;
mod routes;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let overrides = config::ServerConfig::from_env().expect("invalid server configuration");
    let conf = leptos::prelude::get_configuration(None).expect("leptos configuration missing");
    let mut options = conf.leptos_options;
    overrides.apply(&mut options);
    let addr = options.site_addr;

    let app = routes::app(options);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "assistant studio listening");
    axum::serve(listener, app).await.expect("server failed");
}
