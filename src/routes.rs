//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app has no API: every page is rendered by Leptos and all data lives in
//! the browser. The server only renders routes, serves the WASM bundle under
//! `/pkg` and answers health checks.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Leptos SSR routes plus static assets.
pub fn app(leptos_options: LeptosOptions) -> Router {
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    Router::new()
        .route("/healthz", get(healthz))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(pkg_dir(&leptos_options)))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Directory holding the compiled WASM, JS and CSS.
fn pkg_dir(options: &LeptosOptions) -> PathBuf {
    PathBuf::from(options.site_root.as_ref()).join(options.site_pkg_dir.as_ref())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
