//! HTTP server
//!
//! Provides the Mojang-compatible relay routes, the texture routes and the
//! unified `/{identifier}` texture lookup.

use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::middleware::{request_deadline, response_cache};
use crate::routes;
use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Only relayed documents and textures go through the response cache
    let relay = Router::new()
        .route(
            "/session/minecraft/profile/{uuid}",
            get(routes::session::profile),
        )
        .route(
            "/api/profiles/minecraft",
            post(routes::api::profiles_by_names).fallback(routes::api::method_not_allowed),
        )
        .route(
            "/api/orders/statistics",
            post(routes::api::order_statistics).fallback(routes::api::method_not_allowed),
        )
        .route(
            "/api/users/profiles/minecraft/{username}",
            get(routes::api::profile_at),
        )
        .route("/api/user/profiles/{uuid}/names", get(routes::api::name_history))
        .route("/texture/{hash}", get(routes::textures::texture))
        .route("/of/capes/{file}", get(routes::textures::optifine_cape))
        .route("/{identifier}", get(routes::resolve::texture));

    // Rewritten profiles point at `{prefix}/texture/{hash}`
    let prefix = &state.config.texture_path_prefix;
    let relay = if prefix.is_empty() {
        relay
    } else {
        relay.route(
            &format!("{}/texture/{{hash}}", prefix),
            get(routes::textures::texture),
        )
    }
    .layer(from_fn_with_state(state.clone(), response_cache));

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .merge(relay)
        .fallback(routes::not_found)
        .layer(from_fn_with_state(state.clone(), request_deadline))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: AppState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}
