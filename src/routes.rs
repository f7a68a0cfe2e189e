// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, community, interaction},
    state::AppState,
    utils::session::login_required,
};

/// Assembles the main application router.
///
/// * Auth routes (register, login, logout) are public.
/// * Post listing and detail are public; creating posts and comments
///   goes through the `login_required` guard.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Guards only the routed methods, so a wrong method is still a 405.
    let guard = middleware::from_fn_with_state(state.clone(), login_required);

    let auth_routes = Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/logout/", post(auth::logout));

    let post_routes = Router::new()
        .route(
            "/create-post/",
            post(community::create_post).route_layer(guard.clone()),
        )
        .route("/posts/", get(community::list_posts))
        .route("/post/{id}/", get(community::get_post))
        .route(
            "/post/{id}/comment/",
            post(interaction::create_comment).route_layer(guard),
        );

    Router::new()
        .merge(auth_routes)
        .merge(post_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
