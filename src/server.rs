use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, services::ServeDir,
    trace::TraceLayer,
};
use tower_sessions::SessionStore;

use crate::handlers::{protected, public};
use crate::middleware::{rate_limit_middleware, require_session, RateLimiter};
use crate::session::session_layer;
use crate::state::AppState;

/// Build the full application router over the given session store
pub fn app<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let config = state.config.clone();

    // Static assets, with the 404 page for anything not found (any method)
    let static_files = ServeDir::new(&config.server.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(public::pages::not_found.into_service());

    let mut router = Router::new()
        // Public
        .merge(page_routes())
        .merge(auth_routes())
        // Protected
        .merge(data_routes())
        .fallback_service(static_files)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(session_layer(store, &config.session));

    if config.api.enable_response_compression {
        router = router.layer(CompressionLayer::new());
    }
    if config.api.enable_rate_limiting {
        let limiter = Arc::new(RateLimiter::from_config(&config.api));
        router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.layer(CatchPanicLayer::custom(public::pages::handle_panic))
}

fn page_routes() -> Router<AppState> {
    use public::pages::not_found;

    Router::new()
        .route("/", get(public::pages::home).fallback(not_found))
        .route("/health", get(public::health::health).fallback(not_found))
}

fn auth_routes() -> Router<AppState> {
    use public::{auth, pages::not_found};

    Router::new()
        .route(
            "/login",
            get(auth::login_form).post(auth::login).fallback(not_found),
        )
        .route("/logout", post(auth::logout).fallback(not_found))
}

// The gate wraps only the matched methods; other methods fall through to 404 untouched
fn data_routes() -> Router<AppState> {
    use protected::data;
    use public::pages::not_found;

    Router::new()
        // Collection-level operations
        .route(
            "/api/:collection",
            get(data::collection_get)
                .post(data::collection_post)
                .route_layer(middleware::from_fn(require_session))
                .fallback(not_found),
        )
        // Record-level operations
        .route(
            "/api/:collection/:id",
            put(data::record_put)
                .delete(data::record_delete)
                .route_layer(middleware::from_fn(require_session))
                .fallback(not_found),
        )
}
