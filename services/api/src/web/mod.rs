pub mod admin;
pub mod ask;
pub mod auth;
pub mod books;
pub mod forms;
pub mod middleware;
pub mod rest;
pub mod state;

#[cfg(test)]
mod testing;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::{require_admin, require_auth};
use state::AppState;

/// Builds the API router with its public, authenticated and admin-only routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Admin routes (auth + admin flag required). Layers run bottom-up.
    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard_handler))
        .route(
            "/admin/users/{id}",
            put(admin::edit_user_handler).delete(admin::delete_user_handler),
        )
        .layer(axum_middleware::from_fn(require_admin))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/books",
            get(books::list_books_handler).post(books::create_book_handler),
        )
        .route(
            "/books/{id}",
            get(books::get_book_handler)
                .put(books::update_book_handler)
                .delete(books::delete_book_handler),
        )
        .route("/ai-query", post(ask::ai_query_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
