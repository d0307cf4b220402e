//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use cardbox_core::media::MAX_IMAGE_BYTES;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Multipart framing overhead allowed on top of the image size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // The body limit must admit the largest legal payload on any route; the
    // per-endpoint limits (5 MiB images, JSON body cap) are enforced in the
    // handlers with precise 400 responses.
    let body_limit = state
        .config
        .server
        .max_json_body_bytes
        .max(MAX_IMAGE_BYTES + MULTIPART_OVERHEAD);

    // Browser SPA client: allow cross-origin API calls during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Health check (unauthenticated, for probes)
        .route("/health", get(handlers::health_check))
        // Decks
        .route(
            "/decks",
            get(handlers::list_decks).post(handlers::create_deck),
        )
        .route("/decks/import", post(handlers::import_deck))
        .route(
            "/decks/{deck_id}",
            get(handlers::get_deck).delete(handlers::delete_deck),
        )
        .route(
            "/decks/{deck_id}/flashcards",
            get(handlers::list_deck_flashcards),
        )
        .route(
            "/decks/{deck_id}/flashcards/category/{category}",
            get(handlers::list_flashcards_by_category),
        )
        .route("/decks/{deck_id}/categories", get(handlers::list_categories))
        .route("/decks/{deck_id}/export", get(handlers::export_deck))
        // Flashcards
        .route("/flashcards", post(handlers::create_flashcard))
        .route(
            "/flashcards/{flashcard_id}",
            get(handlers::get_flashcard)
                .put(handlers::update_flashcard)
                .delete(handlers::delete_flashcard),
        )
        .route(
            "/flashcards/{flashcard_id}/image",
            post(handlers::upload_image).delete(handlers::remove_image),
        )
        // Stored images
        .route("/uploads/{filename}", get(handlers::get_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
