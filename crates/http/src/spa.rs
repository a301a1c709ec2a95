//! Static serving of the built single-page frontend.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Mount `/assets` and an `index.html` fallback when `dist` is a directory.
///
/// Every unmatched path gets `index.html` so client-side routing works.
pub fn with_frontend(router: Router, dist: Option<&Path>) -> Router {
    let Some(dist) = dist.filter(|d| d.is_dir()) else {
        if let Some(missing) = dist {
            tracing::warn!(path = %missing.display(), "FRONTEND_DIST is not a directory, not serving SPA");
        }
        return router;
    };
    tracing::info!(path = %dist.display(), "serving frontend");
    router
        .nest_service("/assets", ServeDir::new(dist.join("assets")))
        .fallback_service(ServeFile::new(dist.join("index.html")))
}
