use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use routes::{images::list_images, liveness::live, readiness::ready, upload::upload_image};

pub mod api_state;
pub mod error;
mod routes;

/// Room for multipart boundaries and the text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Router for the gallery API
pub fn api_routes<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    let body_limit = app_state
        .config
        .upload_max_file_size
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/all", get(list_images))
        .route(
            "/new",
            post(upload_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/ready", get(ready))
        .route("/live", get(live))
}
