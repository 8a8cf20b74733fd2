use axum::{extract::State, response::IntoResponse, Json};

use crate::{api_state::ApiState, error::ApiError};

pub async fn list_images(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .gallery
        .list_images()
        .await
        .map_err(|e| ApiError::from_app_error(e, state.config.expose_error_details()))?;

    Ok(Json(images))
}
