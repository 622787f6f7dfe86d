use axum::{routing::get, Router};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route("/data", get(super::get_data::get_data))
        .route("/search", get(super::search::search))
        .route("/openapi.json", get(super::openapi::openapi))
}
