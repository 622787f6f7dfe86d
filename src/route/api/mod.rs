use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::record::Record;

pub mod app;
pub mod get_data;
pub mod openapi;
pub mod search;

/// Body of every successful dataset response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse {
    /// Always `true`.
    pub success: bool,
    /// Number of records in `data`.
    pub count: usize,
    pub data: Vec<Record>,
}

impl DataResponse {
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

impl IntoResponse for DataResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
