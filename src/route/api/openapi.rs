use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    record::{Record, RecordField},
    route::health::HealthResponse,
};

use super::DataResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::route::api::get_data::get_data,
        crate::route::api::search::search,
        crate::route::health::health,
    ),
    components(schemas(DataResponse, ErrorResponse, HealthResponse, Record, RecordField))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
