use axum::extract::State;

use crate::{
    error::{ApiError, ErrorResponse, ErrorVerbosityProvider, UpstreamFailure},
    state::ApiState,
};

use super::DataResponse;

/// Returns the whole archive.
#[utoipa::path(
    get,
    path = "/api/data",
    responses(
        (status = 200, description = "Every record of the archive", body = DataResponse),
        (status = 500, description = "The archive could not be fetched", body = ErrorResponse),
    )
)]
pub async fn get_data(State(state): State<ApiState>) -> Result<DataResponse, ApiError> {
    let records = state
        .upstream()
        .fetch_all()
        .await
        .map_err(|err| UpstreamFailure::new(state.error_verbosity(), &err))?;

    Ok(DataResponse::new(records))
}
