use axum::extract::State;

use crate::{
    error::{ApiError, ErrorResponse, ErrorVerbosityProvider, UpstreamFailure},
    extractor::query::ApiQuery,
    search::{filter, SearchQuery},
    state::ApiState,
};

use super::DataResponse;

/// Returns the records containing `q`, either in `field` or in any field.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "The matching records in archive order", body = DataResponse),
        (status = 500, description = "The archive could not be fetched or the query is malformed", body = ErrorResponse),
    )
)]
pub async fn search(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<DataResponse, ApiError> {
    let records = state
        .upstream()
        .fetch_all()
        .await
        .map_err(|err| UpstreamFailure::new(state.error_verbosity(), &err))?;

    let found = filter(records, &query);
    tracing::debug!(count = found.len(), "Search finished");

    Ok(DataResponse::new(found))
}
