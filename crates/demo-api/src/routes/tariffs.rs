//! Tariff lookup route

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::Method,
    Json,
};
use demo_core::{TariffQuery, TariffQueryResult};
use std::sync::Arc;
use tracing::debug;

/// `GET /api/tariffs?ids=A,B&ids=C`
///
/// Mounted for every method so that anything other than GET gets a JSON 405.
pub async fn lookup(
    method: Method,
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<TariffQueryResult>, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let raw_ids: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "ids")
        .map(|(_, value)| value.as_str())
        .collect();

    let query = TariffQuery::parse(&raw_ids);
    let result = query.resolve(&state.catalog);

    debug!(
        "Tariff lookup: {} requested, {} matched, {} missing",
        query.ids().len(),
        result.tariffs.len(),
        result.missing_ids.len()
    );

    Ok(Json(result))
}
