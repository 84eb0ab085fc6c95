use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::AppError,
    models::date_range::DateRange,
    services::report::RateRecord,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/cancellation-rate", get(cancellation_rate))
}

#[derive(Deserialize)]
struct RateQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Serialize)]
struct RatesResponse {
    data: Vec<RateRecord>,
}

async fn cancellation_rate(
    State(state): State<AppState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<RatesResponse>, AppError> {
    let start = query
        .start_date
        .as_deref()
        .ok_or(AppError::MissingDate("start_date"))?;
    let end = query
        .end_date
        .as_deref()
        .ok_or(AppError::MissingDate("end_date"))?;

    let range = DateRange::from_strings(start, end)?;
    debug!("cancellation-rate report for {} .. {}", range.start, range.end);

    let data = state.reports.rates_for(&range).await?;
    Ok(Json(RatesResponse { data }))
}
