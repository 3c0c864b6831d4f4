//! Dashboard analytics.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use database::analytics::{self, Analytics};

use crate::error::Result;
use crate::state::AppState;

/// Headline stats for the last 24 hours and the 7-day platform chart.
pub async fn get(State(state): State<AppState>) -> Result<Json<Analytics>> {
    let payload = analytics::compute(state.db.pool(), Utc::now()).await?;
    Ok(Json(payload))
}
