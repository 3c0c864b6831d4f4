//! Sales pipeline leads.

use axum::extract::State;
use axum::Json;
use database::{lead, LeadStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{JsonBody, Result};
use crate::routes::{present, require_id};
use crate::state::AppState;

/// Body of `PUT /api/leads`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub status: Option<String>,
    pub needs_human: Option<bool>,
}

/// All leads, most recently active first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let leads = lead::list_leads(state.db.pool()).await?;
    Ok(Json(json!({ "leads": leads })))
}

/// Change a lead's status or release a human takeover.
pub async fn update(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let id = require_id(req.id.as_deref())?;
    let status = present(req.status.as_deref())
        .map(str::parse::<LeadStatus>)
        .transpose()?;

    let lead = lead::update_lead(state.db.pool(), id, status, req.needs_human).await?;
    info!(lead_id = %lead.id, status = %lead.status, needs_human = lead.needs_human, "Lead updated");

    Ok(Json(json!({ "lead": lead })))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_invalid_status_rejected() {
        let app = app(TestOptions::default()).await;
        let id = uuid::Uuid::new_v4().to_string();

        let (status, body) = call_json(
            &app.router,
            json_request("PUT", "/api/leads", json!({ "id": id, "status": "Maybe" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid lead status: Maybe");
    }

    #[tokio::test]
    async fn test_missing_id_rejected() {
        let app = app(TestOptions::default()).await;

        let (status, _) = call_json(
            &app.router,
            json_request("PUT", "/api/leads", json!({ "needs_human": false })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
