//! Per-page bot configuration.

use axum::extract::State;
use axum::Json;
use database::{bot_config, BotConfigUpdate, NewBotConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, JsonBody, Result};
use crate::routes::{present, require_id};
use crate::state::AppState;

/// Body of `POST /api/bot-configs`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub page_id: Option<String>,
    pub page_name: Option<String>,
    pub system_prompt: Option<String>,
    pub access_token: Option<String>,
    pub is_active: Option<bool>,
}

/// Body of `PATCH /api/bot-configs`: update addressed by page.
#[derive(Debug, Deserialize)]
pub struct PatchRequest {
    pub page_id: Option<String>,
    #[serde(flatten)]
    pub update: BotConfigUpdate,
}

/// Body of `PUT /api/bot-configs`: update addressed by row ID.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub update: BotConfigUpdate,
}

/// All configs, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let configs = bot_config::list_configs(state.db.pool()).await?;
    Ok(Json(json!({ "configs": configs })))
}

pub async fn create(
    State(state): State<AppState>,
    body: JsonBody<CreateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let page_id = present(req.page_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("page_id is required"))?
        .to_string();

    let new = NewBotConfig {
        page_id,
        page_name: req.page_name,
        system_prompt: req.system_prompt,
        access_token: req.access_token,
        is_active: req.is_active,
    };
    let config = bot_config::create_config(state.db.pool(), &new).await?;
    info!(page_id = %config.page_id, "Bot config created");

    Ok(Json(json!({ "config": config })))
}

pub async fn patch(
    State(state): State<AppState>,
    body: JsonBody<PatchRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let page_id = present(req.page_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("page_id is required"))?;

    let config = bot_config::update_by_page_id(state.db.pool(), page_id, &req.update).await?;
    Ok(Json(json!({ "config": config })))
}

pub async fn update(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let id = require_id(req.id.as_deref())?;

    let config = bot_config::update_by_id(state.db.pool(), id, &req.update).await?;
    Ok(Json(json!({ "config": config })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use axum::http::StatusCode;

    #[test]
    fn test_patch_request_flattens_update() {
        let req: PatchRequest = serde_json::from_value(json!({
            "page_id": "PAGE_1",
            "system_prompt": "Be brief."
        }))
        .unwrap();
        assert_eq!(req.page_id.as_deref(), Some("PAGE_1"));
        assert_eq!(req.update.system_prompt.as_deref(), Some("Be brief."));
        assert!(req.update.is_active.is_none());
    }

    #[tokio::test]
    async fn test_missing_page_id_rejected() {
        let app = app(TestOptions::default()).await;

        let (status, body) = call_json(
            &app.router,
            json_request("POST", "/api/bot-configs", json!({ "system_prompt": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "page_id is required");

        let (status, _) = call_json(
            &app.router,
            json_request("PATCH", "/api/bot-configs", json!({ "page_id": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_requires_id() {
        let app = app(TestOptions::default()).await;

        let (status, body) = call_json(
            &app.router,
            json_request("PUT", "/api/bot-configs", json!({ "is_active": false })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ID is required");
    }
}
