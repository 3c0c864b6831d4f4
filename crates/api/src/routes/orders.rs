//! Orders and the client tracking lookup.

use axum::extract::{Path, State};
use axum::Json;
use database::{order, OrderStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, JsonBody, Result};
use crate::routes::{parse_id, present};
use crate::state::AppState;

/// Body of `PUT /api/orders`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub status: Option<String>,
}

/// All orders, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let orders = order::list_orders(state.db.pool()).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// A single order, for the client tracking page.
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    let order = order::get_order(state.db.pool(), id).await?;
    Ok(Json(json!({ "order": order })))
}

/// Move an order to a new status.
pub async fn update(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let (Some(id), Some(status)) = (present(req.id.as_deref()), present(req.status.as_deref()))
    else {
        return Err(ApiError::bad_request("ID and status are required"));
    };
    let status: OrderStatus = status
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid status"))?;
    let id = parse_id(id)?;

    let order = order::update_status(state.db.pool(), id, status).await?;
    info!(order_id = %order.id, status = %order.status, "Order status changed");

    Ok(Json(json!({ "order": order })))
}
