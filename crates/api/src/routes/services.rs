//! Service catalog.

use axum::extract::{Query, State};
use axum::Json;
use database::validation::{parse_price, validate_price};
use database::{service, NewService, ServiceUpdate, ValidationError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, JsonBody, Result};
use crate::routes::{present, require_id};
use crate::state::AppState;

/// Body of `POST /api/services`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// A JSON number or a numeric string.
    pub price: Option<Value>,
}

/// Body of `PUT /api/services`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub is_active: Option<bool>,
}

/// Query of `DELETE /api/services`.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// All services, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let services = service::list_services(state.db.pool()).await?;
    Ok(Json(json!({ "services": services })))
}

pub async fn create(
    State(state): State<AppState>,
    body: JsonBody<CreateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let price = req.price.as_ref().map(price_from).transpose()?.flatten();
    let (Some(name), Some(price)) = (present(req.name.as_deref()), price) else {
        return Err(ApiError::bad_request("Name and price are required"));
    };

    let new = NewService {
        name: name.to_string(),
        description: req.description,
        price,
    };
    let service = service::create_service(state.db.pool(), &new).await?;
    info!(service_id = %service.id, name = %service.name, "Service created");

    Ok(Json(json!({ "service": service })))
}

pub async fn update(
    State(state): State<AppState>,
    body: JsonBody<UpdateRequest>,
) -> Result<Json<Value>> {
    let Json(req) = body?;
    let id = require_id(req.id.as_deref())?;
    let update = ServiceUpdate {
        price: req.price.as_ref().map(price_from).transpose()?.flatten(),
        name: req.name,
        description: req.description,
        is_active: req.is_active,
    };
    let service = service::update_service(state.db.pool(), id, &update).await?;
    Ok(Json(json!({ "service": service })))
}

pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>> {
    let id = require_id(query.id.as_deref())?;
    service::delete_service(state.db.pool(), id).await?;
    info!(service_id = %id, "Service deleted");
    Ok(Json(json!({ "success": true })))
}

/// Read a price sent as a number or a numeric string. Blank and null mean absent.
fn price_from(value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => {
            let price = number
                .as_f64()
                .ok_or_else(|| ValidationError::InvalidPrice(number.to_string()))?;
            validate_price(price)?;
            Ok(Some(price))
        }
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => Ok(Some(parse_price(raw)?)),
        other => Err(ValidationError::InvalidPrice(other.to_string()).into()),
    }
}
