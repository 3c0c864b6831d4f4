//! Conversation history.

use axum::extract::{Query, State};
use axum::Json;
use database::message::{self, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::routes::present;
use crate::state::AppState;

/// Query of `GET /api/messages`.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub sender_id: Option<String>,
    pub limit: Option<i64>,
}

impl MessagesQuery {
    /// Requested page size; missing or non-positive falls back to the default.
    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// One sender's messages, or the inbox of latest messages per sender.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Value>> {
    match present(query.sender_id.as_deref()) {
        Some(sender_id) => {
            let messages =
                message::recent_messages(state.db.pool(), sender_id, query.limit()).await?;
            Ok(Json(json!({ "messages": messages })))
        }
        None => {
            let conversations = message::latest_per_sender(state.db.pool()).await?;
            Ok(Json(json!({ "conversations": conversations })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults() {
        assert_eq!(MessagesQuery::default().limit(), 50);
        let query = MessagesQuery {
            sender_id: None,
            limit: Some(0),
        };
        assert_eq!(query.limit(), 50);
        let query = MessagesQuery {
            sender_id: None,
            limit: Some(5),
        };
        assert_eq!(query.limit(), 5);
    }
}
