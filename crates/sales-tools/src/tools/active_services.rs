//! Catalog lookup tool.

use async_trait::async_trait;
use database::{service, Database};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Reply when the catalog has nothing active.
pub const NO_SERVICES_MESSAGE: &str = "No services are currently available.";

/// Lists the services the bot may sell, with prices.
pub struct GetActiveServices {
    db: Database,
}

impl GetActiveServices {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for GetActiveServices {
    fn name(&self) -> &str {
        "get_active_services"
    }

    fn description(&self) -> &str {
        "List the services currently offered, with description and price. \
         Call this before quoting any price."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let services = service::list_active_services(self.db.pool()).await?;
        if services.is_empty() {
            return Ok(ToolOutput::success(NO_SERVICES_MESSAGE));
        }

        let catalog: Vec<Value> = services
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "description": s.description,
                    "price": s.price,
                })
            })
            .collect();

        ToolOutput::json(&Value::Array(catalog))
    }
}
