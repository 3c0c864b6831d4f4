//! Order creation tool.

use async_trait::async_trait;
use database::{order, Database, NewOrder};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Records a confirmed sale and closes the lead.
pub struct CreateOrder {
    db: Database,
    public_base_url: Option<String>,
}

impl CreateOrder {
    /// `public_base_url` enables client tracking links (`<base>/client/<id>`).
    pub fn new(db: Database, public_base_url: Option<String>) -> Self {
        Self {
            db,
            public_base_url: public_base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Tracking page URL for an order, when a public base URL is configured.
    pub fn tracking_url(&self, order_id: &str) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}/client/{}", base, order_id))
    }

    /// Validate arguments into an order for the current conversation.
    pub fn parse_order(args: &ToolArgs) -> Result<NewOrder, ToolError> {
        let context = args.context()?;
        Ok(NewOrder {
            page_id: Some(context.page_id.clone()),
            sender_id: Some(context.sender_id.clone()),
            client_name: args.get_string("client_name")?,
            client_contact: args.get_string("client_contact")?,
            service_name: args.get_string("service_name")?,
            agreed_price: args.get_string("agreed_price")?,
        })
    }
}

#[async_trait]
impl Tool for CreateOrder {
    fn name(&self) -> &str {
        "create_order"
    }

    fn description(&self) -> &str {
        "Create an order once the customer has confirmed the service and price \
         and given their name and a contact (email or phone)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "client_name": {
                    "type": "string",
                    "description": "Customer's full name"
                },
                "client_contact": {
                    "type": "string",
                    "description": "Email or phone number to reach the customer"
                },
                "service_name": {
                    "type": "string",
                    "description": "Name of the service being purchased"
                },
                "agreed_price": {
                    "type": "string",
                    "description": "Price agreed with the customer"
                }
            },
            "required": ["client_name", "client_contact", "service_name", "agreed_price"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let new_order = Self::parse_order(&args)?;
        let context = args.context()?;

        let (created, _) = order::create_order_and_close_lead(
            self.db.pool(),
            &context.page_id,
            &context.sender_id,
            &new_order,
        )
        .await?;

        info!(
            order_id = %created.id,
            sender_id = %context.sender_id,
            "Lead closed with order"
        );

        let order_id = created.id.to_string();
        let mut result = json!({
            "order_id": order_id,
            "status": created.status,
        });
        if let Some(url) = self.tracking_url(&order_id) {
            result["tracking_url"] = Value::String(url);
        }

        ToolOutput::json(&result)
    }
}
