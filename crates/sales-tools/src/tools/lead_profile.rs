//! Lead profile tool.

use async_trait::async_trait;
use database::{lead, Database, LeadStatus, LeadUpdate};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Saves what the bot learned about the customer.
pub struct UpdateLeadProfile {
    db: Database,
}

impl UpdateLeadProfile {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Collect the provided fields. At least one must be present.
    pub fn parse_update(args: &ToolArgs) -> Result<LeadUpdate, ToolError> {
        let status = match args.get_string_opt("status")? {
            Some(raw) => Some(raw.parse::<LeadStatus>().map_err(|e| {
                ToolError::InvalidParameter {
                    name: "status".to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let update = LeadUpdate {
            name: args.get_string_opt("name")?,
            email: args.get_string_opt("email")?,
            phone: args.get_string_opt("phone")?,
            interested_service: args.get_string_opt("interested_service")?,
            objection: args.get_string_opt("objection")?,
            status,
        };

        if update.is_empty() {
            return Err(ToolError::InvalidParameter {
                name: "profile".to_string(),
                reason: "provide at least one field to update".to_string(),
            });
        }
        Ok(update)
    }
}

#[async_trait]
impl Tool for UpdateLeadProfile {
    fn name(&self) -> &str {
        "update_lead_profile"
    }

    fn description(&self) -> &str {
        "Save details the customer shared (name, email, phone, service of interest, \
         objections) and move the lead through the pipeline. Only send fields you learned."
    }

    fn parameters(&self) -> Value {
        let statuses: Vec<&str> = LeadStatus::ALL.iter().map(|s| s.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Customer's name"},
                "email": {"type": "string", "description": "Customer's email address"},
                "phone": {"type": "string", "description": "Customer's phone number"},
                "interested_service": {
                    "type": "string",
                    "description": "Service the customer is interested in"
                },
                "objection": {
                    "type": "string",
                    "description": "Concern holding the customer back"
                },
                "status": {
                    "type": "string",
                    "enum": statuses,
                    "description": "Pipeline stage"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let update = Self::parse_update(&args)?;
        let context = args.context()?;

        let saved =
            lead::upsert_profile(self.db.pool(), &context.page_id, &context.sender_id, &update)
                .await?;

        ToolOutput::json(&json!({
            "updated": true,
            "status": saved.status,
        }))
    }
}
