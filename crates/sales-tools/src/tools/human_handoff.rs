//! Human takeover tool.

use async_trait::async_trait;
use database::{lead, Database};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Result text after a successful handoff.
pub const HANDOFF_MESSAGE: &str =
    "A human team member has been notified and will take over this conversation.";

/// Flags the lead so the bot stops answering and a human steps in.
pub struct RequestHumanIntervention {
    db: Database,
}

impl RequestHumanIntervention {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for RequestHumanIntervention {
    fn name(&self) -> &str {
        "request_human_intervention"
    }

    fn description(&self) -> &str {
        "Hand the conversation to a human. Use when the customer asks for a person, \
         is upset, or needs something you cannot handle."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Why a human is needed"
                }
            },
            "required": ["reason"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let reason = args.get_string("reason")?;
        let context = args.context()?;

        lead::flag_needs_human(self.db.pool(), &context.page_id, &context.sender_id, &reason)
            .await?;

        Ok(ToolOutput::success(HANDOFF_MESSAGE))
    }
}
