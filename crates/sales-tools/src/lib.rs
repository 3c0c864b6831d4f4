//! Sales tools for the pagebot model.
//!
//! This crate provides a `ToolRegistry` of the tools the model may call
//! while talking to a customer, and [`SalesToolExecutor`], which exposes
//! the registry as a brain-core `ToolExecutor` for the conversation loop.
//!
//! # Built-in Tools
//!
//! - [`GetActiveServices`] - The active catalog with prices.
//! - [`CreateOrder`] - Record a confirmed sale and close the lead.
//! - [`RequestHumanIntervention`] - Hand the conversation to a person.
//! - [`UpdateLeadProfile`] - Save what the customer shared about themselves.
//!
//! Every tool acts on the conversation in the request metadata
//! (`page_id`, `sender_id`).
//!
//! # Example
//!
//! ```rust,no_run
//! use database::Database;
//! use sales_tools::{default_registry, SalesToolExecutor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/pagebot").await?;
//! let executor = SalesToolExecutor::new(default_registry(db, None));
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod registry;
mod tool;
pub mod tools;

pub use error::ToolError;
pub use executor::SalesToolExecutor;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs, ToolOutput};
pub use tools::{CreateOrder, GetActiveServices, RequestHumanIntervention, UpdateLeadProfile};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

use database::Database;

/// Create a registry with all sales tools registered.
///
/// `public_base_url` enables tracking links in `create_order` results.
pub fn default_registry(db: Database, public_base_url: Option<String>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(GetActiveServices::new(db.clone()));
    registry.register(CreateOrder::new(db.clone(), public_base_url));
    registry.register(RequestHumanIntervention::new(db.clone()));
    registry.register(UpdateLeadProfile::new(db));

    registry
}
