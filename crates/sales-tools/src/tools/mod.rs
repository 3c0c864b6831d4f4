//! Built-in sales tool implementations.

mod active_services;
mod create_order;
mod human_handoff;
mod lead_profile;

pub use active_services::GetActiveServices;
pub use create_order::CreateOrder;
pub use human_handoff::RequestHumanIntervention;
pub use lead_profile::UpdateLeadProfile;
