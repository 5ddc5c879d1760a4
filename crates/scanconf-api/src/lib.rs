//! scanconf-api: HTTP client for the scanner appliance management API.
//!
//! Every remote read and write goes through [`ApiClient`]: fetching the
//! appliance snapshot and pushing per-appliance VLAN/route updates.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod response;

pub use client::{ApiClient, ApiConfig, ApiError};
pub use mutations::ApplianceKind;
