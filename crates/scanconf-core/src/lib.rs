//! scanconf-core: network configuration model for scanner appliances.
//!
//! This crate holds everything reconciliation needs that does no I/O:
//! - VLAN and static route entries with their wire rendering
//! - Per-appliance state with dirty tracking
//! - Update payload encoding
//! - The appliance list snapshot model
//! - Change requests

pub mod appliance;
pub mod change;
pub mod encode;
pub mod entry;
pub mod error;
pub mod snapshot;

pub use appliance::ApplianceState;
pub use change::{ChangeRequest, Operation};
pub use encode::{EmptyCategoryPolicy, UpdatePayload, UpdateScope};
pub use entry::{Category, Entry, NetworkEntry, RouteEntry, VlanEntry};
pub use error::CoreError;
pub use snapshot::{parse_snapshot_xml, Snapshot};
