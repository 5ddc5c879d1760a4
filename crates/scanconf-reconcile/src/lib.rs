//! scanconf-reconcile: reconciles scanner appliance VLANs and static routes.
//!
//! Loads the current appliance state from the management API, applies
//! add/remove change lists read from CSV, and issues one update call per
//! appliance whose configuration actually changed.

pub mod changes;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod run;
