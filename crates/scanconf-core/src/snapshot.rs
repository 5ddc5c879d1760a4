//! Appliance list XML deserialization.
//!
//! The management API's `action=list&output_mode=full` call returns an
//! `<APPLIANCE_LIST_OUTPUT>` document. These structs mirror the parts of it
//! that reconciliation needs; everything else in the document is ignored.

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Value of `VLANS/SETTING` when VLAN support is turned on.
pub const VLANS_ENABLED: &str = "Enabled";

/// Root element: `<APPLIANCE_LIST_OUTPUT>`.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "RESPONSE")]
    pub response: SnapshotResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    #[serde(rename = "DATETIME")]
    pub datetime: Option<String>,
    #[serde(rename = "APPLIANCE_LIST")]
    pub appliance_list: Option<ApplianceList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplianceList {
    #[serde(rename = "APPLIANCE", default)]
    pub appliances: Vec<ApplianceRecord>,
}

/// One `<APPLIANCE>` element.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplianceRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "VLANS")]
    pub vlans: Option<VlanSection>,
    #[serde(rename = "STATIC_ROUTES")]
    pub static_routes: Option<RouteSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VlanSection {
    #[serde(rename = "SETTING")]
    pub setting: Option<String>,
    #[serde(rename = "VLAN", default)]
    pub vlans: Vec<VlanRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VlanRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "IP_ADDRESS")]
    pub ip_address: String,
    #[serde(rename = "NETMASK")]
    pub netmask: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSection {
    #[serde(rename = "ROUTE", default)]
    pub routes: Vec<RouteRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "IP_ADDRESS")]
    pub ip_address: String,
    #[serde(rename = "NETMASK")]
    pub netmask: String,
    #[serde(rename = "GATEWAY")]
    pub gateway: String,
}

impl Snapshot {
    /// All appliances in the snapshot; empty when the list element is absent.
    pub fn appliances(&self) -> &[ApplianceRecord] {
        self.response
            .appliance_list
            .as_ref()
            .map_or(&[], |list| list.appliances.as_slice())
    }
}

impl ApplianceRecord {
    /// Whether the appliance reports VLAN support as enabled.
    pub fn vlans_enabled(&self) -> bool {
        self.vlans
            .as_ref()
            .and_then(|v| v.setting.as_deref())
            .is_some_and(|s| s.trim() == VLANS_ENABLED)
    }

    /// VLAN records, regardless of the enabled setting.
    pub fn vlan_records(&self) -> &[VlanRecord] {
        self.vlans.as_ref().map_or(&[], |v| v.vlans.as_slice())
    }

    /// Static route records; empty when the section is absent.
    pub fn route_records(&self) -> &[RouteRecord] {
        self.static_routes
            .as_ref()
            .map_or(&[], |r| r.routes.as_slice())
    }
}

/// Parse appliance list XML bytes into a [`Snapshot`].
pub fn parse_snapshot_xml(xml: &[u8]) -> Result<Snapshot> {
    quick_xml::de::from_reader(xml).map_err(|e| CoreError::SnapshotParse(format!("{e}")))
}
