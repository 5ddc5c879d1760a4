//! Network entries: the unit of add/remove change on an appliance.
//!
//! Entries are immutable values. Two entries are the same entry iff every
//! field is equal; the derived `Eq`/`Hash`/`Ord` impls cover all fields, so a
//! route with the same name but a different gateway is a *different* route.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shared contract for the two entry shapes.
pub trait NetworkEntry: Ord + Clone {
    /// Query parameter that carries a list of this kind of entry.
    const CATEGORY: Category;

    /// Render the entry in the pipe-delimited field order the remote API expects.
    fn render(&self) -> String;
}

/// Which list on the appliance an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Routes,
    Vlans,
}

impl Category {
    /// Query-string marker, e.g. `set_vlans`.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Routes => "set_routes",
            Self::Vlans => "set_vlans",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routes => f.write_str("routes"),
            Self::Vlans => f.write_str("vlans"),
        }
    }
}

// ── VLAN ──────────────────────────────────────────────────────────

/// A VLAN binding on a scanner appliance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VlanEntry {
    vlan_id: String,
    vlan_name: String,
    address: String,
    netmask: String,
}

impl VlanEntry {
    pub fn new(
        vlan_id: impl Into<String>,
        vlan_name: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
    ) -> Self {
        Self {
            vlan_id: vlan_id.into(),
            vlan_name: vlan_name.into(),
            address: address.into(),
            netmask: netmask.into(),
        }
    }

    pub fn vlan_id(&self) -> &str {
        &self.vlan_id
    }

    pub fn vlan_name(&self) -> &str {
        &self.vlan_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn netmask(&self) -> &str {
        &self.netmask
    }
}

impl NetworkEntry for VlanEntry {
    const CATEGORY: Category = Category::Vlans;

    /// `vlanId|address|netmask|vlanName`
    fn render(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.vlan_id, self.address, self.netmask, self.vlan_name
        )
    }
}

// ── Static route ──────────────────────────────────────────────────

/// A static route on a scanner appliance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteEntry {
    route_name: String,
    address: String,
    netmask: String,
    gateway: String,
}

impl RouteEntry {
    pub fn new(
        route_name: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            route_name: route_name.into(),
            address: address.into(),
            netmask: netmask.into(),
            gateway: gateway.into(),
        }
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn netmask(&self) -> &str {
        &self.netmask
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }
}

impl NetworkEntry for RouteEntry {
    const CATEGORY: Category = Category::Routes;

    /// `address|netmask|gateway|routeName`
    fn render(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.address, self.netmask, self.gateway, self.route_name
        )
    }
}

// ── Either kind ───────────────────────────────────────────────────

/// An entry of either kind, as carried by a change request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Vlan(VlanEntry),
    Route(RouteEntry),
}

impl Entry {
    pub fn category(&self) -> Category {
        match self {
            Self::Vlan(_) => Category::Vlans,
            Self::Route(_) => Category::Routes,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Vlan(v) => v.render(),
            Self::Route(r) => r.render(),
        }
    }
}

impl From<VlanEntry> for Entry {
    fn from(v: VlanEntry) -> Self {
        Self::Vlan(v)
    }
}

impl From<RouteEntry> for Entry {
    fn from(r: RouteEntry) -> Self {
        Self::Route(r)
    }
}
