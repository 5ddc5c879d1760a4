//! Per-appliance network state with dirty tracking.
//!
//! An [`ApplianceState`] is loaded once from a snapshot, mutated through the
//! add/remove methods, and read once to build its update payload. The entry
//! sets are private: the mutation methods are the only way to change them and
//! the only way to mark the appliance dirty.

use std::collections::BTreeSet;

use crate::change::Operation;
use crate::encode::{EmptyCategoryPolicy, UpdatePayload, UpdateScope};
use crate::entry::{Entry, RouteEntry, VlanEntry};
use crate::snapshot::ApplianceRecord;

/// Current network configuration of one scanner appliance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplianceState {
    id: String,
    name: String,
    vlans: BTreeSet<VlanEntry>,
    routes: BTreeSet<RouteEntry>,
    dirty: bool,
}

impl ApplianceState {
    /// An appliance with no VLANs or routes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vlans: BTreeSet::new(),
            routes: BTreeSet::new(),
            dirty: false,
        }
    }

    /// Build the baseline state from a snapshot record.
    ///
    /// VLANs are only loaded when the appliance reports VLAN support as
    /// enabled. The result is clean.
    pub fn from_snapshot(record: &ApplianceRecord) -> Self {
        let mut state = Self::new(record.id.trim(), record.name.trim());

        if record.vlans_enabled() {
            state.vlans = record
                .vlan_records()
                .iter()
                .map(|v| VlanEntry::new(&v.id, &v.name, &v.ip_address, &v.netmask))
                .collect();
        } else if !record.vlan_records().is_empty() {
            tracing::debug!(
                appliance = %state.name,
                ignored = record.vlan_records().len(),
                "VLAN support disabled, ignoring reported VLANs"
            );
        }

        state.routes = record
            .route_records()
            .iter()
            .map(|r| RouteEntry::new(&r.name, &r.ip_address, &r.netmask, &r.gateway))
            .collect();

        state
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any mutation has changed the entry sets since loading.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// VLANs in deterministic (field) order.
    pub fn vlans(&self) -> impl ExactSizeIterator<Item = &VlanEntry> + '_ {
        self.vlans.iter()
    }

    /// Routes in deterministic (field) order.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &RouteEntry> + '_ {
        self.routes.iter()
    }

    pub fn has_vlan(&self, vlan: &VlanEntry) -> bool {
        self.vlans.contains(vlan)
    }

    pub fn has_route(&self, route: &RouteEntry) -> bool {
        self.routes.contains(route)
    }

    // ── Mutations ─────────────────────────────────────────────────

    /// Insert `vlan` if absent. Returns whether the set changed.
    pub fn add_vlan(&mut self, vlan: VlanEntry) -> bool {
        let changed = self.vlans.insert(vlan);
        self.mark(changed)
    }

    /// Remove `vlan` if present. Returns whether the set changed.
    pub fn remove_vlan(&mut self, vlan: &VlanEntry) -> bool {
        let changed = self.vlans.remove(vlan);
        self.mark(changed)
    }

    /// Insert `route` if absent. Returns whether the set changed.
    pub fn add_route(&mut self, route: RouteEntry) -> bool {
        let changed = self.routes.insert(route);
        self.mark(changed)
    }

    /// Remove `route` if present. Returns whether the set changed.
    pub fn remove_route(&mut self, route: &RouteEntry) -> bool {
        let changed = self.routes.remove(route);
        self.mark(changed)
    }

    /// Dispatch an operation to the matching mutation for the entry's kind.
    pub fn apply(&mut self, entry: Entry, op: Operation) -> bool {
        match (entry, op) {
            (Entry::Vlan(v), Operation::Add) => self.add_vlan(v),
            (Entry::Vlan(v), Operation::Remove) => self.remove_vlan(&v),
            (Entry::Route(r), Operation::Add) => self.add_route(r),
            (Entry::Route(r), Operation::Remove) => self.remove_route(&r),
        }
    }

    // Dirty never resets within a run.
    fn mark(&mut self, changed: bool) -> bool {
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Encode the categories in `scope` as an update payload.
    ///
    /// Routes come before VLANs. An included category with no entries is
    /// handled according to `policy`.
    pub fn build_update_payload(
        &self,
        scope: UpdateScope,
        policy: EmptyCategoryPolicy,
    ) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        if scope.routes {
            payload.push_category(&self.routes, policy);
        }
        if scope.vlans {
            payload.push_category(&self.vlans, policy);
        }
        payload
    }
}
