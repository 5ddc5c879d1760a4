//! Reconciliation: load every appliance's current state, apply the requested
//! changes, and collect the appliances that need an update call.

use std::collections::BTreeMap;

use scanconf_api::ApiClient;
use scanconf_core::snapshot::Snapshot;
use scanconf_core::{
    ApplianceState, ChangeRequest, CoreError, EmptyCategoryPolicy, UpdatePayload, UpdateScope,
};

use crate::error::Result;

/// Anything that can supply the current appliance snapshot.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

impl SnapshotSource for ApiClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        Ok(self.list_appliances().await?)
    }
}

/// Counts from one [`Reconciler::apply_changes`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub requested: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// An appliance whose state diverges from the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PendingUpdate<'a> {
    pub appliance: &'a ApplianceState,
    pub scope: UpdateScope,
}

impl PendingUpdate<'_> {
    pub fn payload(&self, policy: EmptyCategoryPolicy) -> UpdatePayload {
        self.appliance.build_update_payload(self.scope, policy)
    }
}

/// Appliance states for one run, keyed by appliance name.
///
/// The map is built once from a snapshot and is the only copy of appliance
/// state during the run.
#[derive(Debug, Default)]
pub struct Reconciler {
    appliances: BTreeMap<String, ApplianceState>,
    scope: UpdateScope,
}

impl Reconciler {
    /// Fetch the snapshot from `source` and build one state per appliance.
    pub async fn load_all<S: SnapshotSource>(source: &S) -> Result<Self> {
        let snapshot = source.fetch_snapshot().await?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Build one state per appliance in `snapshot`.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut appliances = BTreeMap::new();

        for record in snapshot.appliances() {
            let state = ApplianceState::from_snapshot(record);
            tracing::debug!(
                appliance = %state.name(),
                appliance_id = %state.id(),
                vlans = state.vlans().len(),
                routes = state.routes().len(),
                "Loaded appliance"
            );
            if let Some(previous) = appliances.insert(state.name().to_string(), state) {
                tracing::warn!(
                    appliance = %previous.name(),
                    replaced_id = %previous.id(),
                    "Duplicate appliance name in snapshot, keeping the later record"
                );
            }
        }

        Self {
            appliances,
            scope: UpdateScope::default(),
        }
    }

    pub fn appliance(&self, name: &str) -> Option<&ApplianceState> {
        self.appliances.get(name)
    }

    pub fn len(&self) -> usize {
        self.appliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    /// Categories requested so far in this run.
    pub fn scope(&self) -> UpdateScope {
        self.scope
    }

    /// Check every change against the loaded appliances.
    ///
    /// Fails on the first change that names an unknown appliance.
    pub fn validate(&self, changes: &[ChangeRequest]) -> Result<()> {
        match changes
            .iter()
            .find(|c| !self.appliances.contains_key(&c.appliance_name))
        {
            Some(unknown) => Err(CoreError::UnknownAppliance {
                name: unknown.appliance_name.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Validate the whole batch, then apply each change in order.
    ///
    /// Nothing is applied if any change names an unknown appliance.
    pub fn apply_changes(&mut self, changes: Vec<ChangeRequest>) -> Result<ApplySummary> {
        self.validate(&changes)?;

        let mut summary = ApplySummary {
            requested: changes.len(),
            ..Default::default()
        };

        for change in changes {
            if self.apply_one(change)? {
                summary.changed += 1;
            } else {
                summary.unchanged += 1;
            }
        }

        Ok(summary)
    }

    /// Apply a single change and widen the run scope to its category.
    ///
    /// Returns whether the appliance's entries changed.
    fn apply_one(&mut self, change: ChangeRequest) -> Result<bool> {
        let Some(appliance) = self.appliances.get_mut(&change.appliance_name) else {
            return Err(CoreError::UnknownAppliance {
                name: change.appliance_name,
            }
            .into());
        };
        self.scope.include(change.entry.category());

        let rendered = change.entry.render();
        let changed = appliance.apply(change.entry, change.operation);
        tracing::debug!(
            appliance = %change.appliance_name,
            operation = %change.operation,
            entry = %rendered,
            changed,
            "Applied change"
        );
        Ok(changed)
    }

    /// Dirty appliances in name order, each with the run's update scope.
    pub fn pending_updates(&self) -> Vec<PendingUpdate<'_>> {
        self.appliances
            .values()
            .filter(|a| a.is_dirty())
            .map(|appliance| PendingUpdate {
                appliance,
                scope: self.scope,
            })
            .collect()
    }
}
