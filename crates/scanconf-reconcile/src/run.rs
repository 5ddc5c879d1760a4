//! Run orchestration: snapshot → apply changes → plan → push.
//!
//! Updates are pushed one appliance at a time in name order. There is no
//! transaction around the batch: appliances updated before a failure stay
//! updated.

use serde::Serialize;
use uuid::Uuid;

use scanconf_api::{ApiClient, ApiError, ApplianceKind};
use scanconf_core::{ChangeRequest, EmptyCategoryPolicy, UpdatePayload};

use crate::config::UpdateFailurePolicy;
use crate::error::{ReconcileError, Result};
use crate::reconcile::{ApplySummary, Reconciler, SnapshotSource};

/// Receives one update call per dirty appliance.
#[allow(async_fn_in_trait)]
pub trait UpdateSink {
    async fn push_update(
        &self,
        appliance_id: &str,
        payload: &UpdatePayload,
    ) -> std::result::Result<(), ApiError>;
}

/// Pushes updates through the management API.
pub struct ApiSink<'a> {
    client: &'a ApiClient,
    kind: ApplianceKind,
}

impl<'a> ApiSink<'a> {
    pub fn new(client: &'a ApiClient, kind: ApplianceKind) -> Self {
        Self { client, kind }
    }
}

impl UpdateSink for ApiSink<'_> {
    async fn push_update(
        &self,
        appliance_id: &str,
        payload: &UpdatePayload,
    ) -> std::result::Result<(), ApiError> {
        self.client
            .update_appliance(appliance_id, self.kind, payload)
            .await
    }
}

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub empty_category: EmptyCategoryPolicy,
    pub on_update_failure: UpdateFailurePolicy,
    /// Plan updates without pushing them.
    pub dry_run: bool,
}

/// One update call, ready to send.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedUpdate {
    pub appliance: String,
    pub appliance_id: String,
    pub payload: UpdatePayload,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub applied: ApplySummary,
    pub planned: Vec<PlannedUpdate>,
    /// Names of appliances whose update call succeeded.
    pub updated: Vec<String>,
}

/// Encode a payload for every pending appliance.
///
/// Appliances whose payload ends up empty (every included category omitted)
/// are skipped with a warning.
pub fn plan_updates(reconciler: &Reconciler, policy: EmptyCategoryPolicy) -> Vec<PlannedUpdate> {
    reconciler
        .pending_updates()
        .into_iter()
        .filter_map(|pending| {
            let payload = pending.payload(policy);
            if payload.is_empty() {
                tracing::warn!(
                    appliance = %pending.appliance.name(),
                    "Nothing to send after omitting empty categories, skipping update"
                );
                return None;
            }
            Some(PlannedUpdate {
                appliance: pending.appliance.name().to_string(),
                appliance_id: pending.appliance.id().to_string(),
                payload,
            })
        })
        .collect()
}

/// Push each planned update in order, honouring `policy` on failure.
///
/// Returns the names of the appliances that were updated.
pub async fn push_updates<K: UpdateSink>(
    sink: &K,
    planned: &[PlannedUpdate],
    policy: UpdateFailurePolicy,
) -> Result<Vec<String>> {
    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for plan in planned {
        tracing::info!(
            appliance = %plan.appliance,
            appliance_id = %plan.appliance_id,
            "Updating appliance"
        );
        tracing::debug!(appliance = %plan.appliance, payload = %plan.payload, "Update payload");

        match sink.push_update(&plan.appliance_id, &plan.payload).await {
            Ok(()) => updated.push(plan.appliance.clone()),
            Err(e) => {
                tracing::error!(
                    appliance = %plan.appliance,
                    appliance_id = %plan.appliance_id,
                    error = %e,
                    "Appliance update failed"
                );
                match policy {
                    UpdateFailurePolicy::Abort => {
                        return Err(ReconcileError::UpdateFailed {
                            appliance: plan.appliance.clone(),
                            appliance_id: plan.appliance_id.clone(),
                            source: e,
                        });
                    }
                    UpdateFailurePolicy::Continue => failed.push(plan.appliance.clone()),
                }
            }
        }
    }

    if !failed.is_empty() {
        return Err(ReconcileError::UpdatesFailed {
            attempted: planned.len(),
            failed,
        });
    }

    Ok(updated)
}

/// Execute one reconciliation run.
///
/// The snapshot is fetched first; a fetch failure aborts before any change
/// is looked at. The change list is validated as a whole before anything is
/// applied.
pub async fn run<S: SnapshotSource, K: UpdateSink>(
    source: &S,
    sink: &K,
    changes: Vec<ChangeRequest>,
    options: RunOptions,
) -> Result<RunReport> {
    let run_id = Uuid::new_v4();
    tracing::info!(run_id = %run_id, changes = changes.len(), "Starting reconciliation run");

    let mut reconciler = Reconciler::load_all(source).await?;
    tracing::info!(run_id = %run_id, appliances = reconciler.len(), "Appliance state loaded");

    let applied = reconciler.apply_changes(changes)?;
    let planned = plan_updates(&reconciler, options.empty_category);

    tracing::info!(
        run_id = %run_id,
        changed = applied.changed,
        unchanged = applied.unchanged,
        pending = planned.len(),
        "Changes applied"
    );

    let updated = if options.dry_run {
        tracing::info!(run_id = %run_id, "Dry run, no updates pushed");
        Vec::new()
    } else {
        push_updates(sink, &planned, options.on_update_failure).await?
    };

    tracing::info!(run_id = %run_id, updated = updated.len(), "Reconciliation run complete");

    Ok(RunReport {
        run_id,
        applied,
        planned,
        updated,
    })
}
