//! Read operations: fetching the appliance snapshot.

use reqwest::Method;

use scanconf_core::snapshot::{parse_snapshot_xml, Snapshot};

use crate::client::{ApiClient, ApiError};

/// Appliance endpoint shared by list and virtual-appliance update calls.
pub const APPLIANCE_PATH: &str = "/api/2.0/fo/appliance/";

impl ApiClient {
    /// Fetch the current configuration of every appliance in the subscription.
    pub async fn list_appliances(&self) -> Result<Snapshot, ApiError> {
        let url = self.url(APPLIANCE_PATH, [("action", "list"), ("output_mode", "full")])?;
        let body = self.call(Method::GET, url).await?;
        let snapshot = parse_snapshot_xml(&body)?;

        tracing::info!(
            appliances = snapshot.appliances().len(),
            "Fetched appliance snapshot"
        );
        Ok(snapshot)
    }
}
