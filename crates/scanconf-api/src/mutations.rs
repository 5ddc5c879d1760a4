//! Write operations: pushing an update payload to one appliance.

use reqwest::Method;
use serde::Deserialize;

use scanconf_core::UpdatePayload;

use crate::client::{ApiClient, ApiError};
use crate::queries::APPLIANCE_PATH;

const PHYSICAL_APPLIANCE_PATH: &str = "/api/2.0/fo/appliance/physical/";

/// Which update endpoint an appliance is managed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplianceKind {
    #[default]
    Virtual,
    Physical,
}

impl ApplianceKind {
    pub fn update_path(self) -> &'static str {
        match self {
            Self::Virtual => APPLIANCE_PATH,
            Self::Physical => PHYSICAL_APPLIANCE_PATH,
        }
    }
}

impl ApiClient {
    /// Replace the categories carried by `payload` on appliance `appliance_id`.
    pub async fn update_appliance(
        &self,
        appliance_id: &str,
        kind: ApplianceKind,
        payload: &UpdatePayload,
    ) -> Result<(), ApiError> {
        let params = [("action", "update"), ("id", appliance_id)]
            .into_iter()
            .chain(payload.params());
        let url = self.url(kind.update_path(), params)?;
        self.call(Method::POST, url).await?;
        Ok(())
    }
}
