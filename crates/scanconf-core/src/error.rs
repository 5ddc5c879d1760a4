use thiserror::Error;

/// Errors raised by the core appliance model.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Appliance {name} does not exist in subscription")]
    UnknownAppliance { name: String },

    #[error("Invalid operation '{token}' for appliance {appliance}: expected add or remove")]
    InvalidOperation { appliance: String, token: String },

    #[error("Failed to parse appliance snapshot: {0}")]
    SnapshotParse(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
