//! Requested changes: one entry to add to or remove from a named appliance.

use std::fmt;
use std::str::FromStr;

use crate::entry::Entry;

/// Add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
}

/// Token that is neither `add` nor `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(UnknownOperation(s.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// A single desired mutation, joined to an appliance by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub appliance_name: String,
    pub entry: Entry,
    pub operation: Operation,
}

impl ChangeRequest {
    pub fn new(
        appliance_name: impl Into<String>,
        entry: impl Into<Entry>,
        operation: Operation,
    ) -> Self {
        Self {
            appliance_name: appliance_name.into(),
            entry: entry.into(),
            operation,
        }
    }

    pub fn add(appliance_name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        Self::new(appliance_name, entry, Operation::Add)
    }

    pub fn remove(appliance_name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        Self::new(appliance_name, entry, Operation::Remove)
    }
}
