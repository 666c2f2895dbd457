// ABOUTME: Function lifecycle states reported by the provider control plane.
// ABOUTME: Active is the only state that accepts a mutation; *Failed states are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle snapshot of a function. Never cached across steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionStatus {
    Creating,
    CreateFailed,
    Active,
    Updating,
    UpdateFailed,
    Publishing,
    PublishFailed,
    Deleting,
    DeleteFailed,
    /// A status this tool does not know, kept verbatim.
    Other(String),
}

impl FunctionStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "Creating" => FunctionStatus::Creating,
            "CreateFailed" => FunctionStatus::CreateFailed,
            "Active" => FunctionStatus::Active,
            "Updating" => FunctionStatus::Updating,
            "UpdateFailed" => FunctionStatus::UpdateFailed,
            "Publishing" => FunctionStatus::Publishing,
            "PublishFailed" => FunctionStatus::PublishFailed,
            "Deleting" => FunctionStatus::Deleting,
            "DeleteFailed" => FunctionStatus::DeleteFailed,
            other => FunctionStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FunctionStatus::Creating => "Creating",
            FunctionStatus::CreateFailed => "CreateFailed",
            FunctionStatus::Active => "Active",
            FunctionStatus::Updating => "Updating",
            FunctionStatus::UpdateFailed => "UpdateFailed",
            FunctionStatus::Publishing => "Publishing",
            FunctionStatus::PublishFailed => "PublishFailed",
            FunctionStatus::Deleting => "Deleting",
            FunctionStatus::DeleteFailed => "DeleteFailed",
            FunctionStatus::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FunctionStatus::Active)
    }

    /// Any state whose name contains "Failed" is a terminal failure.
    pub fn is_failed(&self) -> bool {
        self.as_str().contains("Failed")
    }

    /// Neither Active nor failed: the control plane is still working.
    pub fn is_transitional(&self) -> bool {
        !self.is_active() && !self.is_failed()
    }
}

impl From<String> for FunctionStatus {
    fn from(value: String) -> Self {
        FunctionStatus::from_wire(&value)
    }
}

impl From<FunctionStatus> for String {
    fn from(status: FunctionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for FunctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
