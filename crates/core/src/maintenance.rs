//! Maintenance vocabularies shared by actions and failures.
//!
//! Actions carry a closed `type` and `status` set; failures keep free-text
//! `type` and `status` but share the [`Severity`] scale. The string forms
//! below are what the database `CHECK` constraints accept.

use crate::error::CoreError;

/// Status given to a failure that was recorded without one.
pub const DEFAULT_FAILURE_STATUS: &str = "Open";

/// Maximum length of a failure status (matches `VARCHAR(50)`).
pub const MAX_FAILURE_STATUS_LEN: usize = 50;

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Kind of maintenance work recorded by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Maintenance,
    Repair,
    Replacement,
    Inspection,
    Calibration,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::Maintenance,
        ActionType::Repair,
        ActionType::Replacement,
        ActionType::Inspection,
        ActionType::Calibration,
    ];

    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Maintenance => "maintenance",
            ActionType::Repair => "repair",
            ActionType::Replacement => "replacement",
            ActionType::Inspection => "inspection",
            ActionType::Calibration => "calibration",
        }
    }

    /// Parse from the stored string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity scale shared by actions and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a maintenance action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 5] = [
        ActionStatus::Planned,
        ActionStatus::InProgress,
        ActionStatus::Completed,
        ActionStatus::Cancelled,
        ActionStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Planned => "Planned",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Completed => "Completed",
            ActionStatus::Cancelled => "Cancelled",
            ActionStatus::OnHold => "On Hold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an optional action type / severity / status triple from a
/// create or update payload. `None` fields are skipped.
pub fn validate_action_fields(
    action_type: Option<&str>,
    severity: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(t) = action_type {
        if ActionType::parse(t).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown action type '{t}'. Expected one of: {}",
                join(ActionType::ALL.iter().map(ActionType::as_str))
            )));
        }
    }
    validate_severity(severity)?;
    if let Some(s) = status {
        if ActionStatus::parse(s).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown action status '{s}'. Expected one of: {}",
                join(ActionStatus::ALL.iter().map(ActionStatus::as_str))
            )));
        }
    }
    Ok(())
}

/// Validate the optional severity and free-text status of a failure payload.
pub fn validate_failure_fields(
    severity: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    validate_severity(severity)?;
    if let Some(s) = status {
        if s.chars().count() > MAX_FAILURE_STATUS_LEN {
            return Err(CoreError::Validation(format!(
                "Failure status must be at most {MAX_FAILURE_STATUS_LEN} characters"
            )));
        }
    }
    Ok(())
}

fn validate_severity(severity: Option<&str>) -> Result<(), CoreError> {
    match severity {
        Some(s) if Severity::parse(s).is_none() => Err(CoreError::Validation(format!(
            "Unknown severity '{s}'. Expected one of: {}",
            join(Severity::ALL.iter().map(Severity::as_str))
        ))),
        _ => Ok(()),
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
