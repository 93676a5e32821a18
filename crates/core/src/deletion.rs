//! Asset deletion policy.

use crate::error::CoreError;
use crate::types::DbId;

/// What happens to an asset's actions, failures and documents when the
/// asset is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetDeletePolicy {
    /// Refuse the deletion while any child row references the asset.
    #[default]
    Restrict,
    /// Delete every child row, then the asset, in one transaction.
    Cascade,
}

impl AssetDeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetDeletePolicy::Restrict => "restrict",
            AssetDeletePolicy::Cascade => "cascade",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(AssetDeletePolicy::Restrict),
            "cascade" => Ok(AssetDeletePolicy::Cascade),
            other => Err(CoreError::Validation(format!(
                "Unknown asset delete policy '{other}'. Expected 'restrict' or 'cascade'"
            ))),
        }
    }
}

/// Child rows referencing one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssetDependents {
    pub actions: i64,
    pub failures: i64,
    pub documents: i64,
}

impl AssetDependents {
    pub fn is_empty(&self) -> bool {
        self.actions == 0 && self.failures == 0 && self.documents == 0
    }
}

/// Decide whether asset `id` may be deleted under `policy`.
pub fn check_asset_deletion(
    policy: AssetDeletePolicy,
    id: DbId,
    dependents: AssetDependents,
) -> Result<(), CoreError> {
    if policy == AssetDeletePolicy::Cascade || dependents.is_empty() {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Asset {id} still has {} action(s), {} failure(s) and {} document(s)",
        dependents.actions, dependents.failures, dependents.documents
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(AssetDeletePolicy::parse("Cascade").unwrap(), AssetDeletePolicy::Cascade);
        assert_eq!(AssetDeletePolicy::parse(" restrict ").unwrap(), AssetDeletePolicy::Restrict);
        assert_matches!(AssetDeletePolicy::parse("orphan"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn restrict_refuses_when_children_exist() {
        let deps = AssetDependents {
            failures: 1,
            ..Default::default()
        };
        assert_matches!(
            check_asset_deletion(AssetDeletePolicy::Restrict, 4, deps),
            Err(CoreError::Conflict(msg)) if msg.contains("1 failure")
        );
    }

    #[test]
    fn restrict_allows_childless_asset() {
        assert!(check_asset_deletion(AssetDeletePolicy::Restrict, 4, AssetDependents::default()).is_ok());
    }

    #[test]
    fn cascade_always_allows() {
        let deps = AssetDependents {
            actions: 3,
            failures: 2,
            documents: 1,
        };
        assert!(check_asset_deletion(AssetDeletePolicy::Cascade, 4, deps).is_ok());
    }
}
