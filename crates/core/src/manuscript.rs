//! Manuscript status machine and group-confirmation rules.
//!
//! A manuscript starts `pending` and is resolved by the advertiser to
//! `approved` or `revision` through the tokenized confirmation endpoint.
//! Staff actions re-enter the cycle: a resend puts a `revision` manuscript
//! back to `pending`, a template change retires the old row as `cancelled`
//! and inserts a fresh `pending` one. `auto_approved` is reached only by the
//! SLA sweep, never by the advertiser.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Statuses
-------------------------------------------------------------------------- */

/// Awaiting the advertiser's decision.
pub const STATUS_PENDING: &str = "pending";

/// Approved by the advertiser.
pub const STATUS_APPROVED: &str = "approved";

/// Advertiser requested changes.
pub const STATUS_REVISION: &str = "revision";

/// Superseded by a template change; never advertiser-reachable.
pub const STATUS_CANCELLED: &str = "cancelled";

/// Approved automatically after the SLA window elapsed with no response.
pub const STATUS_AUTO_APPROVED: &str = "auto_approved";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_APPROVED,
    STATUS_REVISION,
    STATUS_CANCELLED,
    STATUS_AUTO_APPROVED,
];

/// Validate a manuscript status string.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/* --------------------------------------------------------------------------
Confirmation actions
-------------------------------------------------------------------------- */

/// The two decisions an advertiser can submit against a confirm token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Approve,
    Revision,
}

impl ConfirmAction {
    pub fn parse(action: &str) -> Result<Self, CoreError> {
        match action {
            "approve" => Ok(Self::Approve),
            "revision" => Ok(Self::Revision),
            other => Err(CoreError::Validation(format!(
                "Invalid action '{other}'. Must be 'approve' or 'revision'"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Target resolution
-------------------------------------------------------------------------- */

/// Minimal view of a manuscript used when resolving confirmation targets.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub id: DbId,
    pub status: String,
}

impl GroupMember {
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }
}

/// Resolve the manuscript ids a confirmation action applies to.
///
/// `manuscript` is the row the token resolved to. `siblings` are all members
/// of its group in creation order (empty when it is not grouped). When the
/// caller names a specific `manuscript_id`, that id must be the token's own
/// manuscript or one of its group siblings; a leaked token cannot be used to
/// act on an unrelated row. Without an explicit id, a grouped token targets
/// every sibling still pending; an ungrouped token targets itself.
///
/// A fully resolved group yields the token's own manuscript as the sole
/// target, so the subsequent conditional update matches nothing and the
/// caller reports `AlreadyProcessed` with that manuscript's status.
pub fn resolve_targets(
    manuscript: &GroupMember,
    siblings: &[GroupMember],
    requested: Option<DbId>,
) -> Result<Vec<DbId>, CoreError> {
    if let Some(id) = requested {
        let in_group = id == manuscript.id || siblings.iter().any(|m| m.id == id);
        if !in_group {
            return Err(CoreError::Forbidden(
                "Manuscript does not belong to this confirmation group".to_string(),
            ));
        }
        return Ok(vec![id]);
    }

    if !siblings.is_empty() {
        let pending: Vec<DbId> = siblings
            .iter()
            .filter(|m| m.is_pending())
            .map(|m| m.id)
            .collect();
        if !pending.is_empty() {
            return Ok(pending);
        }
    }

    Ok(vec![manuscript.id])
}

/* --------------------------------------------------------------------------
Stats
-------------------------------------------------------------------------- */

/// Aggregate manuscript counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManuscriptStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub revision: i64,
    pub cancelled: i64,
    pub auto_approved: i64,
}

impl ManuscriptStats {
    /// Assemble stats from `(status, count)` pairs as returned by a
    /// `GROUP BY status` query. Unknown statuses still count toward the total.
    pub fn from_counts(counts: &[(String, i64)]) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            stats.total += count;
            match status.as_str() {
                STATUS_PENDING => stats.pending += count,
                STATUS_APPROVED => stats.approved += count,
                STATUS_REVISION => stats.revision += count,
                STATUS_CANCELLED => stats.cancelled += count,
                STATUS_AUTO_APPROVED => stats.auto_approved += count,
                _ => {}
            }
        }
        stats
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn member(id: DbId, status: &str) -> GroupMember {
        GroupMember {
            id,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_all_statuses_accepted() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(validate_status("archived").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn test_parse_confirm_action() {
        assert_eq!(ConfirmAction::parse("approve").unwrap(), ConfirmAction::Approve);
        assert_eq!(ConfirmAction::parse("revision").unwrap(), ConfirmAction::Revision);
        assert_matches!(ConfirmAction::parse("reject"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_group_action_targets_pending_siblings_only() {
        let token_row = member(1, STATUS_PENDING);
        let siblings = vec![
            member(1, STATUS_PENDING),
            member(2, STATUS_APPROVED),
            member(3, STATUS_PENDING),
        ];
        let targets = resolve_targets(&token_row, &siblings, None).unwrap();
        assert_eq!(targets, vec![1, 3]);
    }

    #[test]
    fn test_resolved_group_falls_back_to_token_manuscript() {
        let token_row = member(1, STATUS_APPROVED);
        let siblings = vec![member(1, STATUS_APPROVED), member(2, STATUS_REVISION)];
        let targets = resolve_targets(&token_row, &siblings, None).unwrap();
        assert_eq!(targets, vec![1]);
    }

    #[test]
    fn test_ungrouped_token_targets_itself() {
        let token_row = member(7, STATUS_PENDING);
        let targets = resolve_targets(&token_row, &[], None).unwrap();
        assert_eq!(targets, vec![7]);
    }

    #[test]
    fn test_explicit_id_targets_single_sibling() {
        let token_row = member(1, STATUS_PENDING);
        let siblings = vec![member(1, STATUS_PENDING), member(2, STATUS_PENDING)];
        let targets = resolve_targets(&token_row, &siblings, Some(2)).unwrap();
        assert_eq!(targets, vec![2]);
    }

    #[test]
    fn test_explicit_id_outside_group_is_forbidden() {
        let token_row = member(1, STATUS_PENDING);
        let siblings = vec![member(1, STATUS_PENDING), member(2, STATUS_PENDING)];
        assert_matches!(
            resolve_targets(&token_row, &siblings, Some(99)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_explicit_id_on_ungrouped_token_must_match() {
        let token_row = member(5, STATUS_PENDING);
        assert_eq!(resolve_targets(&token_row, &[], Some(5)).unwrap(), vec![5]);
        assert_matches!(
            resolve_targets(&token_row, &[], Some(6)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_stats_from_counts() {
        let counts = vec![
            (STATUS_PENDING.to_string(), 4),
            (STATUS_APPROVED.to_string(), 2),
            (STATUS_CANCELLED.to_string(), 1),
        ];
        let stats = ManuscriptStats::from_counts(&counts);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.revision, 0);
        assert_eq!(stats.auto_approved, 0);
    }
}
