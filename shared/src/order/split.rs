//! Bill-split plan
//!
//! Splitting is client-coordinated: the plan partitions an order's line
//! items into groups, each of which becomes one invoice when the order is
//! closed. The plan itself is never persisted; an abandoned split costs
//! nothing. [`validate_partition`] is the completeness gate the server
//! runs before committing: every item in exactly one group.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::snapshot::OrderItem;

/// One sub-bill of the partition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitGroup {
    /// Optional display label ("Maria", "seat 2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Line IDs assigned to this sub-bill
    pub item_ids: Vec<String>,
}

/// Client-held partition of an order's items into N sub-bills
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitPlan {
    pub splits: Vec<SplitGroup>,
}

/// Ways a plan can fail the partition-completeness check
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SplitPlanError {
    #[error("split plan has no groups")]
    EmptyPlan,

    #[error("split group {0} is empty")]
    EmptyGroup(usize),

    #[error("item {0} is not part of the order")]
    UnknownItem(String),

    #[error("item {0} is assigned to more than one group")]
    DuplicateItem(String),

    #[error("{0} item(s) are not assigned to any group")]
    UnassignedItems(usize),
}

/// Check that `plan` is an exact partition of `items`: no duplicates, no
/// omissions, no unknown ids, no empty group.
pub fn validate_partition(items: &[OrderItem], plan: &SplitPlan) -> Result<(), SplitPlanError> {
    if plan.splits.is_empty() {
        return Err(SplitPlanError::EmptyPlan);
    }

    let order_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    let mut assigned: HashSet<&str> = HashSet::new();

    for (idx, group) in plan.splits.iter().enumerate() {
        if group.item_ids.is_empty() {
            return Err(SplitPlanError::EmptyGroup(idx));
        }
        for item_id in &group.item_ids {
            if !order_ids.contains(item_id.as_str()) {
                return Err(SplitPlanError::UnknownItem(item_id.clone()));
            }
            if !assigned.insert(item_id.as_str()) {
                return Err(SplitPlanError::DuplicateItem(item_id.clone()));
            }
        }
    }

    let unassigned = order_ids.len() - assigned.len();
    if unassigned > 0 {
        return Err(SplitPlanError::UnassignedItems(unassigned));
    }

    Ok(())
}
