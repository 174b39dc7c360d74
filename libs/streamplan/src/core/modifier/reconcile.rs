// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Turns a session's change set into a deployment plan.

use std::collections::{BTreeSet, HashSet};

use super::change_set::ChangeSet;
use super::deployment_plan::DeploymentPlan;
use crate::core::error::Result;
use crate::core::physical::{PhysicalOperatorId, PhysicalPlan};

/// Place and prime new operators, then compute what to stop and (re)start.
///
/// Anything downstream of a new or rewired operator is restarted, since its
/// deployed wiring predates the change. New operators are never undeployed
/// and removed operators are never deployed. Operators left unplaced by an
/// abandoned earlier session were never deployed either, so they are handled
/// as new here.
pub(crate) fn reconcile(
    physical: &mut PhysicalPlan,
    changes: &ChangeSet,
) -> Result<DeploymentPlan> {
    let removed_operators = changes.removed_operators();

    let mut new_operators = changes.new_operators().clone();
    let leftover: Vec<PhysicalOperatorId> = physical
        .unplaced_operators()
        .into_iter()
        .filter(|id| !new_operators.contains(id))
        .collect();
    if !leftover.is_empty() {
        tracing::warn!(
            "[RECONCILE] {} operator(s) from an unfinished session, deploying as new",
            leftover.len()
        );
        new_operators.extend(leftover);
    }

    let (new_containers, release_containers) = physical.assign_containers(&new_operators);

    for id in &new_operators {
        physical.init_checkpoint(*id)?;
    }

    // existing downstream operators require redeploy
    let new_dependents = physical.dependents(&new_operators);
    let mut undeploy: HashSet<PhysicalOperatorId> =
        new_dependents.difference(&new_operators).copied().collect();
    let mut deploy = new_dependents;

    let redeploy = physical.dependents(changes.affected_operators());

    undeploy.extend(redeploy.iter().copied());
    undeploy.extend(removed_operators.iter().copied());
    undeploy.retain(|id| !new_operators.contains(id));

    deploy.extend(redeploy);
    deploy.retain(|id| !removed_operators.contains(id));

    tracing::debug!(
        "[RECONCILE] new {}, affected {}, removed {}",
        new_operators.len(),
        changes.affected_operators().len(),
        removed_operators.len()
    );

    Ok(DeploymentPlan {
        release_containers,
        undeploy: sorted(undeploy),
        new_containers,
        deploy: sorted(deploy),
    })
}

fn sorted(ids: HashSet<PhysicalOperatorId>) -> BTreeSet<PhysicalOperatorId> {
    ids.into_iter().collect()
}
