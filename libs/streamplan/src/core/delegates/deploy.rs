// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Deployment delegate trait: the executor that carries out a reconciled plan.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::Result;
use crate::core::modifier::DeploymentPlan;
use crate::core::physical::{ContainerId, PhysicalOperatorId};

/// Executor for plan changes.
///
/// Implementations must undeploy before they deploy within a container, so
/// that no container runs old and new wiring at the same time. Whether the
/// call blocks until the cluster has converged is up to the implementation.
///
/// A blanket implementation is provided for `Arc<dyn DeployDelegate>`,
/// so you can pass an Arc directly where a `DeployDelegate` is expected.
pub trait DeployDelegate: Send + Sync {
    fn deploy(
        &self,
        release_containers: &BTreeSet<ContainerId>,
        undeploy: &BTreeSet<PhysicalOperatorId>,
        new_containers: &BTreeSet<ContainerId>,
        deploy: &BTreeSet<PhysicalOperatorId>,
    ) -> Result<()>;
}

// =============================================================================
// Blanket implementation for Arc wrapper
// =============================================================================

impl DeployDelegate for Arc<dyn DeployDelegate> {
    fn deploy(
        &self,
        release_containers: &BTreeSet<ContainerId>,
        undeploy: &BTreeSet<PhysicalOperatorId>,
        new_containers: &BTreeSet<ContainerId>,
        deploy: &BTreeSet<PhysicalOperatorId>,
    ) -> Result<()> {
        (**self).deploy(release_containers, undeploy, new_containers, deploy)
    }
}

// =============================================================================
// Default implementations
// =============================================================================

/// Logs the instruction set and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDeployDelegate;

impl DeployDelegate for LoggingDeployDelegate {
    fn deploy(
        &self,
        release_containers: &BTreeSet<ContainerId>,
        undeploy: &BTreeSet<PhysicalOperatorId>,
        new_containers: &BTreeSet<ContainerId>,
        deploy: &BTreeSet<PhysicalOperatorId>,
    ) -> Result<()> {
        tracing::info!(
            "[DEPLOY] release {:?}, undeploy {:?}, new containers {:?}, deploy {:?}",
            release_containers,
            undeploy,
            new_containers,
            deploy
        );
        Ok(())
    }
}

/// Keeps every instruction set it receives.
#[derive(Debug, Default)]
pub struct RecordingDeployDelegate {
    calls: Mutex<Vec<DeploymentPlan>>,
}

impl RecordingDeployDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeploymentPlan> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last(&self) -> Option<DeploymentPlan> {
        self.calls.lock().last().cloned()
    }
}

impl DeployDelegate for RecordingDeployDelegate {
    fn deploy(
        &self,
        release_containers: &BTreeSet<ContainerId>,
        undeploy: &BTreeSet<PhysicalOperatorId>,
        new_containers: &BTreeSet<ContainerId>,
        deploy: &BTreeSet<PhysicalOperatorId>,
    ) -> Result<()> {
        self.calls.lock().push(DeploymentPlan {
            release_containers: release_containers.clone(),
            undeploy: undeploy.clone(),
            new_containers: new_containers.clone(),
            deploy: deploy.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_delegate_through_arc() {
        let recorder = Arc::new(RecordingDeployDelegate::new());
        let delegate: Arc<dyn DeployDelegate> = recorder.clone();

        let undeploy = BTreeSet::from([PhysicalOperatorId::new(1)]);
        delegate
            .deploy(&BTreeSet::new(), &undeploy, &BTreeSet::new(), &BTreeSet::new())
            .unwrap();

        assert_eq!(recorder.call_count(), 1);
        assert_eq!(recorder.last().unwrap().undeploy, undeploy);
    }

    #[test]
    fn test_logging_delegate_succeeds() {
        let empty = BTreeSet::new();
        let ops = BTreeSet::new();
        assert!(LoggingDeployDelegate.deploy(&empty, &ops, &empty, &ops).is_ok());
    }
}
