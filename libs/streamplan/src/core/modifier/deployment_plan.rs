// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::physical::{ContainerId, PhysicalOperatorId};

/// Instruction set produced by reconciliation and handed to the deployer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Containers left empty, to be returned to the cluster.
    pub release_containers: BTreeSet<ContainerId>,
    /// Running operators to stop before rewiring.
    pub undeploy: BTreeSet<PhysicalOperatorId>,
    /// Containers requested for new operators.
    pub new_containers: BTreeSet<ContainerId>,
    /// Operators to (re)start with current wiring.
    pub deploy: BTreeSet<PhysicalOperatorId>,
}

impl DeploymentPlan {
    pub fn is_empty(&self) -> bool {
        self.release_containers.is_empty()
            && self.undeploy.is_empty()
            && self.new_containers.is_empty()
            && self.deploy.is_empty()
    }
}

impl fmt::Display for DeploymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "-{} containers, undeploy {}, +{} containers, deploy {}",
            self.release_containers.len(),
            self.undeploy.len(),
            self.new_containers.len(),
            self.deploy.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_ids() {
        let plan = DeploymentPlan {
            undeploy: BTreeSet::from([PhysicalOperatorId::new(2)]),
            deploy: BTreeSet::from([PhysicalOperatorId::new(2), PhysicalOperatorId::new(5)]),
            ..Default::default()
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["deploy"], serde_json::json!([2, 5]));
        assert_eq!(plan.to_string(), "-0 containers, undeploy 1, +0 containers, deploy 2");
    }
}
