// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::ids::{ContainerId, PhysicalOperatorId};

/// Recovery point of a physical operator, identified by window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Checkpoint {
    pub window_id: i64,
}

impl Checkpoint {
    /// Window id of a checkpoint that precedes all processed data.
    pub const INITIAL_WINDOW_ID: i64 = -1;

    pub fn initial() -> Self {
        Self {
            window_id: Self::INITIAL_WINDOW_ID,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.window_id == Self::INITIAL_WINDOW_ID
    }
}

/// One partition of a logical operator.
#[derive(Debug, Clone)]
pub struct PhysicalOperator {
    pub id: PhysicalOperatorId,
    /// Name of the logical operator this instance belongs to.
    pub logical_name: String,
    pub partition: usize,
    container: Option<ContainerId>,
    recovery_checkpoint: Option<Checkpoint>,
    pub(crate) node: NodeIndex,
}

impl PhysicalOperator {
    pub(crate) fn new(
        id: PhysicalOperatorId,
        logical_name: impl Into<String>,
        partition: usize,
        node: NodeIndex,
    ) -> Self {
        Self {
            id,
            logical_name: logical_name.into(),
            partition,
            container: None,
            recovery_checkpoint: None,
            node,
        }
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    pub(crate) fn set_container(&mut self, container: Option<ContainerId>) {
        self.container = container;
    }

    pub fn recovery_checkpoint(&self) -> Option<Checkpoint> {
        self.recovery_checkpoint
    }

    pub(crate) fn set_recovery_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.recovery_checkpoint = Some(checkpoint);
    }
}
