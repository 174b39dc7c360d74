// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::BTreeSet;

use super::ids::{ContainerId, PhysicalOperatorId};

/// Execution slot hosting one or more physical operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: ContainerId,
    operators: BTreeSet<PhysicalOperatorId>,
}

impl Container {
    pub(crate) fn new(id: ContainerId) -> Self {
        Self {
            id,
            operators: BTreeSet::new(),
        }
    }

    pub fn operators(&self) -> &BTreeSet<PhysicalOperatorId> {
        &self.operators
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub(crate) fn host(&mut self, id: PhysicalOperatorId) {
        self.operators.insert(id);
    }

    pub(crate) fn evict(&mut self, id: PhysicalOperatorId) -> bool {
        self.operators.remove(&id)
    }
}
