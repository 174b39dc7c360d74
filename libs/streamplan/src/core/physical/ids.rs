// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a deployed (or deployable) physical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalOperatorId(u32);

impl PhysicalOperatorId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PhysicalOperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PTOperator[{}]", self.0)
    }
}

impl From<u32> for PhysicalOperatorId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identifier of an execution container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(u32);

impl ContainerId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PTContainer[{}]", self.0)
    }
}

impl From<u32> for ContainerId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Monotonic id source. Ids are never reused within one plan.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdSequence(u32);

impl IdSequence {
    pub(crate) fn next<T: From<u32>>(&mut self) -> T {
        self.0 += 1;
        T::from(self.0)
    }
}
