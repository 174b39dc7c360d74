// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Physical plan: partitions, containers and physical wiring.

mod container;
mod ids;
mod operator;
mod physical_plan;
mod placement;

pub use container::Container;
pub use ids::{ContainerId, PhysicalOperatorId};
pub use operator::{Checkpoint, PhysicalOperator};
pub use physical_plan::PhysicalPlan;
