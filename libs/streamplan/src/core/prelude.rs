// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Common imports for building and modifying plans.

pub use crate::core::PlanConfig;
pub use crate::core::delegates::{DeployDelegate, LoggingDeployDelegate};
pub use crate::core::error::{PlanError, Result};
pub use crate::core::logical::{
    GenericOperator, InputPortRef, LogicalPlan, Operator, OutputPortRef,
};
pub use crate::core::modifier::{DeploymentPlan, PlanModifier};
pub use crate::core::physical::PhysicalPlan;
pub use crate::core::shared_plan::SharedPlan;
