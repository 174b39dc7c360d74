// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Live modification of deployed streaming dataflow plans.
//!
//! A [`LogicalPlan`] names operators and the streams between their ports. A
//! [`PhysicalPlan`] expands it into partitioned physical operators placed in
//! containers. A [`PlanModifier`] session edits either one; against a physical
//! plan it tracks what changed and [`PlanModifier::apply_changes`] hands a
//! minimal undeploy/deploy instruction set to a [`DeployDelegate`].
//!
//! ```
//! use streamplan::prelude::*;
//!
//! # fn main() -> streamplan::Result<()> {
//! let mut logical = LogicalPlan::new();
//! logical.add_operator("source", Box::new(GenericOperator::new("gen").with_output("out")))?;
//! logical.add_operator("sink", Box::new(GenericOperator::new("log").with_input("in")))?;
//! logical.add_stream("data", OutputPortRef::new("source", "out"))?;
//! logical.add_sink("data", InputPortRef::new("sink", "in"))?;
//!
//! let mut physical = PhysicalPlan::new(logical)?;
//! let mut modifier = PlanModifier::live(&mut physical);
//! modifier.add_operator("audit", Box::new(GenericOperator::new("log").with_input("in")))?;
//! modifier.add_sink("data", "audit", "in")?;
//! let plan = modifier.apply_changes(&LoggingDeployDelegate)?;
//! assert_eq!(plan.new_containers.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use core::{
    ChangeSet, Checkpoint, Container, ContainerId, DeployDelegate, DeploymentPlan, ErrorKind,
    GenericOperator, InputPortRef, LoggingDeployDelegate, LogicalPlan, Operator, OperatorMeta,
    OutputPortRef, PhysicalOperator, PhysicalOperatorId, PhysicalPlan, PlanConfig, PlanError,
    PlanModifier, PortInfo, PortMappingDescriptor, RecordingDeployDelegate, Result, SharedPlan,
    StreamMeta, set_operator_properties,
};
pub use core::prelude;
