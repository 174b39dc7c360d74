// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Logical plan: operators, ports and streams.

mod logical_plan;
mod operator;
mod operator_meta;
mod ports;
mod properties;
mod stream_meta;
mod validation;

pub use logical_plan::LogicalPlan;
pub use operator::{GenericOperator, Operator};
pub use operator_meta::OperatorMeta;
pub use ports::{InputPortRef, OutputPortRef, PortInfo, PortMappingDescriptor};
pub use properties::set_operator_properties;
pub use stream_meta::StreamMeta;
pub use validation::validate_plan;
