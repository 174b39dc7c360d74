// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::operator::Operator;
use super::ports::PortMappingDescriptor;

/// Logical operator entry: the operator instance plus plan attributes.
#[derive(Debug, Clone)]
pub struct OperatorMeta {
    pub name: String,
    operator: Box<dyn Operator>,
    ports: PortMappingDescriptor,
    partition_count: usize,
}

impl OperatorMeta {
    pub(crate) fn new(
        name: impl Into<String>,
        operator: Box<dyn Operator>,
        partition_count: usize,
    ) -> Self {
        let ports = operator.describe_ports();
        Self {
            name: name.into(),
            operator,
            ports,
            partition_count,
        }
    }

    pub fn operator(&self) -> &dyn Operator {
        self.operator.as_ref()
    }

    pub fn operator_mut(&mut self) -> &mut dyn Operator {
        self.operator.as_mut()
    }

    /// Ports as declared when the operator was added.
    pub fn ports(&self) -> &PortMappingDescriptor {
        &self.ports
    }

    /// Number of physical operators this logical operator maps to.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    pub(crate) fn set_partition_count(&mut self, count: usize) {
        self.partition_count = count;
    }
}
