// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Operator capability trait consumed by the logical plan.

use std::fmt;

use serde_json::{Map, Value};

use super::ports::{PortInfo, PortMappingDescriptor};
use crate::core::error::{PlanError, Result};

/// A processing stage that can be placed into a logical plan.
///
/// The plan never inspects an operator beyond this trait: ports are resolved
/// by name through [`Operator::describe_ports`], and configuration is
/// exchanged as JSON.
pub trait Operator: Send + Sync + fmt::Debug {
    /// Type name used in logs and diagnostics.
    fn operator_type(&self) -> &str;

    /// Declared input and output ports.
    fn describe_ports(&self) -> PortMappingDescriptor;

    /// Current configuration as a JSON value.
    fn config_json(&self) -> Value;

    /// Replace the configuration.
    fn apply_config_json(&mut self, config: &Value) -> Result<()>;

    fn clone_box(&self) -> Box<dyn Operator>;
}

impl Clone for Box<dyn Operator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Operator described entirely by data: a type name, a port list and a JSON
/// object config.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericOperator {
    operator_type: String,
    ports: PortMappingDescriptor,
    config: Map<String, Value>,
}

impl GenericOperator {
    pub fn new(operator_type: impl Into<String>) -> Self {
        Self {
            operator_type: operator_type.into(),
            ports: PortMappingDescriptor::new(),
            config: Map::new(),
        }
    }

    pub fn with_input(mut self, name: &str) -> Self {
        self.ports = self.ports.with_input(PortInfo::new(name));
        self
    }

    pub fn with_output(mut self, name: &str) -> Self {
        self.ports = self.ports.with_output(PortInfo::new(name));
        self
    }

    pub fn with_port(mut self, port: PortInfo, is_input: bool) -> Self {
        self.ports = if is_input {
            self.ports.with_input(port)
        } else {
            self.ports.with_output(port)
        };
        self
    }

    pub fn with_config(mut self, key: &str, value: Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }
}

impl Operator for GenericOperator {
    fn operator_type(&self) -> &str {
        &self.operator_type
    }

    fn describe_ports(&self) -> PortMappingDescriptor {
        self.ports.clone()
    }

    fn config_json(&self) -> Value {
        Value::Object(self.config.clone())
    }

    fn apply_config_json(&mut self, config: &Value) -> Result<()> {
        match config {
            Value::Object(map) => {
                self.config = map.clone();
                Ok(())
            }
            other => Err(PlanError::Configuration(format!(
                "{} expects an object config, got {}",
                self.operator_type, other
            ))),
        }
    }

    fn clone_box(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generic_operator_ports() {
        let op = GenericOperator::new("filter")
            .with_input("in")
            .with_output("out")
            .with_output("rejected");
        let ports = op.describe_ports();
        assert!(ports.input("in").is_some());
        assert_eq!(ports.output_ports.len(), 2);
        assert!(ports.output("in").is_none());
    }

    #[test]
    fn test_generic_operator_rejects_non_object_config() {
        let mut op = GenericOperator::new("filter");
        assert!(op.apply_config_json(&json!([1, 2])).is_err());
        op.apply_config_json(&json!({"threshold": 3})).unwrap();
        assert_eq!(op.config().get("threshold"), Some(&json!(3)));
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let original: Box<dyn Operator> =
            Box::new(GenericOperator::new("map").with_config("k", json!(1)));
        let mut copy = original.clone();
        copy.apply_config_json(&json!({"k": 2})).unwrap();
        assert_eq!(original.config_json(), json!({"k": 1}));
        assert_eq!(copy.config_json(), json!({"k": 2}));
    }
}
