// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::error::{PlanError, Result};

/// Declared port of an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    pub name: String,
    /// Tuple type carried by the port. `None` accepts anything.
    #[serde(default)]
    pub data_type: Option<String>,
}

impl PortInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type.into()),
        }
    }

    /// Whether a stream from `self` (output) may feed `sink` (input).
    pub fn is_compatible_with(&self, sink: &PortInfo) -> bool {
        match (&self.data_type, &sink.data_type) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Named input and output ports declared by an operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMappingDescriptor {
    pub input_ports: BTreeMap<String, PortInfo>,
    pub output_ports: BTreeMap<String, PortInfo>,
}

impl PortMappingDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, port: PortInfo) -> Self {
        self.input_ports.insert(port.name.clone(), port);
        self
    }

    pub fn with_output(mut self, port: PortInfo) -> Self {
        self.output_ports.insert(port.name.clone(), port);
        self
    }

    pub fn input(&self, name: &str) -> Option<&PortInfo> {
        self.input_ports.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&PortInfo> {
        self.output_ports.get(name)
    }
}

/// Handle to an output port: the source end of a stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputPortRef {
    pub operator: String,
    pub port: String,
}

/// Handle to an input port: one sink of a stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InputPortRef {
    pub operator: String,
    pub port: String,
}

macro_rules! port_ref_impl {
    ($ty:ident) => {
        impl $ty {
            pub fn new(operator: impl Into<String>, port: impl Into<String>) -> Self {
                Self {
                    operator: operator.into(),
                    port: port.into(),
                }
            }

            /// Parse "operator.port" format.
            pub fn parse(address: &str) -> Result<Self> {
                let (operator, port) = address.split_once('.').ok_or_else(|| {
                    PlanError::NotFound(format!(
                        "Invalid port address '{}'. Expected format: 'operator.port'",
                        address
                    ))
                })?;

                if operator.is_empty() || port.is_empty() {
                    return Err(PlanError::NotFound(format!(
                        "Empty operator or port name in port address '{}'",
                        address
                    )));
                }

                Ok(Self::new(operator, port))
            }

            pub fn to_address(&self) -> String {
                format!("{}.{}", self.operator, self.port)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}", self.operator, self.port)
            }
        }
    };
}

port_ref_impl!(OutputPortRef);
port_ref_impl!(InputPortRef);
