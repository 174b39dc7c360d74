// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::ports::{InputPortRef, OutputPortRef};

/// A named stream: one output port feeding any number of input ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMeta {
    pub name: String,
    pub source: OutputPortRef,
    pub sinks: Vec<InputPortRef>,
}

impl StreamMeta {
    pub(crate) fn new(name: impl Into<String>, source: OutputPortRef) -> Self {
        Self {
            name: name.into(),
            source,
            sinks: Vec::new(),
        }
    }

    pub fn has_sink(&self, sink: &InputPortRef) -> bool {
        self.sinks.iter().any(|s| s == sink)
    }

    /// Whether any sink belongs to `operator`.
    pub fn feeds(&self, operator: &str) -> bool {
        self.sinks.iter().any(|s| s.operator == operator)
    }

    /// A stream with no sinks carries data nowhere.
    pub fn is_dangling(&self) -> bool {
        self.sinks.is_empty()
    }
}
