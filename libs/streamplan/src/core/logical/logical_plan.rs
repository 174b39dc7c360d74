// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::{BTreeMap, BTreeSet};

use super::operator::Operator;
use super::operator_meta::OperatorMeta;
use super::ports::{InputPortRef, OutputPortRef, PortInfo};
use super::stream_meta::StreamMeta;
use super::validation::{self, OperatorTopology};
use crate::core::config::PlanConfig;
use crate::core::error::{PlanError, Result};

/// Logical DAG of named operators connected by named streams.
///
/// Structural rules enforced here: names are unique, streams attach to
/// declared ports only, an input port carries at most one stream, and no
/// stream may close a cycle.
#[derive(Debug, Clone, Default)]
pub struct LogicalPlan {
    operators: BTreeMap<String, OperatorMeta>,
    streams: BTreeMap<String, StreamMeta>,
    config: PlanConfig,
}

impl LogicalPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_operator(&self, name: &str) -> Option<&OperatorMeta> {
        self.operators.get(name)
    }

    pub fn get_operator_mut(&mut self, name: &str) -> Option<&mut OperatorMeta> {
        self.operators.get_mut(name)
    }

    pub fn get_stream(&self, name: &str) -> Option<&StreamMeta> {
        self.streams.get(name)
    }

    pub fn operators(&self) -> impl Iterator<Item = &OperatorMeta> {
        self.operators.values()
    }

    pub fn streams(&self) -> impl Iterator<Item = &StreamMeta> {
        self.streams.values()
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Streams with at least one sink on `operator`.
    pub fn input_streams(&self, operator: &str) -> Vec<&StreamMeta> {
        self.streams.values().filter(|s| s.feeds(operator)).collect()
    }

    /// Streams sourced from `operator`.
    pub fn output_streams(&self, operator: &str) -> Vec<&StreamMeta> {
        self.streams
            .values()
            .filter(|s| s.source.operator == operator)
            .collect()
    }

    /// The stream connected to an input port, if any.
    pub fn stream_for_input(&self, port: &InputPortRef) -> Option<&StreamMeta> {
        self.streams.values().find(|s| s.has_sink(port))
    }

    /// Look up a declared output port.
    pub fn output_port(&self, port: &OutputPortRef) -> Result<&PortInfo> {
        let meta = self.operators.get(&port.operator).ok_or_else(|| {
            PlanError::NotFound(format!("Invalid operator name {}", port.operator))
        })?;
        meta.ports().output(&port.port).ok_or_else(|| {
            PlanError::NotFound(format!("Invalid port {} ({})", port.port, meta.name))
        })
    }

    /// Look up a declared input port.
    pub fn input_port(&self, port: &InputPortRef) -> Result<&PortInfo> {
        let meta = self.operators.get(&port.operator).ok_or_else(|| {
            PlanError::NotFound(format!("Invalid operator name {}", port.operator))
        })?;
        meta.ports().input(&port.port).ok_or_else(|| {
            PlanError::NotFound(format!("Invalid port {} ({})", port.port, meta.name))
        })
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn add_operator(
        &mut self,
        name: impl Into<String>,
        operator: Box<dyn Operator>,
    ) -> Result<&OperatorMeta> {
        let name = name.into();
        if self.operators.contains_key(&name) {
            return Err(PlanError::Validation(format!(
                "Operator {} already exists",
                name
            )));
        }

        tracing::debug!("[LOGICAL] add operator {} ({})", name, operator.operator_type());
        let meta = OperatorMeta::new(
            name.clone(),
            operator,
            self.config.default_partition_count,
        );
        Ok(self.operators.entry(name).or_insert(meta))
    }

    pub fn set_partition_count(&mut self, name: &str, count: usize) -> Result<()> {
        if count == 0 {
            return Err(PlanError::Validation(format!(
                "Operator {} needs at least one partition",
                name
            )));
        }
        let meta = self
            .operators
            .get_mut(name)
            .ok_or_else(|| PlanError::NotFound(format!("Invalid operator name {}", name)))?;
        meta.set_partition_count(count);
        Ok(())
    }

    /// Remove an operator, its outgoing streams, and its sinks on other streams.
    pub fn remove_operator(&mut self, name: &str) -> Option<OperatorMeta> {
        let meta = self.operators.remove(name)?;

        self.streams.retain(|_, s| s.source.operator != name);
        for stream in self.streams.values_mut() {
            stream.sinks.retain(|sink| sink.operator != name);
        }

        tracing::debug!("[LOGICAL] removed operator {}", name);
        Some(meta)
    }

    // =========================================================================
    // Streams
    // =========================================================================

    pub fn add_stream(
        &mut self,
        name: impl Into<String>,
        source: OutputPortRef,
    ) -> Result<&StreamMeta> {
        let name = name.into();
        if self.streams.contains_key(&name) {
            return Err(PlanError::Validation(format!(
                "Stream {} already exists",
                name
            )));
        }
        self.output_port(&source)?;

        tracing::debug!("[LOGICAL] add stream {} from {}", name, source);
        let stream = StreamMeta::new(name.clone(), source);
        Ok(self.streams.entry(name).or_insert(stream))
    }

    /// Check that every port in `sinks` could be attached to a stream sourced
    /// at `source`. Leaves the plan untouched.
    pub fn check_sinks(&self, source: &OutputPortRef, sinks: &[InputPortRef]) -> Result<()> {
        let source_port = self.output_port(source)?;
        let topology = OperatorTopology::build(self);
        let mut seen = BTreeSet::new();

        for sink in sinks {
            let sink_port = self.input_port(sink)?;

            if !seen.insert(sink) {
                return Err(PlanError::Validation(format!(
                    "Input port {} listed more than once",
                    sink
                )));
            }

            if let Some(existing) = self.stream_for_input(sink) {
                return Err(PlanError::Validation(format!(
                    "Input port {} already connected to stream {}",
                    sink, existing.name
                )));
            }

            if self.config.strict_port_types && !source_port.is_compatible_with(sink_port) {
                return Err(PlanError::Validation(format!(
                    "Port types differ: {} ({:?}) -> {} ({:?})",
                    source, source_port.data_type, sink, sink_port.data_type
                )));
            }

            if sink.operator == source.operator
                || topology.reaches(&sink.operator, &source.operator)
            {
                return Err(PlanError::Validation(format!(
                    "Connecting {} -> {} would create a cycle",
                    source, sink
                )));
            }
        }

        Ok(())
    }

    pub fn add_sink(&mut self, stream_name: &str, sink: InputPortRef) -> Result<()> {
        let source = self
            .streams
            .get(stream_name)
            .map(|s| s.source.clone())
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))?;

        self.check_sinks(&source, std::slice::from_ref(&sink))?;

        tracing::debug!("[LOGICAL] stream {} += sink {}", stream_name, sink);
        if let Some(stream) = self.streams.get_mut(stream_name) {
            stream.sinks.push(sink);
        }
        Ok(())
    }

    pub fn remove_stream(&mut self, name: &str) -> Option<StreamMeta> {
        let removed = self.streams.remove(name);
        if removed.is_some() {
            tracing::debug!("[LOGICAL] removed stream {}", name);
        }
        removed
    }

    /// Validate plan structure: no dangling streams, no cycles.
    pub fn validate(&self) -> Result<()> {
        validation::validate_plan(self)
    }
}
