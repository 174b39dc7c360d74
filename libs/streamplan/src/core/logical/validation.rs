// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;

use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};

use super::LogicalPlan;
use crate::core::error::{PlanError, Result};

/// Operator-level topology: one node per operator, one edge per (stream, sink).
pub(crate) struct OperatorTopology<'a> {
    graph: DiGraph<&'a str, &'a str>,
    index: HashMap<&'a str, NodeIndex>,
}

impl<'a> OperatorTopology<'a> {
    pub(crate) fn build(plan: &'a LogicalPlan) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for meta in plan.operators() {
            index.insert(meta.name.as_str(), graph.add_node(meta.name.as_str()));
        }
        for stream in plan.streams() {
            let Some(&from) = index.get(stream.source.operator.as_str()) else {
                continue;
            };
            for sink in &stream.sinks {
                if let Some(&to) = index.get(sink.operator.as_str()) {
                    graph.add_edge(from, to, stream.name.as_str());
                }
            }
        }
        Self { graph, index }
    }

    /// Whether data can already flow from `from` to `to`.
    pub(crate) fn reaches(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    pub(crate) fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

/// Validate plan structure.
pub fn validate_plan(plan: &LogicalPlan) -> Result<()> {
    if let Some(stream) = plan.streams().find(|s| s.is_dangling()) {
        return Err(PlanError::Validation(format!(
            "Stream {} has no sinks",
            stream.name
        )));
    }

    if OperatorTopology::build(plan).is_cyclic() {
        return Err(PlanError::Validation("Plan contains cycles".into()));
    }

    Ok(())
}
