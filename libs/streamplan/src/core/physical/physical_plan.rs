// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{Dfs, EdgeRef, IntoEdgeReferences};

use super::container::Container;
use super::ids::{ContainerId, IdSequence, PhysicalOperatorId};
use super::operator::{Checkpoint, PhysicalOperator};
use super::placement::pack_operators;
use crate::core::error::{PlanError, Result};
use crate::core::logical::{InputPortRef, LogicalPlan};

/// Physical edge: data of `stream` delivered to input port `sink_port`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PhysicalStream {
    stream: String,
    sink_port: String,
}

/// Physical deployment layout of a logical plan.
///
/// Every logical operator maps to `partition_count` physical operators. Each
/// logical stream is wired as a full mesh between the physical operators of
/// its source and of each sink.
#[derive(Debug)]
pub struct PhysicalPlan {
    logical: LogicalPlan,
    operators: BTreeMap<PhysicalOperatorId, PhysicalOperator>,
    containers: BTreeMap<ContainerId, Container>,
    by_logical: BTreeMap<String, Vec<PhysicalOperatorId>>,
    graph: StableDiGraph<PhysicalOperatorId, PhysicalStream>,
    operator_ids: IdSequence,
    container_ids: IdSequence,
}

impl PhysicalPlan {
    /// Build the initial physical plan: materialize every operator, wire every
    /// stream, place everything into containers and prime checkpoints.
    pub fn new(logical: LogicalPlan) -> Result<Self> {
        logical.validate()?;

        let mut plan = Self {
            logical,
            operators: BTreeMap::new(),
            containers: BTreeMap::new(),
            by_logical: BTreeMap::new(),
            graph: StableDiGraph::new(),
            operator_ids: IdSequence::default(),
            container_ids: IdSequence::default(),
        };

        let names: Vec<String> = plan.logical.operators().map(|m| m.name.clone()).collect();
        let mut all = HashSet::new();
        for name in &names {
            all.extend(plan.add_logical_operator(name)?);
        }
        plan.assign_containers(&all);
        for id in &all {
            plan.init_checkpoint(*id)?;
        }

        tracing::info!(
            "Physical plan: {} operators in {} containers",
            plan.operators.len(),
            plan.containers.len()
        );
        Ok(plan)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn logical(&self) -> &LogicalPlan {
        &self.logical
    }

    pub fn logical_mut(&mut self) -> &mut LogicalPlan {
        &mut self.logical
    }

    pub fn get_operator(&self, id: PhysicalOperatorId) -> Option<&PhysicalOperator> {
        self.operators.get(&id)
    }

    pub fn operators(&self) -> impl Iterator<Item = &PhysicalOperator> {
        self.operators.values()
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// Physical operators of a logical operator. Empty if unknown.
    pub fn operators_for(&self, logical_name: &str) -> Vec<PhysicalOperatorId> {
        self.by_logical
            .get(logical_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    /// Physical operators that `id` sends data to.
    pub fn downstream(&self, id: PhysicalOperatorId) -> BTreeSet<PhysicalOperatorId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Physical operators that send data to `id`.
    pub fn upstream(&self, id: PhysicalOperatorId) -> BTreeSet<PhysicalOperatorId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(
        &self,
        id: PhysicalOperatorId,
        direction: Direction,
    ) -> BTreeSet<PhysicalOperatorId> {
        self.operators
            .get(&id)
            .map(|op| {
                self.graph
                    .neighbors_directed(op.node, direction)
                    .map(|n| self.graph[n])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `operators` (those still in the plan) plus everything transitively
    /// downstream of them.
    pub fn dependents(
        &self,
        operators: &HashSet<PhysicalOperatorId>,
    ) -> HashSet<PhysicalOperatorId> {
        let mut result = HashSet::new();
        let mut dfs = Dfs::empty(&self.graph);
        for op in operators.iter().filter_map(|id| self.operators.get(id)) {
            dfs.move_to(op.node);
            while let Some(node) = dfs.next(&self.graph) {
                result.insert(self.graph[node]);
            }
        }
        result
    }

    // =========================================================================
    // Logical change propagation
    // =========================================================================

    /// Create the physical operators of a logical operator and wire any
    /// streams that already reference it. Returns the new ids.
    pub fn add_logical_operator(&mut self, logical_name: &str) -> Result<Vec<PhysicalOperatorId>> {
        let partitions = self
            .logical
            .get_operator(logical_name)
            .map(|m| m.partition_count())
            .ok_or_else(|| {
                PlanError::NotFound(format!("Invalid operator name {}", logical_name))
            })?;

        if self.by_logical.contains_key(logical_name) {
            return Err(PlanError::Validation(format!(
                "Operator {} is already materialized",
                logical_name
            )));
        }

        let mut ids = Vec::with_capacity(partitions);
        for partition in 0..partitions {
            let id: PhysicalOperatorId = self.operator_ids.next();
            let node = self.graph.add_node(id);
            self.operators
                .insert(id, PhysicalOperator::new(id, logical_name, partition, node));
            ids.push(id);
        }
        self.by_logical.insert(logical_name.to_string(), ids.clone());

        let touching: Vec<(String, Vec<InputPortRef>)> = self
            .logical
            .streams()
            .filter(|s| s.source.operator == logical_name || s.feeds(logical_name))
            .map(|s| (s.name.clone(), s.sinks.clone()))
            .collect();
        for (stream, sinks) in touching {
            for sink in sinks {
                self.wire(&stream, &sink)?;
            }
        }

        tracing::debug!(
            "[PHYSICAL] {} -> {} partition(s) {:?}",
            logical_name,
            partitions,
            ids
        );
        Ok(ids)
    }

    /// Destroy the physical operators of a logical operator, collecting their
    /// ids into `removed`.
    pub fn remove_logical_operator(
        &mut self,
        logical_name: &str,
        removed: &mut HashSet<PhysicalOperatorId>,
    ) {
        let Some(ids) = self.by_logical.remove(logical_name) else {
            return;
        };

        for id in ids {
            if let Some(op) = self.operators.remove(&id) {
                self.graph.remove_node(op.node);
                if let Some(container) = op.container().and_then(|c| self.containers.get_mut(&c)) {
                    container.evict(id);
                }
                removed.insert(id);
            }
        }
        tracing::debug!("[PHYSICAL] removed {}", logical_name);
    }

    /// Wire a sink that was just added to a logical stream. The sink's
    /// physical operators are collected into `affected`.
    pub fn connect_input(
        &mut self,
        stream_name: &str,
        sink: &InputPortRef,
        affected: &mut HashSet<PhysicalOperatorId>,
    ) -> Result<()> {
        let stream = self
            .logical
            .get_stream(stream_name)
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))?;
        if !stream.has_sink(sink) {
            return Err(PlanError::NotFound(format!(
                "Stream {} has no sink {}",
                stream_name, sink
            )));
        }

        self.wire(stream_name, sink)?;
        affected.extend(self.operators_for(&sink.operator));
        Ok(())
    }

    /// Drop every physical edge of a logical stream. Source and sink physical
    /// operators are collected into `affected`.
    pub fn remove_logical_stream(
        &mut self,
        stream_name: &str,
        affected: &mut HashSet<PhysicalOperatorId>,
    ) -> Result<()> {
        let stream = self
            .logical
            .get_stream(stream_name)
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))?;

        let mut touched: Vec<String> = vec![stream.source.operator.clone()];
        touched.extend(stream.sinks.iter().map(|s| s.operator.clone()));

        let edges: Vec<_> = self
            .graph
            .edge_references()
            .filter(|e| e.weight().stream == stream_name)
            .map(|e| e.id())
            .collect();
        for edge in edges {
            self.graph.remove_edge(edge);
        }

        for name in touched {
            affected.extend(self.operators_for(&name));
        }
        Ok(())
    }

    fn wire(&mut self, stream_name: &str, sink: &InputPortRef) -> Result<()> {
        let source = self
            .logical
            .get_stream(stream_name)
            .map(|s| s.source.operator.clone())
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))?;

        let from: Vec<_> = self.nodes_for(&source);
        let to: Vec<_> = self.nodes_for(&sink.operator);
        for &a in &from {
            for &b in &to {
                let already = self.graph.edges(a).any(|e| {
                    e.target() == b
                        && e.weight().stream == stream_name
                        && e.weight().sink_port == sink.port
                });
                if !already {
                    self.graph.add_edge(
                        a,
                        b,
                        PhysicalStream {
                            stream: stream_name.to_string(),
                            sink_port: sink.port.clone(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn nodes_for(&self, logical_name: &str) -> Vec<petgraph::stable_graph::NodeIndex> {
        self.by_logical
            .get(logical_name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.operators.get(id))
            .map(|op| op.node)
            .collect()
    }

    // =========================================================================
    // Containers and checkpoints
    // =========================================================================

    /// Physical operators not yet placed in a container. These have never been
    /// deployed.
    pub fn unplaced_operators(&self) -> HashSet<PhysicalOperatorId> {
        self.operators
            .values()
            .filter(|op| op.container().is_none())
            .map(|op| op.id)
            .collect()
    }

    /// Release containers left empty and place every unplaced operator of
    /// `new_operators` into new containers.
    ///
    /// Returns `(new_containers, release_containers)`.
    pub fn assign_containers(
        &mut self,
        new_operators: &HashSet<PhysicalOperatorId>,
    ) -> (BTreeSet<ContainerId>, BTreeSet<ContainerId>) {
        let release: BTreeSet<ContainerId> = self
            .containers
            .values()
            .filter(|c| c.is_empty())
            .map(|c| c.id)
            .collect();
        for id in &release {
            self.containers.remove(id);
        }

        let unplaced: Vec<PhysicalOperatorId> = new_operators
            .iter()
            .filter(|id| {
                self.operators
                    .get(id)
                    .is_some_and(|op| op.container().is_none())
            })
            .copied()
            .collect();

        let per_container = self.logical.config().max_operators_per_container;
        let mut created = BTreeSet::new();
        for group in pack_operators(unplaced, per_container) {
            let container_id: ContainerId = self.container_ids.next();
            let mut container = Container::new(container_id);
            for id in group {
                container.host(id);
                if let Some(op) = self.operators.get_mut(&id) {
                    op.set_container(Some(container_id));
                }
            }
            self.containers.insert(container_id, container);
            created.insert(container_id);
        }

        tracing::debug!(
            "[PHYSICAL] containers: +{} -{}",
            created.len(),
            release.len()
        );
        (created, release)
    }

    /// Give a new physical operator its starting recovery point.
    pub fn init_checkpoint(&mut self, id: PhysicalOperatorId) -> Result<()> {
        let op = self
            .operators
            .get_mut(&id)
            .ok_or_else(|| PlanError::NotFound(format!("Physical operator {} not found", id)))?;
        op.set_recovery_checkpoint(Checkpoint::initial());
        Ok(())
    }
}
