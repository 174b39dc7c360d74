// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Modification of the plan of a running application.

use std::collections::{BTreeMap, HashSet};

use super::change_set::ChangeSet;
use super::deployment_plan::DeploymentPlan;
use super::reconcile::reconcile;
use crate::core::delegates::DeployDelegate;
use crate::core::error::{PlanError, Result};
use crate::core::logical::{
    InputPortRef, LogicalPlan, Operator, OutputPortRef, StreamMeta, set_operator_properties,
};
use crate::core::physical::PhysicalPlan;

enum PlanTarget<'a> {
    /// Dry run: logical plan only.
    Logical(&'a mut LogicalPlan),
    /// Live: physical plan and the logical plan it owns.
    Physical(&'a mut PhysicalPlan),
}

/// One batch of edits against a logical plan, optionally mirrored into a
/// physical plan.
///
/// Each edit validates before it mutates, so a failed call leaves the plan as
/// it was; earlier successful calls are not rolled back. The session ends with
/// [`PlanModifier::apply_changes`], which consumes it.
pub struct PlanModifier<'a> {
    target: PlanTarget<'a>,
    changes: ChangeSet,
}

impl<'a> PlanModifier<'a> {
    /// Modifier for a dry run on the logical plan only.
    pub fn logical_only(plan: &'a mut LogicalPlan) -> Self {
        Self {
            target: PlanTarget::Logical(plan),
            changes: ChangeSet::new(),
        }
    }

    /// Modifier for a deployed plan.
    pub fn live(plan: &'a mut PhysicalPlan) -> Self {
        Self {
            target: PlanTarget::Physical(plan),
            changes: ChangeSet::new(),
        }
    }

    /// Apply `edits` to a copy of `plan` and validate the result. The copy is
    /// returned; `plan` itself is never touched.
    pub fn dry_run<F>(plan: &LogicalPlan, edits: F) -> Result<LogicalPlan>
    where
        F: for<'m> FnOnce(&mut PlanModifier<'m>) -> Result<()>,
    {
        let mut copy = plan.clone();
        {
            let mut modifier = PlanModifier::logical_only(&mut copy);
            edits(&mut modifier)?;
        }
        copy.validate()?;
        Ok(copy)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.target, PlanTarget::Physical(_))
    }

    pub fn change_set(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn logical_plan(&self) -> &LogicalPlan {
        match &self.target {
            PlanTarget::Logical(plan) => &**plan,
            PlanTarget::Physical(plan) => plan.logical(),
        }
    }

    fn logical_plan_mut(&mut self) -> &mut LogicalPlan {
        match &mut self.target {
            PlanTarget::Logical(plan) => &mut **plan,
            PlanTarget::Physical(plan) => plan.logical_mut(),
        }
    }

    // =========================================================================
    // Streams
    // =========================================================================

    /// Attach `sinks` to an existing stream.
    pub fn add_sinks(&mut self, stream_name: &str, sinks: &[InputPortRef]) -> Result<&StreamMeta> {
        let source = self
            .logical_plan()
            .get_stream(stream_name)
            .map(|s| s.source.clone())
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))?;

        self.logical_plan().check_sinks(&source, sinks)?;

        for sink in sinks {
            self.logical_plan_mut().add_sink(stream_name, sink.clone())?;
            if let PlanTarget::Physical(physical) = &mut self.target {
                let mut affected = HashSet::new();
                physical.connect_input(stream_name, sink, &mut affected)?;
                self.changes.record_affected(affected);
            }
            tracing::info!("[MODIFY] stream {} += {}", stream_name, sink);
        }

        self.logical_plan()
            .get_stream(stream_name)
            .ok_or_else(|| PlanError::NotFound(format!("Stream {} is not found!", stream_name)))
    }

    /// Add a stream from `source` to `sinks`. If a stream with the same name
    /// and source already exists, the sinks are attached to it.
    pub fn add_stream(
        &mut self,
        stream_name: &str,
        source: OutputPortRef,
        sinks: &[InputPortRef],
    ) -> Result<&StreamMeta> {
        let existing_source = self
            .logical_plan()
            .get_stream(stream_name)
            .map(|s| s.source.clone());

        match existing_source {
            Some(existing) if existing != source => {
                tracing::warn!(
                    "[MODIFY] rejected stream {}: source {} differs from {}",
                    stream_name,
                    source,
                    existing
                );
                return Err(PlanError::Validation(format!(
                    "Stream {} already connected to {}",
                    stream_name, existing
                )));
            }
            Some(_) => {}
            None => {
                self.logical_plan().check_sinks(&source, sinks)?;
                self.logical_plan_mut().add_stream(stream_name, source.clone())?;
                tracing::info!("[MODIFY] add stream {} from {}", stream_name, source);
            }
        }

        self.add_sinks(stream_name, sinks)
    }

    /// Add a stream between two named ports.
    pub fn add_stream_by_name(
        &mut self,
        stream_name: &str,
        source_operator: &str,
        source_port: &str,
        target_operator: &str,
        target_port: &str,
    ) -> Result<()> {
        let meta = self.logical_plan().get_operator(source_operator).ok_or_else(|| {
            PlanError::Validation(format!("Invalid operator name {}", source_operator))
        })?;
        if meta.ports().output(source_port).is_none() {
            return Err(PlanError::NotFound(format!(
                "Invalid port {} ({})",
                source_port, meta.name
            )));
        }

        let source = OutputPortRef::new(source_operator, source_port);
        let sink = self.input_port(target_operator, target_port)?;
        self.add_stream(stream_name, source, &[sink])?;
        Ok(())
    }

    /// Add a sink to an existing stream.
    pub fn add_sink(
        &mut self,
        stream_name: &str,
        target_operator: &str,
        target_port: &str,
    ) -> Result<()> {
        let sink = self.input_port(target_operator, target_port)?;
        self.add_sinks(stream_name, &[sink])?;
        Ok(())
    }

    /// Remove the named stream. Ignored when the stream does not exist.
    pub fn remove_stream(&mut self, stream_name: &str) -> Result<()> {
        if self.logical_plan().get_stream(stream_name).is_none() {
            tracing::debug!("[MODIFY] stream {} not present, nothing to remove", stream_name);
            return Ok(());
        }

        if let PlanTarget::Physical(physical) = &mut self.target {
            // associated operators will redeploy
            let mut affected = HashSet::new();
            physical.remove_logical_stream(stream_name, &mut affected)?;
            self.changes.record_affected(affected);
        }
        self.logical_plan_mut().remove_stream(stream_name);

        tracing::info!("[MODIFY] removed stream {}", stream_name);
        Ok(())
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// Add an operator. In live mode its physical operators are created and
    /// tracked as new.
    pub fn add_operator(&mut self, name: &str, operator: Box<dyn Operator>) -> Result<()> {
        let operator_type = operator.operator_type().to_string();
        self.logical_plan_mut().add_operator(name, operator)?;

        if let PlanTarget::Physical(physical) = &mut self.target {
            match physical.add_logical_operator(name) {
                Ok(ids) => self.changes.record_new(ids),
                Err(e) => {
                    physical.logical_mut().remove_operator(name);
                    return Err(e);
                }
            }
        }

        tracing::info!("[MODIFY] add operator {} ({})", name, operator_type);
        Ok(())
    }

    /// Remove an operator. Ignored when the operator does not exist.
    ///
    /// Fails if the operator has outgoing streams, or if it is the only
    /// consumer of one of its input streams.
    pub fn remove_operator(&mut self, name: &str) -> Result<()> {
        let plan = self.logical_plan();
        if plan.get_operator(name).is_none() {
            tracing::debug!("[MODIFY] operator {} not present, nothing to remove", name);
            return Ok(());
        }

        let inputs = plan.input_streams(name);
        if inputs
            .iter()
            .any(|s| s.sinks.iter().all(|sink| sink.operator == name))
        {
            // would result in dangling stream
            let names: Vec<&str> = inputs.iter().map(|s| s.name.as_str()).collect();
            return Err(PlanError::Validation(format!(
                "Operator {} connected to input streams {:?}",
                name, names
            )));
        }

        let outputs = plan.output_streams(name);
        if !outputs.is_empty() {
            let names: Vec<&str> = outputs.iter().map(|s| s.name.as_str()).collect();
            return Err(PlanError::Validation(format!(
                "Operator {} connected to output streams {:?}",
                name, names
            )));
        }

        self.logical_plan_mut().remove_operator(name);

        if let PlanTarget::Physical(physical) = &mut self.target {
            let mut removed = HashSet::new();
            physical.remove_logical_operator(name, &mut removed);
            self.changes.record_removed(removed);
        }

        tracing::info!("[MODIFY] removed operator {}", name);
        Ok(())
    }

    /// Set a property on an operator added in this session. Operators that
    /// are already deployed cannot be reconfigured through a modifier.
    pub fn set_operator_property(
        &mut self,
        operator_name: &str,
        property_name: &str,
        property_value: &str,
    ) -> Result<()> {
        self.assert_get_operator(operator_name)?;

        if let PlanTarget::Physical(physical) = &self.target {
            if physical
                .operators_for(operator_name)
                .iter()
                .any(|id| !self.changes.is_new(id))
            {
                return Err(PlanError::Validation(format!(
                    "Properties can only be set on new operators: {} {} {}",
                    operator_name, property_name, property_value
                )));
            }
        }

        let properties =
            BTreeMap::from([(property_name.to_string(), property_value.to_string())]);
        let meta = self
            .logical_plan_mut()
            .get_operator_mut(operator_name)
            .ok_or_else(|| {
                PlanError::NotFound(format!("Invalid operator name {}", operator_name))
            })?;
        set_operator_properties(meta.operator_mut(), &properties)?;

        tracing::info!(
            "[MODIFY] {}.{} = {}",
            operator_name,
            property_name,
            property_value
        );
        Ok(())
    }

    fn assert_get_operator(&self, name: &str) -> Result<()> {
        self.logical_plan()
            .get_operator(name)
            .map(|_| ())
            .ok_or_else(|| PlanError::NotFound(format!("Invalid operator name {}", name)))
    }

    fn input_port(&self, operator_name: &str, port_name: &str) -> Result<InputPortRef> {
        let port = InputPortRef::new(operator_name, port_name);
        self.logical_plan().input_port(&port)?;
        Ok(port)
    }

    // =========================================================================
    // Deployment
    // =========================================================================

    /// Reconcile the session's changes and hand them to `deployer`.
    ///
    /// Only valid for a live modifier.
    pub fn apply_changes<D>(self, deployer: &D) -> Result<DeploymentPlan>
    where
        D: DeployDelegate + ?Sized,
    {
        let PlanModifier { target, changes } = self;
        let physical = match target {
            PlanTarget::Physical(physical) => physical,
            PlanTarget::Logical(_) => {
                return Err(PlanError::NotSupported(
                    "apply_changes requires a physical plan".into(),
                ));
            }
        };

        let plan = reconcile(physical, &changes)?;
        tracing::info!("[APPLY] {}", plan);

        deployer.deploy(
            &plan.release_containers,
            &plan.undeploy,
            &plan.new_containers,
            &plan.deploy,
        )?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delegates::RecordingDeployDelegate;
    use crate::core::logical::GenericOperator;
    use serde_json::json;

    fn op() -> Box<dyn Operator> {
        Box::new(GenericOperator::new("pass").with_input("in").with_output("out"))
    }

    fn inp(op: &str) -> InputPortRef {
        InputPortRef::new(op, "in")
    }

    fn out(op: &str) -> OutputPortRef {
        OutputPortRef::new(op, "out")
    }

    #[test]
    fn test_logical_only_mode() {
        let mut plan = LogicalPlan::new();
        let mut modifier = PlanModifier::logical_only(&mut plan);
        assert!(!modifier.is_live());

        modifier.add_operator("a", op()).unwrap();
        modifier.add_operator("b", op()).unwrap();
        modifier.add_stream("ab", out("a"), &[inp("b")]).unwrap();
        modifier.set_operator_property("a", "rate", "10").unwrap();
        assert!(modifier.change_set().is_empty());

        let err = modifier
            .apply_changes(&RecordingDeployDelegate::new())
            .unwrap_err();
        assert!(matches!(err, PlanError::NotSupported(_)));

        assert_eq!(plan.stream_count(), 1);
        assert_eq!(
            plan.get_operator("a").unwrap().operator().config_json(),
            json!({"rate": 10})
        );
    }

    #[test]
    fn test_add_sinks_requires_stream() {
        let mut plan = LogicalPlan::new();
        let mut modifier = PlanModifier::logical_only(&mut plan);
        modifier.add_operator("b", op()).unwrap();
        let err = modifier.add_sinks("missing", &[inp("b")]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_stream_by_name_error_kinds() {
        let mut plan = LogicalPlan::new();
        let mut modifier = PlanModifier::logical_only(&mut plan);
        modifier.add_operator("a", op()).unwrap();
        modifier.add_operator("b", op()).unwrap();

        let err = modifier
            .add_stream_by_name("s", "nope", "out", "b", "in")
            .unwrap_err();
        assert!(err.is_validation());

        let err = modifier
            .add_stream_by_name("s", "a", "nope", "b", "in")
            .unwrap_err();
        assert!(err.is_not_found());

        let err = modifier
            .add_stream_by_name("s", "a", "out", "nope", "in")
            .unwrap_err();
        assert!(err.is_not_found());

        let err = modifier
            .add_stream_by_name("s", "a", "out", "b", "nope")
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(modifier.logical_plan().get_stream("s").is_none());
        modifier
            .add_stream_by_name("s", "a", "out", "b", "in")
            .unwrap();
        assert_eq!(modifier.logical_plan().get_stream("s").unwrap().sinks, vec![inp("b")]);
    }

    #[test]
    fn test_new_stream_with_bad_sink_is_not_created() {
        let mut plan = LogicalPlan::new();
        let mut modifier = PlanModifier::logical_only(&mut plan);
        modifier.add_operator("a", op()).unwrap();
        modifier.add_operator("b", op()).unwrap();

        let err = modifier
            .add_stream("ab", out("a"), &[inp("b"), InputPortRef::new("b", "nope")])
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(modifier.logical_plan().get_stream("ab").is_none());
    }

    #[test]
    fn test_set_property_unknown_operator() {
        let mut plan = LogicalPlan::new();
        let mut modifier = PlanModifier::logical_only(&mut plan);
        let err = modifier.set_operator_property("ghost", "p", "v").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dry_run_leaves_original_untouched() {
        let mut plan = LogicalPlan::new();
        plan.add_operator("a", op()).unwrap();

        let result = PlanModifier::dry_run(&plan, |m| {
            m.add_operator("b", op())?;
            m.add_stream("ab", out("a"), &[inp("b")])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(result.operator_count(), 2);
        assert_eq!(plan.operator_count(), 1);

        // a stream left without sinks fails validation
        let err = PlanModifier::dry_run(&plan, |m| {
            m.add_stream("dangling", out("a"), &[])?;
            Ok(())
        })
        .unwrap_err();
        assert!(err.is_validation());
    }
}
