//! SharedPlan Integration Tests
//!
//! Verifies that batches are validated before they touch the live plan and
//! that sessions from several threads are serialized.

use std::sync::Arc;
use std::thread;

use streamplan::core::delegates::RecordingDeployDelegate;
use streamplan::core::logical::{GenericOperator, LogicalPlan, Operator, OutputPortRef};
use streamplan::core::modifier::PlanModifier;
use streamplan::core::physical::PhysicalPlan;
use streamplan::core::shared_plan::SharedPlan;

fn source() -> Box<dyn Operator> {
    Box::new(GenericOperator::new("source").with_output("out"))
}

fn sink() -> Box<dyn Operator> {
    Box::new(GenericOperator::new("sink").with_input("in"))
}

fn shared() -> SharedPlan {
    let mut logical = LogicalPlan::new();
    logical.add_operator("a", source()).unwrap();
    logical.add_operator("b", sink()).unwrap();
    logical.add_stream("ab", OutputPortRef::new("a", "out")).unwrap();
    logical
        .add_sink("ab", streamplan::core::logical::InputPortRef::new("b", "in"))
        .unwrap();
    SharedPlan::new(PhysicalPlan::new(logical).unwrap())
}

#[test]
fn test_modify_deploys_valid_batch() {
    let plan = shared();
    let recorder = RecordingDeployDelegate::new();

    let deployment = plan
        .modify(&recorder, |m| {
            m.add_operator("c", sink())?;
            m.add_sink("ab", "c", "in")
        })
        .unwrap();

    assert_eq!(deployment.deploy.len(), 1);
    assert_eq!(recorder.call_count(), 1);
    plan.with_plan(|p| {
        assert_eq!(p.operator_count(), 3);
        assert_eq!(p.logical().get_stream("ab").unwrap().sinks.len(), 2);
    });
}

#[test]
fn test_modify_rejects_batch_leaving_dangling_stream() {
    let plan = shared();
    let recorder = RecordingDeployDelegate::new();

    // every edit succeeds on its own, but "orphan" is left without sinks
    let err = plan
        .modify(&recorder, |m| {
            m.add_operator("c", source())?;
            m.add_stream("orphan", OutputPortRef::new("c", "out"), &[])?;
            Ok(())
        })
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(recorder.call_count(), 0);
    plan.with_plan(|p| {
        assert!(p.logical().get_operator("c").is_none());
        assert!(p.logical().get_stream("orphan").is_none());
        assert_eq!(p.operator_count(), 2);
    });
}

#[test]
fn test_modify_rejects_failing_edit() {
    let plan = shared();
    let recorder = RecordingDeployDelegate::new();

    let err = plan
        .modify(&recorder, |m| {
            m.add_operator("c", sink())?;
            m.remove_operator("b")
        })
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(recorder.call_count(), 0);
    plan.with_plan(|p| assert!(p.logical().get_operator("c").is_none()));
}

#[test]
fn test_dry_run_does_not_touch_live_plan() {
    let plan = shared();
    let preview = plan
        .dry_run(|m| {
            m.add_operator("c", sink())?;
            m.add_sink("ab", "c", "in")
        })
        .unwrap();

    assert_eq!(preview.operator_count(), 3);
    plan.with_plan(|p| assert_eq!(p.logical().operator_count(), 2));
}

#[test]
fn test_concurrent_sessions_are_serialized() {
    let plan = shared();
    let recorder = Arc::new(RecordingDeployDelegate::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let plan = plan.clone();
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                let name = format!("sink_{}", i);
                plan.modify(recorder.as_ref(), |m| {
                    m.add_operator(&name, sink())?;
                    m.add_sink("ab", &name, "in")
                })
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(recorder.call_count(), 4);
    plan.with_plan(|p| {
        assert_eq!(p.logical().get_stream("ab").unwrap().sinks.len(), 5);
        assert_eq!(p.operator_count(), 6);
    });
}

#[test]
fn test_logical_dry_run_helper() {
    let mut logical = LogicalPlan::new();
    logical.add_operator("a", source()).unwrap();
    let result = PlanModifier::dry_run(&logical, |m| m.remove_operator("a")).unwrap();
    assert_eq!(result.operator_count(), 0);
    assert_eq!(logical.operator_count(), 1);
}
