// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Plan modification sessions.
//!
//! A session collects logical edits, mirrors them into the physical plan's
//! bookkeeping, and finally reconciles everything into one deployment:
//! 1. EDIT - validate and apply each change to the logical plan
//! 2. TRACK - record new, affected and removed physical operators
//! 3. APPLY - assign containers, prime checkpoints, compute undeploy/deploy sets

mod change_set;
mod deployment_plan;
mod plan_modifier;
mod reconcile;

pub use change_set::ChangeSet;
pub use deployment_plan::DeploymentPlan;
pub use plan_modifier::PlanModifier;
