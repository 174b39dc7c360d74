// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Thread-shared handle to a deployed plan.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::delegates::DeployDelegate;
use crate::core::error::Result;
use crate::core::logical::LogicalPlan;
use crate::core::modifier::{DeploymentPlan, PlanModifier};
use crate::core::physical::PhysicalPlan;

/// A physical plan shared between threads, with at most one modification
/// session in flight at a time.
#[derive(Clone)]
pub struct SharedPlan {
    inner: Arc<Mutex<PhysicalPlan>>,
}

impl SharedPlan {
    pub fn new(plan: PhysicalPlan) -> Self {
        Self {
            inner: Arc::new(Mutex::new(plan)),
        }
    }

    /// Run `edits` as one session and deploy the result.
    ///
    /// The batch is first tried against a copy of the logical plan and the
    /// outcome validated. Only a batch that passes is replayed on the live
    /// plan, so an invalid batch never reaches the deployer.
    pub fn modify<D, F>(&self, deployer: &D, edits: F) -> Result<DeploymentPlan>
    where
        D: DeployDelegate + ?Sized,
        F: for<'m> Fn(&mut PlanModifier<'m>) -> Result<()>,
    {
        let mut plan = self.inner.lock();

        if let Err(e) = PlanModifier::dry_run(plan.logical(), |m| edits(m)) {
            tracing::warn!("[SHARED] rejected modification: {}", e);
            return Err(e);
        }

        let mut modifier = PlanModifier::live(&mut *plan);
        edits(&mut modifier)?;
        modifier.apply_changes(deployer)
    }

    /// Apply `edits` to a copy of the current logical plan and validate it.
    pub fn dry_run<F>(&self, edits: F) -> Result<LogicalPlan>
    where
        F: for<'m> FnOnce(&mut PlanModifier<'m>) -> Result<()>,
    {
        let plan = self.inner.lock();
        PlanModifier::dry_run(plan.logical(), edits)
    }

    /// Read access to the current plan.
    pub fn with_plan<R>(&self, f: impl FnOnce(&PhysicalPlan) -> R) -> R {
        let plan = self.inner.lock();
        f(&plan)
    }
}

impl std::fmt::Debug for SharedPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPlan").finish_non_exhaustive()
    }
}
