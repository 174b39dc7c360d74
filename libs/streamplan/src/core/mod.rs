// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod config;
pub mod delegates;
pub mod error;
pub mod logical;
pub mod modifier;
pub mod physical;
pub mod prelude;
pub mod shared_plan;

pub use config::PlanConfig;
pub use error::*;

pub use delegates::*;
pub use logical::*;
pub use modifier::*;
pub use physical::*;
pub use shared_plan::SharedPlan;
