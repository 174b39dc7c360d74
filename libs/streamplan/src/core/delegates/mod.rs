// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Delegate traits for the collaborators the modifier hands work to.

mod deploy;

pub use deploy::{DeployDelegate, LoggingDeployDelegate, RecordingDeployDelegate};
