// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Physical consequences accumulated over one modification session.

use std::collections::HashSet;

use crate::core::physical::PhysicalOperatorId;

/// New, affected and removed physical operators of a session.
///
/// An id is a member of at most one of the three sets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    new_operators: HashSet<PhysicalOperatorId>,
    affected_operators: HashSet<PhysicalOperatorId>,
    removed_operators: HashSet<PhysicalOperatorId>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators created by this session.
    pub fn new_operators(&self) -> &HashSet<PhysicalOperatorId> {
        &self.new_operators
    }

    /// Pre-existing operators whose wiring changed.
    pub fn affected_operators(&self) -> &HashSet<PhysicalOperatorId> {
        &self.affected_operators
    }

    /// Pre-existing operators destroyed by this session.
    pub fn removed_operators(&self) -> &HashSet<PhysicalOperatorId> {
        &self.removed_operators
    }

    pub fn is_empty(&self) -> bool {
        self.new_operators.is_empty()
            && self.affected_operators.is_empty()
            && self.removed_operators.is_empty()
    }

    pub fn is_new(&self, id: &PhysicalOperatorId) -> bool {
        self.new_operators.contains(id)
    }

    pub(crate) fn record_new(&mut self, ids: impl IntoIterator<Item = PhysicalOperatorId>) {
        for id in ids {
            self.affected_operators.remove(&id);
            self.new_operators.insert(id);
        }
    }

    /// New operators are deployed with current wiring anyway, and removed ones
    /// are gone, so neither is tracked as affected.
    pub(crate) fn record_affected(&mut self, ids: impl IntoIterator<Item = PhysicalOperatorId>) {
        for id in ids {
            if !self.new_operators.contains(&id) && !self.removed_operators.contains(&id) {
                self.affected_operators.insert(id);
            }
        }
    }

    /// An operator added and removed within the same session was never
    /// deployed; it simply disappears from the change set.
    pub(crate) fn record_removed(&mut self, ids: impl IntoIterator<Item = PhysicalOperatorId>) {
        for id in ids {
            self.affected_operators.remove(&id);
            if !self.new_operators.remove(&id) {
                self.removed_operators.insert(id);
            }
        }
    }
}
