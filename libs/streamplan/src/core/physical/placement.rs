// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Grouping of unplaced physical operators into new containers.

use super::ids::PhysicalOperatorId;

/// Split `operators` into groups of at most `per_container`, in id order, one
/// group per new container.
pub(crate) fn pack_operators(
    mut operators: Vec<PhysicalOperatorId>,
    per_container: usize,
) -> Vec<Vec<PhysicalOperatorId>> {
    operators.sort();
    operators
        .chunks(per_container.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<PhysicalOperatorId> {
        raw.iter().copied().map(PhysicalOperatorId::new).collect()
    }

    #[test]
    fn test_one_per_container() {
        let groups = pack_operators(ids(&[3, 1, 2]), 1);
        assert_eq!(groups, vec![ids(&[1]), ids(&[2]), ids(&[3])]);
    }

    #[test]
    fn test_packs_up_to_limit() {
        let groups = pack_operators(ids(&[5, 4, 3, 2, 1]), 2);
        assert_eq!(groups, vec![ids(&[1, 2]), ids(&[3, 4]), ids(&[5])]);
    }

    #[test]
    fn test_empty_input() {
        assert!(pack_operators(Vec::new(), 3).is_empty());
    }
}
