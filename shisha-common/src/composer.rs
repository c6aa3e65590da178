//! Mix composition engine
//!
//! An [`IngredientSet`] is the working state of a mix being built: up to
//! [`MAX_INGREDIENTS`] flavor references, each with an integer percentage
//! weight. Every mutation re-derives the weights so a non-empty set always
//! sums to exactly 100.
//!
//! Two rebalancing rules are in play:
//! - add/remove: equal shares by floor division, with the integer remainder
//!   assigned to the first element (deterministic for any n)
//! - adjust: the target is clamped to [5,95] and the entire residual is
//!   pushed onto the first OTHER ingredient (two-party correction, not
//!   proportional redistribution across all others)

use thiserror::Error;

/// Maximum number of ingredients in a single mix
pub const MAX_INGREDIENTS: usize = 5;

/// Adjustment clamp bounds: an adjusted ingredient stays within [5,95]
pub const ADJUST_MIN: i64 = 5;
pub const ADJUST_MAX: i64 = 95;

/// Composition errors, all caller-caused and terminal
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("mix already has the maximum of {MAX_INGREDIENTS} ingredients")]
    CapacityExceeded,

    #[error("flavor {0} is already in the mix")]
    DuplicateFlavor(i64),

    #[error("flavor {0} is not in the mix")]
    UnknownFlavor(i64),
}

/// One selected flavor and its percentage weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientShare {
    pub flavor_id: i64,
    pub percentage: i64,
}

/// The ingredient collection of a mix under construction
///
/// Insertion order is preserved but carries no meaning beyond determining
/// which element receives the floor-division remainder and which "other"
/// element absorbs adjustment residuals.
#[derive(Debug, Clone, Default)]
pub struct IngredientSet {
    shares: Vec<IngredientShare>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shares(&self) -> &[IngredientShare] {
        &self.shares
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all percentage weights (100 for any non-empty set)
    pub fn total(&self) -> i64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }

    pub fn contains(&self, flavor_id: i64) -> bool {
        self.shares.iter().any(|s| s.flavor_id == flavor_id)
    }

    /// Add a flavor and redistribute all weights into equal shares
    pub fn add(&mut self, flavor_id: i64) -> Result<(), ComposeError> {
        if self.contains(flavor_id) {
            return Err(ComposeError::DuplicateFlavor(flavor_id));
        }
        if self.shares.len() >= MAX_INGREDIENTS {
            return Err(ComposeError::CapacityExceeded);
        }

        self.shares.push(IngredientShare {
            flavor_id,
            percentage: 0,
        });
        self.rebalance_equal();
        Ok(())
    }

    /// Remove a flavor; remaining weights are redistributed into equal shares
    pub fn remove(&mut self, flavor_id: i64) -> Result<(), ComposeError> {
        let idx = self
            .index_of(flavor_id)
            .ok_or(ComposeError::UnknownFlavor(flavor_id))?;
        self.shares.remove(idx);

        if !self.shares.is_empty() {
            self.rebalance_equal();
        }
        Ok(())
    }

    /// Step the target's weight by `delta` (the UI uses -5/+5 steps)
    ///
    /// The target is clamped to [5,95]; any residual is pushed entirely onto
    /// the first other ingredient. Only the target is clamped: the absorbing
    /// ingredient may leave [5,95] and even go negative, which is the
    /// preserved two-party rule, not an oversight. With a single ingredient
    /// there is nothing to trade against, so the call is a no-op and the
    /// weight stays at 100.
    pub fn adjust(&mut self, flavor_id: i64, delta: i64) -> Result<(), ComposeError> {
        let idx = self
            .index_of(flavor_id)
            .ok_or(ComposeError::UnknownFlavor(flavor_id))?;
        if self.shares.len() == 1 {
            return Ok(());
        }

        let current = self.shares[idx].percentage;
        self.shares[idx].percentage = (current + delta).clamp(ADJUST_MIN, ADJUST_MAX);
        self.rebalance_onto_other(idx);
        Ok(())
    }

    /// Set the target's weight to an absolute slider value
    ///
    /// Same clamping and two-party correction as [`adjust`](Self::adjust).
    pub fn set_percentage(&mut self, flavor_id: i64, value: i64) -> Result<(), ComposeError> {
        let idx = self
            .index_of(flavor_id)
            .ok_or(ComposeError::UnknownFlavor(flavor_id))?;
        if self.shares.len() == 1 {
            return Ok(());
        }

        self.shares[idx].percentage = value.clamp(ADJUST_MIN, ADJUST_MAX);
        self.rebalance_onto_other(idx);
        Ok(())
    }

    fn index_of(&self, flavor_id: i64) -> Option<usize> {
        self.shares.iter().position(|s| s.flavor_id == flavor_id)
    }

    /// Equal-share redistribution: share = floor(100/n), remainder to the
    /// first element
    fn rebalance_equal(&mut self) {
        let n = self.shares.len() as i64;
        let share = 100 / n;
        let remainder = 100 - share * n;

        for (i, ingredient) in self.shares.iter_mut().enumerate() {
            ingredient.percentage = if i == 0 { share + remainder } else { share };
        }
    }

    /// Two-party correction: push the whole residual onto the first
    /// ingredient that is not the one just adjusted
    fn rebalance_onto_other(&mut self, target_idx: usize) {
        let residual = 100 - self.total();
        if residual == 0 {
            return;
        }
        // len() >= 2 is guaranteed by the callers
        let other_idx = if target_idx == 0 { 1 } else { 0 };
        self.shares[other_idx].percentage += residual;
        debug_assert_eq!(self.total(), 100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentages(set: &IngredientSet) -> Vec<i64> {
        set.shares().iter().map(|s| s.percentage).collect()
    }

    #[test]
    fn add_single_flavor_gets_full_weight() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        assert_eq!(percentages(&set), vec![100]);
    }

    #[test]
    fn add_walkthrough_two_then_three() {
        // [{X,100}] -> [{X,50},{Y,50}] -> [{X,34},{Y,33},{Z,33}]
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.add(2).unwrap();
        assert_eq!(percentages(&set), vec![50, 50]);
        set.add(3).unwrap();
        assert_eq!(percentages(&set), vec![34, 33, 33]);
    }

    #[test]
    fn add_four_and_five_keep_sum_exact() {
        let mut set = IngredientSet::new();
        for id in 1..=4 {
            set.add(id).unwrap();
        }
        assert_eq!(percentages(&set), vec![25, 25, 25, 25]);
        set.add(5).unwrap();
        assert_eq!(percentages(&set), vec![20, 20, 20, 20, 20]);
    }

    #[test]
    fn add_rejects_duplicate_flavor() {
        let mut set = IngredientSet::new();
        set.add(7).unwrap();
        assert_eq!(set.add(7), Err(ComposeError::DuplicateFlavor(7)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn add_rejects_sixth_ingredient() {
        let mut set = IngredientSet::new();
        for id in 1..=5 {
            set.add(id).unwrap();
        }
        assert_eq!(set.add(6), Err(ComposeError::CapacityExceeded));
        assert_eq!(set.len(), 5);
        assert_eq!(set.total(), 100);
    }

    #[test]
    fn remove_redistributes_remaining() {
        let mut set = IngredientSet::new();
        for id in 1..=3 {
            set.add(id).unwrap();
        }
        set.remove(2).unwrap();
        assert_eq!(percentages(&set), vec![50, 50]);
        set.remove(1).unwrap();
        assert_eq!(percentages(&set), vec![100]);
    }

    #[test]
    fn remove_last_leaves_empty_set() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.remove(1).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total(), 0);
    }

    #[test]
    fn remove_unknown_flavor_fails() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        assert_eq!(set.remove(9), Err(ComposeError::UnknownFlavor(9)));
    }

    #[test]
    fn sum_is_100_after_every_add_remove_sequence() {
        let mut set = IngredientSet::new();
        for id in 1..=5 {
            set.add(id).unwrap();
            assert_eq!(set.total(), 100);
        }
        for id in [3, 1, 5] {
            set.remove(id).unwrap();
            assert_eq!(set.total(), 100);
        }
    }

    #[test]
    fn adjust_moves_weight_between_two_ingredients() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.add(2).unwrap();
        set.adjust(1, 5).unwrap();
        assert_eq!(percentages(&set), vec![55, 45]);
        set.adjust(2, -5).unwrap();
        assert_eq!(percentages(&set), vec![60, 40]);
    }

    #[test]
    fn adjust_clamps_target_to_bounds() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.add(2).unwrap();
        for _ in 0..20 {
            set.adjust(1, 5).unwrap();
        }
        assert_eq!(percentages(&set), vec![95, 5]);
        for _ in 0..30 {
            set.adjust(1, -5).unwrap();
        }
        assert_eq!(percentages(&set), vec![5, 95]);
    }

    #[test]
    fn adjust_residual_goes_to_first_other_ingredient() {
        let mut set = IngredientSet::new();
        for id in 1..=3 {
            set.add(id).unwrap();
        }
        // [34, 33, 33]; bump the last: the FIRST ingredient absorbs -5
        set.adjust(3, 5).unwrap();
        assert_eq!(percentages(&set), vec![29, 33, 38]);
        assert_eq!(set.total(), 100);

        // adjust the first: the second (first non-target) absorbs
        set.adjust(1, 5).unwrap();
        assert_eq!(percentages(&set), vec![34, 28, 38]);
        assert_eq!(set.total(), 100);
    }

    #[test]
    fn adjust_absorber_is_not_clamped() {
        let mut set = IngredientSet::new();
        for id in 1..=3 {
            set.add(id).unwrap();
        }
        // drive the last ingredient to its 95 cap; the first absorbs the
        // whole residual and goes negative while the sum stays exact
        for _ in 0..20 {
            set.adjust(3, 5).unwrap();
        }
        assert_eq!(percentages(&set), vec![-28, 33, 95]);
        assert_eq!(set.total(), 100);
    }

    #[test]
    fn adjust_single_ingredient_is_noop() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.adjust(1, -5).unwrap();
        assert_eq!(percentages(&set), vec![100]);
    }

    #[test]
    fn set_percentage_applies_same_correction() {
        let mut set = IngredientSet::new();
        set.add(1).unwrap();
        set.add(2).unwrap();
        set.set_percentage(1, 70).unwrap();
        assert_eq!(percentages(&set), vec![70, 30]);
        // out-of-range slider values clamp to [5,95]
        set.set_percentage(2, 200).unwrap();
        assert_eq!(percentages(&set), vec![5, 95]);
    }
}
