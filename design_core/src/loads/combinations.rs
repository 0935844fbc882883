//! Ultimate Limit State Load Combinations
//!
//! Two combinations are checked for gravity members:
//! - ULS-1: 1.4G + 1.6Q (full permanent load factor)
//! - ULS-2: 1.0G + 1.6Q (favourable permanent load)
//!
//! The larger factored load governs and its name is reported with the result.
//! Factors are kept in a `BTreeMap` so sums are evaluated in a fixed order and
//! identical requests produce bit-identical output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::LoadCase;
use crate::design_code::{DEAD_LOAD_FACTOR, DEAD_LOAD_FACTOR_MIN, LIVE_LOAD_FACTOR};

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use design_core::loads::{LoadCombination, LoadCase, LoadType};
///
/// let combo = LoadCombination::new("ULS-1", "1.4G + 1.6Q")
///     .with_factor(LoadType::Dead, 1.4)
///     .with_factor(LoadType::Live, 1.6);
///
/// let case = LoadCase::new("Floor")
///     .with_load(LoadType::Dead, 10.0)
///     .with_load(LoadType::Live, 5.0);
///
/// assert!((combo.apply(&case) - 22.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "ULS-1")
    pub name: String,

    /// Human-readable equation (e.g., "1.4G + 1.6Q")
    pub equation: String,

    /// Load factors keyed by load type
    pub factors: BTreeMap<LoadType, f64>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: BTreeMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Apply this combination to a LoadCase, returning the total factored load
    ///
    /// Load types not in the combination are treated as having factor 0.
    pub fn apply(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .map(|(load_type, factor)| factor * case.get(*load_type))
            .sum()
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// The ultimate limit state combinations for gravity members
pub fn uls_combinations() -> Vec<LoadCombination> {
    vec![
        LoadCombination::new("ULS-1", "1.4G + 1.6Q")
            .with_factor(LoadType::Dead, DEAD_LOAD_FACTOR)
            .with_factor(LoadType::Live, LIVE_LOAD_FACTOR),
        LoadCombination::new("ULS-2", "1.0G + 1.6Q")
            .with_factor(LoadType::Dead, DEAD_LOAD_FACTOR_MIN)
            .with_factor(LoadType::Live, LIVE_LOAD_FACTOR),
    ]
}

/// Outcome of a governing-combination search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoverningCombination {
    /// Combination identifier
    pub name: String,
    /// Human-readable equation
    pub equation: String,
    /// Factored load in the units of the load case
    pub factored_load: f64,
}

/// Find the governing (maximum) combination
///
/// Ties keep the first combination in list order.
///
/// # Example
/// ```
/// use design_core::loads::{find_governing_combination, uls_combinations, LoadCase, LoadType};
///
/// let case = LoadCase::new("Beam")
///     .with_load(LoadType::Dead, 20.0)
///     .with_load(LoadType::Live, 10.0);
///
/// let gov = find_governing_combination(&case, &uls_combinations());
/// assert_eq!(gov.name, "ULS-1");
/// assert!((gov.factored_load - 44.0).abs() < 1e-9);
/// ```
pub fn find_governing_combination(
    case: &LoadCase,
    combinations: &[LoadCombination],
) -> GoverningCombination {
    let mut best: Option<GoverningCombination> = None;
    for combo in combinations {
        let load = combo.apply(case);
        if best.as_ref().map_or(true, |b| load > b.factored_load) {
            best = Some(GoverningCombination {
                name: combo.name.clone(),
                equation: combo.equation.clone(),
                factored_load: load,
            });
        }
    }
    best.unwrap_or(GoverningCombination {
        name: String::new(),
        equation: String::new(),
        factored_load: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uls_factors() {
        let combos = uls_combinations();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].get_factor(LoadType::Dead), 1.4);
        assert_eq!(combos[1].get_factor(LoadType::Dead), 1.0);
        assert_eq!(combos[1].get_factor(LoadType::Live), 1.6);
    }

    #[test]
    fn test_full_dead_factor_governs_for_gravity() {
        let case = LoadCase::new("Slab")
            .with_load(LoadType::Dead, 7.5)
            .with_load(LoadType::Live, 3.0);
        let gov = find_governing_combination(&case, &uls_combinations());
        // 1.4 × 7.5 + 1.6 × 3 = 15.3
        assert_eq!(gov.name, "ULS-1");
        assert!((gov.factored_load - 15.3).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dead_load_ties_to_first() {
        let case = LoadCase::new("Live only").with_load(LoadType::Live, 5.0);
        let gov = find_governing_combination(&case, &uls_combinations());
        assert_eq!(gov.name, "ULS-1");
        assert!((gov.factored_load - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_combination_list() {
        let gov = find_governing_combination(&LoadCase::default(), &[]);
        assert_eq!(gov.factored_load, 0.0);
        assert!(gov.name.is_empty());
    }
}
