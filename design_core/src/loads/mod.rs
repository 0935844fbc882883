//! Load cases and ultimate limit state combinations
//!
//! # Overview
//!
//! - [`LoadType`] - Permanent (G) and variable (Q) load categories
//! - [`LoadCase`] - A collection of service load values for one scenario
//! - [`LoadCombination`] - Factors applied to a load case
//! - [`find_governing_combination`] - Largest factored load and its name
//!
//! # Example
//!
//! ```
//! use design_core::loads::{LoadType, LoadCase, uls_combinations, find_governing_combination};
//!
//! let beam_loads = LoadCase::new("Roof beam")
//!     .with_load(LoadType::Dead, 15.0)   // kN/m incl. self-weight
//!     .with_load(LoadType::Live, 8.0);   // kN/m
//!
//! let gov = find_governing_combination(&beam_loads, &uls_combinations());
//! println!("{} governs: {:.1} kN/m", gov.equation, gov.factored_load);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::{
    find_governing_combination,
    uls_combinations,
    GoverningCombination,
    LoadCombination,
};
pub use load_types::LoadType;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A collection of service load values by type for one loading scenario
///
/// # Example
/// ```
/// use design_core::loads::{LoadCase, LoadType};
///
/// let case = LoadCase::new("Typical floor")
///     .with_load(LoadType::Dead, 6.5)
///     .with_load(LoadType::Live, 2.0);
///
/// assert_eq!(case.get(LoadType::Dead), 6.5);
/// assert_eq!(case.total(), 8.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Label for this load case
    pub label: String,

    /// Load values keyed by type (kN/m, kN/m² or kN depending on the element)
    pub loads: BTreeMap<LoadType, f64>,
}

impl LoadCase {
    /// Create a new empty load case with a label
    pub fn new(label: impl Into<String>) -> Self {
        LoadCase {
            label: label.into(),
            loads: BTreeMap::new(),
        }
    }

    /// Add or update a load value (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Add to an existing load value (e.g. self-weight onto G)
    pub fn add_load(&mut self, load_type: LoadType, value: f64) {
        *self.loads.entry(load_type).or_insert(0.0) += value;
    }

    /// Get the load value for a type, defaulting to 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Check that gravity loads are non-negative
    pub fn validate(&self) -> CalcResult<()> {
        for (load_type, value) in &self.loads {
            if *value < 0.0 {
                return Err(CalcError::invalid_input(
                    format!("load_{}", load_type.code()),
                    value.to_string(),
                    format!("{} cannot be negative", load_type.description()),
                ));
            }
        }
        Ok(())
    }

    /// Total unfactored (service) load
    pub fn total(&self) -> f64 {
        LoadType::ALL.iter().map(|lt| self.get(*lt)).sum()
    }

    /// Apply the ULS combinations and find the governing one
    pub fn governing_uls(&self) -> GoverningCombination {
        find_governing_combination(self, &uls_combinations())
    }
}

impl Default for LoadCase {
    fn default() -> Self {
        LoadCase::new("Unnamed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_case_builder() {
        let case = LoadCase::new("Test")
            .with_load(LoadType::Dead, 10.0)
            .with_load(LoadType::Live, 20.0);

        assert_eq!(case.label, "Test");
        assert_eq!(case.get(LoadType::Dead), 10.0);
        assert_eq!(case.get(LoadType::Live), 20.0);
    }

    #[test]
    fn test_add_load_accumulates() {
        let mut case = LoadCase::new("Beam").with_load(LoadType::Dead, 10.0);
        case.add_load(LoadType::Dead, 3.75);
        case.add_load(LoadType::Live, 2.0);
        assert_eq!(case.get(LoadType::Dead), 13.75);
        assert_eq!(case.get(LoadType::Live), 2.0);
    }

    #[test]
    fn test_validation_rejects_negative() {
        let case = LoadCase::new("Invalid").with_load(LoadType::Dead, -10.0);
        assert!(case.validate().is_err());
        assert!(LoadCase::new("Ok").with_load(LoadType::Live, 0.0).validate().is_ok());
    }

    #[test]
    fn test_governing_uls() {
        let case = LoadCase::new("Test")
            .with_load(LoadType::Dead, 20.0)
            .with_load(LoadType::Live, 40.0);
        let gov = case.governing_uls();
        // 1.4 × 20 + 1.6 × 40 = 92
        assert!((gov.factored_load - 92.0).abs() < 0.001);
        assert_eq!(gov.equation, "1.4G + 1.6Q");
    }

    #[test]
    fn test_load_case_serialization() {
        let case = LoadCase::new("Floor")
            .with_load(LoadType::Dead, 20.0)
            .with_load(LoadType::Live, 50.0);

        let json = serde_json::to_string(&case).unwrap();
        let parsed: LoadCase = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, case);
    }
}
