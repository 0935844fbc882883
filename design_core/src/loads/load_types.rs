//! Load type definitions
//!
//! The gravity load categories that enter the ultimate limit state
//! combinations of the design modules.

use serde::{Deserialize, Serialize};

/// Load categories
///
/// Each load type has a standard symbol used in combination equations.
///
/// # Example
/// ```
/// use design_core::loads::LoadType;
///
/// let dead = LoadType::Dead;
/// assert_eq!(dead.code(), "G");
/// assert_eq!(dead.description(), "Permanent load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// G - Permanent load (self-weight, finishes, fixed partitions)
    Dead,
    /// Q - Variable load (occupancy, movable items)
    Live,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 2] = [LoadType::Dead, LoadType::Live];

    /// Standard symbol (G, Q)
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "G",
            LoadType::Live => "Q",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Permanent load",
            LoadType::Live => "Variable load",
        }
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
