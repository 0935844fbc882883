//! # Design Code Constants
//!
//! Partial safety factors, load factors, detailing limits, and stability
//! minima used across the design modules. Everything here is process-wide
//! constant data; nothing is configurable at runtime.
//!
//! ## Factor Summary
//!
//! | Symbol | Description                       | Value |
//! |--------|-----------------------------------|-------|
//! | γc     | Concrete partial safety factor    | 1.50  |
//! | γs     | Reinforcement partial safety factor | 1.15 |
//! | αcc    | Concrete stress-block reduction   | 0.85  |
//! | γG     | Permanent load factor (ULS)       | 1.40  |
//! | γQ     | Variable load factor (ULS)        | 1.60  |
//! | γH     | Earth pressure load factor (ULS)  | 1.60  |
//!
//! ## Reference
//!
//! TS 500 (2000) with EN 1992-1-1 simplified methods where TS 500 is silent.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Code Section References
// ============================================================================

/// Code clause references for design checks.
///
/// Reported in warnings so a reviewer can trace each check.
pub mod code_ref {
    /// Material partial safety factors
    pub const MATERIAL_FACTORS: &str = "TS 500 6.2.5";
    /// Column slenderness
    pub const SLENDERNESS: &str = "TS 500 7.6";
    /// Minimum eccentricity
    pub const MIN_ECCENTRICITY: &str = "EN 1992-1-1 6.1(4)";
    /// Nominal curvature second-order method
    pub const NOMINAL_CURVATURE: &str = "EN 1992-1-1 5.8.8";
    /// Column reinforcement limits
    pub const COLUMN_REINFORCEMENT: &str = "TS 500 7.4.1";
    /// Column confinement ties
    pub const COLUMN_TIES: &str = "TS 500 7.4.2";
    /// Beam reinforcement limits
    pub const BEAM_REINFORCEMENT: &str = "TS 500 7.3";
    /// Shear design
    pub const SHEAR: &str = "TS 500 8.1";
    /// Punching shear
    pub const PUNCHING: &str = "TS 500 8.3";
    /// Slab minimum reinforcement and spacing
    pub const SLAB_REINFORCEMENT: &str = "TS 500 11.2";
    /// Deflection control by span/depth ratio
    pub const SPAN_DEPTH: &str = "EN 1992-1-1 7.4.2";
    /// Earth-retaining stability
    pub const RETAINING_STABILITY: &str = "EN 1997-1 9.7";
}

// ============================================================================
// Material and Load Factors
// ============================================================================

/// Concrete partial safety factor γc
pub const GAMMA_C: f64 = 1.5;

/// Reinforcing steel partial safety factor γs
pub const GAMMA_S: f64 = 1.15;

/// Stress-block reduction factor αcc
pub const ALPHA_CC: f64 = 0.85;

/// Modulus of elasticity of reinforcing steel (MPa)
pub const STEEL_ELASTIC_MODULUS_MPA: f64 = 200_000.0;

/// ULS factor on permanent (dead) load
pub const DEAD_LOAD_FACTOR: f64 = 1.4;

/// ULS factor on permanent load when it is favourable
pub const DEAD_LOAD_FACTOR_MIN: f64 = 1.0;

/// ULS factor on variable (live) load
pub const LIVE_LOAD_FACTOR: f64 = 1.6;

/// ULS factor on earth-pressure effects (retaining walls)
pub const EARTH_PRESSURE_FACTOR: f64 = 1.6;

/// Reinforced concrete unit weight (kN/m³)
pub const CONCRETE_UNIT_WEIGHT: f64 = 25.0;

/// Average unit weight of footing concrete plus overlying soil (kN/m³)
pub const FOOTING_AVERAGE_UNIT_WEIGHT: f64 = 20.0;

// ============================================================================
// Column Limits
// ============================================================================

/// Column reinforcement ratio bounds (ρmin, ρmax)
pub const COLUMN_RATIO_MIN: f64 = 0.002;
pub const COLUMN_RATIO_MAX: f64 = 0.04;

/// Ratio above which congestion is flagged
pub const COLUMN_RATIO_WARN: f64 = 0.03;

/// Utilization (%) above which a warning is issued
pub const UTILIZATION_WARN_PERCENT: f64 = 90.0;

/// Column longitudinal bar count bounds
pub const COLUMN_MIN_BARS: u32 = 8;
pub const COLUMN_MAX_BARS: u32 = 12;

/// Slenderness beyond which the simplified method is not permitted
pub const MAX_SLENDERNESS: f64 = 100.0;

/// Maximum tie spacing (mm)
pub const MAX_TIE_SPACING_MM: f64 = 300.0;

// ============================================================================
// Flexural Limits
// ============================================================================

/// Limiting K = M/(b·d²·fck) for a singly reinforced section
pub const K_BALANCED: f64 = 0.167;

/// Upper bound on the lever arm as a fraction of d
pub const MAX_LEVER_ARM_RATIO: f64 = 0.95;

/// Maximum ratio for beams, slabs and footings
pub const FLEXURE_RATIO_MAX: f64 = 0.04;

/// Absolute floor on beam minimum ratio
pub const BEAM_RATIO_FLOOR: f64 = 0.0013;

/// Minimum ratio for slabs and footings
pub const SLAB_RATIO_MIN: f64 = 0.002;

/// Retaining wall main steel minimum (fraction of gross section)
pub const WALL_MAIN_RATIO_MIN: f64 = 0.002;

/// Retaining wall distribution steel minimum (fraction of gross section)
pub const WALL_DISTRIBUTION_RATIO_MIN: f64 = 0.0018;

/// Smallest practical spacing for continuous layouts (mm)
pub const MIN_BAR_SPACING_MM: f64 = 75.0;

// ============================================================================
// Stability Minima
// ============================================================================

/// Minimum factor of safety against overturning
pub const FOS_OVERTURNING_MIN: f64 = 2.0;

/// Minimum factor of safety against sliding
pub const FOS_SLIDING_MIN: f64 = 1.5;

/// Minimum factor of safety against bearing failure
pub const FOS_BEARING_MIN: f64 = 3.0;

// ============================================================================
// Support Conditions
// ============================================================================

/// End condition of a flexural member.
///
/// Selects the moment and shear coefficients for uniformly loaded spans
/// and the basic span/effective-depth ratio for deflection control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    /// Pin-roller: M = wL²/8
    #[default]
    SimplySupported,
    /// End span of a continuous member: M ≈ wL²/10
    Continuous,
    /// Both ends fixed: M = wL²/12 at the supports
    Fixed,
    /// Cantilever: M = wL²/2
    Cantilever,
}

impl SupportType {
    /// All support variants
    pub const ALL: [SupportType; 4] = [
        SupportType::SimplySupported,
        SupportType::Continuous,
        SupportType::Fixed,
        SupportType::Cantilever,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "simply_supported" | "simple" | "pinned" => Ok(SupportType::SimplySupported),
            "continuous" => Ok(SupportType::Continuous),
            "fixed" | "fixed_fixed" => Ok(SupportType::Fixed),
            "cantilever" => Ok(SupportType::Cantilever),
            _ => Err(CalcError::invalid_input(
                "supportType",
                s,
                "expected one of simply_supported, continuous, fixed, cantilever",
            )),
        }
    }

    /// Denominator n in M = wL²/n
    pub fn moment_denominator(&self) -> f64 {
        match self {
            SupportType::SimplySupported => 8.0,
            SupportType::Continuous => 10.0,
            SupportType::Fixed => 12.0,
            SupportType::Cantilever => 2.0,
        }
    }

    /// Coefficient c in V = c·wL
    pub fn shear_coefficient(&self) -> f64 {
        match self {
            SupportType::Cantilever => 1.0,
            _ => 0.5,
        }
    }

    /// Basic span/effective-depth limit
    pub fn span_depth_limit(&self) -> f64 {
        match self {
            SupportType::SimplySupported => 20.0,
            SupportType::Continuous => 26.0,
            SupportType::Fixed => 26.0,
            SupportType::Cantilever => 7.0,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportType::SimplySupported => "Simply supported",
            SupportType::Continuous => "Continuous",
            SupportType::Fixed => "Fixed-fixed",
            SupportType::Cantilever => "Cantilever",
        }
    }
}

impl std::fmt::Display for SupportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
