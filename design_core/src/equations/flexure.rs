//! # Reinforced-Concrete Flexure
//!
//! Rectangular stress-block relations for singly reinforced sections.
//!
//! ## Notation
//!
//! - `M` = Design moment (kN·m)
//! - `b` = Section width (mm)
//! - `d` = Effective depth (mm)
//! - `K` = Normalised moment M/(b·d²·fck)
//! - `z` = Lever arm (mm)
//! - `As` = Tension steel area (mm²)
//! - `a` = Depth of the equivalent stress block (mm)
//!
//! All stresses in MPa (N/mm²).
//!
//! ## References
//!
//! - Mosley, Bungey & Hulse, Reinforced Concrete Design to Eurocode 2, §4.5

use crate::design_code::{K_BALANCED, MAX_LEVER_ARM_RATIO};
use crate::units::{KiloNewtonMeters, NewtonMillimeters};

fn n_mm(m_knm: f64) -> f64 {
    NewtonMillimeters::from(KiloNewtonMeters(m_knm)).0
}

/// Normalised design moment
///
/// # Formula
/// K = M·10⁶/(b·d²·fck)
#[inline]
pub fn normalised_moment(m_knm: f64, b: f64, d: f64, fck: f64) -> f64 {
    n_mm(m_knm) / (b * d * d * fck)
}

/// Lever arm of a singly reinforced section
///
/// # Formula
/// z = d·(0.5 + √(0.25 − K/1.134)) ≤ 0.95·d
///
/// K is capped at the balanced limit K' = 0.167, so the square root is
/// always real.
///
/// # Example
/// ```rust
/// use design_core::equations::flexure::lever_arm;
///
/// // Lightly loaded section hits the 0.95d cap
/// assert!((lever_arm(500.0, 0.01) - 475.0).abs() < 1e-9);
/// ```
#[inline]
pub fn lever_arm(d: f64, k: f64) -> f64 {
    let k = k.clamp(0.0, K_BALANCED);
    let z = d * (0.5 + (0.25 - k / 1.134).sqrt());
    z.min(MAX_LEVER_ARM_RATIO * d)
}

/// Tension steel required for a moment at lever arm z
///
/// # Formula
/// As = M·10⁶/(fyd·z)
#[inline]
pub fn required_steel_area(m_knm: f64, fyd: f64, z: f64) -> f64 {
    n_mm(m_knm) / (fyd * z)
}

/// Moment capacity of a singly reinforced rectangular section
///
/// # Formula
/// a = As·fyd/(b·fcd_block), M_Rd = As·fyd·(d − a/2)/10⁶
#[inline]
pub fn moment_capacity(as_mm2: f64, fyd: f64, b: f64, d: f64, fcd_block: f64) -> f64 {
    let a = as_mm2 * fyd / (b * fcd_block);
    KiloNewtonMeters::from(NewtonMillimeters(as_mm2 * fyd * (d - a / 2.0))).0
}

/// Simplified wall/base steel with a fixed 0.9d lever arm
///
/// # Formula
/// As = M·10⁶/(0.87·fy·0.9·d)
#[inline]
pub fn simplified_steel_area(m_knm: f64, fy: f64, d: f64) -> f64 {
    n_mm(m_knm) / (0.87 * fy * 0.9 * d)
}
