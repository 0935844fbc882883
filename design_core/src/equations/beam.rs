//! # Member Action Formulas
//!
//! Design moments and shears for uniformly loaded spans, cantilever strips
//! under trapezoidal pressure, and the two-way slab load split.
//!
//! ## Notation
//!
//! - `L` = Span length (m)
//! - `w` = Uniform load intensity (kN/m)
//! - `p1`, `p2` = Pressure at the fixed end and the free end of a strip (kPa)
//! - `M` = Bending moment (kN·m)
//! - `V` = Shear force (kN)
//! - `r` = Long span / short span ratio
//!
//! ## Sign Conventions
//!
//! - Loads: Positive downward
//! - Moments are returned as magnitudes
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1
//! - Reynolds & Steedman, Reinforced Concrete Designer's Handbook, Table 63

use crate::design_code::SupportType;

// =============================================================================
// UNIFORM LOAD
// =============================================================================

/// Governing design moment for a uniform load on a span
///
/// ```text
///    w w w w w w w w w
///    ↓ ↓ ↓ ↓ ↓ ↓ ↓ ↓ ↓
///    ═════════════════
///    △               △
///    ←───────L───────→
/// ```
///
/// # Formula
/// M = w·L²/n, with n = 8 (simply supported), 10 (continuous),
/// 12 (fixed) or 2 (cantilever)
///
/// # Example
/// ```rust
/// use design_core::design_code::SupportType;
/// use design_core::equations::beam::uniform_load_moment;
///
/// // 20 kN/m over 6 m, simply supported: 20 × 36 / 8 = 90 kN·m
/// let m = uniform_load_moment(20.0, 6.0, SupportType::SimplySupported);
/// assert!((m - 90.0).abs() < 1e-9);
/// ```
#[inline]
pub fn uniform_load_moment(w: f64, l: f64, support: SupportType) -> f64 {
    w * l * l / support.moment_denominator()
}

/// Governing design shear for a uniform load on a span
///
/// # Formula
/// V = c·w·L, with c = ½ (supported both ends) or 1 (cantilever)
#[inline]
pub fn uniform_load_shear(w: f64, l: f64, support: SupportType) -> f64 {
    support.shear_coefficient() * w * l
}

// =============================================================================
// CANTILEVER STRIPS UNDER LINEARLY VARYING PRESSURE
// =============================================================================

/// Moment at the fixed end of a cantilever strip under trapezoidal pressure
///
/// ```text
///                      p2
///          p1 ┌─────────┐
///   fixed ════╪═════════╡ free
///             ←────L────→
/// ```
///
/// # Formula
/// M = L²·(2·p2 + p1)/6
///
/// The resultant of the trapezoid acts at L·(p1 + 2·p2)/(3·(p1 + p2)) from
/// the fixed end.
#[inline]
pub fn trapezoid_cantilever_moment(p_fixed: f64, p_free: f64, l: f64) -> f64 {
    l * l * (p_fixed + 2.0 * p_free) / 6.0
}

/// Resultant of a trapezoidal pressure over length L
///
/// # Formula
/// R = L·(p1 + p2)/2
#[inline]
pub fn trapezoid_resultant(p1: f64, p2: f64, l: f64) -> f64 {
    l * (p1 + p2) / 2.0
}

/// Linear interpolation of a pressure diagram at distance x from p_start
#[inline]
pub fn linear_pressure_at(p_start: f64, p_end: f64, length: f64, x: f64) -> f64 {
    if length <= 0.0 {
        return p_start;
    }
    p_start + (p_end - p_start) * x / length
}

// =============================================================================
// TWO-WAY SLABS
// =============================================================================

/// Share of a uniform load carried by the short span (Rankine–Grashof)
///
/// # Formula
/// α_x = r⁴/(1 + r⁴), with r = L_long/L_short
///
/// The long span carries the remaining 1 − α_x.
///
/// # Example
/// ```rust
/// use design_core::equations::beam::grashof_short_span_share;
///
/// // Square panel splits the load equally
/// assert!((grashof_short_span_share(1.0) - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn grashof_short_span_share(ratio: f64) -> f64 {
    let r4 = ratio.powi(4);
    r4 / (1.0 + r4)
}
