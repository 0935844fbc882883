//! # Lateral Earth Pressure
//!
//! Rankine earth-pressure coefficients and resultant thrusts for
//! cohesionless backfill.
//!
//! ## Notation
//!
//! - `φ` = Soil internal friction angle
//! - `β` = Backfill slope angle above horizontal
//! - `γ` = Soil unit weight (kN/m³)
//! - `H` = Retained height (m)
//! - `q` = Uniform surcharge (kPa)
//!
//! ## References
//!
//! - Das, Principles of Foundation Engineering, Chapter 13

use crate::errors::{CalcError, CalcResult};

/// Rankine active coefficient for a level backfill
///
/// # Formula
/// Ka = tan²(45° − φ/2) = (1 − sin φ)/(1 + sin φ)
///
/// # Example
/// ```rust
/// use design_core::equations::earth_pressure::rankine_active_level;
///
/// let ka = rankine_active_level(30f64.to_radians());
/// assert!((ka - 1.0 / 3.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rankine_active_level(phi_rad: f64) -> f64 {
    (std::f64::consts::FRAC_PI_4 - phi_rad / 2.0).tan().powi(2)
}

/// Rankine active coefficient for a backfill sloping at β
///
/// # Formula
/// ```text
///            cos β − √(cos²β − cos²φ)
/// Ka = cos β ─────────────────────────
///            cos β + √(cos²β − cos²φ)
/// ```
///
/// Reduces to tan²(45° − φ/2) for β = 0. Undefined for β > φ (the slope
/// itself is unstable), which is reported as a calculation failure.
pub fn rankine_active_sloped(phi_rad: f64, beta_rad: f64) -> CalcResult<f64> {
    if beta_rad == 0.0 {
        return Ok(rankine_active_level(phi_rad));
    }
    let cb = beta_rad.cos();
    let cp = phi_rad.cos();
    let radicand = cb * cb - cp * cp;
    if radicand < 0.0 {
        return Err(CalcError::calculation_failed(
            "Earth pressure",
            "backfill slope exceeds the soil friction angle",
        ));
    }
    let root = radicand.sqrt();
    Ok(cb * (cb - root) / (cb + root))
}

/// Rankine passive coefficient for a level surface
///
/// # Formula
/// Kp = tan²(45° + φ/2)
#[inline]
pub fn rankine_passive(phi_rad: f64) -> f64 {
    (std::f64::consts::FRAC_PI_4 + phi_rad / 2.0).tan().powi(2)
}

/// Triangular soil thrust per metre run, acting at H/3
///
/// # Formula
/// P = ½·K·γ·H²
#[inline]
pub fn triangular_thrust(k: f64, gamma: f64, height: f64) -> f64 {
    0.5 * k * gamma * height * height
}

/// Rectangular surcharge thrust per metre run, acting at H/2
///
/// # Formula
/// P = K·q·H
#[inline]
pub fn surcharge_thrust(k: f64, q: f64, height: f64) -> f64 {
    k * q * height
}
