//! # Unit Types
//!
//! Type-safe wrappers for engineering units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## SI Units
//!
//! The request contract mixes metres (spans, heights) and millimetres
//! (section dimensions), which is exactly where unit slips happen:
//! - Length: metres (m), millimetres (mm)
//! - Force: kilonewtons (kN)
//! - Moment: kilonewton-metres (kN·m), newton-millimetres (N·mm)
//! - Angle: degrees at the boundary, radians internally
//!
//! ## Example
//!
//! ```rust
//! use design_core::units::{Meters, Millimeters, KiloNewtonMeters, NewtonMillimeters};
//!
//! let height = Meters(3.5);
//! let height_mm: Millimeters = height.into();
//! assert_eq!(height_mm.0, 3500.0);
//!
//! let m: NewtonMillimeters = KiloNewtonMeters(50.0).into();
//! assert_eq!(m.0, 50.0e6);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

/// Moment in newton-millimetres (the unit section formulas work in)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMillimeters(pub f64);

impl From<KiloNewtonMeters> for NewtonMillimeters {
    fn from(knm: KiloNewtonMeters) -> Self {
        NewtonMillimeters(knm.0 * 1.0e6)
    }
}

impl From<NewtonMillimeters> for KiloNewtonMeters {
    fn from(nmm: NewtonMillimeters) -> Self {
        KiloNewtonMeters(nmm.0 / 1.0e6)
    }
}

// ============================================================================
// Angles
// ============================================================================

/// Angle in degrees (as entered by users)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Convert to radians for trigonometry
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let mm: Millimeters = Meters(4.0).into();
        assert_eq!(mm.0, 4000.0);
        let m: Meters = Millimeters(350.0).into();
        assert!((m.0 - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_force_and_moment_conversions() {
        let n: Newtons = KiloNewtons(1500.0).into();
        assert_eq!(n.0, 1.5e6);
        let knm: KiloNewtonMeters = NewtonMillimeters(30.0e6).into();
        assert!((knm.0 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_degrees() {
        assert!((Degrees(180.0).to_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Millimeters(400.0)).unwrap();
        assert_eq!(json, "400.0");
    }
}
