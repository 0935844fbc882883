//! # Cross-Section Property Formulas
//!
//! Geometric properties of solid rectangular concrete sections.
//!
//! ## Notation
//!
//! - `A` = Gross cross-sectional area
//! - `I` = Moment of inertia (second moment of area)
//! - `i` = Radius of gyration (√(I/A))
//! - `b` = Width of section
//! - `h` = Overall depth of section
//! - `d` = Effective depth (compression face to tension steel centroid)
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Chapter 3

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Calculate gross area of a rectangular section
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use design_core::equations::section::rectangular_area;
///
/// assert_eq!(rectangular_area(400.0, 400.0), 160_000.0);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Calculate moment of inertia about the centroidal axis parallel to b
///
/// # Formula
/// I = b·h³/12
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

/// Calculate radius of gyration for a rectangular section
///
/// Used in column slenderness (λ = l_e / i).
///
/// # Formula
/// i = √(I/A) = h/√12 ≈ 0.289h
///
/// # Example
/// ```rust
/// use design_core::equations::section::rectangular_radius_of_gyration;
///
/// let i = rectangular_radius_of_gyration(400.0);
/// // i = 400 / √12 = 115.47 mm
/// assert!((i - 115.47).abs() < 0.01);
/// ```
#[inline]
pub fn rectangular_radius_of_gyration(h: f64) -> f64 {
    h / (12.0_f64).sqrt()
}

/// Calculate effective depth from overall depth
///
/// ```text
///   ┌───────────────┐ ─┬─
///   │               │  │
///   │               │  d
///   │   ●   ●   ●   │ ─┴─  ← main bar centroid
///   └───────────────┘  cover + link + Ø/2
/// ```
///
/// # Formula
/// d = h − cover − Ø_link − Ø_bar/2
#[inline]
pub fn effective_depth(h: f64, cover: f64, link_diameter: f64, bar_diameter: f64) -> f64 {
    h - cover - link_diameter - bar_diameter / 2.0
}
