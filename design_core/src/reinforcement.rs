//! # Reinforcement Selection
//!
//! Two shared routines turn a required steel area into real bars:
//!
//! - [`select_bars`] - discrete layouts (columns, beams): a bar diameter and a
//!   bar count within element-specific bounds
//! - [`select_spacing`] - continuous layouts (walls, slabs, footings): a fixed
//!   diameter at a spacing per metre run
//!
//! Both are deterministic: the same request always yields the same layout.
//! When no layout satisfies the bounds, both fall back to the nearest
//! admissible layout and set `fallback`, which callers must surface as a
//! warning.
//!
//! ## Example
//!
//! ```rust
//! use design_core::reinforcement::select_bars;
//! use design_core::materials::COLUMN_BAR_DIAMETERS;
//!
//! let sel = select_bars(4107.0, &COLUMN_BAR_DIAMETERS, 8, 12).unwrap();
//! assert_eq!(sel.arrangement(), "9Ø25");
//! assert!(sel.area_provided_mm2 >= 4107.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::design_code::MIN_BAR_SPACING_MM;
use crate::errors::{CalcError, CalcResult};
use crate::materials::bar_area_mm2;

/// A discrete bar layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSelection {
    /// Bar diameter Ø (mm)
    pub diameter_mm: u32,
    /// Number of bars
    pub count: u32,
    /// Area asked for (mm²)
    pub area_required_mm2: f64,
    /// Area supplied by the layout (mm²)
    pub area_provided_mm2: f64,
    /// True when no diameter met the count bounds and the nearest bound was used
    pub fallback: bool,
}

impl BarSelection {
    /// Layout label, e.g. "8Ø20"
    pub fn arrangement(&self) -> String {
        format!("{}Ø{}", self.count, self.diameter_mm)
    }

    /// Provided minus required area (negative only for fallbacks)
    pub fn excess_mm2(&self) -> f64 {
        self.area_provided_mm2 - self.area_required_mm2
    }
}

/// A continuous bar layout per metre run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSelection {
    /// Bar diameter Ø (mm)
    pub diameter_mm: u32,
    /// Centre-to-centre spacing (mm)
    pub spacing_mm: f64,
    /// Area asked for (mm²/m)
    pub area_required_mm2_per_m: f64,
    /// Area supplied (mm²/m)
    pub area_provided_mm2_per_m: f64,
    /// True when the spacing hit the practical minimum
    pub fallback: bool,
}

impl SpacingSelection {
    /// Layout label, e.g. "Ø16/150"
    pub fn arrangement(&self) -> String {
        format!("Ø{}/{:.0}", self.diameter_mm, self.spacing_mm)
    }
}

fn check_required(required_mm2: f64) -> CalcResult<()> {
    if !required_mm2.is_finite() {
        return Err(CalcError::non_finite("steelAreaRequired"));
    }
    if required_mm2 < 0.0 {
        return Err(CalcError::calculation_failed(
            "Bar selection",
            format!("required area {:.1} mm² is negative", required_mm2),
        ));
    }
    Ok(())
}

fn bars_needed(required_mm2: f64, diameter_mm: u32) -> u32 {
    (required_mm2 / bar_area_mm2(diameter_mm)).ceil() as u32
}

/// Choose a bar diameter and count for `required_mm2`.
///
/// Every diameter whose count `ceil(As/Abar)` lies in `[min_count, max_count]`
/// is a candidate; the one with the smallest excess area wins, ties going to
/// the smaller diameter. With no candidate, the diameter whose count is
/// closest to the bounds is used with its count clamped to the nearest bound.
pub fn select_bars(
    required_mm2: f64,
    diameters: &[u32],
    min_count: u32,
    max_count: u32,
) -> CalcResult<BarSelection> {
    check_required(required_mm2)?;
    if diameters.is_empty() || min_count == 0 || min_count > max_count {
        return Err(CalcError::Internal {
            message: format!(
                "invalid bar search space: {} diameters, counts {}..={}",
                diameters.len(),
                min_count,
                max_count
            ),
        });
    }

    let mut best: Option<(f64, u32, u32)> = None;
    for &d in diameters {
        let count = bars_needed(required_mm2, d);
        if (min_count..=max_count).contains(&count) {
            let excess = f64::from(count) * bar_area_mm2(d) - required_mm2;
            if best.map_or(true, |(e, _, _)| excess < e) {
                best = Some((excess, d, count));
            }
        }
    }

    if let Some((_, d, count)) = best {
        return Ok(BarSelection {
            diameter_mm: d,
            count,
            area_required_mm2: required_mm2,
            area_provided_mm2: f64::from(count) * bar_area_mm2(d),
            fallback: false,
        });
    }

    Ok(nearest_bound_layout(required_mm2, diameters, min_count, max_count))
}

/// Fallback policy: the diameter whose unconstrained count is nearest the
/// bounds, with the count clamped onto that bound.
pub fn nearest_bound_layout(
    required_mm2: f64,
    diameters: &[u32],
    min_count: u32,
    max_count: u32,
) -> BarSelection {
    let mut chosen = (u32::MAX, diameters[0], min_count);
    for &d in diameters {
        let count = bars_needed(required_mm2, d);
        let distance = if count < min_count {
            min_count - count
        } else {
            count.saturating_sub(max_count)
        };
        if distance < chosen.0 {
            chosen = (distance, d, count.clamp(min_count, max_count));
        }
    }
    let (_, d, count) = chosen;
    tracing::warn!(
        required_mm2,
        diameter_mm = d,
        count,
        "no bar layout within count bounds; using nearest bound"
    );
    BarSelection {
        diameter_mm: d,
        count,
        area_required_mm2: required_mm2,
        area_provided_mm2: f64::from(count) * bar_area_mm2(d),
        fallback: true,
    }
}

/// Choose a spacing for a fixed bar diameter to supply `required_mm2_per_m`.
///
/// Spacing is rounded down to 10 mm and capped at `max_spacing_mm`. A spacing
/// under the practical minimum is raised to it and flagged as a fallback.
pub fn select_spacing(
    required_mm2_per_m: f64,
    diameter_mm: u32,
    max_spacing_mm: f64,
) -> CalcResult<SpacingSelection> {
    check_required(required_mm2_per_m)?;
    let area = bar_area_mm2(diameter_mm);
    let cap = round_down_10(max_spacing_mm.max(MIN_BAR_SPACING_MM));

    let ideal = if required_mm2_per_m > 0.0 {
        round_down_10(1000.0 * area / required_mm2_per_m)
    } else {
        cap
    };

    let (spacing, fallback) = if ideal < MIN_BAR_SPACING_MM {
        (MIN_BAR_SPACING_MM, true)
    } else {
        (ideal.min(cap), false)
    };

    Ok(SpacingSelection {
        diameter_mm,
        spacing_mm: spacing,
        area_required_mm2_per_m: required_mm2_per_m,
        area_provided_mm2_per_m: 1000.0 * area / spacing,
        fallback,
    })
}

fn round_down_10(x: f64) -> f64 {
    (x / 10.0).floor() * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{COLUMN_BAR_DIAMETERS, STANDARD_BAR_DIAMETERS};

    #[test]
    fn test_selects_minimum_excess() {
        // 2000 mm²: Ø20 → 7 (out of 8..12), Ø16 → 10 bars = 2011 mm² (excess 11)
        let sel = select_bars(2000.0, &COLUMN_BAR_DIAMETERS, 8, 12).unwrap();
        assert!(!sel.fallback);
        assert_eq!(sel.diameter_mm, 16);
        assert_eq!(sel.count, 10);
        assert!(sel.area_provided_mm2 >= 2000.0);
    }

    #[test]
    fn test_large_area_column() {
        // 4107 mm²: only Ø25 gives 8..12 bars (9 bars = 4418 mm²)
        let sel = select_bars(4107.0, &COLUMN_BAR_DIAMETERS, 8, 12).unwrap();
        assert_eq!(sel.arrangement(), "9Ø25");
        assert!(sel.excess_mm2() > 0.0);
    }

    #[test]
    fn test_small_area_clamps_to_min_count() {
        let sel = select_bars(100.0, &COLUMN_BAR_DIAMETERS, 8, 12).unwrap();
        assert!(sel.fallback);
        assert_eq!(sel.count, 8);
        assert_eq!(sel.diameter_mm, 16);
        assert!(sel.area_provided_mm2 >= 100.0);
    }

    #[test]
    fn test_huge_area_clamps_to_max_count() {
        let sel = select_bars(50_000.0, &COLUMN_BAR_DIAMETERS, 8, 12).unwrap();
        assert!(sel.fallback);
        assert_eq!(sel.count, 12);
        assert_eq!(sel.diameter_mm, 32);
        assert!(sel.area_provided_mm2 < 50_000.0);
    }

    #[test]
    fn test_zero_area_uses_minimum_layout() {
        let sel = select_bars(0.0, &STANDARD_BAR_DIAMETERS, 2, 8).unwrap();
        assert_eq!(sel.count, 2);
        assert_eq!(sel.diameter_mm, 12);
    }

    #[test]
    fn test_deterministic() {
        let a = select_bars(3333.3, &STANDARD_BAR_DIAMETERS, 2, 8).unwrap();
        let b = select_bars(3333.3, &STANDARD_BAR_DIAMETERS, 2, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(select_bars(f64::NAN, &STANDARD_BAR_DIAMETERS, 2, 8).is_err());
        assert!(select_bars(-1.0, &STANDARD_BAR_DIAMETERS, 2, 8).is_err());
        assert!(select_bars(100.0, &[], 2, 8).is_err());
        assert!(select_bars(100.0, &STANDARD_BAR_DIAMETERS, 9, 8).is_err());
    }

    #[test]
    fn test_spacing_rounds_down() {
        // Ø16 = 201 mm²; 1000 × 201 / 1000 = 201 → 200 mm
        let s = select_spacing(1000.0, 16, 300.0).unwrap();
        assert_eq!(s.spacing_mm, 200.0);
        assert!(s.area_provided_mm2_per_m >= 1000.0);
        assert_eq!(s.arrangement(), "Ø16/200");
    }

    #[test]
    fn test_spacing_capped_at_maximum() {
        let s = select_spacing(100.0, 12, 250.0).unwrap();
        assert_eq!(s.spacing_mm, 250.0);
        assert!(!s.fallback);
    }

    #[test]
    fn test_spacing_floor_is_fallback() {
        let s = select_spacing(5000.0, 12, 300.0).unwrap();
        assert!(s.fallback);
        assert_eq!(s.spacing_mm, MIN_BAR_SPACING_MM);
    }
}
