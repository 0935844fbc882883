//! # Flexural Design Pipeline
//!
//! Beams, slab strips and footing strips share one design sequence:
//!
//! ```text
//! demand → K, z → As,req → ratio limits → bar layout → M_Rd → span/depth → verdict
//! ```
//!
//! Each element describes itself through the [`FlexuralMember`] trait and
//! [`design_flexure`] runs the sequence. Element modules only compute their
//! own demand and add their own extra checks (shear, punching, ...).
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::flexure::{design_flexure, BarLayout, FlexuralMember, FlexuralSection};
//! use design_core::materials::{MaterialCatalog, MaterialProperties, STANDARD_BAR_DIAMETERS};
//!
//! struct TestBeam;
//!
//! impl FlexuralMember for TestBeam {
//!     fn label(&self) -> &str { "Beam" }
//!     fn section(&self) -> FlexuralSection {
//!         FlexuralSection { width_mm: 300.0, height_mm: 500.0, effective_depth_mm: 442.0 }
//!     }
//!     fn design_moment_knm(&self) -> f64 { 120.0 }
//!     fn layout(&self) -> BarLayout {
//!         BarLayout::Discrete { diameters: &STANDARD_BAR_DIAMETERS, min_count: 2, max_count: 8 }
//!     }
//!     fn min_ratio(&self, _m: &MaterialProperties) -> f64 { 0.0013 }
//! }
//!
//! let m = MaterialCatalog::standard().resolve("C30", "420").properties;
//! let design = design_flexure(&TestBeam, &m).unwrap();
//! assert!(design.is_adequate);
//! assert!(design.moment_capacity >= 120.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::design_code::{FLEXURE_RATIO_MAX, K_BALANCED};
use crate::equations::flexure::{lever_arm, moment_capacity, normalised_moment, required_steel_area};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialProperties;
use crate::reinforcement::{select_bars, select_spacing, BarSelection, SpacingSelection};
use crate::report::{ensure_all_finite, Warnings};

/// Rounding slack when comparing provided and required steel (mm²)
pub(crate) const AREA_TOLERANCE_MM2: f64 = 1e-6;

/// Rectangular section of a flexural member (mm). Spaced layouts use a
/// 1000 mm wide strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexuralSection {
    pub width_mm: f64,
    pub height_mm: f64,
    pub effective_depth_mm: f64,
}

/// How the required area is turned into bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarLayout {
    /// A count of bars chosen from a diameter list
    Discrete {
        diameters: &'static [u32],
        min_count: u32,
        max_count: u32,
    },
    /// Fixed diameter at a spacing per metre run
    Spaced { diameter_mm: u32, max_spacing_mm: f64 },
}

/// Span/effective-depth deflection control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanDepthCheck {
    pub span_m: f64,
    pub limit: f64,
}

/// Strategy describing one flexural member to the shared pipeline.
pub trait FlexuralMember {
    /// Label used to prefix warnings ("Beam", "Slab short span", ...)
    fn label(&self) -> &str;

    fn section(&self) -> FlexuralSection;

    /// Factored design moment (kN·m, or kN·m/m for strips)
    fn design_moment_knm(&self) -> f64;

    fn layout(&self) -> BarLayout;

    /// Minimum tension steel ratio As/(b·d)
    fn min_ratio(&self, materials: &MaterialProperties) -> f64;

    /// Maximum tension steel ratio As/(b·d)
    fn max_ratio(&self) -> f64 {
        FLEXURE_RATIO_MAX
    }

    /// Deflection control, if the member has one
    fn span_depth(&self) -> Option<SpanDepthCheck> {
        None
    }
}

/// Reinforcement actually provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum ProvidedReinforcement {
    Bars(BarSelection),
    Spaced(SpacingSelection),
}

impl ProvidedReinforcement {
    pub fn area_mm2(&self) -> f64 {
        match self {
            ProvidedReinforcement::Bars(b) => b.area_provided_mm2,
            ProvidedReinforcement::Spaced(s) => s.area_provided_mm2_per_m,
        }
    }

    pub fn arrangement(&self) -> String {
        match self {
            ProvidedReinforcement::Bars(b) => b.arrangement(),
            ProvidedReinforcement::Spaced(s) => s.arrangement(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        match self {
            ProvidedReinforcement::Bars(b) => b.fallback,
            ProvidedReinforcement::Spaced(s) => s.fallback,
        }
    }

    pub fn diameter_mm(&self) -> u32 {
        match self {
            ProvidedReinforcement::Bars(b) => b.diameter_mm,
            ProvidedReinforcement::Spaced(s) => s.diameter_mm,
        }
    }
}

/// Outcome of the flexural pipeline for one member or strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexuralDesign {
    /// Factored design moment (kN·m or kN·m/m)
    pub design_moment: f64,
    /// Section width used (mm)
    pub width: f64,
    /// Effective depth used (mm)
    pub effective_depth: f64,
    /// Normalised moment K = M/(b·d²·fck)
    pub k_factor: f64,
    /// True when K exceeds the balanced limit
    pub compression_steel_required: bool,
    /// Lever arm z (mm)
    pub lever_arm: f64,
    /// Steel area from the moment alone (mm² or mm²/m)
    pub steel_area_flexure: f64,
    /// Minimum steel area (mm² or mm²/m)
    pub steel_area_minimum: f64,
    /// Governing required steel area (mm² or mm²/m)
    pub steel_area_required: f64,
    /// Steel area provided (mm² or mm²/m)
    pub steel_area_provided: f64,
    /// Provided layout, tagged `bars` or `spaced`
    pub reinforcement: ProvidedReinforcement,
    /// Layout label ("3Ø20", "Ø12/150")
    pub bar_arrangement: String,
    /// Provided ratio As/(b·d) in percent
    pub reinforcement_ratio: f64,
    /// Moment capacity M_Rd (kN·m or kN·m/m)
    pub moment_capacity: f64,
    /// M_Ed/M_Rd in percent
    pub utilization_ratio: f64,
    /// Actual span/effective depth, when checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_depth_ratio: Option<f64>,
    /// Allowed span/effective depth, when checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_depth_limit: Option<f64>,
    pub is_adequate: bool,
    pub warnings: Vec<String>,
}

/// Run the shared flexural design sequence for `member`.
pub fn design_flexure(
    member: &dyn FlexuralMember,
    materials: &MaterialProperties,
) -> CalcResult<FlexuralDesign> {
    let label = member.label();
    let FlexuralSection {
        width_mm: b,
        height_mm: h,
        effective_depth_mm: d,
    } = member.section();
    if !(b > 0.0 && d > 0.0) {
        return Err(CalcError::calculation_failed(
            "Flexure",
            format!("{}: effective depth {:.0} mm leaves no section", label, d),
        ));
    }
    if d >= h {
        return Err(CalcError::calculation_failed(
            "Flexure",
            format!(
                "{}: effective depth {:.0} mm is not inside the {:.0} mm section",
                label, d, h
            ),
        ));
    }

    let m = member.design_moment_knm().max(0.0);
    let mut warnings = Warnings::new();

    // Lever arm and steel from the moment
    let k = normalised_moment(m, b, d, materials.fck_mpa);
    let compression_steel_required = k > K_BALANCED;
    let z = lever_arm(d, k);
    let as_flexure = if m > 0.0 {
        required_steel_area(m, materials.fyd_mpa, z)
    } else {
        0.0
    };
    warnings.push_if(compression_steel_required, || {
        format!(
            "{}: K = {:.3} exceeds {:.3}; section needs compression steel or more depth",
            label, k, K_BALANCED
        )
    });

    // Ratio limits
    let rho_min = member.min_ratio(materials);
    let rho_max = member.max_ratio();
    let as_min = rho_min * b * d;
    let as_max = rho_max * b * d;
    let as_required = as_flexure.max(as_min);
    warnings.push_if(as_required > as_max, || {
        format!(
            "{}: required steel {:.0} mm² exceeds the maximum {:.0} mm²",
            label, as_required, as_max
        )
    });

    let reinforcement = match member.layout() {
        BarLayout::Discrete {
            diameters,
            min_count,
            max_count,
        } => ProvidedReinforcement::Bars(select_bars(as_required, diameters, min_count, max_count)?),
        BarLayout::Spaced {
            diameter_mm,
            max_spacing_mm,
        } => ProvidedReinforcement::Spaced(select_spacing(as_required, diameter_mm, max_spacing_mm)?),
    };
    let fallback = reinforcement.is_fallback();
    let under_supplied = reinforcement.area_mm2() + AREA_TOLERANCE_MM2 < as_required;
    warnings.push_if(fallback, || {
        format!(
            "{}: no layout meets the bar limits; nearest layout {} used",
            label,
            reinforcement.arrangement()
        )
    });

    // Capacity
    let as_provided = reinforcement.area_mm2();
    let rho = as_provided / (b * d);
    let m_rd = moment_capacity(as_provided, materials.fyd_mpa, b, d, materials.fcd_block());
    let utilization = if m_rd > 0.0 { m / m_rd * 100.0 } else { 0.0 };
    warnings.push_if(rho > rho_max, || {
        format!(
            "{}: reinforcement ratio {:.2}% exceeds {:.2}%",
            label,
            rho * 100.0,
            rho_max * 100.0
        )
    });
    warnings.push_if(utilization > 100.0, || {
        format!("{}: moment utilization {:.1}% exceeds 100%", label, utilization)
    });

    // Deflection control
    let span_depth = member.span_depth();
    let span_depth_ratio = span_depth.map(|c| c.span_m * 1000.0 / d);
    let span_depth_ok = match (span_depth, span_depth_ratio) {
        (Some(c), Some(ratio)) => ratio <= c.limit,
        _ => true,
    };
    if let (Some(c), Some(ratio)) = (span_depth, span_depth_ratio) {
        warnings.push_if(!span_depth_ok, || {
            format!(
                "{}: span/depth {:.1} exceeds the limit {:.0}; deflection governs",
                label, ratio, c.limit
            )
        });
    }

    ensure_all_finite(&[
        ("designMoment", m),
        ("kFactor", k),
        ("leverArm", z),
        ("steelAreaRequired", as_required),
        ("momentCapacity", m_rd),
        ("utilizationRatio", utilization),
    ])?;

    let is_adequate = !compression_steel_required
        && utilization <= 100.0
        && rho >= rho_min
        && rho <= rho_max
        && !under_supplied
        && span_depth_ok;

    tracing::debug!(
        member = label,
        m_knm = m,
        k,
        as_required,
        arrangement = %reinforcement.arrangement(),
        utilization,
        is_adequate,
        "flexural design"
    );

    Ok(FlexuralDesign {
        design_moment: m,
        width: b,
        effective_depth: d,
        k_factor: k,
        compression_steel_required,
        lever_arm: z,
        steel_area_flexure: as_flexure,
        steel_area_minimum: as_min,
        steel_area_required: as_required,
        steel_area_provided: as_provided,
        bar_arrangement: reinforcement.arrangement(),
        reinforcement,
        reinforcement_ratio: rho * 100.0,
        moment_capacity: m_rd,
        utilization_ratio: utilization,
        span_depth_ratio,
        span_depth_limit: span_depth.map(|c| c.limit),
        is_adequate,
        warnings: warnings.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialCatalog, STANDARD_BAR_DIAMETERS};

    struct Member {
        b: f64,
        h: f64,
        d: f64,
        m: f64,
        layout: BarLayout,
        span: Option<SpanDepthCheck>,
    }

    impl FlexuralMember for Member {
        fn label(&self) -> &str {
            "Test"
        }
        fn section(&self) -> FlexuralSection {
            FlexuralSection {
                width_mm: self.b,
                height_mm: self.h,
                effective_depth_mm: self.d,
            }
        }
        fn design_moment_knm(&self) -> f64 {
            self.m
        }
        fn layout(&self) -> BarLayout {
            self.layout
        }
        fn min_ratio(&self, _m: &MaterialProperties) -> f64 {
            0.0013
        }
        fn span_depth(&self) -> Option<SpanDepthCheck> {
            self.span
        }
    }

    fn discrete(b: f64, d: f64, m: f64) -> Member {
        Member {
            b,
            h: d + 50.0,
            d,
            m,
            layout: BarLayout::Discrete {
                diameters: &STANDARD_BAR_DIAMETERS,
                min_count: 2,
                max_count: 8,
            },
            span: None,
        }
    }

    fn c30() -> MaterialProperties {
        MaterialCatalog::standard().resolve("C30", "420").properties
    }

    #[test]
    fn test_typical_beam_is_adequate() {
        let design = design_flexure(&discrete(300.0, 450.0, 150.0), &c30()).unwrap();
        // K = 0.0823, z = 414.5, As = 150e6 / (365.2 × 414.5) = 991 mm²
        assert!((design.steel_area_flexure - 991.0).abs() < 2.0);
        assert!(design.steel_area_provided >= design.steel_area_required);
        assert!(design.is_adequate);
        assert!(design.warnings.is_empty());
    }

    #[test]
    fn test_zero_moment_gives_minimum_steel() {
        let design = design_flexure(&discrete(300.0, 450.0, 0.0), &c30()).unwrap();
        assert_eq!(design.steel_area_flexure, 0.0);
        assert!((design.steel_area_required - 0.0013 * 300.0 * 450.0).abs() < 1e-9);
        assert_eq!(design.utilization_ratio, 0.0);
    }

    #[test]
    fn test_over_balanced_section_is_inadequate() {
        // K = 400e6 / (250 × 300² × 30) = 0.59
        let design = design_flexure(&discrete(250.0, 300.0, 400.0), &c30()).unwrap();
        assert!(design.compression_steel_required);
        assert!(!design.is_adequate);
        assert!(design.warnings.iter().any(|w| w.contains("compression steel")));
    }

    #[test]
    fn test_spaced_layout_per_metre() {
        let member = Member {
            b: 1000.0,
            h: 200.0,
            d: 150.0,
            m: 20.0,
            layout: BarLayout::Spaced {
                diameter_mm: 10,
                max_spacing_mm: 200.0,
            },
            span: None,
        };
        let design = design_flexure(&member, &c30()).unwrap();
        assert!(matches!(design.reinforcement, ProvidedReinforcement::Spaced(_)));
        assert!(design.bar_arrangement.starts_with("Ø10/"));
        assert!(design.steel_area_provided >= design.steel_area_required);
    }

    #[test]
    fn test_span_depth_limit() {
        let mut member = discrete(300.0, 250.0, 30.0);
        member.span = Some(SpanDepthCheck {
            span_m: 6.0,
            limit: 20.0,
        });
        let design = design_flexure(&member, &c30()).unwrap();
        // 6000 / 250 = 24 > 20
        assert!((design.span_depth_ratio.unwrap() - 24.0).abs() < 1e-9);
        assert!(!design.is_adequate);
    }

    #[test]
    fn test_no_section_is_error() {
        assert!(design_flexure(&discrete(300.0, -5.0, 10.0), &c30()).is_err());
    }

    #[test]
    fn test_effective_depth_outside_section_is_error() {
        let mut member = discrete(300.0, 450.0, 100.0);
        member.h = 400.0;
        let err = design_flexure(&member, &c30()).unwrap_err();
        assert!(err.to_string().contains("400 mm section"));
    }

    #[test]
    fn test_count_clamped_up_to_minimum_stays_adequate() {
        // As,min = 0.0013 × 300 × 450 = 175.5 mm², fewer than 4 bars of any size
        let mut member = discrete(300.0, 450.0, 0.0);
        member.layout = BarLayout::Discrete {
            diameters: &STANDARD_BAR_DIAMETERS,
            min_count: 4,
            max_count: 8,
        };
        let design = design_flexure(&member, &c30()).unwrap();
        assert_eq!(design.bar_arrangement, "4Ø12");
        assert!(design.steel_area_provided > design.steel_area_required);
        assert!(design.is_adequate);
        assert!(design.warnings.iter().any(|w| w.contains("nearest layout")));
    }

    #[test]
    fn test_count_clamped_down_to_maximum_is_inadequate() {
        // 300 kN·m on 300 × 450 needs about 2216 mm², more than 2Ø32
        let mut member = discrete(300.0, 450.0, 300.0);
        member.layout = BarLayout::Discrete {
            diameters: &STANDARD_BAR_DIAMETERS,
            min_count: 2,
            max_count: 2,
        };
        let design = design_flexure(&member, &c30()).unwrap();
        assert!(design.steel_area_provided < design.steel_area_required);
        assert!(!design.is_adequate);
    }

    #[test]
    fn test_serializes_layout_tag() {
        let design = design_flexure(&discrete(300.0, 450.0, 150.0), &c30()).unwrap();
        let json = serde_json::to_value(&design).unwrap();
        assert_eq!(json["reinforcement"]["layout"], "bars");
        assert!(json.get("spanDepthRatio").is_none());
    }
}
