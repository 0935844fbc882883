//! # Rectangular Beam Design
//!
//! Designs a singly reinforced rectangular beam under uniform dead and live
//! load for flexure, shear and deflection (span/depth).
//!
//! ## Method
//!
//! 1. Self weight (25 kN/m³) added to the dead load unless disabled
//! 2. Governing ULS line load from 1.4G + 1.6Q and 1.0G + 1.6Q
//! 3. M = wL²/n and V = c·wL from the support condition
//! 4. Tension steel from the shared flexural pipeline, 2–8 bars of Ø12–Ø32
//! 5. Shear: concrete capacity V_cr = 0.65·fctd·b·d, crushing limit
//!    0.22·fcd·b·d, Ø8 two-leg stirrups where V_d > V_cr
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::beam::{calculate, BeamInput};
//! use design_core::materials::MaterialCatalog;
//! use serde_json::json;
//!
//! let input = BeamInput::from_json(&json!({
//!     "span": 5.0, "beamWidth": 300, "beamDepth": 500,
//!     "deadLoad": 15, "liveLoad": 10
//! })).unwrap();
//!
//! let result = calculate(&input, MaterialCatalog::standard()).unwrap();
//! assert!((result.design_moment - 132.03).abs() < 0.01);
//! assert!(result.is_adequate);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::flexure::{
    design_flexure, BarLayout, FlexuralDesign, FlexuralMember, FlexuralSection,
    ProvidedReinforcement, SpanDepthCheck,
};
use crate::calculations::{read_grades, revalidate};
use crate::design_code::{code_ref, SupportType, BEAM_RATIO_FLOOR, CONCRETE_UNIT_WEIGHT};
use crate::equations::beam::{uniform_load_moment, uniform_load_shear};
use crate::equations::section::{effective_depth, rectangular_area, rectangular_moment_of_inertia};
use crate::errors::CalcResult;
use crate::loads::{GoverningCombination, LoadCase, LoadType};
use crate::materials::{bar_area_mm2, MaterialCatalog, MaterialProperties, STANDARD_BAR_DIAMETERS};
use crate::report::{ensure_all_finite, DesignStatus, Warnings};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const SPAN: FieldSpec = FieldSpec::required("span", "m", 0.5, 30.0);
const BEAM_WIDTH: FieldSpec = FieldSpec::required("beamWidth", "mm", 150.0, 1500.0);
const BEAM_DEPTH: FieldSpec = FieldSpec::required("beamDepth", "mm", 200.0, 3000.0);
const DEAD_LOAD: FieldSpec = FieldSpec::required("deadLoad", "kN/m", 0.0, f64::INFINITY);
const LIVE_LOAD: FieldSpec = FieldSpec::required("liveLoad", "kN/m", 0.0, f64::INFINITY);
const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 20.0, 100.0, 40.0);

/// Stirrup diameter (mm)
const STIRRUP_MM: u32 = 8;
/// Stirrup legs
const STIRRUP_LEGS: u32 = 2;
/// Main bar diameter assumed for the effective depth (mm)
const ASSUMED_BAR_MM: f64 = 20.0;
/// Main bar count bounds
const BEAM_MIN_BARS: u32 = 2;
const BEAM_MAX_BARS: u32 = 8;
/// Cap on stirrup spacing (mm)
const MAX_STIRRUP_SPACING_MM: f64 = 200.0;
/// Practical minimum stirrup spacing (mm)
const MIN_STIRRUP_SPACING_MM: f64 = 50.0;
/// Minimum clear gap between bars (mm), or the bar diameter if larger
const MIN_CLEAR_GAP_MM: f64 = 25.0;

/// Input parameters for a uniformly loaded rectangular beam.
///
/// ## JSON Example
///
/// ```json
/// {
///   "span": 6.0,
///   "beamWidth": 300,
///   "beamDepth": 550,
///   "deadLoad": 18,
///   "liveLoad": 12,
///   "supportType": "continuous"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamInput {
    /// Clear span L (m)
    #[serde(rename = "span")]
    pub span_m: f64,

    /// Web width b (mm)
    #[serde(rename = "beamWidth")]
    pub width_mm: f64,

    /// Overall depth h (mm)
    #[serde(rename = "beamDepth")]
    pub depth_mm: f64,

    /// Superimposed dead load G (kN/m), excluding self weight
    #[serde(rename = "deadLoad")]
    pub dead_load_kn_m: f64,

    /// Live load Q (kN/m)
    #[serde(rename = "liveLoad")]
    pub live_load_kn_m: f64,

    #[serde(rename = "supportType")]
    pub support: SupportType,

    /// Add 25 kN/m³ self weight to G
    #[serde(rename = "includeSelfWeight")]
    pub include_self_weight: bool,

    #[serde(rename = "concreteGrade")]
    pub concrete_grade: String,

    #[serde(rename = "steelGrade")]
    pub steel_grade: String,

    /// Clear cover to stirrups (mm)
    #[serde(rename = "coverThickness")]
    pub cover_mm: f64,
}

impl BeamInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let span_m = f.number(&SPAN);
        let width_mm = f.number(&BEAM_WIDTH);
        let depth_mm = f.number(&BEAM_DEPTH);
        let dead_load_kn_m = f.number(&DEAD_LOAD);
        let live_load_kn_m = f.number(&LIVE_LOAD);
        let support = read_support(&mut f, &SupportType::ALL);
        let include_self_weight = f.flag("includeSelfWeight", true);
        let (concrete_grade, steel_grade) = read_grades(&mut f);
        let cover_mm = f.number(&COVER);

        if f.is_clean() {
            let clear = width_mm - 2.0 * (cover_mm + f64::from(STIRRUP_MM));
            f.check(
                clear >= 2.0 * f64::from(STANDARD_BAR_DIAMETERS[0]) + MIN_CLEAR_GAP_MM,
                "beamWidth",
                "too narrow for two bars inside the cover and stirrups",
            );
        }

        f.finish(|| BeamInput {
            span_m,
            width_mm,
            depth_mm,
            dead_load_kn_m,
            live_load_kn_m,
            support,
            include_self_weight,
            concrete_grade,
            steel_grade,
            cover_mm,
        })
    }

    /// Apply the request rules to a programmatically built input.
    pub fn validate(&self) -> CalcResult<()> {
        revalidate(self, Self::from_json)
    }

    /// Self weight of the section (kN/m)
    pub fn self_weight_kn_m(&self) -> f64 {
        CONCRETE_UNIT_WEIGHT * rectangular_area(self.width_mm, self.depth_mm) / 1.0e6
    }

    /// Service loads with self weight folded into G
    pub fn load_case(&self) -> LoadCase {
        let mut case = LoadCase::new("Beam")
            .with_load(LoadType::Dead, self.dead_load_kn_m)
            .with_load(LoadType::Live, self.live_load_kn_m);
        if self.include_self_weight {
            case.add_load(LoadType::Dead, self.self_weight_kn_m());
        }
        case
    }
}

/// Read `supportType`, restricted to `allowed`.
pub(crate) fn read_support(f: &mut Fields<'_>, allowed: &[SupportType]) -> SupportType {
    let label = f.text("supportType", "simply_supported");
    match SupportType::from_str_flexible(&label) {
        Ok(s) if allowed.contains(&s) => s,
        _ => {
            let names: Vec<String> = allowed
                .iter()
                .filter_map(|s| serde_json::to_value(s).ok())
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            f.check(
                false,
                "supportType",
                format!("'{}' is not one of {}", label, names.join(", ")),
            );
            SupportType::default()
        }
    }
}

/// The beam as seen by the flexural pipeline.
struct BeamMember {
    width: f64,
    height: f64,
    d: f64,
    moment: f64,
    span_m: f64,
    support: SupportType,
}

impl FlexuralMember for BeamMember {
    fn label(&self) -> &str {
        "Beam"
    }

    fn section(&self) -> FlexuralSection {
        FlexuralSection {
            width_mm: self.width,
            height_mm: self.height,
            effective_depth_mm: self.d,
        }
    }

    fn design_moment_knm(&self) -> f64 {
        self.moment
    }

    fn layout(&self) -> BarLayout {
        BarLayout::Discrete {
            diameters: &STANDARD_BAR_DIAMETERS,
            min_count: BEAM_MIN_BARS,
            max_count: BEAM_MAX_BARS,
        }
    }

    fn min_ratio(&self, materials: &MaterialProperties) -> f64 {
        (0.8 * materials.fctd_mpa / materials.fyd_mpa).max(BEAM_RATIO_FLOOR)
    }

    fn span_depth(&self) -> Option<SpanDepthCheck> {
        Some(SpanDepthCheck {
            span_m: self.span_m,
            limit: self.support.span_depth_limit(),
        })
    }
}

/// Shear design with vertical stirrups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShearDesign {
    /// Factored shear V_d (kN)
    pub design_shear: f64,
    /// Concrete contribution V_cr (kN)
    pub concrete_capacity: f64,
    /// Web crushing limit (kN)
    pub max_capacity: f64,
    /// True when V_d > V_cr
    pub shear_reinforcement_required: bool,
    pub stirrup_diameter: u32,
    pub stirrup_legs: u32,
    /// Stirrup area per set A_sw (mm²)
    pub stirrup_area: f64,
    /// Provided spacing (mm)
    pub stirrup_spacing: f64,
    /// Spacing cap min(d/2, 200) (mm)
    pub max_spacing: f64,
    /// e.g. "Ø8/150 (2 legs)"
    pub stirrup_arrangement: String,
    /// 0.8·V_cr + A_sw·fyd·d/s, capped at the crushing limit (kN)
    pub shear_capacity: f64,
    /// V_d / shear capacity in percent
    pub utilization_ratio: f64,
    pub is_adequate: bool,
}

fn design_shear(
    v_d: f64,
    b: f64,
    d: f64,
    materials: &MaterialProperties,
    warnings: &mut Warnings,
) -> ShearDesign {
    let v_cr = 0.65 * materials.fctd_mpa * b * d / 1000.0;
    let v_max = 0.22 * materials.fcd_mpa * b * d / 1000.0;
    let a_sw = f64::from(STIRRUP_LEGS) * bar_area_mm2(STIRRUP_MM);
    let max_spacing = (d / 2.0).min(MAX_STIRRUP_SPACING_MM);
    let required = v_d > v_cr;

    let spacing = if required {
        let s = a_sw * materials.fyd_mpa * d / ((v_d - 0.8 * v_cr) * 1000.0);
        ((s / 10.0).floor() * 10.0).min(max_spacing)
    } else {
        max_spacing.floor()
    };
    let spacing = if spacing < MIN_STIRRUP_SPACING_MM {
        warnings.push(format!(
            "Stirrup spacing below {:.0} mm needed; use larger or more legs",
            MIN_STIRRUP_SPACING_MM
        ));
        MIN_STIRRUP_SPACING_MM
    } else {
        spacing
    };

    let capacity = (0.8 * v_cr + a_sw * materials.fyd_mpa * d / (spacing * 1000.0)).min(v_max);
    let crushing = v_d > v_max;
    warnings.push_if(crushing, || {
        format!(
            "Shear {:.1} kN exceeds the web crushing limit {:.1} kN; enlarge the section",
            v_d, v_max
        )
    });
    let utilization = if capacity > 0.0 { v_d / capacity * 100.0 } else { 0.0 };

    ShearDesign {
        design_shear: v_d,
        concrete_capacity: v_cr,
        max_capacity: v_max,
        shear_reinforcement_required: required,
        stirrup_diameter: STIRRUP_MM,
        stirrup_legs: STIRRUP_LEGS,
        stirrup_area: a_sw,
        stirrup_spacing: spacing,
        max_spacing,
        stirrup_arrangement: format!("Ø{}/{:.0} ({} legs)", STIRRUP_MM, spacing, STIRRUP_LEGS),
        shear_capacity: capacity,
        utilization_ratio: utilization,
        is_adequate: !crushing && v_d <= capacity,
    }
}

/// Width needed to place `count` bars of `diameter` in one layer (mm).
fn single_layer_width(count: u32, diameter: u32) -> f64 {
    let phi = f64::from(diameter);
    let gap = phi.max(MIN_CLEAR_GAP_MM);
    f64::from(count) * phi + f64::from(count.saturating_sub(1)) * gap
}

/// Beam design result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeamResult {
    pub span: f64,
    pub support_type: SupportType,
    /// Self weight included in G (kN/m)
    pub self_weight: f64,
    /// Total permanent load G (kN/m)
    pub dead_load_total: f64,
    /// Variable load Q (kN/m)
    pub live_load: f64,
    pub governing_combination: GoverningCombination,
    /// Governing ULS line load (kN/m)
    pub factored_load: f64,
    /// M_Ed (kN·m)
    pub design_moment: f64,
    /// V_Ed (kN)
    pub design_shear: f64,
    /// Gross second moment of area (mm⁴)
    pub gross_moment_of_inertia: f64,
    pub effective_depth: f64,
    pub steel_area_required: f64,
    pub steel_area_provided: f64,
    pub number_of_bars: u32,
    pub bar_diameter: u32,
    pub bar_arrangement: String,
    /// Percent of b·d
    pub reinforcement_ratio: f64,
    /// M_Rd (kN·m)
    pub moment_capacity: f64,
    pub fits_single_layer: bool,
    pub flexure: FlexuralDesign,
    pub shear: ShearDesign,
    /// Larger of the flexural and shear utilizations (%)
    pub utilization_ratio: f64,
    pub is_adequate: bool,
    pub design_status: DesignStatus,
    pub materials: MaterialProperties,
    pub code_references: Vec<String>,
    pub warnings: Vec<String>,
}

/// Design a rectangular beam.
pub fn calculate(input: &BeamInput, catalog: &MaterialCatalog) -> CalcResult<BeamResult> {
    input.validate()?;

    let resolved = catalog.resolve(&input.concrete_grade, &input.steel_grade);
    let m = &resolved.properties;
    let mut warnings = Warnings::new();
    warnings.extend(resolved.fallbacks.iter().cloned());

    let (b, h) = (input.width_mm, input.depth_mm);
    let span = input.span_m;

    // === Actions ===
    let case = input.load_case();
    case.validate()?;
    let governing = case.governing_uls();
    let w = governing.factored_load;
    let m_ed = uniform_load_moment(w, span, input.support);
    let v_ed = uniform_load_shear(w, span, input.support);

    // === Flexure ===
    let d = effective_depth(h, input.cover_mm, f64::from(STIRRUP_MM), ASSUMED_BAR_MM);
    let member = BeamMember {
        width: b,
        height: h,
        d,
        moment: m_ed,
        span_m: span,
        support: input.support,
    };
    let flexure = design_flexure(&member, m)?;
    warnings.extend(flexure.warnings.iter().cloned());

    let (count, diameter) = match &flexure.reinforcement {
        ProvidedReinforcement::Bars(bars) => (bars.count, bars.diameter_mm),
        ProvidedReinforcement::Spaced(s) => (0, s.diameter_mm),
    };
    let clear_width = b - 2.0 * (input.cover_mm + f64::from(STIRRUP_MM));
    let fits_single_layer = single_layer_width(count, diameter) <= clear_width;
    warnings.push_if(!fits_single_layer, || {
        format!(
            "{} does not fit in one layer within {:.0} mm clear width; use two layers",
            flexure.bar_arrangement, clear_width
        )
    });

    // === Shear ===
    let shear = design_shear(v_ed, b, d, m, &mut warnings);

    let utilization = flexure.utilization_ratio.max(shear.utilization_ratio);
    ensure_all_finite(&[
        ("factoredLoad", w),
        ("designMoment", m_ed),
        ("designShear", v_ed),
        ("concreteShearCapacity", shear.concrete_capacity),
        ("stirrupSpacing", shear.stirrup_spacing),
        ("utilizationRatio", utilization),
    ])?;

    let is_adequate = flexure.is_adequate && shear.is_adequate;

    tracing::debug!(
        w,
        m_ed,
        v_ed,
        arrangement = %flexure.bar_arrangement,
        stirrups = %shear.stirrup_arrangement,
        is_adequate,
        "beam design"
    );

    Ok(BeamResult {
        span,
        support_type: input.support,
        self_weight: if input.include_self_weight {
            input.self_weight_kn_m()
        } else {
            0.0
        },
        dead_load_total: case.get(LoadType::Dead),
        live_load: case.get(LoadType::Live),
        factored_load: w,
        governing_combination: governing,
        design_moment: m_ed,
        design_shear: v_ed,
        gross_moment_of_inertia: rectangular_moment_of_inertia(b, h),
        effective_depth: d,
        steel_area_required: flexure.steel_area_required,
        steel_area_provided: flexure.steel_area_provided,
        number_of_bars: count,
        bar_diameter: diameter,
        bar_arrangement: flexure.bar_arrangement.clone(),
        reinforcement_ratio: flexure.reinforcement_ratio,
        moment_capacity: flexure.moment_capacity,
        fits_single_layer,
        flexure,
        shear,
        utilization_ratio: utilization,
        is_adequate,
        design_status: DesignStatus::from_adequate(is_adequate),
        materials: m.clone(),
        code_references: vec![
            code_ref::BEAM_REINFORCEMENT.to_string(),
            code_ref::SHEAR.to_string(),
            code_ref::SPAN_DEPTH.to_string(),
        ],
        warnings: warnings.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example() -> BeamInput {
        BeamInput::from_json(&json!({
            "span": 5.0, "beamWidth": 300, "beamDepth": 500,
            "deadLoad": 15, "liveLoad": 10
        }))
        .unwrap()
    }

    fn run(input: &BeamInput) -> BeamResult {
        calculate(input, MaterialCatalog::standard()).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let input = example();
        assert_eq!(input.support, SupportType::SimplySupported);
        assert!(input.include_self_weight);
        assert_eq!(input.cover_mm, 40.0);
    }

    #[test]
    fn test_loads_and_actions() {
        let r = run(&example());
        // 25 × 0.3 × 0.5 = 3.75 kN/m
        assert!((r.self_weight - 3.75).abs() < 1e-9);
        assert!((r.dead_load_total - 18.75).abs() < 1e-9);
        // 1.4 × 18.75 + 1.6 × 10 = 42.25
        assert!((r.factored_load - 42.25).abs() < 1e-9);
        assert_eq!(r.governing_combination.equation, "1.4G + 1.6Q");
        // 42.25 × 25 / 8
        assert!((r.design_moment - 132.03).abs() < 0.01);
        assert!((r.design_shear - 105.625).abs() < 1e-6);
    }

    #[test]
    fn test_flexure() {
        let r = run(&example());
        assert!((r.effective_depth - 442.0).abs() < 1e-9);
        assert!(r.steel_area_provided >= r.steel_area_required);
        assert!((2..=8).contains(&r.number_of_bars));
        assert!(r.moment_capacity >= r.design_moment);
        assert!(r.flexure.span_depth_ratio.unwrap() < 20.0);
    }

    #[test]
    fn test_light_shear_uses_maximum_spacing() {
        let r = run(&example());
        // V_cr = 0.65 × 1.278 × 300 × 442 / 1000 = 110.2 kN > 105.6 kN
        assert!((r.shear.concrete_capacity - 110.2).abs() < 0.2);
        assert!(!r.shear.shear_reinforcement_required);
        assert_eq!(r.shear.stirrup_spacing, 200.0);
        assert!(r.shear.is_adequate);
        assert!(r.is_adequate);
        assert_eq!(r.design_status, DesignStatus::Adequate);
    }

    #[test]
    fn test_heavy_beam_needs_stirrups_and_depth() {
        let mut input = example();
        input.span_m = 4.0;
        input.width_mm = 250.0;
        input.depth_mm = 400.0;
        input.dead_load_kn_m = 40.0;
        input.live_load_kn_m = 40.0;
        let r = run(&input);
        assert!(r.shear.shear_reinforcement_required);
        assert!(r.shear.stirrup_spacing < 200.0);
        assert!(r.shear.stirrup_spacing >= 50.0);
        // K ≈ 0.28 > 0.167
        assert!(r.flexure.compression_steel_required);
        assert!(!r.is_adequate);
        assert_eq!(r.design_status, DesignStatus::Inadequate);
    }

    #[test]
    fn test_cantilever_coefficients() {
        let mut input = example();
        input.span_m = 2.0;
        input.support = SupportType::Cantilever;
        let r = run(&input);
        assert!((r.design_moment - 42.25 * 4.0 / 2.0).abs() < 1e-6);
        assert!((r.design_shear - 42.25 * 2.0).abs() < 1e-6);
        assert_eq!(r.flexure.span_depth_limit, Some(7.0));
    }

    #[test]
    fn test_self_weight_can_be_excluded() {
        let mut input = example();
        input.include_self_weight = false;
        let r = run(&input);
        assert_eq!(r.self_weight, 0.0);
        assert!((r.factored_load - (1.4 * 15.0 + 1.6 * 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_long_span_fails_deflection() {
        let mut input = example();
        input.span_m = 12.0;
        input.dead_load_kn_m = 2.0;
        input.live_load_kn_m = 1.0;
        let r = run(&input);
        // 12000 / 442 = 27.1 > 20
        assert!(!r.is_adequate);
        assert!(r.warnings.iter().any(|w| w.contains("span/depth")));
    }

    #[test]
    fn test_single_layer_width() {
        // 3Ø20: 60 + 2 × 25
        assert!((single_layer_width(3, 20) - 110.0).abs() < 1e-9);
        // 2Ø32: 64 + 32
        assert!((single_layer_width(2, 32) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_support_type() {
        let err = BeamInput::from_json(&json!({
            "span": 5.0, "beamWidth": 300, "beamDepth": 500,
            "deadLoad": 15, "liveLoad": 10, "supportType": "propped"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("supportType"));
    }

    #[test]
    fn test_narrow_beam_rejected() {
        let err = BeamInput::from_json(&json!({
            "span": 5.0, "beamWidth": 150, "beamDepth": 500,
            "deadLoad": 15, "liveLoad": 10, "coverThickness": 50
        }))
        .unwrap_err();
        assert!(err.to_string().contains("beamWidth"));
    }

    #[test]
    fn test_response_field_names() {
        let json = serde_json::to_value(run(&example())).unwrap();
        for key in [
            "designMoment", "designShear", "governingCombination", "barArrangement",
            "steelAreaRequired", "steelAreaProvided", "shear", "flexure",
            "isAdequate", "designStatus", "warnings",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["supportType"], "simply_supported");
    }
}
