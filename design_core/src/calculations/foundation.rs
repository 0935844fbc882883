//! # Isolated Pad Footing
//!
//! Sizes and reinforces a rectangular pad under a single concentric column.
//!
//! ## Method
//!
//! 1. Net allowable pressure q_net = q_allow − 20·D_f
//! 2. Plan area A ≥ N/q_net with equal projections on all four sides,
//!    B·(B + (h − b)) ≥ A, B rounded up to 50 mm
//! 3. Ultimate pressure q_u = λ·N/(B·L)
//! 4. Thickness given, or searched from 300 mm in 50 mm steps until the
//!    punching and one-way shear checks pass
//! 5. Cantilever flexure at the column face, per metre, both directions
//! 6. Service bearing check with footing and backfill weight
//!
//! ```text
//!        ←──────── B ────────→
//!       ┌─────────────────────┐ ↑
//!       │     ┌ ─ ─ ─ ─ ┐     │ │
//!       │       ┌─────┐       │ │
//!       │     │ │ col │ │ d/2 │ L
//!       │       └─────┘       │ │
//!       │     └ ─ ─ ─ ─ ┘     │ │
//!       └─────────────────────┘ ↓
//! ```
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::foundation::{calculate, FoundationInput};
//! use design_core::materials::MaterialCatalog;
//! use serde_json::json;
//!
//! let input = FoundationInput::from_json(&json!({
//!     "axialLoad": 900, "columnWidth": 400, "columnDepth": 400,
//!     "allowableBearingPressure": 200
//! })).unwrap();
//!
//! let result = calculate(&input, MaterialCatalog::standard()).unwrap();
//! assert_eq!(result.footing_width, 2250.0);
//! assert_eq!(result.footing_thickness, 400.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::flexure::{
    design_flexure, BarLayout, FlexuralDesign, FlexuralMember, FlexuralSection,
};
use crate::calculations::{read_grades, revalidate};
use crate::design_code::{
    code_ref, CONCRETE_UNIT_WEIGHT, FOOTING_AVERAGE_UNIT_WEIGHT, SLAB_RATIO_MIN,
};
use crate::errors::CalcResult;
use crate::materials::{MaterialCatalog, MaterialProperties};
use crate::report::{ensure_all_finite, CheckStatus, DesignStatus, Warnings};
use crate::units::{Meters, Millimeters};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const AXIAL_LOAD: FieldSpec = FieldSpec::required("axialLoad", "kN", 1.0, f64::INFINITY);
const COLUMN_WIDTH: FieldSpec = FieldSpec::required("columnWidth", "mm", 150.0, 2000.0);
const COLUMN_DEPTH: FieldSpec = FieldSpec::required("columnDepth", "mm", 150.0, 2000.0);
const ALLOWABLE_BEARING: FieldSpec =
    FieldSpec::required("allowableBearingPressure", "kPa", 50.0, 2000.0);
const FOUNDATION_DEPTH: FieldSpec = FieldSpec::optional("foundationDepth", "m", 0.3, 5.0, 1.0);
const LOAD_FACTOR: FieldSpec = FieldSpec::optional("loadFactor", "", 1.0, 2.0, 1.5);
const FOOTING_THICKNESS: FieldSpec = FieldSpec::required("footingThickness", "mm", 250.0, 2000.0);
const BAR_DIAMETER: FieldSpec = FieldSpec::optional("barDiameter", "mm", 10.0, 32.0, 14.0);
const SOIL_UNIT_WEIGHT: FieldSpec = FieldSpec::optional("soilUnitWeight", "kN/m³", 10.0, 25.0, 18.0);
const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 40.0, 100.0, 50.0);

/// Plan dimensions are rounded up to this module (mm)
const PLAN_MODULE_MM: f64 = 50.0;
/// Smallest projection beyond the column face (mm)
const MIN_PROJECTION_MM: f64 = 50.0;
/// Thickness search bounds and step (mm)
const THICKNESS_START_MM: f64 = 300.0;
const THICKNESS_STEP_MM: f64 = 50.0;
const THICKNESS_MAX_MM: f64 = 2000.0;
/// Absolute cap on footing bar spacing (mm)
const FOOTING_MAX_SPACING_MM: f64 = 300.0;

/// Input parameters for an isolated pad footing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "axialLoad": 900,
///   "columnWidth": 400,
///   "columnDepth": 400,
///   "allowableBearingPressure": 200,
///   "foundationDepth": 1.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationInput {
    /// Service axial load N (kN)
    #[serde(rename = "axialLoad")]
    pub axial_load_kn: f64,

    /// Column side b, along the footing width B (mm)
    #[serde(rename = "columnWidth")]
    pub column_width_mm: f64,

    /// Column side h, along the footing length L (mm)
    #[serde(rename = "columnDepth")]
    pub column_depth_mm: f64,

    /// Allowable gross bearing pressure (kPa)
    #[serde(rename = "allowableBearingPressure")]
    pub allowable_bearing_kpa: f64,

    /// Depth of the footing underside below grade D_f (m)
    #[serde(rename = "foundationDepth")]
    pub depth_m: f64,

    /// Service-to-ultimate load factor λ
    #[serde(rename = "loadFactor")]
    pub load_factor: f64,

    /// Fixed thickness (mm); searched when absent
    #[serde(rename = "footingThickness", skip_serializing_if = "Option::is_none")]
    pub thickness_mm: Option<f64>,

    #[serde(rename = "barDiameter")]
    pub bar_diameter_mm: u32,

    /// Backfill unit weight (kN/m³)
    #[serde(rename = "soilUnitWeight")]
    pub soil_unit_weight: f64,

    #[serde(rename = "concreteGrade")]
    pub concrete_grade: String,

    #[serde(rename = "steelGrade")]
    pub steel_grade: String,

    #[serde(rename = "coverThickness")]
    pub cover_mm: f64,
}

impl FoundationInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let axial_load_kn = f.number(&AXIAL_LOAD);
        let column_width_mm = f.number(&COLUMN_WIDTH);
        let column_depth_mm = f.number(&COLUMN_DEPTH);
        let allowable_bearing_kpa = f.number(&ALLOWABLE_BEARING);
        let depth_m = f.number(&FOUNDATION_DEPTH);
        let load_factor = f.number(&LOAD_FACTOR);
        let thickness_mm = f.optional_number(&FOOTING_THICKNESS);
        let bar_diameter = f.number(&BAR_DIAMETER);
        let soil_unit_weight = f.number(&SOIL_UNIT_WEIGHT);
        let (concrete_grade, steel_grade) = read_grades(&mut f);
        let cover_mm = f.number(&COVER);

        if f.is_clean() {
            f.check(bar_diameter.fract() == 0.0, "barDiameter", "must be a whole number of millimetres");
            f.check(
                allowable_bearing_kpa > FOOTING_AVERAGE_UNIT_WEIGHT * depth_m,
                "allowableBearingPressure",
                format!(
                    "must exceed the overburden {:.0} kPa at foundationDepth",
                    FOOTING_AVERAGE_UNIT_WEIGHT * depth_m
                ),
            );
            if let Some(t) = thickness_mm {
                f.check(
                    t - cover_mm - 2.0 * bar_diameter > 0.0,
                    "footingThickness",
                    "leaves no effective depth for two bar layers",
                );
            }
        }

        f.finish(|| FoundationInput {
            axial_load_kn,
            column_width_mm,
            column_depth_mm,
            allowable_bearing_kpa,
            depth_m,
            load_factor,
            thickness_mm,
            bar_diameter_mm: bar_diameter as u32,
            soil_unit_weight,
            concrete_grade,
            steel_grade,
            cover_mm,
        })
    }

    /// Apply the request rules to a programmatically built input.
    pub fn validate(&self) -> CalcResult<()> {
        revalidate(self, Self::from_json)
    }

    /// q_allow − 20·D_f (kPa)
    pub fn net_allowable_kpa(&self) -> f64 {
        self.allowable_bearing_kpa - FOOTING_AVERAGE_UNIT_WEIGHT * self.depth_m
    }
}

/// Plan dimensions (mm) with equal projections beyond each column face.
fn size_plan(area_required_m2: f64, b_mm: f64, h_mm: f64) -> (f64, f64) {
    let delta = Meters::from(Millimeters(h_mm - b_mm)).0;
    let width_m = (-delta + (delta * delta + 4.0 * area_required_m2).sqrt()) / 2.0;
    // B ≥ b + 2·50 also gives L ≥ h + 2·50
    let width_mm = Millimeters::from(Meters(width_m))
        .0
        .max(b_mm + 2.0 * MIN_PROJECTION_MM);
    let width_mm = (width_mm / PLAN_MODULE_MM).ceil() * PLAN_MODULE_MM;
    (width_mm, width_mm + (h_mm - b_mm))
}

/// Punching shear at d/2 from the column faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchingCheck {
    /// Average effective depth (mm)
    pub effective_depth: f64,
    /// Critical perimeter u_p (mm)
    pub critical_perimeter: f64,
    /// V_pd = N_d − q_u·A_crit (kN)
    pub design_force: f64,
    /// V_pr = fctd·u_p·d (kN)
    pub capacity: f64,
    pub utilization_ratio: f64,
    pub status: CheckStatus,
}

/// One-way (beam) shear at d from the column face, per metre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneWayShearCheck {
    /// kN/m
    pub design_force: f64,
    /// 0.65·fctd·d (kN/m)
    pub capacity: f64,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    width_mm: f64,
    length_mm: f64,
    column_width_mm: f64,
    column_depth_mm: f64,
    n_d: f64,
    q_u: f64,
}

impl Plan {
    fn area_m2(&self) -> f64 {
        self.width_mm * self.length_mm / 1.0e6
    }

    /// Projection beyond the column face (m); equal in both directions
    fn projection_m(&self) -> f64 {
        Meters::from(Millimeters((self.width_mm - self.column_width_mm) / 2.0)).0
    }

    fn punching(&self, d: f64, m: &MaterialProperties) -> PunchingCheck {
        let (b, h) = (self.column_width_mm, self.column_depth_mm);
        let loaded = (b + d).min(self.width_mm) * (h + d).min(self.length_mm) / 1.0e6;
        let u_p = 2.0 * (b + d) + 2.0 * (h + d);
        let v_pd = (self.n_d - self.q_u * loaded).max(0.0);
        let v_pr = m.fctd_mpa * u_p * d / 1000.0;
        PunchingCheck {
            effective_depth: d,
            critical_perimeter: u_p,
            design_force: v_pd,
            capacity: v_pr,
            utilization_ratio: v_pd / v_pr * 100.0,
            status: CheckStatus::from_ok(v_pd <= v_pr),
        }
    }

    fn one_way_shear(&self, d: f64, m: &MaterialProperties) -> OneWayShearCheck {
        let lever = (self.projection_m() - Meters::from(Millimeters(d)).0).max(0.0);
        let v = self.q_u * lever;
        let v_rd = 0.65 * m.fctd_mpa * d;
        OneWayShearCheck {
            design_force: v,
            capacity: v_rd,
            status: CheckStatus::from_ok(v <= v_rd),
        }
    }
}

/// A 1000 mm strip of footing cantilevering from the column face.
struct FootingStrip {
    label: &'static str,
    thickness: f64,
    d: f64,
    moment: f64,
    diameter: u32,
}

impl FlexuralMember for FootingStrip {
    fn label(&self) -> &str {
        self.label
    }

    fn section(&self) -> FlexuralSection {
        FlexuralSection {
            width_mm: 1000.0,
            height_mm: self.thickness,
            effective_depth_mm: self.d,
        }
    }

    fn design_moment_knm(&self) -> f64 {
        self.moment
    }

    fn layout(&self) -> BarLayout {
        BarLayout::Spaced {
            diameter_mm: self.diameter,
            max_spacing_mm: (3.0 * self.thickness).min(FOOTING_MAX_SPACING_MM),
        }
    }

    fn min_ratio(&self, _materials: &MaterialProperties) -> f64 {
        SLAB_RATIO_MIN
    }
}

/// How the thickness was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessSource {
    Specified,
    Searched,
    /// Search hit the upper bound without passing
    SearchLimit,
}

/// Footing design result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundationResult {
    /// q_net (kPa)
    pub net_allowable_pressure: f64,
    /// N/q_net (m²)
    pub required_area: f64,
    /// B (mm)
    pub footing_width: f64,
    /// L (mm)
    pub footing_length: f64,
    /// B·L (m²)
    pub footing_area: f64,
    /// Projection beyond the column face (mm)
    pub projection: f64,
    /// λ·N (kN)
    pub factored_load: f64,
    /// q_u (kPa)
    pub ultimate_pressure: f64,
    /// t (mm)
    pub footing_thickness: f64,
    pub thickness_source: ThicknessSource,
    pub punching: PunchingCheck,
    pub one_way_shear: OneWayShearCheck,
    /// Bars parallel to B
    pub flexure_x: FlexuralDesign,
    /// Bars parallel to L, inner layer
    pub flexure_y: FlexuralDesign,
    /// (N + footing + backfill)/A (kPa)
    pub service_pressure: f64,
    pub bearing_status: CheckStatus,
    pub is_adequate: bool,
    pub design_status: DesignStatus,
    pub materials: MaterialProperties,
    pub code_references: Vec<String>,
    pub warnings: Vec<String>,
}

/// Design an isolated pad footing.
pub fn calculate(input: &FoundationInput, catalog: &MaterialCatalog) -> CalcResult<FoundationResult> {
    input.validate()?;

    let resolved = catalog.resolve(&input.concrete_grade, &input.steel_grade);
    let m = &resolved.properties;
    let mut warnings = Warnings::new();
    warnings.extend(resolved.fallbacks.iter().cloned());

    let n = input.axial_load_kn;
    let phi = f64::from(input.bar_diameter_mm);
    let cover = input.cover_mm;

    // === Plan size ===
    let q_net = input.net_allowable_kpa();
    let area_required = n / q_net;
    let (width_mm, length_mm) = size_plan(area_required, input.column_width_mm, input.column_depth_mm);
    let n_d = input.load_factor * n;
    let mut plan = Plan {
        width_mm,
        length_mm,
        column_width_mm: input.column_width_mm,
        column_depth_mm: input.column_depth_mm,
        n_d,
        q_u: 0.0,
    };
    plan.q_u = n_d / plan.area_m2();

    // === Thickness ===
    let avg_depth = |t: f64| t - cover - phi;
    let passes = |t: f64| {
        plan.punching(avg_depth(t), m).status.is_ok() && plan.one_way_shear(avg_depth(t), m).status.is_ok()
    };
    let (thickness, source) = match input.thickness_mm {
        Some(t) => (t, ThicknessSource::Specified),
        None => {
            let mut t = THICKNESS_START_MM;
            while !passes(t) && t < THICKNESS_MAX_MM {
                t += THICKNESS_STEP_MM;
            }
            if passes(t) {
                (t, ThicknessSource::Searched)
            } else {
                (t, ThicknessSource::SearchLimit)
            }
        }
    };
    warnings.push_if(source == ThicknessSource::SearchLimit, || {
        format!(
            "No thickness up to {:.0} mm satisfies shear; using {:.0} mm",
            THICKNESS_MAX_MM, thickness
        )
    });

    let punching = plan.punching(avg_depth(thickness), m);
    let one_way_shear = plan.one_way_shear(avg_depth(thickness), m);
    warnings.push_if(!punching.status.is_ok(), || {
        format!(
            "Punching shear {:.0} kN exceeds capacity {:.0} kN",
            punching.design_force, punching.capacity
        )
    });
    warnings.push_if(!one_way_shear.status.is_ok(), || {
        format!(
            "One-way shear {:.1} kN/m exceeds capacity {:.1} kN/m",
            one_way_shear.design_force, one_way_shear.capacity
        )
    });

    // === Flexure ===
    let c = plan.projection_m();
    let moment = plan.q_u * c * c / 2.0;
    let strip_x = FootingStrip {
        label: "Footing bottom (width)",
        thickness,
        d: thickness - cover - phi / 2.0,
        moment,
        diameter: input.bar_diameter_mm,
    };
    let strip_y = FootingStrip {
        label: "Footing bottom (length)",
        thickness,
        d: thickness - cover - 1.5 * phi,
        moment,
        diameter: input.bar_diameter_mm,
    };
    let flexure_x = design_flexure(&strip_x, m)?;
    let flexure_y = design_flexure(&strip_y, m)?;
    warnings.extend(flexure_x.warnings.iter().cloned());
    warnings.extend(flexure_y.warnings.iter().cloned());

    // === Service bearing ===
    let area = plan.area_m2();
    let t_m = Meters::from(Millimeters(thickness)).0;
    let self_weight = CONCRETE_UNIT_WEIGHT * area * t_m;
    let backfill = input.soil_unit_weight * area * (input.depth_m - t_m).max(0.0);
    let service_pressure = (n + self_weight + backfill) / area;
    let bearing_ok = service_pressure <= input.allowable_bearing_kpa;
    warnings.push_if(!bearing_ok, || {
        format!(
            "Service bearing {:.1} kPa exceeds the allowable {:.0} kPa",
            service_pressure, input.allowable_bearing_kpa
        )
    });
    warnings.push_if(thickness > input.depth_m * 1000.0, || {
        format!(
            "Footing thickness {:.0} mm exceeds the foundation depth {:.2} m",
            thickness, input.depth_m
        )
    });

    ensure_all_finite(&[
        ("requiredArea", area_required),
        ("ultimatePressure", plan.q_u),
        ("punchingForce", punching.design_force),
        ("punchingCapacity", punching.capacity),
        ("servicePressure", service_pressure),
    ])?;

    let is_adequate = punching.status.is_ok()
        && one_way_shear.status.is_ok()
        && flexure_x.is_adequate
        && flexure_y.is_adequate
        && bearing_ok;

    tracing::debug!(
        width_mm,
        length_mm,
        thickness,
        q_u = plan.q_u,
        source = ?source,
        is_adequate,
        "foundation design"
    );

    Ok(FoundationResult {
        net_allowable_pressure: q_net,
        required_area: area_required,
        footing_width: width_mm,
        footing_length: length_mm,
        footing_area: area,
        projection: Millimeters::from(Meters(c)).0,
        factored_load: n_d,
        ultimate_pressure: plan.q_u,
        footing_thickness: thickness,
        thickness_source: source,
        punching,
        one_way_shear,
        flexure_x,
        flexure_y,
        service_pressure,
        bearing_status: CheckStatus::from_ok(bearing_ok),
        is_adequate,
        design_status: DesignStatus::from_adequate(is_adequate),
        materials: m.clone(),
        code_references: vec![
            code_ref::PUNCHING.to_string(),
            code_ref::SHEAR.to_string(),
            code_ref::SLAB_REINFORCEMENT.to_string(),
        ],
        warnings: warnings.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_body() -> Value {
        json!({
            "axialLoad": 900, "columnWidth": 400, "columnDepth": 400,
            "allowableBearingPressure": 200
        })
    }

    fn example() -> FoundationInput {
        FoundationInput::from_json(&example_body()).unwrap()
    }

    fn run(input: &FoundationInput) -> FoundationResult {
        calculate(input, MaterialCatalog::standard()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let input = example();
        assert_eq!(input.depth_m, 1.0);
        assert_eq!(input.load_factor, 1.5);
        assert_eq!(input.bar_diameter_mm, 14);
        assert_eq!(input.cover_mm, 50.0);
        assert!(input.thickness_mm.is_none());
    }

    #[test]
    fn test_plan_sizing() {
        let r = run(&example());
        // q_net = 180, A = 5.0 m², √5 = 2.236 → 2250
        assert!((r.net_allowable_pressure - 180.0).abs() < 1e-9);
        assert!((r.required_area - 5.0).abs() < 1e-9);
        assert_eq!(r.footing_width, 2250.0);
        assert_eq!(r.footing_length, 2250.0);
        assert!((r.projection - 925.0).abs() < 1e-6);
    }

    #[test]
    fn test_rectangular_column_keeps_equal_projections() {
        let (b, l) = size_plan(6.0, 300.0, 600.0);
        assert!((l - b - 300.0).abs() < 1e-9);
        assert!(b * l / 1.0e6 >= 6.0);
        assert_eq!(b % 50.0, 0.0);
    }

    #[test]
    fn test_thickness_search() {
        let r = run(&example());
        // 300 and 350 fail punching; 400 passes (d = 336)
        assert_eq!(r.footing_thickness, 400.0);
        assert_eq!(r.thickness_source, ThicknessSource::Searched);
        assert_eq!(r.punching.status, CheckStatus::Ok);
        assert!((r.punching.critical_perimeter - 2944.0).abs() < 1e-9);
    }

    #[test]
    fn test_ultimate_pressure_and_flexure() {
        let r = run(&example());
        // 1350 / 5.0625
        assert!((r.ultimate_pressure - 266.667).abs() < 1e-3);
        // 266.7 × 0.925² / 2 = 114.1
        assert!((r.flexure_x.design_moment - 114.08).abs() < 0.05);
        assert!(r.flexure_x.steel_area_provided >= r.flexure_x.steel_area_required);
        assert!(r.flexure_y.effective_depth < r.flexure_x.effective_depth);
    }

    #[test]
    fn test_service_bearing() {
        let r = run(&example());
        // (900 + 50.6 + 54.7) / 5.0625 = 198.6
        assert!((r.service_pressure - 198.6).abs() < 0.1);
        assert_eq!(r.bearing_status, CheckStatus::Ok);
        assert!(r.is_adequate, "{:?}", r.warnings);
    }

    #[test]
    fn test_thin_specified_footing_fails_punching() {
        let mut input = example();
        input.thickness_mm = Some(300.0);
        let r = run(&input);
        assert_eq!(r.thickness_source, ThicknessSource::Specified);
        assert_eq!(r.punching.status, CheckStatus::NotOk);
        assert!(!r.is_adequate);
        assert!(r.warnings.iter().any(|w| w.contains("Punching")));
    }

    #[test]
    fn test_overburden_exceeds_bearing() {
        let mut body = example_body();
        body["allowableBearingPressure"] = json!(60);
        body["foundationDepth"] = json!(3.5);
        let err = FoundationInput::from_json(&body).unwrap_err();
        assert!(err.to_string().contains("allowableBearingPressure"));
    }

    #[test]
    fn test_zero_load_rejected() {
        let mut body = example_body();
        body["axialLoad"] = json!(0);
        assert!(FoundationInput::from_json(&body).is_err());
    }
}
