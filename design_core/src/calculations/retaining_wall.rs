//! # Cantilever Retaining Wall
//!
//! Stability and reinforcement design of a reinforced-concrete cantilever
//! wall per metre run.
//!
//! ## Geometry
//!
//! ```text
//!                  t_top
//!                 ┌────┐ ╱ backfill (slope β)
//!                 │    │╱
//!                ╱     │   γ, φ, q
//!          H_s  ╱ stem │
//!              ╱       │
//!   ┌─────────┴────────┴──────────────┐ ─┬─
//!   │   toe   │ t_bot  │     heel     │  t_base
//!   └─────────┴────────┴──────────────┘ ─┴─
//!   ←──────────────── B ──────────────→
//! ```
//!
//! The stem back face is vertical; any taper is on the exposed front face.
//! `wallHeight` H is measured from the underside of the base, so the stem
//! height is H_s = H − t_base.
//!
//! ## Checks
//!
//! | Check | Requirement |
//! |-------|-------------|
//! | Overturning | M_r/M_o ≥ 2.0 |
//! | Sliding | (ΣW·μ + P_p)/P_a ≥ 1.5 |
//! | Bearing | q_allow/q_max ≥ 3.0 |
//! | Middle third | \|e\| ≤ B/6 |
//!
//! The wall is returned with `overallStatus = "PASS"` only when all four
//! hold; otherwise `"REVIEW REQUIRED"` with the design still complete.
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::retaining_wall::{calculate, RetainingWallInput};
//! use design_core::materials::MaterialCatalog;
//! use serde_json::json;
//!
//! let input = RetainingWallInput::from_json(&json!({
//!     "wallHeight": 4.0, "stemThicknessTop": 250, "stemThicknessBottom": 350,
//!     "baseWidth": 2500, "baseThickness": 400, "toeWidth": 1200,
//!     "soilUnitWeight": 18, "soilFrictionAngle": 30, "surchargeLoad": 0,
//!     "allowableBearingPressure": 150
//! })).unwrap();
//!
//! let result = calculate(&input, MaterialCatalog::standard()).unwrap();
//! assert!((result.ka - 1.0 / 3.0).abs() < 1e-3);
//! assert!(result.fos_overturning > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::{read_grades, revalidate};
use crate::design_code::{
    code_ref, CONCRETE_UNIT_WEIGHT, EARTH_PRESSURE_FACTOR, FOS_BEARING_MIN, FOS_OVERTURNING_MIN,
    FOS_SLIDING_MIN, WALL_DISTRIBUTION_RATIO_MIN, WALL_MAIN_RATIO_MIN,
};
use crate::equations::beam::{linear_pressure_at, trapezoid_cantilever_moment};
use crate::equations::earth_pressure::{
    rankine_active_sloped, rankine_passive, surcharge_thrust, triangular_thrust,
};
use crate::equations::flexure::simplified_steel_area;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialCatalog, MaterialProperties};
use crate::reinforcement::select_spacing;
use crate::report::{ensure_all_finite, CheckStatus, OverallStatus, StabilityCheck, Warnings};
use crate::units::{Degrees, Meters, Millimeters};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const WALL_HEIGHT: FieldSpec = FieldSpec::required("wallHeight", "m", 1.0, 15.0);
const STEM_TOP: FieldSpec = FieldSpec::required("stemThicknessTop", "mm", 150.0, 1000.0);
const STEM_BOTTOM: FieldSpec = FieldSpec::required("stemThicknessBottom", "mm", 150.0, 2000.0);
const BASE_WIDTH: FieldSpec = FieldSpec::required("baseWidth", "mm", 500.0, 15000.0);
const BASE_THICKNESS: FieldSpec = FieldSpec::required("baseThickness", "mm", 200.0, 2000.0);
const TOE_WIDTH: FieldSpec = FieldSpec::required("toeWidth", "mm", 0.0, 10000.0);
const SOIL_UNIT_WEIGHT: FieldSpec = FieldSpec::required("soilUnitWeight", "kN/m³", 10.0, 25.0);
const FRICTION_ANGLE: FieldSpec = FieldSpec::required("soilFrictionAngle", "°", 15.0, 45.0);
const SURCHARGE: FieldSpec = FieldSpec::optional("surchargeLoad", "kPa", 0.0, 100.0, 0.0);
const ALLOWABLE_BEARING: FieldSpec =
    FieldSpec::required("allowableBearingPressure", "kPa", 50.0, 2000.0);
const BACKFILL_SLOPE: FieldSpec = FieldSpec::optional("backfillSlope", "°", 0.0, 40.0, 0.0);
const TOE_SOIL_DEPTH: FieldSpec = FieldSpec::optional("toeSoilDepth", "m", 0.0, 5.0, 0.0);
const BASE_FRICTION: FieldSpec = FieldSpec::optional("baseFrictionCoefficient", "", 0.2, 1.0, 0.5);
const CONCRETE_WEIGHT: FieldSpec =
    FieldSpec::optional("concreteUnitWeight", "kN/m³", 20.0, 30.0, CONCRETE_UNIT_WEIGHT);
const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 25.0, 100.0, 50.0);

/// Stem main bar diameter (mm)
const STEM_BAR_MM: u32 = 16;
/// Base main bar diameter (mm)
const BASE_BAR_MM: u32 = 12;
/// Distribution bar diameter (mm)
const DISTRIBUTION_BAR_MM: u32 = 10;
/// Absolute cap on wall bar spacing (mm)
const WALL_MAX_SPACING_MM: f64 = 300.0;

/// Input parameters for a cantilever retaining wall.
///
/// ## JSON Example
///
/// ```json
/// {
///   "wallHeight": 4.0,
///   "stemThicknessTop": 250,
///   "stemThicknessBottom": 350,
///   "baseWidth": 2500,
///   "baseThickness": 400,
///   "toeWidth": 1200,
///   "soilUnitWeight": 18,
///   "soilFrictionAngle": 30,
///   "surchargeLoad": 10,
///   "allowableBearingPressure": 150,
///   "backfillSlope": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetainingWallInput {
    /// Total height H from underside of base to top of stem (m)
    #[serde(rename = "wallHeight")]
    pub height_m: f64,

    /// Stem thickness at the top (mm)
    #[serde(rename = "stemThicknessTop")]
    pub stem_top_mm: f64,

    /// Stem thickness at the base (mm)
    #[serde(rename = "stemThicknessBottom")]
    pub stem_bottom_mm: f64,

    /// Overall base width B (mm)
    #[serde(rename = "baseWidth")]
    pub base_width_mm: f64,

    /// Base slab thickness (mm)
    #[serde(rename = "baseThickness")]
    pub base_thickness_mm: f64,

    /// Toe projection in front of the stem (mm)
    #[serde(rename = "toeWidth")]
    pub toe_width_mm: f64,

    /// Retained soil unit weight γ (kN/m³)
    #[serde(rename = "soilUnitWeight")]
    pub soil_unit_weight: f64,

    /// Soil friction angle φ (degrees)
    #[serde(rename = "soilFrictionAngle")]
    pub friction_angle_deg: f64,

    /// Uniform surcharge on the retained surface (kPa)
    #[serde(rename = "surchargeLoad")]
    pub surcharge_kpa: f64,

    /// Allowable bearing pressure (kPa)
    #[serde(rename = "allowableBearingPressure")]
    pub allowable_bearing_kpa: f64,

    /// Backfill slope β (degrees)
    #[serde(rename = "backfillSlope")]
    pub backfill_slope_deg: f64,

    /// Soil depth above the toe contributing passive resistance (m)
    #[serde(rename = "toeSoilDepth")]
    pub toe_soil_depth_m: f64,

    /// Base-to-soil friction coefficient μ
    #[serde(rename = "baseFrictionCoefficient")]
    pub base_friction: f64,

    /// Concrete unit weight γc (kN/m³)
    #[serde(rename = "concreteUnitWeight")]
    pub concrete_unit_weight: f64,

    #[serde(rename = "concreteGrade")]
    pub concrete_grade: String,

    #[serde(rename = "steelGrade")]
    pub steel_grade: String,

    /// Cover to main steel (mm)
    #[serde(rename = "coverThickness")]
    pub cover_mm: f64,
}

impl RetainingWallInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let height_m = f.number(&WALL_HEIGHT);
        let stem_top_mm = f.number(&STEM_TOP);
        let stem_bottom_mm = f.number(&STEM_BOTTOM);
        let base_width_mm = f.number(&BASE_WIDTH);
        let base_thickness_mm = f.number(&BASE_THICKNESS);
        let toe_width_mm = f.number(&TOE_WIDTH);
        let soil_unit_weight = f.number(&SOIL_UNIT_WEIGHT);
        let friction_angle_deg = f.number(&FRICTION_ANGLE);
        let surcharge_kpa = f.number(&SURCHARGE);
        let allowable_bearing_kpa = f.number(&ALLOWABLE_BEARING);
        let backfill_slope_deg = f.number(&BACKFILL_SLOPE);
        let toe_soil_depth_m = f.number(&TOE_SOIL_DEPTH);
        let base_friction = f.number(&BASE_FRICTION);
        let concrete_unit_weight = f.number(&CONCRETE_WEIGHT);
        let (concrete_grade, steel_grade) = read_grades(&mut f);
        let cover_mm = f.number(&COVER);

        // Cross-field geometry, only meaningful once every field parsed
        if f.is_clean() {
            f.check(
                stem_top_mm <= stem_bottom_mm,
                "stemThicknessTop",
                "must not exceed stemThicknessBottom",
            );
            f.check(
                toe_width_mm + stem_bottom_mm < base_width_mm,
                "toeWidth",
                "toeWidth + stemThicknessBottom must be less than baseWidth",
            );
            f.check(
                base_thickness_mm < height_m * 1000.0,
                "baseThickness",
                "must be less than wallHeight",
            );
            f.check(
                backfill_slope_deg < friction_angle_deg,
                "backfillSlope",
                "must be less than soilFrictionAngle",
            );
            f.check(
                base_thickness_mm > cover_mm + f64::from(BASE_BAR_MM),
                "coverThickness",
                "leaves no effective depth in the base",
            );
        }

        f.finish(|| RetainingWallInput {
            height_m,
            stem_top_mm,
            stem_bottom_mm,
            base_width_mm,
            base_thickness_mm,
            toe_width_mm,
            soil_unit_weight,
            friction_angle_deg,
            surcharge_kpa,
            allowable_bearing_kpa,
            backfill_slope_deg,
            toe_soil_depth_m,
            base_friction,
            concrete_unit_weight,
            concrete_grade,
            steel_grade,
            cover_mm,
        })
    }

    /// Apply the request rules to a programmatically built input.
    pub fn validate(&self) -> CalcResult<()> {
        revalidate(self, Self::from_json)
    }

    /// Geometry in metres.
    fn geometry(&self) -> WallGeometry {
        let m = |mm: f64| Meters::from(Millimeters(mm)).0;
        let base = m(self.base_width_mm);
        let toe = m(self.toe_width_mm);
        let stem_bottom = m(self.stem_bottom_mm);
        let base_thickness = m(self.base_thickness_mm);
        WallGeometry {
            height: self.height_m,
            stem_height: self.height_m - base_thickness,
            stem_top: m(self.stem_top_mm),
            stem_bottom,
            base,
            base_thickness,
            toe,
            heel: base - toe - stem_bottom,
        }
    }
}

/// Wall dimensions in metres.
#[derive(Debug, Clone, Copy)]
struct WallGeometry {
    height: f64,
    stem_height: f64,
    stem_top: f64,
    stem_bottom: f64,
    base: f64,
    base_thickness: f64,
    toe: f64,
    heel: f64,
}

/// One stabilising weight and its lever arm about the toe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightComponent {
    pub name: String,
    /// Weight per metre run (kN/m)
    pub weight: f64,
    /// Distance from the toe edge (m)
    pub arm: f64,
    /// Moment about the toe (kN·m/m)
    pub moment: f64,
}

impl WeightComponent {
    fn new(name: &str, weight: f64, arm: f64) -> Self {
        WeightComponent {
            name: name.to_string(),
            weight,
            arm,
            moment: weight * arm,
        }
    }
}

/// Shape of the soil pressure under the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BearingDistribution {
    /// Full contact, |e| ≤ B/6
    Trapezoidal,
    /// Partial contact, B/6 < |e| < B/2
    Triangular,
    /// Resultant outside the base; no equilibrium on soil
    OutsideBase,
}

/// Bearing pressure diagram under the base.
#[derive(Debug, Clone, Copy)]
struct BearingPressure {
    distribution: BearingDistribution,
    toe: f64,
    heel: f64,
    /// Contact length measured from the loaded edge (m)
    contact: f64,
    /// Resultant eccentricity from base centre, positive toward the toe (m)
    eccentricity: f64,
}

impl BearingPressure {
    /// Pressure (kPa) at distance x from the toe edge.
    fn at(&self, x: f64, base: f64) -> f64 {
        match self.distribution {
            BearingDistribution::OutsideBase => 0.0,
            BearingDistribution::Trapezoidal => linear_pressure_at(self.toe, self.heel, base, x),
            BearingDistribution::Triangular if self.eccentricity >= 0.0 => {
                if x < self.contact {
                    self.toe * (1.0 - x / self.contact)
                } else {
                    0.0
                }
            }
            BearingDistribution::Triangular => {
                let from_heel = base - x;
                if from_heel < self.contact {
                    self.heel * (1.0 - from_heel / self.contact)
                } else {
                    0.0
                }
            }
        }
    }
}

/// Bearing pressure for vertical load `v` whose resultant sits `x_bar` from the toe.
fn bearing_pressure(v: f64, x_bar: f64, base: f64) -> BearingPressure {
    let e = base / 2.0 - x_bar;
    if x_bar <= 0.0 || x_bar >= base {
        return BearingPressure {
            distribution: BearingDistribution::OutsideBase,
            toe: 0.0,
            heel: 0.0,
            contact: 0.0,
            eccentricity: e,
        };
    }
    if e.abs() <= base / 6.0 {
        let mean = v / base;
        return BearingPressure {
            distribution: BearingDistribution::Trapezoidal,
            toe: mean * (1.0 + 6.0 * e / base),
            heel: mean * (1.0 - 6.0 * e / base),
            contact: base,
            eccentricity: e,
        };
    }
    if e > 0.0 {
        // Heel lifts off
        let contact = 3.0 * x_bar;
        BearingPressure {
            distribution: BearingDistribution::Triangular,
            toe: 2.0 * v / contact,
            heel: 0.0,
            contact,
            eccentricity: e,
        }
    } else {
        // Toe lifts off
        let contact = 3.0 * (base - x_bar);
        BearingPressure {
            distribution: BearingDistribution::Triangular,
            toe: 0.0,
            heel: 2.0 * v / contact,
            contact,
            eccentricity: e,
        }
    }
}

/// Reinforcement for one face of the stem or base, per metre run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallReinforcement {
    /// "stem", "heel", "toe", ...
    pub location: String,
    /// Factored moment (kN·m/m); 0 for distribution steel
    pub design_moment: f64,
    /// Section thickness (mm)
    pub thickness: f64,
    /// Effective depth (mm)
    pub effective_depth: f64,
    /// Steel from the moment (mm²/m)
    pub steel_area_flexure: f64,
    /// Minimum steel (mm²/m)
    pub steel_area_minimum: f64,
    /// Governing required steel (mm²/m)
    pub steel_area_required: f64,
    /// Provided steel (mm²/m)
    pub steel_area_provided: f64,
    pub bar_diameter: u32,
    /// Spacing (mm)
    pub bar_spacing: f64,
    /// e.g. "Ø16/200"
    pub bar_arrangement: String,
    /// True when the spacing hit the practical minimum
    pub fallback: bool,
}

/// Size one face: As = M/(0.87·fy·0.9·d), bounded below by `ratio_min` of the gross section.
fn design_face(
    location: &str,
    m_u: f64,
    thickness_mm: f64,
    cover_mm: f64,
    diameter_mm: u32,
    ratio_min: f64,
    materials: &MaterialProperties,
) -> CalcResult<WallReinforcement> {
    let d = thickness_mm - cover_mm - f64::from(diameter_mm) / 2.0;
    if d <= 0.0 {
        return Err(CalcError::calculation_failed(
            "Retaining wall",
            format!("{}: cover leaves no effective depth", location),
        ));
    }
    let m_u = m_u.max(0.0);
    let as_flexure = if m_u > 0.0 {
        simplified_steel_area(m_u, materials.fy_mpa, d)
    } else {
        0.0
    };
    let as_min = ratio_min * 1000.0 * thickness_mm;
    let as_required = as_flexure.max(as_min);
    let max_spacing = (3.0 * thickness_mm).min(WALL_MAX_SPACING_MM);
    let layout = select_spacing(as_required, diameter_mm, max_spacing)?;
    Ok(WallReinforcement {
        location: location.to_string(),
        design_moment: m_u,
        thickness: thickness_mm,
        effective_depth: d,
        steel_area_flexure: as_flexure,
        steel_area_minimum: as_min,
        steel_area_required: as_required,
        steel_area_provided: layout.area_provided_mm2_per_m,
        bar_diameter: diameter_mm,
        bar_spacing: layout.spacing_mm,
        bar_arrangement: layout.arrangement(),
        fallback: layout.fallback,
    })
}

/// Retaining wall result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainingWallResult {
    /// Active earth-pressure coefficient
    #[serde(rename = "Ka")]
    pub ka: f64,
    /// Passive earth-pressure coefficient
    #[serde(rename = "Kp")]
    pub kp: f64,
    /// Stem height above the base (m)
    pub stem_height: f64,
    /// Heel projection behind the stem (m)
    pub heel_width: f64,
    /// Horizontal soil thrust (kN/m)
    pub active_thrust_soil: f64,
    /// Horizontal surcharge thrust (kN/m)
    pub active_thrust_surcharge: f64,
    /// Total horizontal active thrust P_a (kN/m)
    pub active_thrust: f64,
    /// Height of P_a above the underside of the base (m)
    pub thrust_height: f64,
    /// Depth of soil mobilising passive resistance (m)
    pub passive_depth: f64,
    /// Passive resistance P_p (kN/m)
    pub passive_resistance: f64,
    /// Stabilising weights
    pub weights: Vec<WeightComponent>,
    /// ΣW (kN/m)
    pub total_vertical_load: f64,
    /// M_r about the toe (kN·m/m)
    pub resisting_moment: f64,
    /// M_o about the toe (kN·m/m)
    pub overturning_moment: f64,
    #[serde(rename = "FOS_overturning")]
    pub fos_overturning: f64,
    #[serde(rename = "FOS_sliding")]
    pub fos_sliding: f64,
    #[serde(rename = "FOS_bearing")]
    pub fos_bearing: f64,
    /// Resultant distance from the toe (m)
    pub resultant_location: f64,
    /// Eccentricity from base centre, positive toward the toe (m)
    pub eccentricity: f64,
    /// B/6 (m)
    pub middle_third_limit: f64,
    pub bearing_distribution: BearingDistribution,
    /// Pressure under the toe edge (kPa)
    pub toe_pressure: f64,
    /// Pressure under the heel edge (kPa)
    pub heel_pressure: f64,
    pub tension_at_heel: bool,
    pub tension_at_toe: bool,
    /// Overturning, sliding and bearing
    pub stability_checks: Vec<StabilityCheck>,
    pub middle_third_status: CheckStatus,
    pub stem_reinforcement: WallReinforcement,
    pub stem_distribution: WallReinforcement,
    pub heel_reinforcement: WallReinforcement,
    pub toe_reinforcement: WallReinforcement,
    pub base_distribution: WallReinforcement,
    pub overall_status: OverallStatus,
    pub materials: MaterialProperties,
    pub code_references: Vec<String>,
    pub warnings: Vec<String>,
}

/// Design a cantilever retaining wall.
pub fn calculate(
    input: &RetainingWallInput,
    catalog: &MaterialCatalog,
) -> CalcResult<RetainingWallResult> {
    input.validate()?;

    let resolved = catalog.resolve(&input.concrete_grade, &input.steel_grade);
    let materials = &resolved.properties;
    let mut warnings = Warnings::new();
    warnings.extend(resolved.fallbacks.iter().cloned());

    let g = input.geometry();
    let gamma = input.soil_unit_weight;
    let gamma_c = input.concrete_unit_weight;
    let q = input.surcharge_kpa;
    let phi = Degrees(input.friction_angle_deg).to_radians();
    let beta = Degrees(input.backfill_slope_deg).to_radians();

    // === Earth pressure ===
    let ka = rankine_active_sloped(phi, beta)?;
    let kp = rankine_passive(phi);
    let p_soil = triangular_thrust(ka, gamma, g.height) * beta.cos();
    let p_surcharge = surcharge_thrust(ka, q, g.height) * beta.cos();
    let p_a = p_soil + p_surcharge;
    let thrust_height = (p_soil * g.height / 3.0 + p_surcharge * g.height / 2.0) / p_a;

    let passive_depth = g.base_thickness + input.toe_soil_depth_m;
    let p_p = triangular_thrust(kp, gamma, passive_depth);

    // === Stabilising weights ===
    let taper = g.stem_bottom - g.stem_top;
    let back_face = g.toe + g.stem_bottom;
    let mut weights = vec![
        WeightComponent::new(
            "stem",
            g.stem_top * g.stem_height * gamma_c,
            back_face - g.stem_top / 2.0,
        ),
        WeightComponent::new(
            "stem taper",
            0.5 * taper * g.stem_height * gamma_c,
            g.toe + 2.0 * taper / 3.0,
        ),
        WeightComponent::new("base", g.base * g.base_thickness * gamma_c, g.base / 2.0),
        WeightComponent::new(
            "backfill over heel",
            g.heel * g.stem_height * gamma,
            back_face + g.heel / 2.0,
        ),
    ];
    if beta > 0.0 {
        weights.push(WeightComponent::new(
            "sloped backfill wedge",
            0.5 * g.heel * g.heel * beta.tan() * gamma,
            back_face + 2.0 * g.heel / 3.0,
        ));
    }
    let total_weight: f64 = weights.iter().map(|w| w.weight).sum();
    let weight_moment: f64 = weights.iter().map(|w| w.moment).sum();

    // === Stability ===
    let m_r = weight_moment + p_p * passive_depth / 3.0;
    let m_o = p_a * thrust_height;
    let fos_overturning = m_r / m_o;
    let fos_sliding = (total_weight * input.base_friction + p_p) / p_a;

    let x_bar = (m_r - m_o) / total_weight;
    let bearing = bearing_pressure(total_weight, x_bar, g.base);
    let q_max = bearing.toe.max(bearing.heel);
    let fos_bearing = if q_max > 0.0 {
        input.allowable_bearing_kpa / q_max
    } else {
        0.0
    };
    let middle_third_limit = g.base / 6.0;
    let in_middle_third = bearing.distribution == BearingDistribution::Trapezoidal;
    let tension_at_heel =
        bearing.distribution == BearingDistribution::Triangular && bearing.eccentricity > 0.0;
    let tension_at_toe =
        bearing.distribution == BearingDistribution::Triangular && bearing.eccentricity < 0.0;

    let stability_checks = vec![
        StabilityCheck::new("overturning", fos_overturning, FOS_OVERTURNING_MIN),
        StabilityCheck::new("sliding", fos_sliding, FOS_SLIDING_MIN),
        StabilityCheck::new("bearing", fos_bearing, FOS_BEARING_MIN),
    ];
    let middle_third_status = CheckStatus::from_ok(in_middle_third);

    // === Structural design (factored) ===
    let cover = input.cover_mm;
    let stem_height = g.stem_height;
    let stem_moment = EARTH_PRESSURE_FACTOR
        * (triangular_thrust(ka, gamma, stem_height) * stem_height / 3.0
            + surcharge_thrust(ka, q, stem_height) * stem_height / 2.0)
        * beta.cos();

    // Heel: soil, surcharge and self weight down; bearing up
    let heel_down = (gamma * stem_height + gamma_c * g.base_thickness + q) * g.heel * g.heel / 2.0
        + trapezoid_cantilever_moment(0.0, gamma * g.heel * beta.tan(), g.heel);
    let heel_up = trapezoid_cantilever_moment(
        bearing.at(back_face, g.base),
        bearing.at(g.base, g.base),
        g.heel,
    );
    let heel_moment = EARTH_PRESSURE_FACTOR * (heel_down - heel_up);

    // Toe: bearing up, self weight down
    let toe_up = trapezoid_cantilever_moment(bearing.at(g.toe, g.base), bearing.at(0.0, g.base), g.toe);
    let toe_down = gamma_c * g.base_thickness * g.toe * g.toe / 2.0;
    let toe_moment = EARTH_PRESSURE_FACTOR * (toe_up - toe_down);

    let stem_reinforcement = design_face(
        "stem",
        stem_moment,
        input.stem_bottom_mm,
        cover,
        STEM_BAR_MM,
        WALL_MAIN_RATIO_MIN,
        materials,
    )?;
    let stem_distribution = design_face(
        "stem distribution",
        0.0,
        input.stem_bottom_mm,
        cover,
        DISTRIBUTION_BAR_MM,
        WALL_DISTRIBUTION_RATIO_MIN,
        materials,
    )?;
    let heel_reinforcement = design_face(
        "heel",
        heel_moment,
        input.base_thickness_mm,
        cover,
        BASE_BAR_MM,
        WALL_MAIN_RATIO_MIN,
        materials,
    )?;
    let toe_reinforcement = design_face(
        "toe",
        toe_moment,
        input.base_thickness_mm,
        cover,
        BASE_BAR_MM,
        WALL_MAIN_RATIO_MIN,
        materials,
    )?;
    let base_distribution = design_face(
        "base distribution",
        0.0,
        input.base_thickness_mm,
        cover,
        DISTRIBUTION_BAR_MM,
        WALL_DISTRIBUTION_RATIO_MIN,
        materials,
    )?;

    ensure_all_finite(&[
        ("Ka", ka),
        ("Kp", kp),
        ("activeThrust", p_a),
        ("thrustHeight", thrust_height),
        ("FOS_overturning", fos_overturning),
        ("FOS_sliding", fos_sliding),
        ("FOS_bearing", fos_bearing),
        ("eccentricity", bearing.eccentricity),
        ("toePressure", bearing.toe),
        ("heelPressure", bearing.heel),
        ("stemMoment", stem_moment),
        ("heelMoment", heel_moment),
        ("toeMoment", toe_moment),
    ])?;

    // === Verdict ===
    for check in stability_checks.iter().filter(|c| !c.passes()) {
        warnings.push(format!(
            "{} factor of safety {:.2} is below the required {:.1}",
            capitalize(&check.mode),
            check.factor_of_safety,
            check.required
        ));
    }
    warnings.push_if(
        bearing.distribution == BearingDistribution::OutsideBase,
        || "Resultant falls outside the base; wall is unstable".to_string(),
    );
    warnings.push_if(tension_at_heel, || {
        format!(
            "Resultant outside the middle third (e = {:.3} m > B/6 = {:.3} m); heel lifts off",
            bearing.eccentricity, middle_third_limit
        )
    });
    warnings.push_if(tension_at_toe, || {
        format!(
            "Resultant outside the middle third (e = {:.3} m < −B/6 = {:.3} m); toe lifts off",
            bearing.eccentricity, -middle_third_limit
        )
    });
    for face in [
        &stem_reinforcement,
        &stem_distribution,
        &heel_reinforcement,
        &toe_reinforcement,
        &base_distribution,
    ] {
        warnings.push_if(face.fallback, || {
            format!(
                "{} steel needs closer than 75 mm spacing; using {}",
                capitalize(&face.location),
                face.bar_arrangement
            )
        });
    }

    let passes = stability_checks.iter().all(StabilityCheck::passes) && in_middle_third;
    let overall_status = if passes {
        OverallStatus::Pass
    } else {
        OverallStatus::ReviewRequired
    };

    tracing::debug!(
        ka,
        p_a,
        fos_overturning,
        fos_sliding,
        fos_bearing,
        e = bearing.eccentricity,
        status = overall_status.as_str(),
        "retaining wall design"
    );

    Ok(RetainingWallResult {
        ka,
        kp,
        stem_height: g.stem_height,
        heel_width: g.heel,
        active_thrust_soil: p_soil,
        active_thrust_surcharge: p_surcharge,
        active_thrust: p_a,
        thrust_height,
        passive_depth,
        passive_resistance: p_p,
        weights,
        total_vertical_load: total_weight,
        resisting_moment: m_r,
        overturning_moment: m_o,
        fos_overturning,
        fos_sliding,
        fos_bearing,
        resultant_location: x_bar,
        eccentricity: bearing.eccentricity,
        middle_third_limit,
        bearing_distribution: bearing.distribution,
        toe_pressure: bearing.toe,
        heel_pressure: bearing.heel,
        tension_at_heel,
        tension_at_toe,
        stability_checks,
        middle_third_status,
        stem_reinforcement,
        stem_distribution,
        heel_reinforcement,
        toe_reinforcement,
        base_distribution,
        overall_status,
        materials: materials.clone(),
        code_references: vec![
            code_ref::RETAINING_STABILITY.to_string(),
            code_ref::SLAB_REINFORCEMENT.to_string(),
        ],
        warnings: warnings.into_vec(),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_body() -> Value {
        json!({
            "wallHeight": 4.0, "stemThicknessTop": 250, "stemThicknessBottom": 350,
            "baseWidth": 2500, "baseThickness": 400, "toeWidth": 1200,
            "soilUnitWeight": 18, "soilFrictionAngle": 30, "surchargeLoad": 0,
            "allowableBearingPressure": 150
        })
    }

    fn example() -> RetainingWallInput {
        RetainingWallInput::from_json(&example_body()).unwrap()
    }

    fn run(input: &RetainingWallInput) -> RetainingWallResult {
        calculate(input, MaterialCatalog::standard()).unwrap()
    }

    #[test]
    fn test_coefficients() {
        let r = run(&example());
        assert!((r.ka - 0.3333).abs() < 1e-3);
        assert!((r.kp - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_geometry() {
        let r = run(&example());
        assert!((r.stem_height - 3.6).abs() < 1e-9);
        // 2.5 − 1.2 − 0.35 = 0.95
        assert!((r.heel_width - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_thrust_and_weights() {
        let r = run(&example());
        // ½ × ⅓ × 18 × 4² = 48 kN/m at 4/3 m
        assert!((r.active_thrust - 48.0).abs() < 1e-6);
        assert!((r.thrust_height - 4.0 / 3.0).abs() < 1e-9);
        // 22.5 + 4.5 + 25 + 61.56
        assert!((r.total_vertical_load - 113.56).abs() < 1e-6);
        assert_eq!(r.weights.len(), 4);
        // ½ × 3 × 18 × 0.4² = 4.32
        assert!((r.passive_resistance - 4.32).abs() < 1e-3);
    }

    #[test]
    fn test_factors_of_safety() {
        let r = run(&example());
        // M_r = 193.67 + 0.576 = 194.25; M_o = 64
        assert!((r.fos_overturning - 3.035).abs() < 0.01);
        // (113.56 × 0.5 + 4.32) / 48 = 1.273
        assert!((r.fos_sliding - 1.273).abs() < 0.01);
        assert!(r.fos_bearing > 0.0 && r.fos_bearing.is_finite());
        assert_eq!(r.bearing_distribution, BearingDistribution::Trapezoidal);
        assert_eq!(r.middle_third_status, CheckStatus::Ok);
    }

    #[test]
    fn test_example_needs_review() {
        let r = run(&example());
        // Sliding governs at 1.27 < 1.5
        assert_eq!(r.overall_status, OverallStatus::ReviewRequired);
        assert!(r.warnings.iter().any(|w| w.starts_with("Sliding")));
    }

    #[test]
    fn test_bearing_pressures_balance_load() {
        let r = run(&example());
        let mean = (r.toe_pressure + r.heel_pressure) / 2.0;
        assert!((mean * 2.5 - r.total_vertical_load).abs() < 1e-6);
        assert!(r.toe_pressure > r.heel_pressure);
    }

    #[test]
    fn test_wide_base_passes() {
        let mut input = example();
        input.base_width_mm = 3400.0;
        input.toe_width_mm = 1000.0;
        input.toe_soil_depth_m = 0.6;
        input.allowable_bearing_kpa = 300.0;
        let r = run(&input);
        assert!(r.stability_checks.iter().all(StabilityCheck::passes), "{:?}", r.stability_checks);
        assert_eq!(r.overall_status, OverallStatus::Pass);
    }

    #[test]
    fn test_surcharge_raises_thrust_height() {
        let mut input = example();
        input.surcharge_kpa = 20.0;
        let r = run(&input);
        assert!(r.active_thrust_surcharge > 0.0);
        assert!(r.thrust_height > 4.0 / 3.0);
    }

    #[test]
    fn test_sloped_backfill_adds_wedge() {
        let mut input = example();
        input.backfill_slope_deg = 15.0;
        let r = run(&input);
        assert_eq!(r.weights.len(), 5);
        assert!(r.ka > 1.0 / 3.0);
    }

    #[test]
    fn test_short_heel_lifts() {
        let mut input = example();
        input.base_width_mm = 1700.0;
        input.toe_width_mm = 1300.0;
        let r = run(&input);
        assert!(r.fos_overturning.is_finite());
        assert_ne!(r.bearing_distribution, BearingDistribution::Trapezoidal);
        assert_eq!(r.overall_status, OverallStatus::ReviewRequired);
    }

    #[test]
    fn test_reinforcement_meets_minimum() {
        let r = run(&example());
        for face in [
            &r.stem_reinforcement,
            &r.heel_reinforcement,
            &r.toe_reinforcement,
            &r.stem_distribution,
            &r.base_distribution,
        ] {
            assert!(face.steel_area_provided >= face.steel_area_required);
            assert!(face.bar_spacing <= 300.0);
        }
        assert_eq!(r.stem_reinforcement.bar_diameter, 16);
        assert_eq!(r.heel_reinforcement.bar_diameter, 12);
        // Stem: 1.6 × (½ × ⅓ × 18 × 3.6²) × 1.2 = 74.6 kN·m/m
        assert!((r.stem_reinforcement.design_moment - 74.65).abs() < 0.05);
    }

    #[test]
    fn test_bearing_pressure_shapes() {
        let trap = bearing_pressure(100.0, 1.0, 2.0);
        assert_eq!(trap.distribution, BearingDistribution::Trapezoidal);
        assert!((trap.toe - 50.0).abs() < 1e-9);

        let tri = bearing_pressure(100.0, 0.5, 3.0);
        assert_eq!(tri.distribution, BearingDistribution::Triangular);
        // 2V / 3x̄ = 200 / 1.5
        assert!((tri.toe - 133.333).abs() < 1e-3);
        assert_eq!(tri.at(1.5, 3.0), 0.0);

        let out = bearing_pressure(100.0, -0.1, 2.0);
        assert_eq!(out.distribution, BearingDistribution::OutsideBase);
        assert_eq!(out.toe, 0.0);
    }

    #[test]
    fn test_cross_field_validation() {
        let mut body = example_body();
        body["toeWidth"] = json!(2300);
        let err = RetainingWallInput::from_json(&body).unwrap_err();
        assert!(err.to_string().contains("toeWidth"));

        let mut body = example_body();
        body["backfillSlope"] = json!(35);
        assert!(RetainingWallInput::from_json(&body).is_err());
    }

    #[test]
    fn test_soil_friction_angle_field() {
        let input = example();
        assert_eq!(input.friction_angle_deg, 30.0);
        let echoed = serde_json::to_value(&input).unwrap();
        assert_eq!(echoed["soilFrictionAngle"], 30.0);

        let mut body = example_body();
        body.as_object_mut().unwrap().remove("soilFrictionAngle");
        body["frictionAngle"] = json!(30);
        let err = RetainingWallInput::from_json(&body).unwrap_err();
        assert!(err.to_string().contains("soilFrictionAngle"));
    }

    #[test]
    fn test_response_field_names() {
        let json = serde_json::to_value(run(&example())).unwrap();
        for key in ["Ka", "Kp", "FOS_overturning", "FOS_sliding", "FOS_bearing", "overallStatus"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["overallStatus"], "REVIEW REQUIRED");
        assert_eq!(json["stabilityChecks"][1]["status"], "NOT OK");
    }
}
