//! # Column Design
//!
//! Designs a rectangular reinforced-concrete column under axial load and
//! biaxial bending.
//!
//! ## Method
//!
//! 1. Slenderness from the radius of gyration of the weaker axis, compared
//!    with the axial-load dependent limit λ_lim = 25·√(fck/20)/√n
//! 2. Design moments per axis from the larger of the applied moment and the
//!    minimum eccentricity, plus the nominal-curvature second-order
//!    eccentricity for slender columns
//! 3. Biaxial interaction through Bresler's load contour (exponent 1.5)
//!    giving a mechanical reinforcement ratio ω
//! 4. Steel area bounded by the code minimum and maximum ratios, then a
//!    symmetric bar layout of 8–12 bars
//! 5. Axial capacity and utilization
//!
//! ## Assumptions
//!
//! - Ø10 ties and Ø20 main bars when estimating effective depths
//! - `momentX` bends about the axis parallel to `columnWidth`, so it works
//!   on the `columnDepth` lever
//! - Braced column with effective length k·L
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::column::{calculate, ColumnInput};
//! use design_core::materials::MaterialCatalog;
//! use serde_json::json;
//!
//! let input = ColumnInput::from_json(&json!({
//!     "axialLoad": 1500, "momentX": 50, "momentY": 30,
//!     "columnWidth": 400, "columnDepth": 400, "columnHeight": 3.5,
//!     "concreteGrade": "C30", "steelGrade": "420"
//! })).unwrap();
//!
//! let result = calculate(&input, MaterialCatalog::standard()).unwrap();
//! assert!(!result.is_slender);
//! assert_eq!(result.bar_arrangement, "9Ø25");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::flexure::AREA_TOLERANCE_MM2;
use crate::calculations::{read_grades, revalidate};
use crate::design_code::{
    code_ref, COLUMN_MAX_BARS, COLUMN_MIN_BARS, COLUMN_RATIO_MAX, COLUMN_RATIO_MIN,
    COLUMN_RATIO_WARN, MAX_SLENDERNESS, MAX_TIE_SPACING_MM, UTILIZATION_WARN_PERCENT,
};
use crate::equations::section::{effective_depth, rectangular_area, rectangular_radius_of_gyration};
use crate::errors::CalcResult;
use crate::materials::{MaterialCatalog, MaterialProperties, COLUMN_BAR_DIAMETERS};
use crate::reinforcement::select_bars;
use crate::report::{ensure_all_finite, DesignStatus, Warnings};
use crate::units::{KiloNewtonMeters, KiloNewtons, Meters, Millimeters, NewtonMillimeters, Newtons};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const AXIAL_LOAD: FieldSpec = FieldSpec::required("axialLoad", "kN", 0.0, f64::INFINITY);
const MOMENT_X: FieldSpec = FieldSpec::optional("momentX", "kN·m", 0.0, f64::INFINITY, 0.0);
const MOMENT_Y: FieldSpec = FieldSpec::optional("momentY", "kN·m", 0.0, f64::INFINITY, 0.0);
const COLUMN_WIDTH: FieldSpec = FieldSpec::required("columnWidth", "mm", 150.0, 2000.0);
const COLUMN_DEPTH: FieldSpec = FieldSpec::required("columnDepth", "mm", 150.0, 2000.0);
const COLUMN_HEIGHT: FieldSpec = FieldSpec::required("columnHeight", "m", 1.0, 50.0);
const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 20.0, 100.0, 40.0);
const EFFECTIVE_LENGTH_FACTOR: FieldSpec =
    FieldSpec::optional("effectiveLengthFactor", "", 0.5, 2.5, 1.0);

/// Assumed tie diameter for effective depth (mm)
const ASSUMED_TIE_MM: f64 = 10.0;
/// Assumed main bar diameter for effective depth (mm)
const ASSUMED_BAR_MM: f64 = 20.0;
/// Absolute floor on the minimum eccentricity (mm)
const MIN_ECCENTRICITY_MM: f64 = 20.0;
/// Floor on the normalised axial force inside λ_lim
const AXIAL_RATIO_FLOOR: f64 = 0.05;
/// Bresler load-contour exponent
const BRESLER_EXPONENT: f64 = 1.5;

/// Input parameters for a rectangular column.
///
/// ## JSON Example
///
/// ```json
/// {
///   "axialLoad": 1500,
///   "momentX": 50,
///   "momentY": 30,
///   "columnWidth": 400,
///   "columnDepth": 400,
///   "columnHeight": 3.5,
///   "concreteGrade": "C30",
///   "steelGrade": "420",
///   "coverThickness": 40
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInput {
    /// Factored axial compression N (kN)
    #[serde(rename = "axialLoad")]
    pub axial_load_kn: f64,

    /// Factored moment about the x axis (kN·m)
    #[serde(rename = "momentX")]
    pub moment_x_knm: f64,

    /// Factored moment about the y axis (kN·m)
    #[serde(rename = "momentY")]
    pub moment_y_knm: f64,

    /// Section width b (mm)
    #[serde(rename = "columnWidth")]
    pub width_mm: f64,

    /// Section depth h (mm)
    #[serde(rename = "columnDepth")]
    pub depth_mm: f64,

    /// Storey height L (m)
    #[serde(rename = "columnHeight")]
    pub height_m: f64,

    /// Concrete grade label (e.g. "C30")
    #[serde(rename = "concreteGrade")]
    pub concrete_grade: String,

    /// Steel grade label (e.g. "420")
    #[serde(rename = "steelGrade")]
    pub steel_grade: String,

    /// Clear cover to ties (mm)
    #[serde(rename = "coverThickness")]
    pub cover_mm: f64,

    /// Effective length factor k
    #[serde(rename = "effectiveLengthFactor")]
    pub effective_length_factor: f64,
}

impl ColumnInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let axial_load_kn = f.number(&AXIAL_LOAD);
        let moment_x_knm = f.number(&MOMENT_X);
        let moment_y_knm = f.number(&MOMENT_Y);
        let width_mm = f.number(&COLUMN_WIDTH);
        let depth_mm = f.number(&COLUMN_DEPTH);
        let height_m = f.number(&COLUMN_HEIGHT);
        let (concrete_grade, steel_grade) = read_grades(&mut f);
        let cover_mm = f.number(&COVER);
        let effective_length_factor = f.number(&EFFECTIVE_LENGTH_FACTOR);

        if f.is_clean() {
            let min_dim = width_mm.min(depth_mm);
            f.check(
                min_dim - 2.0 * (cover_mm + ASSUMED_TIE_MM + ASSUMED_BAR_MM) > 0.0,
                "coverThickness",
                format!("leaves no concrete core in a {:.0} mm section", min_dim),
            );
        }

        f.finish(|| ColumnInput {
            axial_load_kn,
            moment_x_knm,
            moment_y_knm,
            width_mm,
            depth_mm,
            height_m,
            concrete_grade,
            steel_grade,
            cover_mm,
            effective_length_factor,
        })
    }

    /// Apply the request rules to a programmatically built input.
    pub fn validate(&self) -> CalcResult<()> {
        revalidate(self, Self::from_json)
    }

    /// Gross area Ac = b·h (mm²)
    pub fn gross_area_mm2(&self) -> f64 {
        rectangular_area(self.width_mm, self.depth_mm)
    }

    /// Effective length l_e = k·L (mm)
    pub fn effective_length_mm(&self) -> f64 {
        Millimeters::from(Meters(self.height_m)).0 * self.effective_length_factor
    }
}

/// Column design result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResult {
    /// Gross area Ac (mm²)
    pub gross_area: f64,
    /// Effective depth for bending about x (mm)
    pub effective_depth_x: f64,
    /// Effective depth for bending about y (mm)
    pub effective_depth_y: f64,
    /// Radius of gyration of the weaker axis (mm)
    pub radius_of_gyration: f64,
    /// Effective length (m)
    pub effective_length: f64,
    /// λ = l_e/i
    pub slenderness_ratio: f64,
    /// λ_lim
    pub slenderness_limit: f64,
    pub is_slender: bool,
    /// Normalised axial force ν = N/(Ac·fcd_block)
    pub normalized_axial_force: f64,
    /// Minimum eccentricity per axis (mm)
    pub min_eccentricity_x: f64,
    pub min_eccentricity_y: f64,
    /// First-order eccentricity M/N per axis (mm); 0 without axial load
    pub first_order_eccentricity_x: f64,
    pub first_order_eccentricity_y: f64,
    /// Second-order eccentricity per axis (mm); 0 for stocky columns
    pub second_order_eccentricity_x: f64,
    pub second_order_eccentricity_y: f64,
    /// Design moments including eccentricity effects (kN·m)
    pub design_moment_x: f64,
    pub design_moment_y: f64,
    /// Combined Bresler relative moment μ
    pub relative_moment: f64,
    /// Mechanical reinforcement ratio ω
    pub mechanical_ratio: f64,
    /// Required longitudinal steel (mm²)
    pub steel_area_required: f64,
    /// Provided longitudinal steel (mm²)
    pub steel_area_provided: f64,
    pub number_of_bars: u32,
    /// Main bar diameter (mm)
    pub bar_diameter: u32,
    /// ρ = As/Ac in percent
    pub reinforcement_ratio: f64,
    /// e.g. "8Ø20"
    pub bar_arrangement: String,
    /// Tie diameter (mm)
    pub tie_diameter: u32,
    /// Tie spacing (mm)
    pub tie_spacing: f64,
    /// N_Rd (kN)
    pub axial_capacity: f64,
    /// N/N_Rd in percent
    pub utilization_ratio: f64,
    pub is_adequate: bool,
    pub design_status: DesignStatus,
    /// Materials used after any grade fallback
    pub materials: MaterialProperties,
    /// Code clauses applied
    pub code_references: Vec<String>,
    pub warnings: Vec<String>,
}

/// Per-axis eccentricity build-up.
struct AxisDemand {
    e_min: f64,
    e_1: f64,
    e_2: f64,
    m_design: f64,
}

/// Eccentricities and design moment for one bending axis.
///
/// `lever_dim` is the section dimension in the bending plane, `d` its
/// effective depth.
fn axis_demand(
    n_kn: f64,
    m_knm: f64,
    lever_dim: f64,
    d: f64,
    le_mm: f64,
    slender: bool,
    eps_yd: f64,
) -> AxisDemand {
    let e_min = (lever_dim / 30.0).max(MIN_ECCENTRICITY_MM);
    let e_1 = if n_kn > 0.0 {
        NewtonMillimeters::from(KiloNewtonMeters(m_knm)).0 / Newtons::from(KiloNewtons(n_kn)).0
    } else {
        0.0
    };
    let e_2 = if slender {
        (le_mm * le_mm / 10.0) * (2.0 * eps_yd / (0.9 * d))
    } else {
        0.0
    };
    let m_design = m_knm.max(n_kn * e_min / 1000.0) + n_kn * e_2 / 1000.0;
    AxisDemand {
        e_min,
        e_1,
        e_2,
        m_design,
    }
}

/// Mechanical ratio ω from the Bresler contour and the axial excess.
fn mechanical_ratio(mu_x: f64, mu_y: f64, nu: f64) -> (f64, f64) {
    let mu = (mu_x.powf(BRESLER_EXPONENT) + mu_y.powf(BRESLER_EXPONENT)).powf(1.0 / BRESLER_EXPONENT);
    let axial_excess = (nu / 0.8 - 1.0).max(0.0);
    let omega = (2.0 * mu + axial_excess).clamp(0.1, 1.0);
    (mu, omega)
}

/// Design a rectangular column.
pub fn calculate(input: &ColumnInput, catalog: &MaterialCatalog) -> CalcResult<ColumnResult> {
    input.validate()?;

    let resolved = catalog.resolve(&input.concrete_grade, &input.steel_grade);
    let m = &resolved.properties;
    let mut warnings = Warnings::new();
    warnings.extend(resolved.fallbacks.iter().cloned());

    let (b, h) = (input.width_mm, input.depth_mm);
    let n = input.axial_load_kn;
    let fcd_block = m.fcd_block();

    // === Geometry ===
    let ac = input.gross_area_mm2();
    let d_x = effective_depth(h, input.cover_mm, ASSUMED_TIE_MM, ASSUMED_BAR_MM);
    let d_y = effective_depth(b, input.cover_mm, ASSUMED_TIE_MM, ASSUMED_BAR_MM);

    // === Slenderness ===
    let i = rectangular_radius_of_gyration(b.min(h));
    let le = input.effective_length_mm();
    let lambda = le / i;
    let nu = Newtons::from(KiloNewtons(n)).0 / (ac * fcd_block);
    let n_floor = nu.max(AXIAL_RATIO_FLOOR);
    let lambda_lim = 25.0 * (m.fck_mpa / 20.0).sqrt() / n_floor.sqrt();
    let is_slender = lambda > lambda_lim;

    // === Eccentricities and design moments ===
    let eps_yd = m.eps_yd();
    let x = axis_demand(n, input.moment_x_knm, h, d_x, le, is_slender, eps_yd);
    let y = axis_demand(n, input.moment_y_knm, b, d_y, le, is_slender, eps_yd);

    // === Biaxial interaction ===
    let mx = NewtonMillimeters::from(KiloNewtonMeters(x.m_design)).0;
    let my = NewtonMillimeters::from(KiloNewtonMeters(y.m_design)).0;
    let mu_x = mx / (b * h * h * fcd_block);
    let mu_y = my / (h * b * b * fcd_block);
    let (mu, omega) = mechanical_ratio(mu_x, mu_y, nu);

    // === Steel area ===
    let as_interaction = omega * ac * fcd_block / m.fyd_mpa;
    let as_floor = (COLUMN_RATIO_MIN * ac).max(Newtons::from(KiloNewtons(n)).0 / m.fyd_mpa);
    let as_cap = COLUMN_RATIO_MAX * ac;
    let as_uncapped = as_interaction.max(as_floor);
    let as_required = as_uncapped.min(as_cap);
    warnings.push_if(as_uncapped > as_cap, || {
        format!(
            "Required steel {:.0} mm² capped at the 4% maximum ({:.0} mm²); enlarge the section",
            as_uncapped, as_cap
        )
    });

    // === Bars and ties ===
    let bars = select_bars(as_required, &COLUMN_BAR_DIAMETERS, COLUMN_MIN_BARS, COLUMN_MAX_BARS)?;
    let phi = bars.diameter_mm;
    let tie_spacing = (12.0 * f64::from(phi)).min(b.min(h)).min(MAX_TIE_SPACING_MM);
    let tie_diameter = 6u32.max(phi.div_ceil(4));

    // === Capacity ===
    let as_provided = bars.area_provided_mm2;
    let rho = as_provided / ac;
    let n_rd = 0.8 * (ac * fcd_block + as_provided * m.fyd_mpa) / 1000.0;
    let utilization = n / n_rd * 100.0;

    ensure_all_finite(&[
        ("slendernessRatio", lambda),
        ("slendernessLimit", lambda_lim),
        ("designMomentX", x.m_design),
        ("designMomentY", y.m_design),
        ("mechanicalRatio", omega),
        ("steelAreaRequired", as_required),
        ("axialCapacity", n_rd),
        ("utilizationRatio", utilization),
    ])?;

    // === Verdict ===
    warnings.push_if(is_slender, || {
        format!(
            "Column is slender (λ = {:.1} > λ_lim = {:.1}); second-order moments included",
            lambda, lambda_lim
        )
    });
    warnings.push_if(lambda > MAX_SLENDERNESS, || {
        format!("Slenderness {:.1} exceeds the absolute limit {:.0}", lambda, MAX_SLENDERNESS)
    });
    warnings.push_if(rho > COLUMN_RATIO_WARN, || {
        format!("Reinforcement ratio {:.2}% above 3%; congestion likely", rho * 100.0)
    });
    warnings.push_if(rho > COLUMN_RATIO_MAX, || {
        format!("Reinforcement ratio {:.2}% exceeds the 4% maximum", rho * 100.0)
    });
    warnings.push_if(rho < COLUMN_RATIO_MIN, || {
        format!("Reinforcement ratio {:.2}% below the 0.2% minimum", rho * 100.0)
    });
    warnings.push_if(utilization > UTILIZATION_WARN_PERCENT, || {
        format!("Axial utilization {:.1}% is above 90%", utilization)
    });
    warnings.push_if(bars.fallback, || {
        format!(
            "No bar layout of {}–{} bars fits {:.0} mm²; using {}",
            COLUMN_MIN_BARS,
            COLUMN_MAX_BARS,
            as_required,
            bars.arrangement()
        )
    });

    let is_adequate = utilization <= 100.0
        && (COLUMN_RATIO_MIN..=COLUMN_RATIO_MAX).contains(&rho)
        && as_provided + AREA_TOLERANCE_MM2 >= as_required
        && lambda <= MAX_SLENDERNESS;

    tracing::debug!(
        n_kn = n,
        lambda,
        lambda_lim,
        as_required,
        arrangement = %bars.arrangement(),
        utilization,
        is_adequate,
        "column design"
    );

    Ok(ColumnResult {
        gross_area: ac,
        effective_depth_x: d_x,
        effective_depth_y: d_y,
        radius_of_gyration: i,
        effective_length: Meters::from(Millimeters(le)).0,
        slenderness_ratio: lambda,
        slenderness_limit: lambda_lim,
        is_slender,
        normalized_axial_force: nu,
        min_eccentricity_x: x.e_min,
        min_eccentricity_y: y.e_min,
        first_order_eccentricity_x: x.e_1,
        first_order_eccentricity_y: y.e_1,
        second_order_eccentricity_x: x.e_2,
        second_order_eccentricity_y: y.e_2,
        design_moment_x: x.m_design,
        design_moment_y: y.m_design,
        relative_moment: mu,
        mechanical_ratio: omega,
        steel_area_required: as_required,
        steel_area_provided: as_provided,
        number_of_bars: bars.count,
        bar_diameter: phi,
        reinforcement_ratio: rho * 100.0,
        bar_arrangement: bars.arrangement(),
        tie_diameter,
        tie_spacing,
        axial_capacity: n_rd,
        utilization_ratio: utilization,
        is_adequate,
        design_status: DesignStatus::from_adequate(is_adequate),
        materials: m.clone(),
        code_references: vec![
            code_ref::MATERIAL_FACTORS.to_string(),
            code_ref::SLENDERNESS.to_string(),
            code_ref::MIN_ECCENTRICITY.to_string(),
            code_ref::NOMINAL_CURVATURE.to_string(),
            code_ref::COLUMN_REINFORCEMENT.to_string(),
            code_ref::COLUMN_TIES.to_string(),
        ],
        warnings: warnings.into_vec(),
    })
}
