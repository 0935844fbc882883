//! # Solid Slab Design
//!
//! One-way or two-way solid slab under uniform area load, designed as
//! 1000 mm wide strips with spaced bars.
//!
//! ## Slab Action
//!
//! | Condition | Action | Load on short span |
//! |-----------|--------|--------------------|
//! | no `longSpan`, or Ly/Lx > 2 | one-way | w |
//! | Ly/Lx ≤ 2 | two-way | w·r⁴/(1 + r⁴) |
//!
//! In one-way action the long direction only carries distribution steel.
//! Short-span bars sit in the outer layer (d_x = h − c − φ/2), long-span bars
//! inside them (d_y = h − c − 1.5φ).
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::slab::{calculate, SlabAction, SlabInput};
//! use design_core::materials::MaterialCatalog;
//! use serde_json::json;
//!
//! let input = SlabInput::from_json(&json!({
//!     "shortSpan": 4.0, "longSpan": 5.0, "slabThickness": 200,
//!     "deadLoad": 1.5, "liveLoad": 2.0, "supportType": "continuous"
//! })).unwrap();
//!
//! let result = calculate(&input, MaterialCatalog::standard()).unwrap();
//! assert_eq!(result.slab_action, SlabAction::TwoWay);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::beam::read_support;
use crate::calculations::flexure::{
    design_flexure, BarLayout, FlexuralDesign, FlexuralMember, FlexuralSection, SpanDepthCheck,
};
use crate::calculations::{read_grades, revalidate};
use crate::design_code::{code_ref, SupportType, CONCRETE_UNIT_WEIGHT, SLAB_RATIO_MIN};
use crate::equations::beam::{grashof_short_span_share, uniform_load_moment, uniform_load_shear};
use crate::errors::CalcResult;
use crate::loads::{GoverningCombination, LoadCase, LoadType};
use crate::materials::{MaterialCatalog, MaterialProperties};
use crate::report::{ensure_all_finite, DesignStatus, Warnings};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const SHORT_SPAN: FieldSpec = FieldSpec::required("shortSpan", "m", 0.5, 15.0);
const LONG_SPAN: FieldSpec = FieldSpec::required("longSpan", "m", 0.5, 30.0);
const THICKNESS: FieldSpec = FieldSpec::required("slabThickness", "mm", 50.0, 600.0);
const DEAD_LOAD: FieldSpec = FieldSpec::required("deadLoad", "kN/m²", 0.0, f64::INFINITY);
const LIVE_LOAD: FieldSpec = FieldSpec::required("liveLoad", "kN/m²", 0.0, f64::INFINITY);
const BAR_DIAMETER: FieldSpec = FieldSpec::optional("barDiameter", "mm", 8.0, 20.0, 10.0);
const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 15.0, 75.0, 25.0);

/// Support conditions a slab strip may take
const SLAB_SUPPORTS: [SupportType; 2] = [SupportType::SimplySupported, SupportType::Continuous];

/// Long/short ratio above which a slab spans one way
const TWO_WAY_RATIO_LIMIT: f64 = 2.0;

/// Minimum practical thickness (mm)
const MIN_THICKNESS_ONE_WAY: f64 = 80.0;
const MIN_THICKNESS_TWO_WAY: f64 = 100.0;

/// Absolute cap on main bar spacing (mm)
const SLAB_MAX_SPACING_MM: f64 = 200.0;

/// Input parameters for a solid slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabInput {
    /// Short span Lx (m)
    #[serde(rename = "shortSpan")]
    pub short_span_m: f64,

    /// Long span Ly (m); absent for a one-way strip
    #[serde(rename = "longSpan", skip_serializing_if = "Option::is_none")]
    pub long_span_m: Option<f64>,

    /// Overall thickness h (mm)
    #[serde(rename = "slabThickness")]
    pub thickness_mm: f64,

    /// Superimposed dead load (kN/m²), excluding self weight
    #[serde(rename = "deadLoad")]
    pub dead_load_kpa: f64,

    /// Live load (kN/m²)
    #[serde(rename = "liveLoad")]
    pub live_load_kpa: f64,

    #[serde(rename = "supportType")]
    pub support: SupportType,

    /// Main bar diameter (mm)
    #[serde(rename = "barDiameter")]
    pub bar_diameter_mm: u32,

    #[serde(rename = "includeSelfWeight")]
    pub include_self_weight: bool,

    #[serde(rename = "concreteGrade")]
    pub concrete_grade: String,

    #[serde(rename = "steelGrade")]
    pub steel_grade: String,

    #[serde(rename = "coverThickness")]
    pub cover_mm: f64,
}

impl SlabInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let short_span_m = f.number(&SHORT_SPAN);
        let long_span_m = f.optional_number(&LONG_SPAN);
        let thickness_mm = f.number(&THICKNESS);
        let dead_load_kpa = f.number(&DEAD_LOAD);
        let live_load_kpa = f.number(&LIVE_LOAD);
        let support = read_support(&mut f, &SLAB_SUPPORTS);
        let bar_diameter = f.number(&BAR_DIAMETER);
        let include_self_weight = f.flag("includeSelfWeight", true);
        let (concrete_grade, steel_grade) = read_grades(&mut f);
        let cover_mm = f.number(&COVER);

        if f.is_clean() {
            f.check(bar_diameter.fract() == 0.0, "barDiameter", "must be a whole number of millimetres");
            if let Some(ly) = long_span_m {
                f.check(ly >= short_span_m, "longSpan", "must not be shorter than shortSpan");
            }
            f.check(
                thickness_mm - cover_mm - 1.5 * bar_diameter > 0.0,
                "slabThickness",
                "leaves no effective depth for two bar layers",
            );
        }

        f.finish(|| SlabInput {
            short_span_m,
            long_span_m,
            thickness_mm,
            dead_load_kpa,
            live_load_kpa,
            support,
            bar_diameter_mm: bar_diameter as u32,
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

    /// Self weight (kN/m²)
    pub fn self_weight_kpa(&self) -> f64 {
        CONCRETE_UNIT_WEIGHT * self.thickness_mm / 1000.0
    }

    /// Ly/Lx, when a long span is given
    pub fn span_ratio(&self) -> Option<f64> {
        self.long_span_m.map(|ly| ly / self.short_span_m)
    }

    pub fn action(&self) -> SlabAction {
        match self.span_ratio() {
            Some(r) if r <= TWO_WAY_RATIO_LIMIT => SlabAction::TwoWay,
            _ => SlabAction::OneWay,
        }
    }
}

/// How the slab carries its load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabAction {
    OneWay,
    TwoWay,
}

impl SlabAction {
    pub fn min_thickness_mm(&self) -> f64 {
        match self {
            SlabAction::OneWay => MIN_THICKNESS_ONE_WAY,
            SlabAction::TwoWay => MIN_THICKNESS_TWO_WAY,
        }
    }
}

/// A 1000 mm strip in one direction.
struct SlabStrip {
    label: &'static str,
    thickness: f64,
    d: f64,
    moment: f64,
    diameter: u32,
    span_check: Option<SpanDepthCheck>,
}

impl FlexuralMember for SlabStrip {
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
            max_spacing_mm: (1.5 * self.thickness).min(SLAB_MAX_SPACING_MM),
        }
    }

    fn min_ratio(&self, _materials: &MaterialProperties) -> f64 {
        SLAB_RATIO_MIN
    }

    fn span_depth(&self) -> Option<SpanDepthCheck> {
        self.span_check
    }
}

/// Slab design result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabResult {
    pub slab_action: SlabAction,
    /// Ly/Lx, when a long span was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_ratio: Option<f64>,
    pub support_type: SupportType,
    /// kN/m²
    pub self_weight: f64,
    pub governing_combination: GoverningCombination,
    /// Governing ULS area load (kN/m²)
    pub factored_load: f64,
    /// Fraction of the load carried by the short span
    pub short_span_share: f64,
    /// Short-direction strip
    pub short_span: FlexuralDesign,
    /// Long-direction strip (distribution steel in one-way action)
    pub long_span: FlexuralDesign,
    /// Short-span support shear per metre (kN/m)
    pub design_shear: f64,
    /// Concrete shear capacity per metre (kN/m)
    pub shear_capacity: f64,
    /// Minimum thickness for this action (mm)
    pub minimum_thickness: f64,
    pub is_adequate: bool,
    pub design_status: DesignStatus,
    pub materials: MaterialProperties,
    pub code_references: Vec<String>,
    pub warnings: Vec<String>,
}

/// Design a solid slab.
pub fn calculate(input: &SlabInput, catalog: &MaterialCatalog) -> CalcResult<SlabResult> {
    input.validate()?;

    let resolved = catalog.resolve(&input.concrete_grade, &input.steel_grade);
    let m = &resolved.properties;
    let mut warnings = Warnings::new();
    warnings.extend(resolved.fallbacks.iter().cloned());

    let h = input.thickness_mm;
    let phi = f64::from(input.bar_diameter_mm);
    let lx = input.short_span_m;
    let action = input.action();

    // === Loads ===
    let mut case = LoadCase::new("Slab")
        .with_load(LoadType::Dead, input.dead_load_kpa)
        .with_load(LoadType::Live, input.live_load_kpa);
    let self_weight = if input.include_self_weight {
        input.self_weight_kpa()
    } else {
        0.0
    };
    case.add_load(LoadType::Dead, self_weight);
    case.validate()?;
    let governing = case.governing_uls();
    let w = governing.factored_load;

    // === Load split ===
    let share = match (action, input.span_ratio()) {
        (SlabAction::TwoWay, Some(r)) => grashof_short_span_share(r),
        _ => 1.0,
    };
    let w_x = w * share;
    let w_y = w - w_x;
    let m_x = uniform_load_moment(w_x, lx, input.support);
    let m_y = match (action, input.long_span_m) {
        (SlabAction::TwoWay, Some(ly)) => uniform_load_moment(w_y, ly, input.support),
        _ => 0.0,
    };

    // === Strips ===
    let d_x = h - input.cover_mm - phi / 2.0;
    let d_y = h - input.cover_mm - 1.5 * phi;
    let short_strip = SlabStrip {
        label: "Slab short span",
        thickness: h,
        d: d_x,
        moment: m_x,
        diameter: input.bar_diameter_mm,
        span_check: Some(SpanDepthCheck {
            span_m: lx,
            limit: input.support.span_depth_limit(),
        }),
    };
    let long_strip = SlabStrip {
        label: match action {
            SlabAction::OneWay => "Slab distribution",
            SlabAction::TwoWay => "Slab long span",
        },
        thickness: h,
        d: d_y,
        moment: m_y,
        diameter: input.bar_diameter_mm,
        span_check: None,
    };
    let short_span = design_flexure(&short_strip, m)?;
    let long_span = design_flexure(&long_strip, m)?;
    warnings.extend(short_span.warnings.iter().cloned());
    warnings.extend(long_span.warnings.iter().cloned());

    // === Shear without links ===
    let v_ed = uniform_load_shear(w_x, lx, input.support);
    let v_rd = 0.65 * m.fctd_mpa * 1000.0 * d_x / 1000.0;
    let shear_ok = v_ed <= v_rd;
    warnings.push_if(!shear_ok, || {
        format!(
            "Slab shear {:.1} kN/m exceeds the concrete capacity {:.1} kN/m; thicken the slab",
            v_ed, v_rd
        )
    });

    // === Thickness ===
    let min_thickness = action.min_thickness_mm();
    let thick_enough = h >= min_thickness;
    warnings.push_if(!thick_enough, || {
        format!(
            "Slab thickness {:.0} mm is below the {:.0} mm minimum for {} action",
            h,
            min_thickness,
            match action {
                SlabAction::OneWay => "one-way",
                SlabAction::TwoWay => "two-way",
            }
        )
    });

    ensure_all_finite(&[
        ("factoredLoad", w),
        ("shortSpanShare", share),
        ("designShear", v_ed),
        ("shearCapacity", v_rd),
    ])?;

    let is_adequate = short_span.is_adequate && long_span.is_adequate && shear_ok && thick_enough;

    tracing::debug!(
        action = ?action,
        w,
        m_x,
        m_y,
        short = %short_span.bar_arrangement,
        long = %long_span.bar_arrangement,
        is_adequate,
        "slab design"
    );

    Ok(SlabResult {
        slab_action: action,
        span_ratio: input.span_ratio(),
        support_type: input.support,
        self_weight,
        factored_load: w,
        governing_combination: governing,
        short_span_share: share,
        short_span,
        long_span,
        design_shear: v_ed,
        shear_capacity: v_rd,
        minimum_thickness: min_thickness,
        is_adequate,
        design_status: DesignStatus::from_adequate(is_adequate),
        materials: m.clone(),
        code_references: vec![
            code_ref::SLAB_REINFORCEMENT.to_string(),
            code_ref::SHEAR.to_string(),
            code_ref::SPAN_DEPTH.to_string(),
        ],
        warnings: warnings.into_vec(),
    })
}
