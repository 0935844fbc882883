//! # Earthwork Grading
//!
//! Cut and fill volumes between an existing ground survey and a proposed
//! surface by the grid-cell (average end area over squares) method.
//!
//! ## Method
//!
//! For every grid cell of area A = sx·sy with corner depths
//! dᵢ = existing − proposed:
//!
//! ```text
//! cut  = A · mean(max(dᵢ, 0))
//! fill = A · mean(max(−dᵢ, 0))
//! ```
//!
//! Cut is multiplied by the shrinkage factor (loose cut compacts when
//! placed) and fill demand by the swell factor before balancing. The site is
//! BALANCED when the adjusted net is within 5% of the adjusted total;
//! otherwise it needs EXPORT (excess cut) or IMPORT (excess fill).
//!
//! ## Example
//!
//! ```rust
//! use design_core::calculations::grading::{calculate, EarthworkStatus, GradingInput};
//! use serde_json::json;
//!
//! let input = GradingInput::from_json(&json!({
//!     "gridSpacing": 10,
//!     "existingElevations": [[100.5, 101.0], [99.5, 100.0]],
//!     "targetElevation": 100.0
//! })).unwrap();
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.cut_volume, 37.5);
//! assert_eq!(result.status, EarthworkStatus::Export);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::revalidate;
use crate::errors::CalcResult;
use crate::report::{ensure_all_finite, round_to, Warnings};
use crate::validation::{FieldSpec, Fields};

// ============================================================================
// Request Fields
// ============================================================================

const GRID_SPACING: FieldSpec = FieldSpec::required("gridSpacing", "m", 0.01, 10_000.0);
const GRID_SPACING_X: FieldSpec = FieldSpec::required("gridSpacingX", "m", 0.01, 10_000.0);
const GRID_SPACING_Y: FieldSpec = FieldSpec::required("gridSpacingY", "m", 0.01, 10_000.0);
const TARGET_ELEVATION: FieldSpec = FieldSpec::required("targetElevation", "m", -500.0, 9000.0);
const SHRINKAGE: FieldSpec = FieldSpec::optional("shrinkageFactor", "", 0.5, 1.0, 0.90);
const SWELL: FieldSpec = FieldSpec::optional("swellFactor", "", 1.0, 1.5, 1.0);

/// Net within this fraction of the total counts as balanced
const BALANCE_TOLERANCE: f64 = 0.05;

/// Decimal places kept in reported volumes (m³) and levels (m)
const VOLUME_DECIMALS: i32 = 3;

/// Input for a grading volume calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gridSpacing": 10,
///   "existingElevations": [[100.5, 101.0, 101.2], [99.5, 100.0, 100.4]],
///   "targetElevation": 100.0,
///   "shrinkageFactor": 0.9
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingInput {
    /// Point spacing along a row (m)
    #[serde(rename = "gridSpacingX")]
    pub spacing_x_m: f64,

    /// Point spacing between rows (m)
    #[serde(rename = "gridSpacingY")]
    pub spacing_y_m: f64,

    /// Surveyed ground levels, rows × columns (m)
    #[serde(rename = "existingElevations")]
    pub existing: Vec<Vec<f64>>,

    /// Flat finished level (m)
    #[serde(rename = "targetElevation", skip_serializing_if = "Option::is_none")]
    pub target_elevation_m: Option<f64>,

    /// Finished levels on the same grid (m)
    #[serde(rename = "proposedElevations", skip_serializing_if = "Option::is_none")]
    pub proposed: Option<Vec<Vec<f64>>>,

    /// Factor on cut volume
    #[serde(rename = "shrinkageFactor")]
    pub shrinkage_factor: f64,

    /// Factor on fill demand
    #[serde(rename = "swellFactor")]
    pub swell_factor: f64,
}

impl GradingInput {
    /// Build a validated input from a request body, reporting every violation.
    pub fn from_json(body: &Value) -> CalcResult<Self> {
        let mut f = Fields::from_value(body)?;
        let spacing = f.optional_number(&GRID_SPACING);
        let spacing_x = f.optional_number(&GRID_SPACING_X).or(spacing);
        let spacing_y = f.optional_number(&GRID_SPACING_Y).or(spacing);
        f.check(
            spacing_x.is_some() && spacing_y.is_some(),
            "gridSpacing",
            "give gridSpacing, or both gridSpacingX and gridSpacingY",
        );

        let existing = f.grid("existingElevations", true);
        let target_elevation_m = f.optional_number(&TARGET_ELEVATION);
        let proposed = f.grid("proposedElevations", false);
        let shrinkage_factor = f.number(&SHRINKAGE);
        let swell_factor = f.number(&SWELL);

        let proposed_given = body.get("proposedElevations").is_some_and(|v| !v.is_null());
        f.check(
            target_elevation_m.is_some() != proposed_given,
            "targetElevation",
            "give exactly one of targetElevation or proposedElevations",
        );
        if let (Some(e), Some(p)) = (&existing, &proposed) {
            f.check(
                e.len() == p.len() && e[0].len() == p[0].len(),
                "proposedElevations",
                format!(
                    "must match existingElevations ({}×{}), got {}×{}",
                    e.len(),
                    e[0].len(),
                    p.len(),
                    p[0].len()
                ),
            );
        }

        f.finish(|| GradingInput {
            spacing_x_m: spacing_x.unwrap_or_default(),
            spacing_y_m: spacing_y.unwrap_or_default(),
            existing: existing.unwrap_or_default(),
            target_elevation_m,
            proposed,
            shrinkage_factor,
            swell_factor,
        })
    }

    /// Apply the request rules to a programmatically built input.
    pub fn validate(&self) -> CalcResult<()> {
        revalidate(self, Self::from_json)
    }

    fn rows(&self) -> usize {
        self.existing.len()
    }

    fn columns(&self) -> usize {
        self.existing.first().map_or(0, Vec::len)
    }

    /// Finished level at grid point (i, j)
    fn proposed_at(&self, i: usize, j: usize) -> f64 {
        match (&self.proposed, self.target_elevation_m) {
            (Some(p), _) => p[i][j],
            (None, Some(t)) => t,
            (None, None) => self.existing[i][j],
        }
    }

    /// existing − proposed at grid point (i, j); positive is cut
    fn depth_at(&self, i: usize, j: usize) -> f64 {
        self.existing[i][j] - self.proposed_at(i, j)
    }
}

/// Site earthwork balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EarthworkStatus {
    Balanced,
    /// Surplus cut to haul off site
    Export,
    /// Fill to bring in
    Import,
}

impl EarthworkStatus {
    fn classify(adjusted_cut: f64, adjusted_fill: f64) -> Self {
        let net = adjusted_cut - adjusted_fill;
        let total = adjusted_cut + adjusted_fill;
        if net.abs() <= BALANCE_TOLERANCE * total {
            EarthworkStatus::Balanced
        } else if net > 0.0 {
            EarthworkStatus::Export
        } else {
            EarthworkStatus::Import
        }
    }
}

/// Grading result. Volumes in m³, levels and depths in m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub rows: usize,
    pub columns: usize,
    pub cell_count: usize,
    /// m²
    pub cell_area: f64,
    /// m²
    pub plan_area: f64,
    pub cut_volume: f64,
    pub fill_volume: f64,
    /// cut − fill
    pub net_volume: f64,
    pub adjusted_cut_volume: f64,
    pub adjusted_fill_volume: f64,
    pub adjusted_net_volume: f64,
    pub max_cut_depth: f64,
    pub max_fill_depth: f64,
    /// Flat level that balances raw cut and fill
    pub balancing_elevation: f64,
    pub shrinkage_factor: f64,
    pub swell_factor: f64,
    pub status: EarthworkStatus,
    pub warnings: Vec<String>,
}

/// Compute cut/fill volumes over the grid.
pub fn calculate(input: &GradingInput) -> CalcResult<GradingResult> {
    input.validate()?;

    let (rows, cols) = (input.rows(), input.columns());
    let cell_area = input.spacing_x_m * input.spacing_y_m;
    let cell_count = (rows - 1) * (cols - 1);
    let mut warnings = Warnings::new();

    let mut cut = 0.0;
    let mut fill = 0.0;
    let mut existing_mean_sum = 0.0;
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let corners = [(i, j), (i, j + 1), (i + 1, j), (i + 1, j + 1)];
            let (mut c, mut fl, mut e) = (0.0, 0.0, 0.0);
            for (r, k) in corners {
                let d = input.depth_at(r, k);
                c += d.max(0.0);
                fl += (-d).max(0.0);
                e += input.existing[r][k];
            }
            cut += cell_area * c / 4.0;
            fill += cell_area * fl / 4.0;
            existing_mean_sum += e / 4.0;
        }
    }

    let mut max_cut: f64 = 0.0;
    let mut max_fill: f64 = 0.0;
    for i in 0..rows {
        for j in 0..cols {
            let d = input.depth_at(i, j);
            max_cut = max_cut.max(d);
            max_fill = max_fill.max(-d);
        }
    }

    let adjusted_cut = cut * input.shrinkage_factor;
    let adjusted_fill = fill * input.swell_factor;
    let status = EarthworkStatus::classify(adjusted_cut, adjusted_fill);
    let balancing_elevation = existing_mean_sum / cell_count as f64;

    ensure_all_finite(&[
        ("cutVolume", cut),
        ("fillVolume", fill),
        ("balancingElevation", balancing_elevation),
    ])?;

    warnings.push_if(cut == 0.0 && fill == 0.0, || {
        "Existing and proposed surfaces coincide; no earthwork".to_string()
    });
    match status {
        EarthworkStatus::Export => warnings.push(format!(
            "Surplus of {:.1} m³ after shrinkage must be exported",
            adjusted_cut - adjusted_fill
        )),
        EarthworkStatus::Import => warnings.push(format!(
            "Shortfall of {:.1} m³ after swell must be imported",
            adjusted_fill - adjusted_cut
        )),
        EarthworkStatus::Balanced => {}
    }

    tracing::debug!(rows, cols, cut, fill, status = ?status, "grading volumes");

    let r = |v: f64| round_to(v, VOLUME_DECIMALS);
    Ok(GradingResult {
        rows,
        columns: cols,
        cell_count,
        cell_area,
        plan_area: cell_area * cell_count as f64,
        cut_volume: r(cut),
        fill_volume: r(fill),
        net_volume: r(cut - fill),
        adjusted_cut_volume: r(adjusted_cut),
        adjusted_fill_volume: r(adjusted_fill),
        adjusted_net_volume: r(adjusted_cut - adjusted_fill),
        max_cut_depth: r(max_cut),
        max_fill_depth: r(max_fill),
        balancing_elevation: r(balancing_elevation),
        shrinkage_factor: input.shrinkage_factor,
        swell_factor: input.swell_factor,
        status,
        warnings: warnings.into_vec(),
    })
}
