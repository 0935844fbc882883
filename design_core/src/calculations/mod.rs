//! # Structural Calculations
//!
//! This module contains all element design types. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Validated input record, built by `*Input::from_json`
//! - `*Result` - Design result (JSON-serializable, camelCase)
//! - `calculate(input, catalog) -> CalcResult<*Result>` - Pure design function
//!
//! ## API Integration
//!
//! All types are designed for machine consumption:
//! - Field names match the JSON request/response contract
//! - Every violation of a request is reported at once
//! - Inadequate designs are normal results, never errors
//!
//! ## Available Calculations
//!
//! - [`column`] - Biaxially loaded rectangular column
//! - [`retaining_wall`] - Cantilever retaining wall stability and steel
//! - [`beam`] - Uniformly loaded rectangular beam (flexure + shear)
//! - [`slab`] - One-way or two-way solid slab
//! - [`foundation`] - Isolated pad footing
//! - [`grading`] - Grid-cell cut/fill earthwork volumes
//! - [`flexure`] - Shared flexural pipeline used by beam, slab and footing

pub mod beam;
pub mod column;
pub mod flexure;
pub mod foundation;
pub mod grading;
pub mod retaining_wall;
pub mod slab;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialCatalog, DEFAULT_CONCRETE_GRADE, DEFAULT_STEEL_GRADE};
use crate::validation::Fields;

// Re-export commonly used types
pub use beam::{BeamInput, BeamResult};
pub use column::{ColumnInput, ColumnResult};
pub use flexure::{FlexuralDesign, FlexuralMember};
pub use foundation::{FoundationInput, FoundationResult};
pub use grading::{GradingInput, GradingResult};
pub use retaining_wall::{RetainingWallInput, RetainingWallResult};
pub use slab::{SlabInput, SlabResult};

/// The element types the engine can design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Column,
    RetainingWall,
    Beam,
    Slab,
    Foundation,
    Grading,
}

impl ElementKind {
    /// All element types in route order
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Column,
        ElementKind::RetainingWall,
        ElementKind::Beam,
        ElementKind::Slab,
        ElementKind::Foundation,
        ElementKind::Grading,
    ];

    /// URL slug (e.g. "retaining-wall")
    pub fn slug(&self) -> &'static str {
        match self {
            ElementKind::Column => "column",
            ElementKind::RetainingWall => "retaining-wall",
            ElementKind::Beam => "beam",
            ElementKind::Slab => "slab",
            ElementKind::Foundation => "foundation",
            ElementKind::Grading => "grading",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Column => "Column",
            ElementKind::RetainingWall => "Retaining Wall",
            ElementKind::Beam => "Beam",
            ElementKind::Slab => "Slab",
            ElementKind::Foundation => "Foundation",
            ElementKind::Grading => "Grading",
        }
    }

    /// Parse a slug, accepting `retaining_wall` and `retainingWall` spellings too
    pub fn from_slug(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "column" => Ok(ElementKind::Column),
            "retaining-wall" | "retainingwall" | "wall" => Ok(ElementKind::RetainingWall),
            "beam" => Ok(ElementKind::Beam),
            "slab" => Ok(ElementKind::Slab),
            "foundation" | "footing" => Ok(ElementKind::Foundation),
            "grading" => Ok(ElementKind::Grading),
            _ => Err(CalcError::unknown_element(s)),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Validate a raw request body, run the element design and serialize the result.
///
/// This is the single entry point used by the HTTP server and the CLI.
///
/// # Example
///
/// ```rust
/// use design_core::calculations::{design, ElementKind};
/// use design_core::materials::MaterialCatalog;
/// use serde_json::json;
///
/// let body = json!({
///     "axialLoad": 1500, "momentX": 50, "momentY": 30,
///     "columnWidth": 400, "columnDepth": 400, "columnHeight": 3.5
/// });
/// let result = design(ElementKind::Column, &body, MaterialCatalog::standard()).unwrap();
/// assert!(result["numberOfBars"].as_u64().unwrap() >= 8);
/// ```
pub fn design(kind: ElementKind, body: &Value, catalog: &MaterialCatalog) -> CalcResult<Value> {
    let value = match kind {
        ElementKind::Column => {
            let input = ColumnInput::from_json(body)?;
            serde_json::to_value(column::calculate(&input, catalog)?)?
        }
        ElementKind::RetainingWall => {
            let input = RetainingWallInput::from_json(body)?;
            serde_json::to_value(retaining_wall::calculate(&input, catalog)?)?
        }
        ElementKind::Beam => {
            let input = BeamInput::from_json(body)?;
            serde_json::to_value(beam::calculate(&input, catalog)?)?
        }
        ElementKind::Slab => {
            let input = SlabInput::from_json(body)?;
            serde_json::to_value(slab::calculate(&input, catalog)?)?
        }
        ElementKind::Foundation => {
            let input = FoundationInput::from_json(body)?;
            serde_json::to_value(foundation::calculate(&input, catalog)?)?
        }
        ElementKind::Grading => {
            let input = GradingInput::from_json(body)?;
            serde_json::to_value(grading::calculate(&input)?)?
        }
    };
    Ok(value)
}

/// Read the concrete and steel grade labels shared by every RC element.
pub(crate) fn read_grades(fields: &mut Fields<'_>) -> (String, String) {
    let concrete = fields.text("concreteGrade", DEFAULT_CONCRETE_GRADE.code());
    let steel = fields.text("steelGrade", DEFAULT_STEEL_GRADE.code());
    (concrete, steel)
}

/// Re-run the JSON validator over a programmatically built input.
///
/// Inputs serialize to the request field names, so the same rules apply to
/// structs built in code as to request bodies.
pub(crate) fn revalidate<T: Serialize>(
    input: &T,
    parse: impl FnOnce(&Value) -> CalcResult<T>,
) -> CalcResult<()> {
    let body = serde_json::to_value(input)?;
    parse(&body).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_slug(kind.slug()).unwrap(), kind);
        }
        assert_eq!(
            ElementKind::from_slug("retaining_wall").unwrap(),
            ElementKind::RetainingWall
        );
    }

    #[test]
    fn test_unknown_slug() {
        let err = ElementKind::from_slug("bridge").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_ELEMENT");
    }

    #[test]
    fn test_serde_slug_matches() {
        let json = serde_json::to_string(&ElementKind::RetainingWall).unwrap();
        assert_eq!(json, "\"retaining-wall\"");
    }

    #[test]
    fn test_design_reports_validation_errors() {
        let body = json!({ "columnWidth": 400 });
        let err = design(ElementKind::Column, &body, MaterialCatalog::standard()).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("axialLoad"));
    }

    #[test]
    fn test_design_dispatches_every_element() {
        let catalog = MaterialCatalog::standard();
        let bodies = [
            (ElementKind::Column, json!({
                "axialLoad": 800, "columnWidth": 300, "columnDepth": 300, "columnHeight": 3.0
            })),
            (ElementKind::RetainingWall, json!({
                "wallHeight": 3.0, "stemThicknessTop": 250, "stemThicknessBottom": 300,
                "baseWidth": 2000, "baseThickness": 350, "toeWidth": 600,
                "soilUnitWeight": 18, "soilFrictionAngle": 30, "allowableBearingPressure": 150
            })),
            (ElementKind::Beam, json!({
                "span": 5.0, "beamWidth": 300, "beamDepth": 500, "deadLoad": 15, "liveLoad": 10
            })),
            (ElementKind::Slab, json!({
                "shortSpan": 4.0, "slabThickness": 180, "deadLoad": 1.5, "liveLoad": 2.0
            })),
            (ElementKind::Foundation, json!({
                "axialLoad": 900, "columnWidth": 400, "columnDepth": 400,
                "allowableBearingPressure": 200
            })),
            (ElementKind::Grading, json!({
                "gridSpacing": 10,
                "existingElevations": [[100.5, 101.0], [99.5, 100.0]],
                "targetElevation": 100.0
            })),
        ];
        for (kind, body) in bodies {
            let out = design(kind, &body, catalog);
            assert!(out.is_ok(), "{} failed: {:?}", kind, out.err());
            assert!(out.unwrap().get("warnings").is_some());
        }
    }
}
