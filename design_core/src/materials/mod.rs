//! # Materials Database
//!
//! Maps concrete and steel grade labels to design strengths.
//!
//! ## Fallback Policy
//!
//! A grade label that is not in the table resolves to the default grade
//! (C30 concrete, 420 steel) instead of failing. Every module goes through
//! [`MaterialCatalog::resolve`], so the policy is identical everywhere, and the
//! substitution is reported back as a note that ends up in the result's
//! `warnings`.
//!
//! ## Example
//!
//! ```rust
//! use design_core::materials::MaterialCatalog;
//!
//! let catalog = MaterialCatalog::standard();
//! let resolved = catalog.resolve("C30", "420");
//! assert!(resolved.fallbacks.is_empty());
//! assert!((resolved.properties.fcd_mpa - 20.0).abs() < 1e-9);
//! ```

pub mod concrete;
pub mod rebar;

pub use concrete::{ConcreteGrade, ConcreteProperties};
pub use rebar::{bar_area_mm2, SteelGrade, COLUMN_BAR_DIAMETERS, STANDARD_BAR_DIAMETERS};

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::design_code::{ALPHA_CC, GAMMA_C, GAMMA_S, STEEL_ELASTIC_MODULUS_MPA};

/// Version tag of the grade tables, reported with every result
pub const MATERIAL_TABLE_VERSION: &str = "2024.1";

/// Default concrete grade used when a label is not recognized
pub const DEFAULT_CONCRETE_GRADE: ConcreteGrade = ConcreteGrade::C30;

/// Default steel grade used when a label is not recognized
pub const DEFAULT_STEEL_GRADE: SteelGrade = SteelGrade::S420;

/// Design strengths for one concrete/steel pairing.
///
/// All stresses in MPa (N/mm²).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialProperties {
    /// Concrete grade actually used
    pub concrete_grade: ConcreteGrade,
    /// Steel grade actually used
    pub steel_grade: SteelGrade,
    /// Characteristic compressive strength
    pub fck_mpa: f64,
    /// Design compressive strength fcd = fck/γc
    pub fcd_mpa: f64,
    /// Design tensile strength fctd = fctk/γc
    pub fctd_mpa: f64,
    /// Concrete modulus of elasticity
    pub ec_mpa: f64,
    /// Characteristic yield strength
    pub fy_mpa: f64,
    /// Design yield strength fyd = fy/γs
    pub fyd_mpa: f64,
    /// Steel modulus of elasticity
    pub es_mpa: f64,
}

impl MaterialProperties {
    fn derive(concrete: &ConcreteProperties, steel: SteelGrade) -> Self {
        MaterialProperties {
            concrete_grade: concrete.grade,
            steel_grade: steel,
            fck_mpa: concrete.fck_mpa,
            fcd_mpa: concrete.fck_mpa / GAMMA_C,
            fctd_mpa: concrete.fctk_mpa / GAMMA_C,
            ec_mpa: concrete.ec_mpa,
            fy_mpa: steel.fy_mpa(),
            fyd_mpa: steel.fy_mpa() / GAMMA_S,
            es_mpa: STEEL_ELASTIC_MODULUS_MPA,
        }
    }

    /// Stress-block design strength αcc·fcd
    pub fn fcd_block(&self) -> f64 {
        ALPHA_CC * self.fcd_mpa
    }

    /// Design yield strain εyd = fyd/Es
    pub fn eps_yd(&self) -> f64 {
        self.fyd_mpa / self.es_mpa
    }
}

/// Outcome of grade resolution: properties plus any substitution notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterials {
    pub properties: MaterialProperties,
    /// One entry per label that fell back to its default
    pub fallbacks: Vec<String>,
}

/// The grade tables, built once and passed by reference into each module.
///
/// The default grades are always present, so the fallback policy can never
/// fail to resolve.
#[derive(Debug)]
pub struct MaterialCatalog {
    version: &'static str,
    concrete: BTreeMap<ConcreteGrade, ConcreteProperties>,
    steel: Vec<SteelGrade>,
}

static STANDARD_CATALOG: Lazy<MaterialCatalog> = Lazy::new(|| {
    MaterialCatalog::with_grades(MATERIAL_TABLE_VERSION, &ConcreteGrade::ALL, &SteelGrade::ALL)
});

impl MaterialCatalog {
    /// The process-wide catalog holding every tabulated grade
    pub fn standard() -> &'static MaterialCatalog {
        &STANDARD_CATALOG
    }

    /// Build a catalog restricted to the given grades (plus the defaults).
    pub fn with_grades(
        version: &'static str,
        concrete: &[ConcreteGrade],
        steel: &[SteelGrade],
    ) -> Self {
        let concrete = concrete
            .iter()
            .copied()
            .chain([DEFAULT_CONCRETE_GRADE])
            .map(|g| (g, ConcreteProperties::for_grade(g)))
            .collect();
        let mut steel: Vec<SteelGrade> = steel.iter().copied().chain([DEFAULT_STEEL_GRADE]).collect();
        steel.sort_by(|a, b| a.fy_mpa().total_cmp(&b.fy_mpa()));
        steel.dedup();
        MaterialCatalog {
            version,
            concrete,
            steel,
        }
    }

    /// Table version string
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Tabulated properties of a concrete class, if this catalog carries it
    pub fn concrete(&self, grade: ConcreteGrade) -> Option<&ConcreteProperties> {
        self.concrete.get(&grade)
    }

    /// True when this catalog carries the steel grade
    pub fn has_steel(&self, grade: SteelGrade) -> bool {
        self.steel.contains(&grade)
    }

    /// Resolve both labels, applying the default-grade fallback policy.
    pub fn resolve(&self, concrete_label: &str, steel_label: &str) -> ResolvedMaterials {
        let mut fallbacks = Vec::new();
        let concrete = match resolve_concrete_grade(concrete_label).and_then(|g| self.concrete(g)) {
            Some(props) => *props,
            None => {
                fallbacks.push(concrete_fallback_note(concrete_label));
                self.concrete(DEFAULT_CONCRETE_GRADE)
                    .copied()
                    .unwrap_or_else(|| ConcreteProperties::for_grade(DEFAULT_CONCRETE_GRADE))
            }
        };
        let steel = match resolve_steel_grade(steel_label).filter(|g| self.has_steel(*g)) {
            Some(grade) => grade,
            None => {
                fallbacks.push(steel_fallback_note(steel_label));
                DEFAULT_STEEL_GRADE
            }
        };
        for note in &fallbacks {
            tracing::warn!(%note, "material grade fallback");
        }
        ResolvedMaterials {
            properties: MaterialProperties::derive(&concrete, steel),
            fallbacks,
        }
    }
}

/// Look up a concrete label; `None` triggers the fallback policy.
pub fn resolve_concrete_grade(label: &str) -> Option<ConcreteGrade> {
    ConcreteGrade::from_str_flexible(label)
}

/// Look up a steel label; `None` triggers the fallback policy.
pub fn resolve_steel_grade(label: &str) -> Option<SteelGrade> {
    SteelGrade::from_str_flexible(label)
}

fn concrete_fallback_note(label: &str) -> String {
    format!(
        "Concrete grade '{}' not recognized; using {}",
        label, DEFAULT_CONCRETE_GRADE
    )
}

fn steel_fallback_note(label: &str) -> String {
    format!(
        "Steel grade '{}' not recognized; using {}",
        label,
        DEFAULT_STEEL_GRADE.code()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_strengths() {
        let m = MaterialCatalog::standard().resolve("C30", "420").properties;
        assert!((m.fcd_mpa - 20.0).abs() < 1e-9);
        assert!((m.fcd_block() - 17.0).abs() < 1e-9);
        // fyd = 420 / 1.15 = 365.2
        assert!((m.fyd_mpa - 365.217).abs() < 0.001);
        // fctd = 0.35√30 / 1.5 = 1.278
        assert!((m.fctd_mpa - 1.278).abs() < 0.001);
    }

    #[test]
    fn test_unknown_grades_fall_back_with_notes() {
        let r = MaterialCatalog::standard().resolve("C99", "S999");
        assert_eq!(r.properties.concrete_grade, ConcreteGrade::C30);
        assert_eq!(r.properties.steel_grade, SteelGrade::S420);
        assert_eq!(r.fallbacks.len(), 2);
        assert!(r.fallbacks[0].contains("C99"));
        assert!(r.fallbacks[1].contains("S999"));
    }

    #[test]
    fn test_known_grades_have_no_notes() {
        let r = MaterialCatalog::standard().resolve("C40", "S500");
        assert!(r.fallbacks.is_empty());
        assert_eq!(r.properties.fy_mpa, 500.0);
    }

    #[test]
    fn test_yield_strain() {
        let m = MaterialCatalog::standard().resolve("C25", "420").properties;
        assert!((m.eps_yd() - 365.217 / 200_000.0).abs() < 1e-8);
    }

    #[test]
    fn test_serialization_camel_case() {
        let m = MaterialCatalog::standard().resolve("C30", "420").properties;
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"fcdMpa\""));
        assert!(json.contains("\"concreteGrade\":\"C30\""));
        assert!(json.contains("\"steelGrade\":\"420\""));
    }

    #[test]
    fn test_restricted_catalog_falls_back_for_missing_grades() {
        let catalog = MaterialCatalog::with_grades("site-2", &[ConcreteGrade::C25], &[]);
        assert!(catalog.concrete(ConcreteGrade::C25).is_some());
        assert!(catalog.concrete(ConcreteGrade::C40).is_none());
        assert!(catalog.has_steel(SteelGrade::S420));
        assert!(!catalog.has_steel(SteelGrade::S500));

        let r = catalog.resolve("C25", "420");
        assert!(r.fallbacks.is_empty());
        assert_eq!(r.properties.fck_mpa, 25.0);

        // Known labels that this catalog does not carry use the defaults
        let r = catalog.resolve("C40", "500");
        assert_eq!(r.properties.concrete_grade, ConcreteGrade::C30);
        assert_eq!(r.properties.steel_grade, SteelGrade::S420);
        assert_eq!(r.fallbacks.len(), 2);
        assert_eq!(catalog.version(), "site-2");
    }

    #[test]
    fn test_catalog_version() {
        assert_eq!(MaterialCatalog::standard().version(), MATERIAL_TABLE_VERSION);
    }
}
