//! Concrete Strength Classes (TS 500 Table 3.1)
//!
//! Characteristic cylinder strengths and derived mechanical properties for
//! normal-weight structural concrete. The derived values are tabulated once by
//! [`MaterialCatalog`](super::MaterialCatalog).

use serde::{Deserialize, Serialize};

/// Concrete strength classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConcreteGrade {
    C16,
    C18,
    C20,
    C25,
    C30,
    C35,
    C40,
    C45,
    C50,
}

impl ConcreteGrade {
    /// All concrete classes, weakest first
    pub const ALL: [ConcreteGrade; 9] = [
        ConcreteGrade::C16,
        ConcreteGrade::C18,
        ConcreteGrade::C20,
        ConcreteGrade::C25,
        ConcreteGrade::C30,
        ConcreteGrade::C35,
        ConcreteGrade::C40,
        ConcreteGrade::C45,
        ConcreteGrade::C50,
    ];

    /// Characteristic cylinder strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::C16 => 16.0,
            ConcreteGrade::C18 => 18.0,
            ConcreteGrade::C20 => 20.0,
            ConcreteGrade::C25 => 25.0,
            ConcreteGrade::C30 => 30.0,
            ConcreteGrade::C35 => 35.0,
            ConcreteGrade::C40 => 40.0,
            ConcreteGrade::C45 => 45.0,
            ConcreteGrade::C50 => 50.0,
        }
    }

    /// Label as used in requests (e.g., "C30")
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteGrade::C16 => "C16",
            ConcreteGrade::C18 => "C18",
            ConcreteGrade::C20 => "C20",
            ConcreteGrade::C25 => "C25",
            ConcreteGrade::C30 => "C30",
            ConcreteGrade::C35 => "C35",
            ConcreteGrade::C40 => "C40",
            ConcreteGrade::C45 => "C45",
            ConcreteGrade::C50 => "C50",
        }
    }

    /// Parse from common label spellings: "C30", "c30", "C30/37", "30".
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let cleaned = s.trim().to_uppercase().replace(' ', "");
        let cylinder = cleaned.split('/').next().unwrap_or("");
        let digits = cylinder.strip_prefix('C').unwrap_or(cylinder);
        Self::ALL.into_iter().find(|g| &g.code()[1..] == digits)
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Characteristic properties of one concrete class (MPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteProperties {
    pub grade: ConcreteGrade,
    /// Characteristic compressive strength
    pub fck_mpa: f64,
    /// Characteristic tensile strength fctk = 0.35·√fck
    pub fctk_mpa: f64,
    /// Modulus of elasticity Ec = 3250·√fck + 14000
    pub ec_mpa: f64,
}

impl ConcreteProperties {
    /// Derive the characteristic properties of a class from its fck
    pub fn for_grade(grade: ConcreteGrade) -> Self {
        let fck = grade.fck_mpa();
        ConcreteProperties {
            grade,
            fck_mpa: fck,
            fctk_mpa: 0.35 * fck.sqrt(),
            ec_mpa: 3250.0 * fck.sqrt() + 14000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(ConcreteGrade::from_str_flexible("C30"), Some(ConcreteGrade::C30));
        assert_eq!(ConcreteGrade::from_str_flexible(" c25 "), Some(ConcreteGrade::C25));
        assert_eq!(ConcreteGrade::from_str_flexible("C30/37"), Some(ConcreteGrade::C30));
        assert_eq!(ConcreteGrade::from_str_flexible("40"), Some(ConcreteGrade::C40));
        assert_eq!(ConcreteGrade::from_str_flexible("C99"), None);
        assert_eq!(ConcreteGrade::from_str_flexible(""), None);
    }

    #[test]
    fn test_derived_properties() {
        let c30 = ConcreteProperties::for_grade(ConcreteGrade::C30);
        assert_eq!(c30.fck_mpa, 30.0);
        // fctk = 0.35 × √30 = 1.917
        assert!((c30.fctk_mpa - 1.917).abs() < 0.001);
        // Ec = 3250 × √30 + 14000 = 31 801
        assert!((c30.ec_mpa - 31_801.0).abs() < 1.0);
    }

    #[test]
    fn test_properties_rise_with_class() {
        let props: Vec<_> = ConcreteGrade::ALL.into_iter().map(ConcreteProperties::for_grade).collect();
        assert!(props.windows(2).all(|w| w[0].fck_mpa < w[1].fck_mpa && w[0].ec_mpa < w[1].ec_mpa));
        assert!(props.iter().zip(ConcreteGrade::ALL).all(|(p, g)| p.grade == g));
    }
}
