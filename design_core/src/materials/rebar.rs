//! Reinforcing Steel Grades and Bar Sizes
//!
//! Yield strengths for hot-rolled ribbed reinforcement and the standard bar
//! diameter series used by the bar selector.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Reinforcing steel grades (characteristic yield strength in MPa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    /// Plain bar, fy = 220 MPa
    #[serde(rename = "220")]
    S220,
    /// Ribbed bar, fy = 420 MPa
    #[serde(rename = "420")]
    S420,
    /// Ribbed bar, fy = 500 MPa
    #[serde(rename = "500")]
    S500,
}

impl SteelGrade {
    /// All steel grades
    pub const ALL: [SteelGrade; 3] = [SteelGrade::S220, SteelGrade::S420, SteelGrade::S500];

    /// Characteristic yield strength fy (MPa)
    pub fn fy_mpa(&self) -> f64 {
        match self {
            SteelGrade::S220 => 220.0,
            SteelGrade::S420 => 420.0,
            SteelGrade::S500 => 500.0,
        }
    }

    /// Label as used in requests (e.g., "420")
    pub fn code(&self) -> &'static str {
        match self {
            SteelGrade::S220 => "220",
            SteelGrade::S420 => "420",
            SteelGrade::S500 => "500",
        }
    }

    /// Parse from common label spellings: "420", "S420", "B420C", "s500".
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let cleaned = s.trim().to_uppercase().replace(' ', "");
        let digits: String = cleaned
            .trim_start_matches(['S', 'B'])
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        Self::ALL.into_iter().find(|g| g.code() == digits)
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.code())
    }
}

/// Standard bar diameters (mm), ascending
pub const STANDARD_BAR_DIAMETERS: [u32; 5] = [12, 16, 20, 25, 32];

/// Column longitudinal bar diameters (mm), ascending
pub const COLUMN_BAR_DIAMETERS: [u32; 4] = [16, 20, 25, 32];

/// Cross-sectional area of one bar (mm²)
#[inline]
pub fn bar_area_mm2(diameter_mm: u32) -> f64 {
    let d = f64::from(diameter_mm);
    PI * d * d / 4.0
}
