//! # Result Assembly
//!
//! Shared building blocks for design results: adequacy/status flags,
//! stability checks, ordered warnings, and the finiteness guard that keeps
//! NaN and ∞ out of every response.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Adequacy verdict for member design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignStatus {
    #[serde(rename = "ADEQUATE")]
    Adequate,
    #[serde(rename = "INADEQUATE")]
    Inadequate,
}

impl DesignStatus {
    pub fn from_adequate(adequate: bool) -> Self {
        if adequate {
            DesignStatus::Adequate
        } else {
            DesignStatus::Inadequate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignStatus::Adequate => "ADEQUATE",
            DesignStatus::Inadequate => "INADEQUATE",
        }
    }
}

/// Overall verdict for stability-governed designs (retaining walls)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "REVIEW REQUIRED")]
    ReviewRequired,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::ReviewRequired => "REVIEW REQUIRED",
        }
    }
}

/// Pass/fail marker on an individual check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOT OK")]
    NotOk,
}

impl CheckStatus {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            CheckStatus::Ok
        } else {
            CheckStatus::NotOk
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

/// One failure mode compared against its code minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityCheck {
    /// Failure mode name ("overturning", "sliding", ...)
    pub mode: String,
    /// Computed factor of safety
    pub factor_of_safety: f64,
    /// Code-mandated minimum
    pub required: f64,
    pub status: CheckStatus,
}

impl StabilityCheck {
    pub fn new(mode: impl Into<String>, factor_of_safety: f64, required: f64) -> Self {
        StabilityCheck {
            mode: mode.into(),
            factor_of_safety,
            required,
            status: CheckStatus::from_ok(factor_of_safety >= required),
        }
    }

    pub fn passes(&self) -> bool {
        self.status.is_ok()
    }
}

/// Ordered, de-duplicated warning list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Warnings(Vec::new())
    }

    /// Append a warning unless the identical text is already present
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.0.contains(&message) {
            self.0.push(message);
        }
    }

    /// Append a warning when `condition` holds
    pub fn push_if(&mut self, condition: bool, message: impl FnOnce() -> String) {
        if condition {
            self.push(message());
        }
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        for m in messages {
            self.push(m);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Reject NaN/∞ for a named quantity.
pub fn ensure_finite(quantity: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::non_finite(quantity))
    }
}

/// Reject the first non-finite entry of a named list.
pub fn ensure_all_finite(values: &[(&str, f64)]) -> CalcResult<()> {
    for (name, v) in values {
        ensure_finite(name, *v)?;
    }
    Ok(())
}

/// Round for presentation; keeps JSON output stable and readable.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (value * p).round() / p
}
