//! # Input Validation
//!
//! Converts a raw JSON request body into a typed input record, or into a
//! list of every violation found. Fields are declared once as [`FieldSpec`]
//! constants next to the input struct that owns them; the [`Fields`] reader
//! walks them without short-circuiting so one response reports every problem.
//!
//! ## Example
//!
//! ```rust
//! use design_core::validation::{FieldSpec, Fields};
//! use serde_json::json;
//!
//! const SPAN: FieldSpec = FieldSpec::required("span", "m", 0.5, 30.0);
//! const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 20.0, 100.0, 40.0);
//!
//! let body = json!({ "span": "6.0" });
//! let mut fields = Fields::from_value(&body).unwrap();
//! let span = fields.number(&SPAN);
//! let cover = fields.number(&COVER);
//! let (span, cover) = fields.finish(|| (span, cover)).unwrap();
//! assert_eq!(span, 6.0);
//! assert_eq!(cover, 40.0);
//! ```

use serde_json::{Map, Value};

use crate::errors::{CalcError, CalcResult};

/// Largest grid dimension accepted for grading surveys
pub const MAX_GRID_DIMENSION: usize = 500;

/// Declaration of one numeric request field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// JSON field name (camelCase, as sent by clients)
    pub name: &'static str,
    /// Unit label used in error messages
    pub unit: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound (`f64::INFINITY` for none)
    pub max: f64,
    /// Value used when the field is absent; `None` means required
    pub default: Option<f64>,
}

impl FieldSpec {
    /// A field that must be present
    pub const fn required(name: &'static str, unit: &'static str, min: f64, max: f64) -> Self {
        FieldSpec {
            name,
            unit,
            min,
            max,
            default: None,
        }
    }

    /// A field that falls back to `default` when absent
    pub const fn optional(
        name: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        FieldSpec {
            name,
            unit,
            min,
            max,
            default: Some(default),
        }
    }

    fn range_reason(&self) -> String {
        let unit = if self.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", self.unit)
        };
        if self.max.is_infinite() {
            format!("must be at least {}{}", self.min, unit)
        } else {
            format!("must be between {} and {}{}", self.min, self.max, unit)
        }
    }
}

/// Accumulating reader over a JSON object body.
///
/// Every accessor records its own violation and returns a placeholder so the
/// caller can keep reading; [`Fields::finish`] only builds the typed record
/// when no violation was recorded.
#[derive(Debug)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> Fields<'a> {
    /// Start reading a request body. Anything but a JSON object is rejected.
    pub fn from_value(body: &'a Value) -> CalcResult<Self> {
        match body {
            Value::Object(map) => Ok(Fields {
                map,
                errors: Vec::new(),
            }),
            _ => Err(CalcError::validation(vec![
                "request body must be a JSON object".to_string(),
            ])),
        }
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.map.get(name) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn reject(&mut self, err: CalcError) {
        self.errors.push(err.to_string());
    }

    /// Read a numeric field, applying presence, coercion and range checks.
    pub fn number(&mut self, decl: &FieldSpec) -> f64 {
        match self.optional_number(decl) {
            Some(v) => v,
            None => match decl.default {
                Some(d) => d,
                None => {
                    self.reject(CalcError::missing_field(decl.name));
                    0.0
                }
            },
        }
    }

    /// Read a numeric field with no default. Absence is not an error.
    pub fn optional_number(&mut self, decl: &FieldSpec) -> Option<f64> {
        let raw = self.present(decl.name)?;
        let value = match coerce_number(raw) {
            Some(v) => v,
            None => {
                self.reject(CalcError::invalid_input(decl.name, raw.to_string(), "must be a finite number"));
                return decl.default.or(Some(0.0));
            }
        };
        if value < decl.min || value > decl.max {
            self.reject(CalcError::invalid_input(decl.name, value.to_string(), decl.range_reason()));
        }
        Some(value)
    }

    /// Read a text field (grade labels, type flags). Numbers are accepted as text.
    pub fn text(&mut self, name: &str, default: &str) -> String {
        match self.present(name) {
            None => default.to_string(),
            Some(Value::String(s)) if s.trim().is_empty() => default.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                self.reject(CalcError::invalid_input(name, other.to_string(), "must be a string"));
                default.to_string()
            }
        }
    }

    /// Read a boolean flag. Accepts `true`/`false`, `"true"`/`"false"` and `1`/`0`.
    pub fn flag(&mut self, name: &str, default: bool) -> bool {
        match self.present(name) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => {
                    self.reject(CalcError::invalid_input(name, s.as_str(), "must be true or false"));
                    default
                }
            },
            Some(Value::Number(n)) if n.as_f64() == Some(1.0) => true,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => false,
            Some(other) => {
                self.reject(CalcError::invalid_input(name, other.to_string(), "must be true or false"));
                default
            }
        }
    }

    /// Read a rectangular 2-D grid of finite numbers (rows × columns, each ≥ 2).
    pub fn grid(&mut self, name: &str, required: bool) -> Option<Vec<Vec<f64>>> {
        let Some(raw) = self.present(name) else {
            if required {
                self.reject(CalcError::missing_field(name));
            }
            return None;
        };
        match parse_grid(raw) {
            Ok(grid) => Some(grid),
            Err(reason) => {
                self.reject(CalcError::invalid_input(name, "[grid]", reason));
                None
            }
        }
    }

    /// Record a cross-field violation when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, reason: impl Into<String>) {
        if !ok {
            self.reject(CalcError::invalid_input(field, "-", reason));
        }
    }

    /// True when no violation has been recorded so far.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Build the typed record, or return every recorded violation.
    pub fn finish<T>(self, build: impl FnOnce() -> T) -> CalcResult<T> {
        if self.errors.is_empty() {
            Ok(build())
        } else {
            Err(CalcError::validation(self.errors))
        }
    }
}

fn coerce_number(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn parse_grid(raw: &Value) -> Result<Vec<Vec<f64>>, String> {
    let rows = raw.as_array().ok_or("must be an array of rows")?;
    if rows.len() < 2 || rows.len() > MAX_GRID_DIMENSION {
        return Err(format!("must have between 2 and {} rows", MAX_GRID_DIMENSION));
    }
    let mut grid = Vec::with_capacity(rows.len());
    let mut width = None;
    for (i, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| format!("row {} must be an array", i))?;
        if cells.len() < 2 || cells.len() > MAX_GRID_DIMENSION {
            return Err(format!("row {} must have between 2 and {} points", i, MAX_GRID_DIMENSION));
        }
        match width {
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => {
                return Err(format!("row {} has {} points, expected {}", i, cells.len(), w));
            }
            Some(_) => {}
        }
        let parsed = cells
            .iter()
            .enumerate()
            .map(|(j, c)| coerce_number(c).ok_or_else(|| format!("point [{}][{}] is not a finite number", i, j)))
            .collect::<Result<Vec<f64>, String>>()?;
        grid.push(parsed);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOAD: FieldSpec = FieldSpec::required("axialLoad", "kN", 0.0, f64::INFINITY);
    const WIDTH: FieldSpec = FieldSpec::required("columnWidth", "mm", 150.0, 2000.0);
    const COVER: FieldSpec = FieldSpec::optional("coverThickness", "mm", 20.0, 100.0, 40.0);

    #[test]
    fn test_reads_numbers_and_defaults() {
        let body = json!({ "axialLoad": 1500, "columnWidth": "400" });
        let mut f = Fields::from_value(&body).unwrap();
        let n = f.number(&LOAD);
        let b = f.number(&WIDTH);
        let c = f.number(&COVER);
        let out = f.finish(|| (n, b, c)).unwrap();
        assert_eq!(out, (1500.0, 400.0, 40.0));
    }

    #[test]
    fn test_collects_every_violation() {
        let body = json!({ "columnWidth": 90, "coverThickness": "abc" });
        let mut f = Fields::from_value(&body).unwrap();
        f.number(&LOAD);
        f.number(&WIDTH);
        f.number(&COVER);
        let err = f.finish(|| ()).unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("axialLoad"));
        assert!(messages[1].contains("columnWidth"));
        assert!(messages[2].contains("coverThickness"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let body = json!({ "axialLoad": 10, "columnWidth": 300, "coverThickness": null });
        let mut f = Fields::from_value(&body).unwrap();
        f.number(&LOAD);
        f.number(&WIDTH);
        assert_eq!(f.number(&COVER), 40.0);
        assert!(f.is_clean());
    }

    #[test]
    fn test_rejects_non_object_body() {
        let body = json!([1, 2, 3]);
        assert!(Fields::from_value(&body).is_err());
    }

    #[test]
    fn test_rejects_booleans_in_numeric_slot() {
        let body = json!({ "axialLoad": true });
        let mut f = Fields::from_value(&body).unwrap();
        f.number(&LOAD);
        assert!(!f.is_clean());
    }

    #[test]
    fn test_text_accepts_numbers() {
        let body = json!({ "steelGrade": 420, "concreteGrade": "  " });
        let mut f = Fields::from_value(&body).unwrap();
        assert_eq!(f.text("steelGrade", "420"), "420");
        assert_eq!(f.text("concreteGrade", "C30"), "C30");
    }

    #[test]
    fn test_flag_parsing() {
        let body = json!({ "a": "yes", "b": 0, "c": "maybe" });
        let mut f = Fields::from_value(&body).unwrap();
        assert!(f.flag("a", false));
        assert!(!f.flag("b", true));
        assert!(f.flag("c", true));
        assert!(!f.is_clean());
    }

    #[test]
    fn test_grid_shape_checks() {
        let body = json!({
            "ok": [[1, 2], [3, 4]],
            "ragged": [[1, 2], [3]],
            "tiny": [[1, 2]],
        });
        let mut f = Fields::from_value(&body).unwrap();
        assert_eq!(f.grid("ok", true).unwrap()[1][0], 3.0);
        assert!(f.grid("ragged", true).is_none());
        assert!(f.grid("tiny", true).is_none());
        assert!(f.grid("missing", false).is_none());
        assert_eq!(f.finish(|| ()).unwrap_err().messages().len(), 2);
    }

    #[test]
    fn test_cross_field_check() {
        let body = json!({});
        let mut f = Fields::from_value(&body).unwrap();
        f.check(false, "toeWidth", "toe and stem must fit inside the base");
        let err = f.finish(|| ()).unwrap_err();
        assert!(err.to_string().contains("toeWidth"));
    }
}
