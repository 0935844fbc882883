//! # design_core - Reinforced-Concrete Design Engine
//!
//! `design_core` is the computational heart of Armature. It designs
//! reinforced-concrete elements from JSON-shaped requests and returns
//! JSON-serializable results, so the same engine serves the HTTP server,
//! the CLI and direct library callers.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All inputs, results and errors implement Serialize/Deserialize
//! - **Aggregated validation**: Every violation in a request is reported at once
//! - **Inadequate is not an error**: A failing design is a normal result with warnings
//!
//! ## Quick Start
//!
//! ```rust
//! use design_core::{design, ElementKind, MaterialCatalog};
//! use serde_json::json;
//!
//! let body = json!({
//!     "axialLoad": 1500, "momentX": 50, "momentY": 30,
//!     "columnWidth": 400, "columnDepth": 400, "columnHeight": 3.5,
//!     "concreteGrade": "C30", "steelGrade": "420"
//! });
//!
//! let result = design(ElementKind::Column, &body, MaterialCatalog::standard()).unwrap();
//! println!("{}", result["barArrangement"]);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Element design modules and the request dispatcher
//! - [`validation`] - Request field reader with aggregated violations
//! - [`materials`] - Concrete and steel grade tables
//! - [`reinforcement`] - Bar and spacing selection
//! - [`loads`] - Load cases and ULS combinations
//! - [`equations`] - Pure engineering formulas
//! - [`design_code`] - Code constants and support conditions
//! - [`report`] - Result status types, warnings and finiteness guards
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod design_code;
pub mod equations;
pub mod errors;
pub mod loads;
pub mod materials;
pub mod reinforcement;
pub mod report;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{design, ElementKind};
pub use errors::{CalcError, CalcResult};
pub use materials::MaterialCatalog;
