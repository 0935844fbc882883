//! # Structural Engineering Equations
//!
//! Fundamental mechanics and reinforced-concrete relations used by the
//! design modules. Having equations in one place enables:
//! - Easy verification against code references (TS 500, EN 1992, EN 1997)
//! - Documentation of assumptions and sign conventions
//! - Consistent implementation across element types
//!
//! ## Modules
//!
//! - [`beam`] - Uniform-load actions, cantilever strips, two-way load split
//! - [`section`] - Rectangular section properties (A, I, i, d)
//! - [`flexure`] - Lever arm, steel area and moment capacity
//! - [`earth_pressure`] - Rankine coefficients and thrusts
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moments**: Returned as magnitudes; the caller knows the tension face
//! - **Earth pressure**: Positive acting toward the wall

pub mod beam;
pub mod earth_pressure;
pub mod flexure;
pub mod section;

pub use beam::{
    grashof_short_span_share,
    linear_pressure_at,
    trapezoid_cantilever_moment,
    trapezoid_resultant,
    uniform_load_moment,
    uniform_load_shear,
};

pub use section::{
    effective_depth,
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_radius_of_gyration,
};

pub use flexure::{
    lever_arm,
    moment_capacity,
    normalised_moment,
    required_steel_area,
    simplified_steel_area,
};

pub use earth_pressure::{
    rankine_active_level,
    rankine_active_sloped,
    rankine_passive,
    surcharge_thrust,
    triangular_thrust,
};
