//! Curated API surface for downstream tools (CLI, benches, property tests).
//!
//! Important
//! - Groups the `_with(cfg)` variants next to their default-config forms so
//!   callers that thread an `OracleCfg` find everything in one place.
//! - Breaking changes follow the crate version.

// Values and oracles
pub use crate::oracle::{Expr, Interval, Oracle, OracleCfg};
pub use crate::value::ExactValue;
// Primitives and realization
pub use crate::primitives::{
    realize, Assignment, Carrier, Circle, Constraint, CoordinateSystem, Line, Object, Point, Ray,
    Segment,
};
// Intersections
pub use crate::intersect::{
    circle_circle, circle_circle_with, intersect, intersect_with, line_circle, line_circle_with,
    line_line, line_line_with, ray_int, ray_int_with, segment_int, segment_int_with, Intersection,
};
// Predicates
pub use crate::predicates::{
    collinear, collinear_with, concurrent, concurrent_with, concyclic, concyclic_with, on_circle,
    on_circle_with, on_line, on_line_with, parallel, parallel_with, perpendicular,
    perpendicular_with,
};
// Sampling
pub use crate::sample::{RationalBounds, ReplayToken, Sampler};
// Errors
pub use crate::error::{ErrorKind, GeomError, Result};
