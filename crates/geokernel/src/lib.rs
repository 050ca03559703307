//! Exact-arithmetic plane geometry kernel.
//!
//! Values are either exact rationals or lazily refined oracles (square roots
//! and expressions over them). Points, lines and circles are immutable value
//! objects; intersections and incidence predicates are decided exactly, or
//! fail with `GeomError::IndeterminatePredicate` when an oracle sign cannot be
//! settled within the refinement bound.
//!
//! Module map
//! - `value`: `ExactValue` and its arithmetic.
//! - `oracle`: interval refinement and sign decisions for irrational values.
//! - `primitives`: `Point`, `Line`, `Circle`, `Segment`, `Ray`, realization.
//! - `intersect`: line/circle intersection routines and the `Object` dispatch.
//! - `predicates`: collinear, concyclic, concurrent, incidence, parallel, perpendicular.
//! - `sample`: seeded random rational primitives for tests and benches.

pub mod api;
pub mod error;
pub mod intersect;
pub mod oracle;
pub mod predicates;
pub mod primitives;
pub mod sample;
pub mod value;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{ErrorKind, GeomError, Result};
pub use intersect::{intersect, Intersection};
pub use oracle::{Oracle, OracleCfg};
pub use primitives::{
    realize, Assignment, Carrier, Circle, CoordinateSystem, Line, Object, Point, Ray, Segment,
};
pub use value::ExactValue;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::intersect::{
        circle_circle, intersect, line_circle, line_line, ray_int, segment_int, Intersection,
    };
    pub use crate::predicates::{
        collinear, concurrent, concyclic, on_circle, on_line, parallel, perpendicular,
    };
    pub use crate::primitives::{
        realize, Assignment, Carrier, Circle, CoordinateSystem, Line, Object, Point, Ray, Segment,
    };
    pub use crate::{ExactValue, GeomError, Oracle, OracleCfg, Result};
}
