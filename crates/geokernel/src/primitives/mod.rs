//! Primitive model: immutable points, lines, circles, segments and rays over `ExactValue`.
//!
//! Invariants
//! - `Line` holds `(a, b, c)` for `a·x + b·y + c = 0` with `(a, b) ≠ (0, 0)`;
//!   coefficients are not normalized, so compare lines by cross-multiplication.
//! - `Circle::radius_sq` is non-negative and rational whenever the center and
//!   the defining point are rational.
//! - A `Free` point has no coordinates until `realize` binds it.
//!
//! References
//! - Code cross-refs: `intersect::{line_line, line_circle}`, `predicates`, `realize`

mod realize;

pub use realize::{realize, Assignment, CoordinateSystem};

use std::cmp::Ordering;

use nalgebra::Vector2;
use serde::Serialize;

use crate::error::{GeomError, Result};
use crate::oracle::OracleCfg;
use crate::value::ExactValue;

/// Carrier a free point may be constrained to.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    Line(Line),
    Circle(Circle),
}

/// Constraint of a free point: its carrier and an optional parameter
/// pinning one position on it.
#[derive(Clone, Debug, Serialize)]
pub struct Constraint {
    pub carrier: Carrier,
    pub param: Option<ExactValue>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Point {
    Fixed { x: ExactValue, y: ExactValue },
    Free {
        name: String,
        constraint: Option<Box<Constraint>>,
    },
}

impl Point {
    pub fn new(x: impl Into<ExactValue>, y: impl Into<ExactValue>) -> Self {
        Point::Fixed {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Coordinate-free point (`PointFree`).
    pub fn free(name: impl Into<String>) -> Self {
        Point::Free {
            name: name.into(),
            constraint: None,
        }
    }

    /// Free point constrained to `carrier` (`PointOn`); `param` selects a position.
    pub fn on(name: impl Into<String>, carrier: Carrier, param: Option<ExactValue>) -> Self {
        Point::Free {
            name: name.into(),
            constraint: Some(Box::new(Constraint { carrier, param })),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Point::Fixed { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Point::Fixed { .. } => None,
            Point::Free { name, .. } => Some(name),
        }
    }

    /// `(x, y)` of a fixed point (`PointCoords`).
    pub fn coords(&self) -> Result<(&ExactValue, &ExactValue)> {
        match self {
            Point::Fixed { x, y } => Ok((x, y)),
            Point::Free { name, .. } => Err(GeomError::UnresolvedFreePoint(name.clone())),
        }
    }

    /// Float preview for plotting; `None` for free points.
    pub fn approx(&self) -> Option<Vector2<f64>> {
        let (x, y) = self.coords().ok()?;
        Some(Vector2::new(x.approx(), y.approx()))
    }

    /// Componentwise `self − other`.
    pub fn vector_to(&self, other: &Point) -> Result<(ExactValue, ExactValue)> {
        let (x1, y1) = self.coords()?;
        let (x2, y2) = other.coords()?;
        Ok((x2 - x1, y2 - y1))
    }

    pub fn coincides(&self, other: &Point) -> Result<bool> {
        self.coincides_with(other, &OracleCfg::default())
    }

    pub fn coincides_with(&self, other: &Point, cfg: &OracleCfg) -> Result<bool> {
        let (dx, dy) = self.vector_to(other)?;
        Ok(dx.is_zero_with(cfg)? && dy.is_zero_with(cfg)?)
    }

    pub(crate) fn translated(&self, dx: &ExactValue, dy: &ExactValue) -> Result<Point> {
        let (x, y) = self.coords()?;
        Ok(Point::new(x + dx, y + dy))
    }
}

/// `(q − p) × (r − p)`: twice the signed area of the triangle `pqr`.
pub(crate) fn cross(p: &Point, q: &Point, r: &Point) -> Result<ExactValue> {
    let (ux, uy) = p.vector_to(q)?;
    let (vx, vy) = p.vector_to(r)?;
    Ok(&ux * &vy - &uy * &vx)
}

pub(crate) fn dot(u: &(ExactValue, ExactValue), v: &(ExactValue, ExactValue)) -> ExactValue {
    &u.0 * &v.0 + &u.1 * &v.1
}

/// Line `a·x + b·y + c = 0`.
#[derive(Clone, Debug, Serialize)]
pub struct Line {
    a: ExactValue,
    b: ExactValue,
    c: ExactValue,
}

impl Line {
    /// Line through two points (`Line(P,Q)`); fails if they coincide.
    pub fn through(p: &Point, q: &Point) -> Result<Line> {
        Self::through_with(p, q, &OracleCfg::default())
    }

    pub fn through_with(p: &Point, q: &Point, cfg: &OracleCfg) -> Result<Line> {
        let (x1, y1) = p.coords()?;
        let (x2, y2) = q.coords()?;
        let a = y2 - y1;
        let b = x1 - x2;
        if a.is_zero_with(cfg)? && b.is_zero_with(cfg)? {
            return Err(GeomError::degenerate("line through coincident points"));
        }
        let c = x2 * y1 - x1 * y2;
        Ok(Line { a, b, c })
    }

    /// Line from its equation (`LineFromEq`); fails if `a = b = 0`.
    pub fn from_eq(
        a: impl Into<ExactValue>,
        b: impl Into<ExactValue>,
        c: impl Into<ExactValue>,
    ) -> Result<Line> {
        let (a, b, c): (ExactValue, ExactValue, ExactValue) = (a.into(), b.into(), c.into());
        if a.is_zero()? && b.is_zero()? {
            return Err(GeomError::degenerate("line equation with a = b = 0"));
        }
        Ok(Line { a, b, c })
    }

    /// `(a, b, c)` (`LineEq`).
    pub fn coefficients(&self) -> (&ExactValue, &ExactValue, &ExactValue) {
        (&self.a, &self.b, &self.c)
    }

    /// `a·x + b·y + c` at `p`; zero iff `p` lies on the line.
    pub fn eval(&self, p: &Point) -> Result<ExactValue> {
        let (x, y) = p.coords()?;
        Ok(&self.a * x + &self.b * y + &self.c)
    }

    /// Direction vector `(−b, a)`.
    pub fn direction(&self) -> (ExactValue, ExactValue) {
        (-&self.b, self.a.clone())
    }

    /// Foot of the perpendicular from the origin: `−c·(a, b)/(a² + b²)`.
    pub fn foot(&self) -> Result<Point> {
        let norm = self.a.square() + self.b.square();
        let s = (-&self.c).checked_div(&norm)?;
        Ok(Point::new(&s * &self.a, &s * &self.b))
    }

    /// Same point set: all 2×2 minors of the coefficient matrix vanish.
    pub fn coincides_with(&self, other: &Line, cfg: &OracleCfg) -> Result<bool> {
        let (a1, b1, c1) = self.coefficients();
        let (a2, b2, c2) = other.coefficients();
        Ok((a1 * b2 - a2 * b1).is_zero_with(cfg)?
            && (a1 * c2 - a2 * c1).is_zero_with(cfg)?
            && (b1 * c2 - b2 * c1).is_zero_with(cfg)?)
    }
}

/// Circle `(x − cx)² + (y − cy)² = radius_sq`.
#[derive(Clone, Debug, Serialize)]
pub struct Circle {
    center: Point,
    radius_sq: ExactValue,
}

impl Circle {
    /// `Circle(center, radius)`; `radius_sq = radius²`, so `sqrt(k)` gives back `k`.
    pub fn new(center: Point, radius: impl Into<ExactValue>) -> Self {
        let radius: ExactValue = radius.into();
        Circle {
            center,
            radius_sq: radius.square(),
        }
    }

    pub fn from_radius_sq(center: Point, radius_sq: impl Into<ExactValue>) -> Result<Self> {
        let radius_sq: ExactValue = radius_sq.into();
        if radius_sq.sign()? == Ordering::Less {
            return Err(GeomError::degenerate(format!(
                "negative squared radius {radius_sq}"
            )));
        }
        Ok(Circle { center, radius_sq })
    }

    /// Circle centered at `center` through `point`; rational inputs give a rational `radius_sq`.
    pub fn through(center: Point, point: &Point) -> Result<Self> {
        let d = center.vector_to(point)?;
        let radius_sq = dot(&d, &d);
        Ok(Circle { center, radius_sq })
    }

    /// Circumcircle of three points (`Circle3`); fails if they are collinear.
    pub fn through3(p: &Point, q: &Point, r: &Point) -> Result<Self> {
        Self::through3_with(p, q, r, &OracleCfg::default())
    }

    pub fn through3_with(p: &Point, q: &Point, r: &Point, cfg: &OracleCfg) -> Result<Self> {
        let area2 = cross(p, q, r)?;
        if area2.is_zero_with(cfg)? {
            return Err(GeomError::degenerate("circle through collinear points"));
        }
        // Solve relative to p: |u − b|² = |b|², |u − c|² = |c|² with b = q − p, c = r − p.
        let b = p.vector_to(q)?;
        let c = p.vector_to(r)?;
        let (bb, cc) = (dot(&b, &b), dot(&c, &c));
        let d = &area2 + &area2;
        let ux = (&c.1 * &bb - &b.1 * &cc).checked_div_with(&d, cfg)?;
        let uy = (&b.0 * &cc - &c.0 * &bb).checked_div_with(&d, cfg)?;
        let radius_sq = ux.square() + uy.square();
        let center = p.translated(&ux, &uy)?;
        Ok(Circle { center, radius_sq })
    }

    /// `CircleCenter`.
    pub fn center(&self) -> &Point {
        &self.center
    }

    /// `CircleRadiusSq`.
    pub fn radius_sq(&self) -> &ExactValue {
        &self.radius_sq
    }

    /// `CircleRadius`; an oracle unless `radius_sq` is a rational square.
    pub fn radius(&self) -> Result<ExactValue> {
        self.radius_sq.sqrt()
    }

    /// Power of `p`: `|p − center|² − radius_sq`; zero iff `p` is on the circle.
    pub fn power(&self, p: &Point) -> Result<ExactValue> {
        let d = self.center.vector_to(p)?;
        Ok(dot(&d, &d) - &self.radius_sq)
    }
}

/// Closed segment from `start` to `end`.
#[derive(Clone, Debug, Serialize)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    /// Fails if both endpoints are fixed and coincide.
    pub fn new(start: Point, end: Point) -> Result<Self> {
        reject_coincident(&start, &end, "segment")?;
        Ok(Segment { start, end })
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn line(&self) -> Result<Line> {
        Line::through(&self.start, &self.end)
    }
}

/// Closed ray from `origin` through `through`.
#[derive(Clone, Debug, Serialize)]
pub struct Ray {
    origin: Point,
    through: Point,
}

impl Ray {
    /// Fails if both points are fixed and coincide.
    pub fn new(origin: Point, through: Point) -> Result<Self> {
        reject_coincident(&origin, &through, "ray")?;
        Ok(Ray { origin, through })
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    pub fn through(&self) -> &Point {
        &self.through
    }

    pub fn line(&self) -> Result<Line> {
        Line::through(&self.origin, &self.through)
    }
}

fn reject_coincident(p: &Point, q: &Point, what: &str) -> Result<()> {
    if p.is_fixed() && q.is_fixed() && p.coincides(q)? {
        return Err(GeomError::degenerate(format!(
            "{what} with coincident endpoints"
        )));
    }
    Ok(())
}

/// Closed set of primitive shapes accepted by `intersect` and `realize`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Segment(Segment),
    Ray(Ray),
}

impl Object {
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Point(_) => "point",
            Object::Line(_) => "line",
            Object::Circle(_) => "circle",
            Object::Segment(_) => "segment",
            Object::Ray(_) => "ray",
        }
    }
}

impl From<Point> for Object {
    fn from(p: Point) -> Self {
        Object::Point(p)
    }
}

impl From<Line> for Object {
    fn from(l: Line) -> Self {
        Object::Line(l)
    }
}

impl From<Circle> for Object {
    fn from(c: Circle) -> Self {
        Object::Circle(c)
    }
}

impl From<Segment> for Object {
    fn from(s: Segment) -> Self {
        Object::Segment(s)
    }
}

impl From<Ray> for Object {
    fn from(r: Ray) -> Self {
        Object::Ray(r)
    }
}

impl From<Carrier> for Object {
    fn from(c: Carrier) -> Self {
        match c {
            Carrier::Line(l) => Object::Line(l),
            Carrier::Circle(c) => Object::Circle(c),
        }
    }
}
