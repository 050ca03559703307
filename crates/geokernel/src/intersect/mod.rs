//! Intersection engine: line–line, line–circle, circle–circle, plus segment
//! and ray filtering, dispatched over the closed `Object` enum.
//!
//! - Parallel lines and concentric circles give an empty result; identical
//!   carriers give `Intersection::Coincident`. Neither is an error.
//! - Line–circle solves `A·t² + B·t + C = 0` over one free coordinate. A
//!   non-square discriminant yields two points over one shared `sqrt` oracle.
//! - Circle–circle reduces to line–circle on the radical axis.
//!
//! References
//! - Code cross-refs: `primitives::{Line, Circle, Segment, Ray}`, `extent`

mod extent;

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{GeomError, Result};
use crate::oracle::OracleCfg;
use crate::predicates::{on_circle_with, on_line_with};
use crate::primitives::{Carrier, Circle, Line, Object, Point, Ray, Segment};
use crate::value::ExactValue;

use extent::{overlap, within_extent};

/// Outcome of an intersection: 0–2 points, or the marker for identical carriers.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intersection {
    Points(Vec<Point>),
    Coincident,
}

impl Intersection {
    pub fn empty() -> Self {
        Intersection::Points(Vec::new())
    }

    /// Points of the result; empty for `Coincident`.
    pub fn points(&self) -> &[Point] {
        match self {
            Intersection::Points(p) => p,
            Intersection::Coincident => &[],
        }
    }

    pub fn is_coincident(&self) -> bool {
        matches!(self, Intersection::Coincident)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Intersection::Points(p) if p.is_empty())
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }
}

pub fn line_line(l1: &Line, l2: &Line) -> Result<Intersection> {
    line_line_with(l1, l2, &OracleCfg::default())
}

/// `LineLineInt`: Cramer's rule on `D = a1·b2 − a2·b1`.
pub fn line_line_with(l1: &Line, l2: &Line, cfg: &OracleCfg) -> Result<Intersection> {
    let (a1, b1, c1) = l1.coefficients();
    let (a2, b2, c2) = l2.coefficients();
    let det = a1 * b2 - a2 * b1;
    if det.is_zero_with(cfg)? {
        return Ok(if l1.coincides_with(l2, cfg)? {
            Intersection::Coincident
        } else {
            Intersection::empty()
        });
    }
    let x = (b1 * c2 - b2 * c1).checked_div_with(&det, cfg)?;
    let y = (a2 * c1 - a1 * c2).checked_div_with(&det, cfg)?;
    Ok(Intersection::Points(vec![Point::new(x, y)]))
}

pub fn line_circle(l: &Line, c: &Circle) -> Result<Intersection> {
    line_circle_with(l, c, &OracleCfg::default())
}

/// `LineCircleInt`: result count follows the sign of the discriminant.
pub fn line_circle_with(l: &Line, c: &Circle, cfg: &OracleCfg) -> Result<Intersection> {
    let (a, b, k) = l.coefficients();
    let (cx, cy) = c.center().coords()?;
    let r2 = c.radius_sq();
    let two = ExactValue::from_integer(2);

    // Either x = t, y = −(a·t + c)/b, or (b = 0) x = −c/a, y = t.
    let vertical = b.is_zero_with(cfg)?;
    if vertical && a.is_zero_with(cfg)? {
        return Err(GeomError::degenerate("line with zero direction"));
    }
    let (qa, qb, qc, x0) = if vertical {
        let x0 = (-k).checked_div_with(a, cfg)?;
        let dx = &x0 - cx;
        let qc = dx.square() + cy.square() - r2;
        (ExactValue::one(), -(&two * cy), qc, Some(x0))
    } else {
        let b2 = b.square();
        let shift = k + &(b * cy);
        let qa = a.square() + b2.clone();
        let qb = &two * &(a * &shift - &b2 * cx);
        let qc = &b2 * &cx.square() + shift.square() - &b2 * r2;
        (qa, qb, qc, None)
    };
    if qa.is_zero_with(cfg)? {
        return Err(GeomError::degenerate("line with zero direction"));
    }
    let disc = qb.square() - ExactValue::from_integer(4) * &qa * &qc;
    let two_a = &two * &qa;
    let at = |t: ExactValue| -> Result<Point> {
        match &x0 {
            Some(x0) => Ok(Point::new(x0.clone(), t)),
            None => {
                let y = (-(a * &t + k)).checked_div_with(b, cfg)?;
                Ok(Point::new(t, y))
            }
        }
    };
    let neg_b = -&qb;
    let sign = disc.sign_with(cfg)?;
    tracing::debug!(sign = ?sign, rational = disc.is_rational(), "line-circle discriminant");
    match sign {
        Ordering::Less => Ok(Intersection::empty()),
        Ordering::Equal => Ok(Intersection::Points(vec![at(
            neg_b.checked_div_with(&two_a, cfg)?,
        )?])),
        Ordering::Greater => {
            // One sqrt handle for both branches.
            let root = disc.sqrt_with(cfg)?;
            let t_minus = (&neg_b - &root).checked_div_with(&two_a, cfg)?;
            let t_plus = (&neg_b + &root).checked_div_with(&two_a, cfg)?;
            Ok(Intersection::Points(vec![at(t_minus)?, at(t_plus)?]))
        }
    }
}

pub fn circle_circle(c1: &Circle, c2: &Circle) -> Result<Intersection> {
    circle_circle_with(c1, c2, &OracleCfg::default())
}

/// `CircleCircleInt`: concentric circles are empty or coincident; otherwise
/// intersect the radical axis with `c1`.
pub fn circle_circle_with(c1: &Circle, c2: &Circle, cfg: &OracleCfg) -> Result<Intersection> {
    let (x1, y1) = c1.center().coords()?;
    let (x2, y2) = c2.center().coords()?;
    if c1.center().coincides_with(c2.center(), cfg)? {
        return Ok(
            if c1.radius_sq().cmp_exact_with(c2.radius_sq(), cfg)? == Ordering::Equal {
                Intersection::Coincident
            } else {
                Intersection::empty()
            },
        );
    }
    let two = ExactValue::from_integer(2);
    let a = &two * &(x2 - x1);
    let b = &two * &(y2 - y1);
    let p1 = x1.square() + y1.square() - c1.radius_sq();
    let p2 = x2.square() + y2.square() - c2.radius_sq();
    let axis = Line::from_eq(a, b, p1 - p2)?;
    line_circle_with(&axis, c1, cfg)
}

pub fn segment_int(seg: &Segment, other: &Object) -> Result<Intersection> {
    segment_int_with(seg, other, &OracleCfg::default())
}

/// `SegmentInt`: intersect the carrier, keep points with parameter in `[0, 1]`.
pub fn segment_int_with(seg: &Segment, other: &Object, cfg: &OracleCfg) -> Result<Intersection> {
    intersect_with(&Object::Segment(seg.clone()), other, cfg)
}

pub fn ray_int(ray: &Ray, other: &Object) -> Result<Intersection> {
    ray_int_with(ray, other, &OracleCfg::default())
}

/// `RayInt`: intersect the carrier, keep points with parameter `t ≥ 0`.
pub fn ray_int_with(ray: &Ray, other: &Object, cfg: &OracleCfg) -> Result<Intersection> {
    intersect_with(&Object::Ray(ray.clone()), other, cfg)
}

pub fn intersect(o1: &Object, o2: &Object) -> Result<Intersection> {
    intersect_with(o1, o2, &OracleCfg::default())
}

/// `Intersect`: dispatch on the pair of object kinds.
pub fn intersect_with(o1: &Object, o2: &Object, cfg: &OracleCfg) -> Result<Intersection> {
    tracing::debug!(lhs = o1.kind(), rhs = o2.kind(), "intersect");
    if let (Object::Point(p), other) | (other, Object::Point(p)) = (o1, o2) {
        return incident_point(p, other, cfg);
    }
    let raw = match (carrier_of(o1)?, carrier_of(o2)?) {
        (Carrier::Line(l1), Carrier::Line(l2)) => line_line_with(&l1, &l2, cfg)?,
        (Carrier::Line(l), Carrier::Circle(c)) | (Carrier::Circle(c), Carrier::Line(l)) => {
            line_circle_with(&l, &c, cfg)?
        }
        (Carrier::Circle(c1), Carrier::Circle(c2)) => circle_circle_with(&c1, &c2, cfg)?,
    };
    match raw {
        Intersection::Coincident => overlap(o1, o2, cfg),
        Intersection::Points(points) => {
            let mut kept = Vec::with_capacity(points.len());
            for p in points {
                if within_extent(o1, &p, cfg)? && within_extent(o2, &p, cfg)? {
                    kept.push(p);
                }
            }
            Ok(Intersection::Points(kept))
        }
    }
}

fn carrier_of(o: &Object) -> Result<Carrier> {
    Ok(match o {
        Object::Line(l) => Carrier::Line(l.clone()),
        Object::Circle(c) => Carrier::Circle(c.clone()),
        Object::Segment(s) => Carrier::Line(s.line()?),
        Object::Ray(r) => Carrier::Line(r.line()?),
        Object::Point(_) => return Err(GeomError::degenerate("a point has no carrier")),
    })
}

/// A point meets an object in itself or not at all.
fn incident_point(p: &Point, other: &Object, cfg: &OracleCfg) -> Result<Intersection> {
    let on = match other {
        Object::Point(q) => p.coincides_with(q, cfg)?,
        Object::Line(l) => on_line_with(p, l, cfg)?,
        Object::Circle(c) => on_circle_with(p, c, cfg)?,
        Object::Segment(s) => on_line_with(p, &s.line()?, cfg)? && within_extent(other, p, cfg)?,
        Object::Ray(r) => on_line_with(p, &r.line()?, cfg)? && within_extent(other, p, cfg)?,
    };
    Ok(if on {
        Intersection::Points(vec![p.clone()])
    } else {
        Intersection::empty()
    })
}

#[cfg(test)]
mod tests;
