//! Predicate engine: exact incidence and configuration tests.
//!
//! Every predicate reduces to deciding whether one `ExactValue` is zero.
//! An oracle that cannot be decided within the refinement bound surfaces as
//! `GeomError::IndeterminatePredicate`, never as `false`.

use crate::error::Result;
use crate::intersect::{line_line_with, Intersection};
use crate::oracle::OracleCfg;
use crate::primitives::{cross, Circle, Line, Point};
use crate::value::ExactValue;

pub fn collinear(points: &[Point]) -> Result<bool> {
    collinear_with(points, &OracleCfg::default())
}

/// `Collinear`: every point lies on the line through the first point and the
/// first point distinct from it. Fewer than three points, or all coincident, is `true`.
pub fn collinear_with(points: &[Point], cfg: &OracleCfg) -> Result<bool> {
    let Some((p0, rest)) = points.split_first() else {
        return Ok(true);
    };
    let mut pivot = None;
    for (i, p) in rest.iter().enumerate() {
        if !p0.coincides_with(p, cfg)? {
            pivot = Some(i);
            break;
        }
    }
    let Some(k) = pivot else {
        return Ok(true);
    };
    let p1 = &rest[k];
    for r in &rest[k + 1..] {
        if !cross(p0, p1, r)?.is_zero_with(cfg)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn concyclic(points: &[Point]) -> Result<bool> {
    concyclic_with(points, &OracleCfg::default())
}

/// `Concyclic`: the lifted determinant of the first three pairwise distinct
/// points with every point vanishes. Fewer than three distinct points is `true`.
pub fn concyclic_with(points: &[Point], cfg: &OracleCfg) -> Result<bool> {
    let mut refs: Vec<&Point> = Vec::with_capacity(3);
    for p in points {
        if refs.len() == 3 {
            break;
        }
        let mut fresh = true;
        for r in &refs {
            if r.coincides_with(p, cfg)? {
                fresh = false;
                break;
            }
        }
        if fresh {
            refs.push(p);
        }
    }
    let &[a, b, c] = refs.as_slice() else {
        return Ok(true);
    };
    for d in points {
        if !incircle_det(a, b, c, d)?.is_zero_with(cfg)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// ```text
/// | ax−dx  ay−dy  (ax−dx)²+(ay−dy)² |
/// | bx−dx  by−dy  (bx−dx)²+(by−dy)² |
/// | cx−dx  cy−dy  (cx−dx)²+(cy−dy)² |
/// ```
fn incircle_det(a: &Point, b: &Point, c: &Point, d: &Point) -> Result<ExactValue> {
    let row = |p: &Point| -> Result<[ExactValue; 3]> {
        let (x, y) = d.vector_to(p)?;
        let w = x.square() + y.square();
        Ok([x, y, w])
    };
    let [ax, ay, aw] = row(a)?;
    let [bx, by, bw] = row(b)?;
    let [cx, cy, cw] = row(c)?;
    let m0 = &by * &cw - &cy * &bw;
    let m1 = &bx * &cw - &cx * &bw;
    let m2 = &bx * &cy - &cx * &by;
    Ok(&ax * &m0 - &ay * &m1 + &aw * &m2)
}

pub fn on_line(p: &Point, l: &Line) -> Result<bool> {
    on_line_with(p, l, &OracleCfg::default())
}

/// `OnLine`: `a·x + b·y + c = 0`.
pub fn on_line_with(p: &Point, l: &Line, cfg: &OracleCfg) -> Result<bool> {
    l.eval(p)?.is_zero_with(cfg)
}

pub fn on_circle(p: &Point, c: &Circle) -> Result<bool> {
    on_circle_with(p, c, &OracleCfg::default())
}

/// `OnCircle`: `|p − center|² = radius_sq`.
pub fn on_circle_with(p: &Point, c: &Circle, cfg: &OracleCfg) -> Result<bool> {
    c.power(p)?.is_zero_with(cfg)
}

pub fn parallel(l1: &Line, l2: &Line) -> Result<bool> {
    parallel_with(l1, l2, &OracleCfg::default())
}

/// `Parallel`: `a1·b2 − a2·b1 = 0` (coincident lines count as parallel).
pub fn parallel_with(l1: &Line, l2: &Line, cfg: &OracleCfg) -> Result<bool> {
    let (a1, b1, _) = l1.coefficients();
    let (a2, b2, _) = l2.coefficients();
    (a1 * b2 - a2 * b1).is_zero_with(cfg)
}

pub fn perpendicular(l1: &Line, l2: &Line) -> Result<bool> {
    perpendicular_with(l1, l2, &OracleCfg::default())
}

/// `Perpendicular`: `a1·a2 + b1·b2 = 0`.
pub fn perpendicular_with(l1: &Line, l2: &Line, cfg: &OracleCfg) -> Result<bool> {
    let (a1, b1, _) = l1.coefficients();
    let (a2, b2, _) = l2.coefficients();
    (a1 * a2 + b1 * b2).is_zero_with(cfg)
}

pub fn concurrent(lines: &[Line]) -> Result<bool> {
    concurrent_with(lines, &OracleCfg::default())
}

/// `Concurrent`: all lines share a point. Lines identical to the first are
/// skipped; if none remain the set is trivially concurrent, and a distinct
/// parallel makes it false.
pub fn concurrent_with(lines: &[Line], cfg: &OracleCfg) -> Result<bool> {
    let Some((l0, rest)) = lines.split_first() else {
        return Ok(true);
    };
    let mut other = None;
    for l in rest {
        if !l0.coincides_with(l, cfg)? {
            other = Some(l);
            break;
        }
    }
    let Some(l1) = other else {
        return Ok(true);
    };
    let meet = match line_line_with(l0, l1, cfg)? {
        Intersection::Points(points) => match points.into_iter().next() {
            Some(p) => p,
            None => return Ok(false),
        },
        Intersection::Coincident => return Ok(true),
    };
    for l in rest {
        if !on_line_with(&meet, l, cfg)? {
            return Ok(false);
        }
    }
    Ok(true)
}
