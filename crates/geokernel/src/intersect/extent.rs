//! Finite-extent tests for segments and rays.
//!
//! A linear object is `base + t·dir`; segments keep `t ∈ [0, 1]`, rays keep
//! `t ≥ 0`. Membership is tested without dividing: with `w = p − base`,
//! `0 ≤ w·dir ≤ dir·dir` for segments and `w·dir ≥ 0` for rays.

use std::cmp::Ordering;

use super::Intersection;
use crate::error::Result;
use crate::oracle::OracleCfg;
use crate::primitives::{dot, Object, Point};
use crate::value::ExactValue;

type Vec2 = (ExactValue, ExactValue);

/// Parameter interval; `None` is unbounded on that side.
struct Span {
    lo: Option<ExactValue>,
    hi: Option<ExactValue>,
}

/// `(base, dir, span)` of a segment or ray; `None` for unbounded objects.
fn parametrize(o: &Object) -> Result<Option<(Point, Vec2, Span)>> {
    Ok(match o {
        Object::Segment(s) => Some((
            s.start().clone(),
            s.start().vector_to(s.end())?,
            Span {
                lo: Some(ExactValue::zero()),
                hi: Some(ExactValue::one()),
            },
        )),
        Object::Ray(r) => Some((
            r.origin().clone(),
            r.origin().vector_to(r.through())?,
            Span {
                lo: Some(ExactValue::zero()),
                hi: None,
            },
        )),
        _ => None,
    })
}

/// Whether `p`, already known to lie on the carrier of `o`, lies within its extent.
pub(super) fn within_extent(o: &Object, p: &Point, cfg: &OracleCfg) -> Result<bool> {
    let Some((base, dir, span)) = parametrize(o)? else {
        return Ok(true);
    };
    let along = dot(&base.vector_to(p)?, &dir);
    if along.sign_with(cfg)? == Ordering::Less {
        return Ok(false);
    }
    match span.hi {
        Some(_) => Ok(along.cmp_exact_with(&dot(&dir, &dir), cfg)? != Ordering::Greater),
        None => Ok(true),
    }
}

/// Overlap of two objects on one carrier: empty, a single touching point, or `Coincident`.
pub(super) fn overlap(o1: &Object, o2: &Object, cfg: &OracleCfg) -> Result<Intersection> {
    let (reference, other) = match (parametrize(o1)?, parametrize(o2)?) {
        (Some(r), _) => (r, o2),
        (None, Some(r)) => (r, o1),
        (None, None) => return Ok(Intersection::Coincident),
    };
    let (base, dir, span) = reference;
    let len2 = dot(&dir, &dir);
    let param = |q: &Point| -> Result<ExactValue> {
        dot(&base.vector_to(q)?, &dir).checked_div_with(&len2, cfg)
    };
    let other_span = match other {
        Object::Segment(s) => {
            let (t0, t1) = (param(s.start())?, param(s.end())?);
            if t0.cmp_exact_with(&t1, cfg)? == Ordering::Greater {
                Span {
                    lo: Some(t1),
                    hi: Some(t0),
                }
            } else {
                Span {
                    lo: Some(t0),
                    hi: Some(t1),
                }
            }
        }
        Object::Ray(r) => {
            let t0 = param(r.origin())?;
            let heading = dot(&r.origin().vector_to(r.through())?, &dir);
            if heading.sign_with(cfg)? == Ordering::Greater {
                Span {
                    lo: Some(t0),
                    hi: None,
                }
            } else {
                Span {
                    lo: None,
                    hi: Some(t0),
                }
            }
        }
        _ => Span { lo: None, hi: None },
    };
    let lo = pick(span.lo, other_span.lo, Ordering::Less, cfg)?;
    let hi = pick(span.hi, other_span.hi, Ordering::Greater, cfg)?;
    let (Some(lo), Some(hi)) = (lo, hi) else {
        return Ok(Intersection::Coincident);
    };
    match lo.cmp_exact_with(&hi, cfg)? {
        Ordering::Greater => Ok(Intersection::empty()),
        Ordering::Equal => {
            let touch = base.translated(&(&lo * &dir.0), &(&lo * &dir.1))?;
            Ok(Intersection::Points(vec![touch]))
        }
        Ordering::Less => Ok(Intersection::Coincident),
    }
}

/// The tighter of two bounds: drop `a` when it compares as `looser` against `b`.
fn pick(
    a: Option<ExactValue>,
    b: Option<ExactValue>,
    looser: Ordering,
    cfg: &OracleCfg,
) -> Result<Option<ExactValue>> {
    Ok(match (a, b) {
        (Some(x), Some(y)) => Some(if x.cmp_exact_with(&y, cfg)? == looser {
            y
        } else {
            x
        }),
        (x, None) => x,
        (None, y) => y,
    })
}
