//! Realization: bind coordinates to free points and return a fully numeric object.
//!
//! Assigned coordinates are read in the given frame and mapped to world
//! coordinates by `origin + u·e1 + v·e2`. Constrained free points without an
//! assignment are solved from their carrier and parameter.

use std::collections::HashMap;

use super::{cross, Carrier, Circle, Line, Object, Point, Ray, Segment};
use crate::error::{GeomError, Result};
use crate::predicates::{on_circle, on_line};
use crate::value::ExactValue;

/// Free-point name → fixed point in frame coordinates.
pub type Assignment = HashMap<String, Point>;

/// Affine frame `(origin, x_axis, y_axis?)`; the y axis defaults to `e1` rotated by +90°.
#[derive(Clone, Debug)]
pub struct CoordinateSystem {
    origin: Point,
    x_axis: Point,
    y_axis: Option<Point>,
}

impl CoordinateSystem {
    /// Fails unless the frame vectors are independent.
    pub fn new(origin: Point, x_axis: Point, y_axis: Option<Point>) -> Result<Self> {
        if origin.coincides(&x_axis)? {
            return Err(GeomError::degenerate("x axis point equals origin"));
        }
        if let Some(y) = &y_axis {
            if cross(&origin, &x_axis, y)?.is_zero()? {
                return Err(GeomError::degenerate("frame axes are parallel"));
            }
        }
        Ok(Self {
            origin,
            x_axis,
            y_axis,
        })
    }

    /// Origin `(0, 0)`, unit x axis, implied unit y axis.
    pub fn standard() -> Self {
        Self {
            origin: Point::new(0, 0),
            x_axis: Point::new(1, 0),
            y_axis: None,
        }
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    /// World point of frame coordinates `(u, v)`.
    pub fn to_world(&self, u: &ExactValue, v: &ExactValue) -> Result<Point> {
        let e1 = self.origin.vector_to(&self.x_axis)?;
        let e2 = match &self.y_axis {
            Some(y) => self.origin.vector_to(y)?,
            None => (-&e1.1, e1.0.clone()),
        };
        let dx = u * &e1.0 + v * &e2.0;
        let dy = u * &e1.1 + v * &e2.1;
        self.origin.translated(&dx, &dy)
    }
}

/// Substitute coordinates for every free point reachable from `object` (`Realize`).
pub fn realize(object: &Object, cs: &CoordinateSystem, assignment: &Assignment) -> Result<Object> {
    Ok(match object {
        Object::Point(p) => Object::Point(realize_point(p, cs, assignment)?),
        Object::Line(l) => Object::Line(l.clone()),
        Object::Circle(c) => Object::Circle(realize_circle(c, cs, assignment)?),
        Object::Segment(s) => Object::Segment(Segment::new(
            realize_point(s.start(), cs, assignment)?,
            realize_point(s.end(), cs, assignment)?,
        )?),
        Object::Ray(r) => Object::Ray(Ray::new(
            realize_point(r.origin(), cs, assignment)?,
            realize_point(r.through(), cs, assignment)?,
        )?),
    })
}

fn realize_circle(c: &Circle, cs: &CoordinateSystem, assignment: &Assignment) -> Result<Circle> {
    let center = realize_point(c.center(), cs, assignment)?;
    Circle::from_radius_sq(center, c.radius_sq().clone())
}

fn realize_carrier(
    carrier: &Carrier,
    cs: &CoordinateSystem,
    assignment: &Assignment,
) -> Result<Carrier> {
    Ok(match carrier {
        Carrier::Line(l) => Carrier::Line(l.clone()),
        Carrier::Circle(c) => Carrier::Circle(realize_circle(c, cs, assignment)?),
    })
}

fn realize_point(p: &Point, cs: &CoordinateSystem, assignment: &Assignment) -> Result<Point> {
    let (name, constraint) = match p {
        Point::Fixed { .. } => return Ok(p.clone()),
        Point::Free { name, constraint } => (name, constraint),
    };
    if let Some(bound) = assignment.get(name) {
        let (u, v) = bound
            .coords()
            .map_err(|_| GeomError::UnresolvedFreePoint(name.clone()))?;
        let world = cs.to_world(u, v)?;
        if let Some(c) = constraint {
            let carrier = realize_carrier(&c.carrier, cs, assignment)?;
            let incident = match &carrier {
                Carrier::Line(l) => on_line(&world, l),
                Carrier::Circle(k) => on_circle(&world, k),
            };
            if matches!(incident, Ok(false)) {
                tracing::warn!(point = %name, "assigned point is off its carrier");
            }
        }
        return Ok(world);
    }
    match constraint.as_deref() {
        Some(c) => match &c.param {
            Some(t) => {
                let carrier = realize_carrier(&c.carrier, cs, assignment)?;
                tracing::debug!(point = %name, param = %t, "solving constrained point");
                point_at(&carrier, t)
            }
            None => Err(GeomError::UnresolvedFreePoint(name.clone())),
        },
        None => Err(GeomError::UnresolvedFreePoint(name.clone())),
    }
}

/// Point at parameter `t`: `foot + t·(−b, a)` on a line, the rational
/// parametrization `center + r·((1 − t²)/(1 + t²), 2t/(1 + t²))` on a circle.
pub(crate) fn point_at(carrier: &Carrier, t: &ExactValue) -> Result<Point> {
    match carrier {
        Carrier::Line(l) => point_on_line(l, t),
        Carrier::Circle(c) => {
            let r = c.radius()?;
            let t2 = t.square();
            let denom = &ExactValue::one() + &t2;
            let cos = (&ExactValue::one() - &t2).checked_div(&denom)?;
            let sin = (t + t).checked_div(&denom)?;
            c.center().translated(&(&r * &cos), &(&r * &sin))
        }
    }
}

fn point_on_line(l: &Line, t: &ExactValue) -> Result<Point> {
    let (dx, dy) = l.direction();
    l.foot()?.translated(&(t * &dx), &(t * &dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> ExactValue {
        ExactValue::ratio(n, d).unwrap()
    }

    #[test]
    fn frame_maps_to_world() {
        // origin (1,1), e1 = (2,0), e2 defaults to (0,2)
        let cs = CoordinateSystem::new(Point::new(1, 1), Point::new(3, 1), None).unwrap();
        let p = cs.to_world(&q(1, 2), &q(1, 1)).unwrap();
        let (x, y) = p.coords().unwrap();
        assert_eq!(x.to_string(), "2/1");
        assert_eq!(y.to_string(), "3/1");
    }

    #[test]
    fn degenerate_frames_are_rejected() {
        assert!(CoordinateSystem::new(Point::new(0, 0), Point::new(0, 0), None).is_err());
        assert!(CoordinateSystem::new(
            Point::new(0, 0),
            Point::new(1, 1),
            Some(Point::new(2, 2))
        )
        .is_err());
    }

    #[test]
    fn line_parameter_walks_along_direction() {
        // y = 1: foot (0, 1), direction (−1, 0)
        let l = Line::from_eq(0, 1, -1).unwrap();
        let p = point_at(&Carrier::Line(l.clone()), &q(3, 1)).unwrap();
        assert!(on_line(&p, &l).unwrap());
        assert_eq!(p.coords().unwrap().0.to_string(), "-3/1");
    }

    #[test]
    fn circle_parameter_gives_points_on_circle() {
        let c = Circle::from_radius_sq(Point::new(1, -1), 25).unwrap();
        for t in [q(0, 1), q(1, 2), q(-3, 1)] {
            let p = point_at(&Carrier::Circle(c.clone()), &t).unwrap();
            assert!(on_circle(&p, &c).unwrap());
            assert!(p.coords().unwrap().0.is_rational());
        }
    }

    #[test]
    fn free_point_takes_its_assigned_coordinates_in_standard_frame() {
        let mut bound = Assignment::new();
        bound.insert("P".to_string(), Point::new(1, 2));
        let r = realize(&Object::Point(Point::free("P")), &CoordinateSystem::standard(), &bound);
        let Object::Point(p) = r.unwrap() else {
            panic!("expected a point");
        };
        let (x, y) = p.coords().unwrap();
        assert_eq!((x.to_string(), y.to_string()), ("1/1".into(), "2/1".into()));
    }

    #[test]
    fn assignment_wins_over_constraint_parameter() {
        let l = Line::from_eq(0, 1, 0).unwrap();
        let p = Point::on("P", Carrier::Line(l), Some(q(5, 1)));
        let mut bound = Assignment::new();
        // off the carrier: kept, with a warning
        bound.insert("P".to_string(), Point::new(2, 3));
        let cs = CoordinateSystem::standard();
        let Object::Point(r) = realize(&Object::Point(p), &cs, &bound).unwrap() else {
            panic!("expected a point");
        };
        let (x, y) = r.coords().unwrap();
        assert_eq!((x.to_string(), y.to_string()), ("2/1".into(), "3/1".into()));
    }

    #[test]
    fn unbound_free_points_stay_unresolved() {
        let cs = CoordinateSystem::standard();
        let none = Assignment::new();
        let err = realize(&Object::Point(Point::free("A")), &cs, &none).unwrap_err();
        assert_eq!(err, GeomError::UnresolvedFreePoint("A".into()));
        let c = Circle::from_radius_sq(Point::new(0, 0), 1).unwrap();
        let on_c = Point::on("B", Carrier::Circle(c), None);
        assert!(realize(&Object::Point(on_c), &cs, &none).is_err());
    }

    #[test]
    fn segment_endpoints_are_realized_in_frame() {
        let seg = Segment::new(Point::free("A"), Point::free("B")).unwrap();
        let mut bound = Assignment::new();
        bound.insert("A".to_string(), Point::new(0, 0));
        bound.insert("B".to_string(), Point::new(1, 0));
        // rotated frame: e1 = (0, 1), e2 = (−1, 0)
        let cs = CoordinateSystem::new(Point::new(0, 0), Point::new(0, 1), None).unwrap();
        let Object::Segment(s) = realize(&Object::Segment(seg), &cs, &bound).unwrap() else {
            panic!("expected a segment");
        };
        let (x, y) = s.end().coords().unwrap();
        assert_eq!((x.to_string(), y.to_string()), ("0/1".into(), "1/1".into()));

        bound.insert("B".to_string(), Point::new(0, 0));
        let seg = Segment::new(Point::free("A"), Point::free("B")).unwrap();
        let err = realize(&Object::Segment(seg), &cs, &bound).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DegenerateConstruction);
    }
}
