use super::*;
use crate::oracle::Expr;

fn pt(p: &Point) -> (String, String) {
    let (x, y) = p.coords().unwrap();
    (x.to_string(), y.to_string())
}

fn pts(r: &Intersection) -> Vec<(String, String)> {
    r.points().iter().map(pt).collect()
}

fn s(x: &str, y: &str) -> (String, String) {
    (x.to_string(), y.to_string())
}

fn origin_circle(radius: i64) -> Circle {
    Circle::new(Point::new(0, 0), radius)
}

#[test]
fn diagonals_of_unit_square_meet_at_center() {
    let l1 = Line::through(&Point::new(0, 0), &Point::new(1, 1)).unwrap();
    let l2 = Line::through(&Point::new(0, 1), &Point::new(1, 0)).unwrap();
    let r = line_line(&l1, &l2).unwrap();
    assert_eq!(pts(&r), vec![s("1/2", "1/2")]);
    let p = &r.points()[0];
    assert!(l1.eval(p).unwrap().is_zero().unwrap());
    assert!(l2.eval(p).unwrap().is_zero().unwrap());
}

#[test]
fn parallel_and_identical_lines() {
    let l1 = Line::from_eq(1, 0, 0).unwrap();
    let l2 = Line::from_eq(1, 0, -1).unwrap();
    assert!(line_line(&l1, &l2).unwrap().is_empty());
    let l3 = Line::from_eq(1, 1, -2).unwrap();
    let l4 = Line::from_eq(-2, -2, 4).unwrap();
    assert!(line_line(&l3, &l4).unwrap().is_coincident());
}

#[test]
fn line_misses_circle() {
    let l = Line::from_eq(1, 0, -3).unwrap();
    assert!(line_circle(&l, &origin_circle(2)).unwrap().is_empty());
}

#[test]
fn tangent_line_touches_once() {
    let l = Line::from_eq(1, 0, -2).unwrap();
    let r = line_circle(&l, &origin_circle(2)).unwrap();
    assert_eq!(pts(&r), vec![s("2/1", "0/1")]);
}

#[test]
fn secant_through_center_gives_two_rational_points() {
    let l = Line::from_eq(0, 1, 0).unwrap();
    let r = line_circle(&l, &origin_circle(2)).unwrap();
    assert_eq!(pts(&r), vec![s("-2/1", "0/1"), s("2/1", "0/1")]);
}

#[test]
fn irrational_points_share_one_sqrt() {
    let c = Circle::from_radius_sq(Point::new(0, 0), 2).unwrap();
    let l = Line::from_eq(1, 0, 0).unwrap();
    let r = line_circle(&l, &c).unwrap();
    assert_eq!(r.len(), 2);
    let (_, y_minus) = r.points()[0].coords().unwrap();
    let (_, y_plus) = r.points()[1].coords().unwrap();
    assert_eq!(y_plus.to_string(), "sqrt(2/1)");
    assert_eq!(y_minus.to_string(), "neg(sqrt(2/1))");

    let plus = y_plus.as_oracle().unwrap();
    match y_minus.as_oracle().unwrap().expr() {
        Expr::Neg(ExactValue::Oracle(inner)) => assert!(inner.ptr_eq(plus)),
        other => panic!("unexpected {other}"),
    }
    assert_eq!((y_plus - y_minus).sign().unwrap(), Ordering::Greater);
    for p in r.points() {
        assert!(on_circle_with(p, &c, &OracleCfg::default()).unwrap());
    }
}

#[test]
fn slanted_secant_points_lie_on_both() {
    // y = x + 1 against the circle at (1, 0) with r² = 3
    let l = Line::from_eq(1, -1, 1).unwrap();
    let c = Circle::from_radius_sq(Point::new(1, 0), 3).unwrap();
    let r = line_circle(&l, &c).unwrap();
    assert_eq!(r.len(), 2);
    for p in r.points() {
        assert!(l.eval(p).unwrap().is_zero().unwrap());
        assert!(c.power(p).unwrap().is_zero().unwrap());
    }
    let (x0, _) = r.points()[0].coords().unwrap();
    let (x1, _) = r.points()[1].coords().unwrap();
    assert_eq!(x0.cmp_exact(x1).unwrap(), Ordering::Less);
}

#[test]
fn circle_circle_cases() {
    let a = origin_circle(5);
    let b = Circle::new(Point::new(6, 0), 5);
    assert_eq!(
        pts(&circle_circle(&a, &b).unwrap()),
        vec![s("3/1", "-4/1"), s("3/1", "4/1")]
    );

    let unit = origin_circle(1);
    let kiss = Circle::new(Point::new(2, 0), 1);
    assert_eq!(pts(&circle_circle(&unit, &kiss).unwrap()), vec![s("1/1", "0/1")]);

    let far = Circle::new(Point::new(5, 0), 1);
    assert!(circle_circle(&unit, &far).unwrap().is_empty());
    let inner = Circle::new(Point::new(1, 0), 1);
    assert!(circle_circle(&a, &inner).unwrap().is_empty());

    assert!(circle_circle(&unit, &origin_circle(1)).unwrap().is_coincident());
    assert!(circle_circle(&unit, &origin_circle(3)).unwrap().is_empty());
}

#[test]
fn segment_keeps_points_within_its_extent() {
    let seg = Segment::new(Point::new(0, 0), Point::new(2, 2)).unwrap();
    let hit = Object::Line(Line::from_eq(1, 1, -2).unwrap());
    assert_eq!(pts(&segment_int(&seg, &hit).unwrap()), vec![s("1/1", "1/1")]);

    let short = Segment::new(Point::new(0, 0), Point::new(1, 1)).unwrap();
    let miss = Object::Line(Line::from_eq(1, 1, -4).unwrap());
    assert!(segment_int(&short, &miss).unwrap().is_empty());

    let chord = Segment::new(Point::new(0, 0), Point::new(3, 0)).unwrap();
    let c = Object::Circle(origin_circle(2));
    assert_eq!(pts(&segment_int(&chord, &c).unwrap()), vec![s("2/1", "0/1")]);
}

#[test]
fn segment_endpoint_counts_as_inside() {
    let seg = Segment::new(Point::new(0, 0), Point::new(2, 0)).unwrap();
    let at_end = Object::Line(Line::from_eq(1, 0, -2).unwrap());
    assert_eq!(pts(&segment_int(&seg, &at_end).unwrap()), vec![s("2/1", "0/1")]);
}

#[test]
fn ray_keeps_forward_points() {
    let ray = Ray::new(Point::new(0, 0), Point::new(1, 0)).unwrap();
    let c = Object::Circle(origin_circle(2));
    assert_eq!(pts(&ray_int(&ray, &c).unwrap()), vec![s("2/1", "0/1")]);
    let behind = Object::Line(Line::from_eq(1, 0, 1).unwrap());
    assert!(ray_int(&ray, &behind).unwrap().is_empty());
}

#[test]
fn collinear_overlaps() {
    let seg = |a: i64, b: i64| Object::Segment(Segment::new(Point::new(a, 0), Point::new(b, 0)).unwrap());
    let ray = |a: i64, b: i64| Object::Ray(Ray::new(Point::new(a, 0), Point::new(b, 0)).unwrap());

    assert!(intersect(&seg(0, 2), &seg(1, 3)).unwrap().is_coincident());
    assert!(intersect(&seg(0, 2), &seg(3, 1)).unwrap().is_coincident());
    assert_eq!(pts(&intersect(&seg(0, 1), &seg(1, 2)).unwrap()), vec![s("1/1", "0/1")]);
    assert!(intersect(&seg(0, 1), &seg(2, 3)).unwrap().is_empty());

    let axis = Object::Line(Line::from_eq(0, 1, 0).unwrap());
    assert!(intersect(&seg(0, 1), &axis).unwrap().is_coincident());
    assert!(intersect(&axis, &ray(0, 1)).unwrap().is_coincident());

    assert_eq!(pts(&intersect(&ray(0, 1), &ray(0, -1)).unwrap()), vec![s("0/1", "0/1")]);
    assert!(intersect(&ray(0, 1), &ray(-1, -2)).unwrap().is_empty());
    assert!(intersect(&ray(0, 1), &ray(5, 6)).unwrap().is_coincident());
    assert!(intersect(&ray(3, 4), &seg(0, 2)).unwrap().is_empty());
    assert_eq!(pts(&intersect(&ray(2, 1), &seg(2, 5)).unwrap()), vec![s("2/1", "0/1")]);
}

#[test]
fn point_operands_test_incidence() {
    let p = Object::Point(Point::new(1, 1));
    let l = Object::Line(Line::from_eq(1, -1, 0).unwrap());
    assert_eq!(pts(&intersect(&p, &l).unwrap()), vec![s("1/1", "1/1")]);
    assert_eq!(pts(&intersect(&l, &p).unwrap()), vec![s("1/1", "1/1")]);

    let seg = Object::Segment(Segment::new(Point::new(2, 2), Point::new(3, 3)).unwrap());
    assert!(intersect(&p, &seg).unwrap().is_empty());
    let c = Object::Circle(Circle::from_radius_sq(Point::new(0, 0), 2).unwrap());
    assert_eq!(intersect(&p, &c).unwrap().len(), 1);
    assert!(intersect(&p, &Object::Point(Point::new(1, 2))).unwrap().is_empty());
}

#[test]
fn free_points_cannot_be_intersected() {
    let l = Object::Line(Line::from_eq(1, 0, 0).unwrap());
    let free = Object::Point(Point::free("P"));
    let err = intersect(&free, &l).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::UnresolvedFreePoint);
}
