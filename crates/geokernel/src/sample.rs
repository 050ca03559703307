//! Reproducible random rational scenes (points, lines, circles).
//!
//! Purpose
//! - Feed property tests and benches with exact inputs drawn from a small
//!   rational grid, so that every draw can be replayed from `(seed, index)`.
//!
//! Model
//! - A coordinate is `p/q` with `|p| ≤ max_numer` and `1 ≤ q ≤ max_denom`.
//! - Lines go through two distinct drawn points; circles are centered at a
//!   drawn point and pass through another, so `radius_sq` stays rational.
//!
//! References
//! - Code cross-refs: `primitives::{Point, Line, Circle}`

use num::BigRational;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::primitives::{Circle, Line, Point};
use crate::value::ExactValue;

/// Consecutive repeated draws after which `distinct_points` gives up.
const MAX_REJECTS: usize = 1024;

/// Grid the sampler draws coordinates from.
#[derive(Clone, Copy, Debug)]
pub struct RationalBounds {
    /// Clamped to at least 1.
    pub max_numer: i64,
    /// Clamped to at least 1.
    pub max_denom: i64,
}

impl Default for RationalBounds {
    fn default() -> Self {
        Self {
            max_numer: 12,
            max_denom: 4,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Stateful sampler; one token yields one deterministic stream of draws.
pub struct Sampler {
    bounds: RationalBounds,
    rng: StdRng,
}

impl Sampler {
    pub fn new(bounds: RationalBounds, tok: ReplayToken) -> Self {
        Self {
            bounds,
            rng: tok.to_std_rng(),
        }
    }

    pub fn rational(&mut self) -> ExactValue {
        let n = self.bounds.max_numer.saturating_abs().max(1);
        let d = self.bounds.max_denom.max(1);
        let p = self.rng.gen_range(-n..=n);
        let q = self.rng.gen_range(1..=d);
        ExactValue::Rational(BigRational::new(p.into(), q.into()))
    }

    pub fn point(&mut self) -> Point {
        let x = self.rational();
        let y = self.rational();
        Point::new(x, y)
    }

    /// Up to `n` pairwise distinct points; draws are rational, so distinctness
    /// is exact. Stops early once `MAX_REJECTS` draws in a row repeat a point,
    /// which happens when the grid holds fewer than `n` values.
    pub fn distinct_points(&mut self, n: usize) -> Vec<Point> {
        let mut out: Vec<Point> = Vec::with_capacity(n);
        let mut rejects = 0;
        while out.len() < n && rejects < MAX_REJECTS {
            let p = self.point();
            if out.iter().any(|q| q.coincides(&p).unwrap_or(true)) {
                rejects += 1;
            } else {
                out.push(p);
                rejects = 0;
            }
        }
        out
    }

    pub fn line(&mut self) -> Line {
        loop {
            if let [p, q] = self.distinct_points(2).as_slice() {
                if let Ok(l) = Line::through(p, q) {
                    return l;
                }
            }
        }
    }

    /// Circle with a strictly positive rational `radius_sq`.
    pub fn circle(&mut self) -> Circle {
        loop {
            if let [p, q] = self.distinct_points(2).as_slice() {
                if let Ok(c) = Circle::through(p.clone(), q) {
                    return c;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::{BigInt, Signed};

    #[test]
    fn reproducible_draws() {
        let tok = ReplayToken { seed: 42, index: 7 };
        let mut a = Sampler::new(RationalBounds::default(), tok);
        let mut b = Sampler::new(RationalBounds::default(), tok);
        for _ in 0..16 {
            assert_eq!(a.rational().to_string(), b.rational().to_string());
        }
        let draw = |index| {
            let mut s = Sampler::new(RationalBounds::default(), ReplayToken { seed: 42, index });
            (0..16).map(|_| s.rational().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
        assert_ne!(draw(7), draw(8));
    }

    #[test]
    fn draws_respect_bounds() {
        let bounds = RationalBounds {
            max_numer: 3,
            max_denom: 2,
        };
        let mut s = Sampler::new(bounds, ReplayToken { seed: 1, index: 0 });
        for _ in 0..64 {
            let v = s.rational();
            let q = v.as_rational().unwrap();
            assert!(q.numer().abs() <= BigInt::from(3));
            assert!(*q.denom() <= BigInt::from(2));
        }
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let bounds = RationalBounds {
            max_numer: i64::MIN,
            max_denom: i64::MIN,
        };
        let mut s = Sampler::new(bounds, ReplayToken { seed: 5, index: 0 });
        for _ in 0..16 {
            let q = s.rational().as_rational().unwrap().clone();
            assert_eq!(*q.denom(), BigInt::from(1));
        }
    }

    #[test]
    fn distinct_points_stop_when_the_grid_is_exhausted() {
        // |p| <= 1 and q = 1 leaves a 3x3 grid
        let bounds = RationalBounds {
            max_numer: 1,
            max_denom: 1,
        };
        let mut s = Sampler::new(bounds, ReplayToken { seed: 2, index: 4 });
        let pts = s.distinct_points(10);
        assert!(pts.len() <= 9);
        assert!(pts.len() >= 2);
        for (i, p) in pts.iter().enumerate() {
            for q in &pts[i + 1..] {
                assert!(!p.coincides(q).unwrap());
            }
        }
        let _ = s.line();
        let _ = s.circle();
    }

    #[test]
    fn circles_and_lines_are_rational_and_proper() {
        let mut s = Sampler::new(RationalBounds::default(), ReplayToken { seed: 9, index: 3 });
        for _ in 0..8 {
            let c = s.circle();
            assert!(c.radius_sq().is_rational());
            assert!(!c.radius_sq().is_zero().unwrap());
            let l = s.line();
            let (a, b, _) = l.coefficients();
            assert!(!(a.is_zero().unwrap() && b.is_zero().unwrap()));
        }
        let pts = s.distinct_points(5);
        for (i, p) in pts.iter().enumerate() {
            for q in &pts[i + 1..] {
                assert!(!p.coincides(q).unwrap());
            }
        }
    }
}
