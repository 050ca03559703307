//! Closed rational intervals with outward dyadic rounding.

use std::cmp::Ordering;
use std::fmt;

use num::{BigInt, BigRational, One, Signed, Zero};

/// Closed interval `[lo, hi]` with rational bounds, `lo <= hi`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lo: BigRational,
    pub hi: BigRational,
}

fn scale(bits: u32) -> BigRational {
    BigRational::from_integer(BigInt::one() << bits as usize)
}

fn floor_dyadic(q: &BigRational, bits: u32) -> BigRational {
    let s = scale(bits);
    (q * &s).floor() / s
}

fn ceil_dyadic(q: &BigRational, bits: u32) -> BigRational {
    let s = scale(bits);
    (q * &s).ceil() / s
}

/// `floor(sqrt(q) * 2^bits) / 2^bits` for `q >= 0`.
fn sqrt_floor_dyadic(q: &BigRational, bits: u32) -> BigRational {
    let s4 = scale(2 * bits);
    let n = (q * s4).floor().to_integer();
    BigRational::new(n.sqrt(), BigInt::one() << bits as usize)
}

/// Dyadic upper bound of `sqrt(q)` within `2^-bits`, `q >= 0`.
fn sqrt_ceil_dyadic(q: &BigRational, bits: u32) -> BigRational {
    let s4 = scale(2 * bits);
    let n = (q * s4).ceil().to_integer();
    let mut r = n.sqrt();
    if &r * &r < n {
        r += 1u32;
    }
    BigRational::new(r, BigInt::one() << bits as usize)
}

impl Interval {
    pub fn new(lo: BigRational, hi: BigRational) -> Self {
        debug_assert!(lo <= hi, "interval bounds out of order");
        Self { lo, hi }
    }

    pub fn point(q: BigRational) -> Self {
        Self {
            lo: q.clone(),
            hi: q,
        }
    }

    pub fn width(&self) -> BigRational {
        &self.hi - &self.lo
    }

    pub fn contains(&self, q: &BigRational) -> bool {
        &self.lo <= q && q <= &self.hi
    }

    pub fn contains_zero(&self) -> bool {
        !self.lo.is_positive() && !self.hi.is_negative()
    }

    /// Sign of every member, if it is the same across the interval.
    pub fn sign(&self) -> Option<Ordering> {
        if self.lo.is_positive() {
            Some(Ordering::Greater)
        } else if self.hi.is_negative() {
            Some(Ordering::Less)
        } else if self.lo.is_zero() && self.hi.is_zero() {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    pub fn add(&self, other: &Interval) -> Interval {
        Interval::new(&self.lo + &other.lo, &self.hi + &other.hi)
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        Interval::new(&self.lo - &other.hi, &self.hi - &other.lo)
    }

    pub fn neg(&self) -> Interval {
        Interval::new(-&self.hi, -&self.lo)
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        let products = [
            &self.lo * &other.lo,
            &self.lo * &other.hi,
            &self.hi * &other.lo,
            &self.hi * &other.hi,
        ];
        let mut lo = products[0].clone();
        let mut hi = products[0].clone();
        for p in &products[1..] {
            if p < &lo {
                lo = p.clone();
            }
            if p > &hi {
                hi = p.clone();
            }
        }
        Interval::new(lo, hi)
    }

    /// `None` when the divisor interval contains zero.
    pub fn div(&self, other: &Interval) -> Option<Interval> {
        if other.contains_zero() {
            return None;
        }
        let recip = Interval::new(other.hi.recip(), other.lo.recip());
        Some(self.mul(&recip))
    }

    /// Enclosure of `sqrt` over the non-negative part of the interval.
    pub fn sqrt(&self, bits: u32) -> Interval {
        let zero = BigRational::zero();
        let lo = if self.lo.is_negative() {
            zero.clone()
        } else {
            self.lo.clone()
        };
        let hi = if self.hi.is_negative() {
            zero
        } else {
            self.hi.clone()
        };
        Interval::new(sqrt_floor_dyadic(&lo, bits), sqrt_ceil_dyadic(&hi, bits))
    }

    /// Round bounds outward to multiples of `2^-bits`.
    pub fn round_outward(&self, bits: u32) -> Interval {
        Interval::new(floor_dyadic(&self.lo, bits), ceil_dyadic(&self.hi, bits))
    }

    /// Both operands enclose the same value, so the result is non-empty for valid inputs.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lo = if self.lo >= other.lo {
            &self.lo
        } else {
            &other.lo
        };
        let hi = if self.hi <= other.hi {
            &self.hi
        } else {
            &other.hi
        };
        (lo <= hi).then(|| Interval::new(lo.clone(), hi.clone()))
    }

    pub fn midpoint(&self) -> BigRational {
        (&self.lo + &self.hi) / BigRational::from_integer(BigInt::from(2))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{},{}/{}]",
            self.lo.numer(),
            self.lo.denom(),
            self.hi.numer(),
            self.hi.denom()
        )
    }
}
