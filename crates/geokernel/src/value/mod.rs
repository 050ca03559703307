//! `ExactValue`: exact rational or oracle; every coordinate and coefficient
//! in the kernel is one of these.
//!
//! Invariants
//! - `Rational` is always in lowest terms with a positive denominator
//!   (guaranteed by `BigRational`).
//! - Rational ∘ Rational stays rational for `+ − × ÷`, and `sqrt` of a
//!   rational square is rational.
//! - Results in the radical fragment that cancel to a rational are returned as
//!   `Rational` (`sqrt(k)·sqrt(k) = k`, `sqrt(x) − sqrt(x) = 0`).
//! - Anything else involving an oracle is an oracle.

mod radical;

pub(crate) use radical::RadicalSum;

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{GeomError, Result};
use crate::oracle::{Expr, Form, Interval, Oracle, OracleCfg};

/// Precision used for float previews.
const APPROX_BITS: u32 = 64;

#[derive(Clone, Debug)]
pub enum ExactValue {
    Rational(BigRational),
    Oracle(Oracle),
}

#[derive(Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
}

impl ExactValue {
    pub fn zero() -> Self {
        ExactValue::Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        ExactValue::Rational(BigRational::one())
    }

    pub fn from_integer(n: i64) -> Self {
        ExactValue::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// `numer / denom`, reduced.
    pub fn ratio(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(GeomError::arithmetic("zero denominator"));
        }
        Ok(ExactValue::Rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            ExactValue::Rational(q) => Some(q),
            ExactValue::Oracle(_) => None,
        }
    }

    pub fn as_oracle(&self) -> Option<&Oracle> {
        match self {
            ExactValue::Rational(_) => None,
            ExactValue::Oracle(o) => Some(o),
        }
    }

    pub fn is_rational(&self) -> bool {
        matches!(self, ExactValue::Rational(_))
    }

    /// Sign relative to zero (`compareToZero`) with default refinement settings.
    pub fn sign(&self) -> Result<Ordering> {
        self.sign_with(&OracleCfg::default())
    }

    pub fn sign_with(&self, cfg: &OracleCfg) -> Result<Ordering> {
        match self {
            ExactValue::Rational(q) => Ok(q.cmp(&BigRational::zero())),
            ExactValue::Oracle(o) => o.sign_with(cfg),
        }
    }

    pub fn is_zero(&self) -> Result<bool> {
        self.is_zero_with(&OracleCfg::default())
    }

    pub fn is_zero_with(&self, cfg: &OracleCfg) -> Result<bool> {
        Ok(self.sign_with(cfg)? == Ordering::Equal)
    }

    /// `compareTo`: sign of `self − other`.
    pub fn cmp_exact(&self, other: &ExactValue) -> Result<Ordering> {
        self.cmp_exact_with(other, &OracleCfg::default())
    }

    pub fn cmp_exact_with(&self, other: &ExactValue, cfg: &OracleCfg) -> Result<Ordering> {
        if let (ExactValue::Rational(p), ExactValue::Rational(q)) = (self, other) {
            return Ok(p.cmp(q));
        }
        (self - other).sign_with(cfg)
    }

    pub fn square(&self) -> ExactValue {
        self * self
    }

    pub fn checked_div(&self, other: &ExactValue) -> Result<ExactValue> {
        self.checked_div_with(other, &OracleCfg::default())
    }

    /// Division; a divisor that is (or decides to) zero is an arithmetic error.
    pub fn checked_div_with(&self, other: &ExactValue, cfg: &OracleCfg) -> Result<ExactValue> {
        match (self, other) {
            (_, ExactValue::Rational(q)) if q.is_zero() => {
                return Err(GeomError::arithmetic("division by zero"))
            }
            (ExactValue::Rational(p), ExactValue::Rational(q)) => {
                return Ok(ExactValue::Rational(p / q))
            }
            _ => {}
        }
        let divisor = other.radical_form();
        if let (Some(x), Some(y)) = (self.radical_form(), divisor.as_ref()) {
            if let Some(inv) = y.inverse() {
                return Ok(x.mul(&inv).into_value());
            }
        }
        // Radical-form oracles are never zero; opaque divisors must be decided.
        if divisor.is_none() && other.sign_with(cfg)? == Ordering::Equal {
            return Err(GeomError::arithmetic(format!("division by zero value {other}")));
        }
        if matches!(self, ExactValue::Rational(p) if p.is_zero()) {
            return Ok(ExactValue::zero());
        }
        Ok(ExactValue::Oracle(Oracle::opaque(Expr::Div(
            self.clone(),
            other.clone(),
        ))))
    }

    pub fn sqrt(&self) -> Result<ExactValue> {
        self.sqrt_with(&OracleCfg::default())
    }

    /// Square root. Rational squares stay rational; other rationals become
    /// `c·sqrt(m)` over a fresh leaf; oracles become nested radicals.
    pub fn sqrt_with(&self, cfg: &OracleCfg) -> Result<ExactValue> {
        match self {
            ExactValue::Rational(q) => {
                if q.is_negative() {
                    return Err(GeomError::arithmetic(format!("square root of {self}")));
                }
                if q.is_zero() {
                    return Ok(ExactValue::zero());
                }
                let (root, m) = radical::split_square(&(q.numer() * q.denom()));
                let coeff = BigRational::new(root, q.denom().clone());
                if m.is_one() {
                    return Ok(ExactValue::Rational(coeff));
                }
                tracing::trace!(radicand = %m, "new sqrt leaf");
                let leaf = Oracle::sqrt_leaf(m.clone());
                Ok(RadicalSum::term(coeff, m, leaf).into_value())
            }
            ExactValue::Oracle(_) => match self.sign_with(cfg)? {
                Ordering::Less => Err(GeomError::arithmetic(format!("square root of {self}"))),
                Ordering::Equal => Ok(ExactValue::zero()),
                Ordering::Greater => Ok(ExactValue::Oracle(Oracle::opaque(Expr::Sqrt(
                    self.clone(),
                )))),
            },
        }
    }

    /// Float preview; never used for decisions.
    pub fn approx(&self) -> f64 {
        let q = match self {
            ExactValue::Rational(q) => Some(q.clone()),
            ExactValue::Oracle(o) => o.enclose(APPROX_BITS).map(|iv| iv.midpoint()),
        };
        q.and_then(|q| q.to_f64()).unwrap_or(f64::NAN)
    }

    pub(crate) fn enclose(&self, bits: u32) -> Option<Interval> {
        match self {
            ExactValue::Rational(q) => Some(Interval::point(q.clone())),
            ExactValue::Oracle(o) => o.enclose(bits),
        }
    }

    pub(crate) fn radical_form(&self) -> Option<RadicalSum> {
        match self {
            ExactValue::Rational(q) => Some(RadicalSum::rational(q.clone())),
            ExactValue::Oracle(o) => match o.form() {
                Form::Leaf(m) => Some(RadicalSum::term(BigRational::one(), m.clone(), o.clone())),
                Form::Sum(s) => Some(s.clone()),
                Form::Opaque => None,
            },
        }
    }

    pub(crate) fn structurally_zero(&self) -> bool {
        match self {
            ExactValue::Rational(q) => q.is_zero(),
            ExactValue::Oracle(o) => o.is_structurally_zero(),
        }
    }

    pub(crate) fn structurally_eq(&self, other: &ExactValue) -> bool {
        match (self, other) {
            (ExactValue::Rational(p), ExactValue::Rational(q)) => p == q,
            (ExactValue::Oracle(a), ExactValue::Oracle(b)) => a.structurally_eq(b),
            _ => false,
        }
    }

    fn combine(&self, other: &ExactValue, op: BinOp) -> ExactValue {
        use ExactValue::Rational as R;
        match (self, other, op) {
            (R(p), R(q), BinOp::Add) => return R(p + q),
            (R(p), R(q), BinOp::Sub) => return R(p - q),
            (R(p), R(q), BinOp::Mul) => return R(p * q),
            (R(p), _, BinOp::Mul) | (_, R(p), BinOp::Mul) if p.is_zero() => {
                return ExactValue::zero()
            }
            (R(p), x, BinOp::Add) | (x, R(p), BinOp::Add | BinOp::Sub) if p.is_zero() => {
                return x.clone()
            }
            _ => {}
        }
        match (self.radical_form(), other.radical_form()) {
            (Some(x), Some(y)) => match op {
                BinOp::Add => x.add(&y),
                BinOp::Sub => x.add(&y.neg()),
                BinOp::Mul => x.mul(&y),
            }
            .into_value(),
            _ => {
                let (a, b) = (self.clone(), other.clone());
                ExactValue::Oracle(Oracle::opaque(match op {
                    BinOp::Add => Expr::Add(a, b),
                    BinOp::Sub => Expr::Sub(a, b),
                    BinOp::Mul => Expr::Mul(a, b),
                }))
            }
        }
    }
}

macro_rules! binop {
    ($tr:ident, $method:ident, $op:expr) => {
        impl $tr<&ExactValue> for &ExactValue {
            type Output = ExactValue;
            fn $method(self, rhs: &ExactValue) -> ExactValue {
                self.combine(rhs, $op)
            }
        }
        impl $tr<ExactValue> for ExactValue {
            type Output = ExactValue;
            fn $method(self, rhs: ExactValue) -> ExactValue {
                self.combine(&rhs, $op)
            }
        }
        impl $tr<&ExactValue> for ExactValue {
            type Output = ExactValue;
            fn $method(self, rhs: &ExactValue) -> ExactValue {
                self.combine(rhs, $op)
            }
        }
        impl $tr<ExactValue> for &ExactValue {
            type Output = ExactValue;
            fn $method(self, rhs: ExactValue) -> ExactValue {
                self.combine(&rhs, $op)
            }
        }
    };
}

binop!(Add, add, BinOp::Add);
binop!(Sub, sub, BinOp::Sub);
binop!(Mul, mul, BinOp::Mul);

impl Neg for &ExactValue {
    type Output = ExactValue;
    fn neg(self) -> ExactValue {
        match self {
            ExactValue::Rational(q) => ExactValue::Rational(-q),
            ExactValue::Oracle(o) => match self.radical_form() {
                Some(form) => form.neg().into_value(),
                None => ExactValue::Oracle(Oracle::opaque(Expr::Neg(ExactValue::Oracle(
                    o.clone(),
                )))),
            },
        }
    }
}

impl Neg for ExactValue {
    type Output = ExactValue;
    fn neg(self) -> ExactValue {
        -&self
    }
}

impl From<i64> for ExactValue {
    fn from(n: i64) -> Self {
        ExactValue::from_integer(n)
    }
}

impl From<i32> for ExactValue {
    fn from(n: i32) -> Self {
        ExactValue::from_integer(i64::from(n))
    }
}

impl From<BigInt> for ExactValue {
    fn from(n: BigInt) -> Self {
        ExactValue::Rational(BigRational::from_integer(n))
    }
}

impl From<BigRational> for ExactValue {
    fn from(q: BigRational) -> Self {
        ExactValue::Rational(q)
    }
}

impl FromStr for ExactValue {
    type Err = GeomError;

    /// Accepts `p/q` or an integer `p`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |t: &str| {
            BigInt::from_str(t.trim()).map_err(|e| GeomError::Parse(format!("{s:?}: {e}")))
        };
        match s.split_once('/') {
            Some((p, q)) => {
                let (p, q) = (parse(p)?, parse(q)?);
                if q.is_zero() {
                    return Err(GeomError::Parse(format!("{s:?}: zero denominator")));
                }
                Ok(ExactValue::Rational(BigRational::new(p, q)))
            }
            None => Ok(ExactValue::from(parse(s)?)),
        }
    }
}

impl fmt::Display for ExactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExactValue::Rational(q) => write!(f, "{}/{}", q.numer(), q.denom()),
            ExactValue::Oracle(o) => o.fmt(f),
        }
    }
}

/// `"p/q"` for rationals; `{expr, interval}` for oracles (interval informational only).
impl Serialize for ExactValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ExactValue::Rational(_) => serializer.serialize_str(&self.to_string()),
            ExactValue::Oracle(o) => {
                let mut st = serializer.serialize_struct("Oracle", 2)?;
                st.serialize_field("expr", &o.to_string())?;
                st.serialize_field("interval", &o.interval().map(|iv| iv.to_string()))?;
                st.end()
            }
        }
    }
}
