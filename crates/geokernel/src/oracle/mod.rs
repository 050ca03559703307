//! Oracles: values not known to be rational, described by an expression
//! and bracketed lazily by rational intervals.
//!
//! Lifecycle
//! - Created by `ExactValue` arithmetic whenever a result is irrational or its
//!   rationality is undetermined (square roots, mixed expressions).
//! - Refined on demand by sign queries; the only mutable state is the cached
//!   enclosure `(lo, hi, bits)` of each node.
//! - Handles are `Arc`-shared. Two intersection points derived from the same
//!   discriminant share the same `sqrt` leaf and therefore the same cache.
//!
//! Concurrency
//! - Every node owns its own `RwLock`. A refinement computes a fresh
//!   enclosure without holding the lock, then publishes `old ∩ fresh` only if
//!   it is strictly tighter (or more precise). Intervals never widen.

mod cfg;
pub mod interval;

pub use cfg::OracleCfg;
pub use interval::Interval;

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use num::{BigInt, BigRational};

use crate::error::{GeomError, Result};
use crate::value::{ExactValue, RadicalSum};

/// Expression tree of an oracle; operands are exact values (rational leaves or other oracles).
#[derive(Clone, Debug)]
pub enum Expr {
    Sqrt(ExactValue),
    Add(ExactValue, ExactValue),
    Sub(ExactValue, ExactValue),
    Mul(ExactValue, ExactValue),
    Div(ExactValue, ExactValue),
    Neg(ExactValue),
}

/// Symbolic classification used for exact cancellation.
#[derive(Clone, Debug)]
pub(crate) enum Form {
    /// `sqrt(m)` for an integer `m` that is not a perfect square.
    Leaf(BigInt),
    /// Member of the radical fragment `q0 + Σ qi·sqrt(mi)`, never purely rational.
    Sum(RadicalSum),
    /// Outside the radical fragment (nested radicals, non-invertible divisions).
    Opaque,
}

#[derive(Clone, Debug)]
struct Enclosure {
    iv: Interval,
    bits: u32,
}

#[derive(Debug)]
struct Node {
    expr: Expr,
    form: Form,
    cache: RwLock<Option<Enclosure>>,
}

/// Shared handle to an oracle node.
#[derive(Clone, Debug)]
pub struct Oracle(Arc<Node>);

impl Oracle {
    pub(crate) fn with_form(expr: Expr, form: Form) -> Self {
        Oracle(Arc::new(Node {
            expr,
            form,
            cache: RwLock::new(None),
        }))
    }

    pub(crate) fn opaque(expr: Expr) -> Self {
        Self::with_form(expr, Form::Opaque)
    }

    /// `sqrt(m)`; the caller guarantees `m > 0` is not a perfect square.
    pub(crate) fn sqrt_leaf(m: BigInt) -> Self {
        let radicand = ExactValue::Rational(BigRational::from_integer(m.clone()));
        Self::with_form(Expr::Sqrt(radicand), Form::Leaf(m))
    }

    pub fn expr(&self) -> &Expr {
        &self.0.expr
    }

    pub(crate) fn form(&self) -> &Form {
        &self.0.form
    }

    /// True if both handles point at the same node (and share one cache).
    pub fn ptr_eq(&self, other: &Oracle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Fractional bits of the cached enclosure, 0 if never refined.
    pub fn precision(&self) -> u32 {
        self.read_cache().map_or(0, |e| e.bits)
    }

    /// Current best enclosure without refining.
    pub fn cached_interval(&self) -> Option<Interval> {
        self.read_cache().map(|e| e.iv)
    }

    /// Current best enclosure; computes the initial one if the node was never refined.
    pub fn interval(&self) -> Option<Interval> {
        self.cached_interval()
            .or_else(|| self.enclose(OracleCfg::default().initial_bits))
    }

    /// One refinement step with default settings.
    pub fn refine(&self) -> Option<Interval> {
        self.refine_with(&OracleCfg::default())
    }

    /// Raise the working precision by one round and return the new enclosure.
    /// `None` means a divisor inside the expression still straddles zero.
    pub fn refine_with(&self, cfg: &OracleCfg) -> Option<Interval> {
        let bits = match self.precision() {
            0 => cfg.initial_bits,
            b => b.saturating_add(cfg.bits_per_round),
        };
        self.enclose(bits)
    }

    /// Exact sign, refining up to `cfg.max_rounds` rounds.
    pub fn sign_with(&self, cfg: &OracleCfg) -> Result<Ordering> {
        for round in 0..cfg.max_rounds {
            let bits = cfg.bits_for_round(round);
            if let Some(sign) = self.enclose(bits).and_then(|iv| iv.sign()) {
                tracing::debug!(round, bits, sign = ?sign, "oracle sign decided");
                return Ok(sign);
            }
        }
        if self.is_structurally_zero() {
            tracing::debug!(expr = %self, "oracle is a structural zero");
            return Ok(Ordering::Equal);
        }
        tracing::warn!(rounds = cfg.max_rounds, expr = %self, "oracle sign undecided");
        Err(GeomError::IndeterminatePredicate {
            rounds: cfg.max_rounds,
            expr: self.to_string(),
        })
    }

    /// Zero identities visible in the expression itself, e.g. `sub(x, x)`.
    pub fn is_structurally_zero(&self) -> bool {
        match &self.0.expr {
            Expr::Sqrt(a) | Expr::Neg(a) | Expr::Div(a, _) => a.structurally_zero(),
            Expr::Mul(a, b) => a.structurally_zero() || b.structurally_zero(),
            Expr::Sub(a, b) => a.structurally_eq(b),
            Expr::Add(a, b) => {
                (a.structurally_zero() && b.structurally_zero())
                    || is_negation_of(a, b)
                    || is_negation_of(b, a)
            }
        }
    }

    pub(crate) fn structurally_eq(&self, other: &Oracle) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&self.0.expr, &other.0.expr) {
            (Expr::Sqrt(a), Expr::Sqrt(b)) | (Expr::Neg(a), Expr::Neg(b)) => a.structurally_eq(b),
            (Expr::Add(a1, b1), Expr::Add(a2, b2))
            | (Expr::Mul(a1, b1), Expr::Mul(a2, b2)) => {
                (a1.structurally_eq(a2) && b1.structurally_eq(b2))
                    || (a1.structurally_eq(b2) && b1.structurally_eq(a2))
            }
            (Expr::Sub(a1, b1), Expr::Sub(a2, b2)) | (Expr::Div(a1, b1), Expr::Div(a2, b2)) => {
                a1.structurally_eq(a2) && b1.structurally_eq(b2)
            }
            _ => false,
        }
    }

    /// Enclosure at `bits` fractional bits; reuses the cache when it is at least as precise.
    pub(crate) fn enclose(&self, bits: u32) -> Option<Interval> {
        if let Some(hit) = self.read_cache().filter(|e| e.bits >= bits) {
            return Some(hit.iv);
        }
        let fresh = match &self.0.expr {
            Expr::Sqrt(a) => a.enclose(bits)?.sqrt(bits),
            Expr::Add(a, b) => a.enclose(bits)?.add(&b.enclose(bits)?).round_outward(bits),
            Expr::Sub(a, b) => a.enclose(bits)?.sub(&b.enclose(bits)?).round_outward(bits),
            Expr::Mul(a, b) => a.enclose(bits)?.mul(&b.enclose(bits)?).round_outward(bits),
            Expr::Div(a, b) => a
                .enclose(bits)?
                .div(&b.enclose(bits)?)?
                .round_outward(bits),
            Expr::Neg(a) => a.enclose(bits)?.neg(),
        };
        Some(self.publish(fresh, bits))
    }

    fn read_cache(&self) -> Option<Enclosure> {
        self.0
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the cached enclosure with `old ∩ fresh` if that is an improvement.
    fn publish(&self, fresh: Interval, bits: u32) -> Interval {
        let mut slot = self.0.cache.write().unwrap_or_else(PoisonError::into_inner);
        let next = match slot.as_ref() {
            Some(old) => {
                let iv = old.iv.intersect(&fresh).unwrap_or_else(|| {
                    debug_assert!(false, "disjoint enclosures of one value");
                    old.iv.clone()
                });
                Enclosure {
                    iv,
                    bits: bits.max(old.bits),
                }
            }
            None => Enclosure { iv: fresh, bits },
        };
        match slot.as_ref() {
            Some(old) if next.bits <= old.bits && next.iv.width() >= old.iv.width() => {
                old.iv.clone()
            }
            _ => {
                let iv = next.iv.clone();
                *slot = Some(next);
                iv
            }
        }
    }
}

fn is_negation_of(a: &ExactValue, b: &ExactValue) -> bool {
    match b {
        ExactValue::Oracle(o) => matches!(o.expr(), Expr::Neg(inner) if inner.structurally_eq(a)),
        ExactValue::Rational(_) => false,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Sqrt(a) => write!(f, "sqrt({a})"),
            Expr::Add(a, b) => write!(f, "add({a},{b})"),
            Expr::Sub(a, b) => write!(f, "sub({a},{b})"),
            Expr::Mul(a, b) => write!(f, "mul({a},{b})"),
            Expr::Div(a, b) => write!(f, "div({a},{b})"),
            Expr::Neg(a) => write!(f, "neg({a})"),
        }
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.expr.fmt(f)
    }
}
